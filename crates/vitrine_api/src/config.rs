//! Runtime configuration for the API server.
//!
//! # Responsibility
//! - Parse CLI flags and environment variables into one typed config.
//!
//! # Invariants
//! - Every knob has a workable default so `vitrine_api` starts bare.

use clap::Parser;
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Storefront catalog/order HTTP API.
#[derive(Debug, Parser)]
#[command(name = "vitrine_api", version, about)]
pub struct ApiConfig {
    /// Socket address to bind.
    #[arg(long, env = "VITRINE_BIND_ADDR", default_value = "127.0.0.1:8080")]
    pub bind_addr: SocketAddr,

    /// SQLite database file path.
    #[arg(long, env = "VITRINE_DB_PATH", default_value = "vitrine.db")]
    pub db_path: PathBuf,

    /// Log level (trace|debug|info|warn|error). Defaults per build mode.
    #[arg(long, env = "VITRINE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Directory for rolling log files. Relative paths are resolved
    /// against the working directory at startup.
    #[arg(long, env = "VITRINE_LOG_DIR", default_value = "logs")]
    pub log_dir: PathBuf,

    /// Base URL of the external ranking service.
    #[arg(
        long,
        env = "VITRINE_RECOMMENDER_URL",
        default_value = "http://127.0.0.1:9090"
    )]
    pub recommender_url: String,

    /// Upper bound for one ranking call, in milliseconds.
    #[arg(long, env = "VITRINE_RECOMMENDER_TIMEOUT_MS", default_value_t = 2_000)]
    pub recommender_timeout_ms: u64,
}

impl ApiConfig {
    /// Returns `log_dir` as an absolute path, which the core logging
    /// bootstrap requires.
    pub fn absolute_log_dir(&self) -> io::Result<PathBuf> {
        if self.log_dir.is_absolute() {
            return Ok(self.log_dir.clone());
        }
        Ok(std::env::current_dir()?.join(&self.log_dir))
    }
}
