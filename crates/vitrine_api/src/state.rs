//! Shared server state and the sync-core bridge.
//!
//! # Responsibility
//! - Own the SQLite connection and the recommendation gateway handle.
//! - Serialize store access behind one mutex so each core call is atomic
//!   with respect to the invariants it enforces.

use crate::error::ApiError;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use vitrine_core::{GatewayResult, ProductId, RecommendationGateway};

pub type SharedState = Arc<AppState>;

/// Process-wide state handed to every handler.
pub struct AppState {
    db: Mutex<Connection>,
    gateway: Box<dyn RecommendationGateway + Send + Sync>,
}

impl AppState {
    /// Builds state from a migrated connection and a gateway
    /// implementation.
    pub fn new(
        db: Connection,
        gateway: impl RecommendationGateway + Send + Sync + 'static,
    ) -> Self {
        Self {
            db: Mutex::new(db),
            gateway: Box::new(gateway),
        }
    }

    /// Runs `f` with exclusive access to the store connection.
    pub fn with_db<T>(&self, f: impl FnOnce(&Connection) -> T) -> T {
        let guard = self
            .db
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&guard)
    }

    /// Forwards a ranking call to the configured gateway.
    pub fn recommend(&self, features: &[f64], count: usize) -> GatewayResult<Vec<ProductId>> {
        self.gateway.recommend(features, count)
    }
}

/// Runs a core closure on a blocking thread with store access.
///
/// SQLite calls are synchronous; running them through `spawn_blocking`
/// keeps the async executor responsive under load.
pub async fn run_core<T, F>(state: SharedState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Connection) -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || state.with_db(f))
        .await
        .map_err(|_| ApiError::internal("store task aborted"))
}
