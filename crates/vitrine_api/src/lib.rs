//! HTTP surface for the Vitrine storefront core.
//!
//! # Responsibility
//! - Map catalog, ledger and recommendation operations onto routes.
//! - Perform input validation and identity extraction before delegating.
//!
//! # Invariants
//! - No business logic lives here; handlers validate, delegate to
//!   `vitrine_core`, and serialize the outcome.
//! - Core calls run on blocking threads; the async executor is never
//!   stalled by SQLite or the ranking client.

pub mod config;
pub mod error;
pub mod identity;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use routes::build_router;
pub use state::{AppState, SharedState};
