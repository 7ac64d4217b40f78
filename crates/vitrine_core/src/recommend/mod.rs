//! Recommendation gateway boundary.
//!
//! # Responsibility
//! - Define the contract for the external ranking capability.
//! - Keep the ranking mechanism opaque: core validates count bounds and
//!   response shape, never model internals.

pub mod gateway;
