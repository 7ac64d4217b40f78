//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define per-resource data access contracts for catalog and ledger.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes must enforce model `validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`,
//!   `InvalidTransition`) in addition to DB transport errors.

pub mod order_repo;
pub mod product_repo;
