//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep the HTTP surface decoupled from storage details.

pub mod catalog_service;
pub mod order_service;
