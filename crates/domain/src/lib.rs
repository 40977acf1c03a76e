//! Domain layer for the Asset Manager backend.
//!
//! This crate contains:
//! - Domain models (Asset, Order, Device, PendingRequest, Employee, User)
//! - Business rules as pure functions (validation, lifecycle, filtering,
//!   CSV mapping, stock aggregation)
//! - Domain error types

pub mod error;
pub mod models;
pub mod services;

pub use error::DomainError;
