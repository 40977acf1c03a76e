//! Shared utilities for the Asset Manager backend.
//!
//! - CSV reading and writing
//! - Password hashing with Argon2id
//! - Session token issuing and validation
//! - Common field validation helpers

pub mod csv;
pub mod jwt;
pub mod password;
pub mod validation;
