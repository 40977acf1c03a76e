//! Application services that combine repositories with domain rules.

pub mod assets;
pub mod auth;
pub mod orders;
