//! Business logic services.

pub mod auth;
pub mod files;
pub mod usage;
