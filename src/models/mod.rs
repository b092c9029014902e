//! Domain models and DTOs.

pub mod file;
pub mod user;
