//! Request middleware: authentication extractors, RBAC, request logging.

pub mod auth;
pub mod logging;
pub mod rbac;
