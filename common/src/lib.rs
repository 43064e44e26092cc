//! Shared building blocks for the HackMate services.
//!
//! Configuration, the error type, the JSON response envelope, middleware
//! and the document models all live here so that route code stays thin.

pub mod config;
pub mod errors;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod response;
pub mod utils;
