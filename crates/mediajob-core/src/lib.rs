//! # mediajob-core
//!
//! Core crate for the media job worker. Contains the unified error system,
//! configuration schemas, tracing setup, and the traits describing the
//! process-wide collaborators a job talks to (diagnostics sink and fallback
//! publish channel).
//!
//! This crate has **no** internal dependencies on other mediajob crates.

pub mod config;
pub mod error;
pub mod result;
pub mod telemetry;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
