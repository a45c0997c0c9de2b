//! Utilities
//!
//! Shared helpers: error types and identifier derivation.

pub mod error;
pub mod ids;

pub use error::{AppError, AppResult};
