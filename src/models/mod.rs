//! Data Models
//!
//! Contains all data structures persisted by the stores.

pub mod account;
pub mod answer;
pub mod image;
pub mod question_bank;
pub mod vignette;

pub use account::*;
pub use answer::*;
pub use image::*;
pub use question_bank::*;
pub use vignette::*;
