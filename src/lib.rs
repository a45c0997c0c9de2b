//! Memoir Vault - Content Storage Library
//!
//! File-backed storage and retrieval for a personal memoir application.
//! It includes:
//! - Account store with PBKDF2 password hashing
//! - Image store (JPEG renditions, thumbnails, metadata sidecars)
//! - Question bank store (CSV seed banks, per-user JSON banks)
//! - Answer persistence keyed by session and question
//! - Vignette store with a derived published mirror
//! - Case-insensitive search across all answers

pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;

// Re-export commonly used items
pub use services::{
    AccountStore, ImageStore, QuestionBankStore, ResponseStore, SearchHit, VignetteStore,
    search_all_answers,
};
pub use state::Workspace;
pub use storage::{ConfigService, DataLayout, StoreConfig};
pub use utils::{AppError, AppResult};
