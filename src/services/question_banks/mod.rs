//! Question Bank Services
//!
//! Seed CSV parsing/export and user bank persistence.

pub mod seed;
pub mod store;

pub use seed::{parse_seed_csv, sessions_to_csv};
pub use store::QuestionBankStore;
