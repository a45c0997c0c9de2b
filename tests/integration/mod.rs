//! Integration Tests Module
//!
//! End-to-end tests over a temporary data root. Tests cover the account
//! lifecycle, question bank editing and CSV export, image upload and
//! embedding, vignette publishing, and cross-answer search.

// Account creation, authentication and administrative deletion
mod account_test;

// Seed banks, custom banks and session editing
mod question_bank_test;

// Upload, rendition resolution and export embedding
mod image_test;


// Workspace answers and cross-answer search
mod search_test;
