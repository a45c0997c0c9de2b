//! Vignette Models
//!
//! Short free-standing stories, distinct from the structured
//! question/answer flow. Drafts and published vignettes live in the same
//! per-user source file; the published-only mirror is derived from it.

use serde::{Deserialize, Serialize};

/// Suggested themes offered at composition time; free text is also allowed.
pub const SUGGESTED_THEMES: &[&str] = &[
    "childhood",
    "family",
    "career",
    "travel",
    "love",
    "loss",
    "tradition",
    "turning point",
];

/// One vignette record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vignette {
    /// 8-char UUID-derived id
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub theme: String,
    pub word_count: usize,
    pub is_draft: bool,
    pub is_published: bool,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub likes: u64,
}

/// Listing filters over a user's vignettes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VignetteFilter {
    All,
    PublishedOnly,
    DraftsOnly,
}

impl VignetteFilter {
    /// Whether a vignette passes this filter.
    pub fn matches(&self, vignette: &Vignette) -> bool {
        match self {
            VignetteFilter::All => true,
            VignetteFilter::PublishedOnly => vignette.is_published,
            VignetteFilter::DraftsOnly => vignette.is_draft,
        }
    }
}
