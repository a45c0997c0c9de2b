//! Question Bank Models
//!
//! Banks are ordered collections of sessions; each session is a titled
//! group of prompt questions sharing guidance text and a word target.
//!
//! Sessions carry two identifiers: `id` is the 1-based display position,
//! renumbered whenever sessions are reordered or deleted, and `key` is an
//! immutable surrogate assigned at creation. Answers reference sessions by
//! `key`, so they survive reorders.

use serde::{Deserialize, Serialize};

use crate::utils::ids::short_uuid;

fn new_session_key() -> String {
    short_uuid()
}

fn default_word_target() -> u32 {
    500
}

/// One session: a titled, ordered group of prompt questions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUnit {
    /// 1-based display position, contiguous within a bank
    pub id: u32,
    /// Stable surrogate key, never reassigned
    #[serde(default = "new_session_key")]
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub guidance: String,
    #[serde(default)]
    pub questions: Vec<String>,
    #[serde(default = "default_word_target")]
    pub word_target: u32,
}

impl SessionUnit {
    /// Create a session with a fresh surrogate key at display position `id`.
    pub fn new(id: u32, title: impl Into<String>, guidance: impl Into<String>, word_target: u32) -> Self {
        Self {
            id,
            key: new_session_key(),
            title: title.into(),
            guidance: guidance.into(),
            questions: Vec::new(),
            word_target,
        }
    }
}

/// Where a bank summary came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BankSource {
    /// Read-only CSV seed file
    Seed,
    /// User-owned editable JSON bank
    Custom,
}

/// Catalog entry describing a bank without its full content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub session_count: usize,
    pub question_count: usize,
    #[serde(default)]
    pub updated_at: Option<String>,
    pub source: BankSource,
}

/// A full question bank as persisted in
/// `question_banks/users/<user_id>/<bank_id>.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionBank {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub sessions: Vec<SessionUnit>,
}

impl QuestionBank {
    /// Summary for the catalog, computed from the bank's content.
    pub fn summary(&self) -> BankSummary {
        BankSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            session_count: self.sessions.len(),
            question_count: self.sessions.iter().map(|s| s.questions.len()).sum(),
            updated_at: Some(self.updated_at.clone()),
            source: BankSource::Custom,
        }
    }

    /// Reassign every session's display id to its 1-based position.
    pub fn renumber_sessions(&mut self) {
        for (index, session) in self.sessions.iter_mut().enumerate() {
            session.id = (index + 1) as u32;
        }
    }

    /// Find a session by its stable key.
    pub fn session_by_key(&self, key: &str) -> Option<&SessionUnit> {
        self.sessions.iter().find(|s| s.key == key)
    }

    /// Find a session by its stable key, mutably.
    pub fn session_by_key_mut(&mut self, key: &str) -> Option<&mut SessionUnit> {
        self.sessions.iter_mut().find(|s| s.key == key)
    }
}
