//! Answer Models
//!
//! Per-user answer maps keyed by (session key, question text). The question
//! text is the join key: renaming a question orphans its prior answer.

use serde::{Deserialize, Serialize};

use crate::models::image::ImageRef;

/// One recorded answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub text: String,
    #[serde(default)]
    pub has_images: bool,
    #[serde(default)]
    pub images: Vec<ImageRef>,
    pub timestamp: String,
    pub word_count: usize,
}

/// One answer map entry, addressed by session key and question text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerEntry {
    pub session_key: String,
    pub question: String,
    #[serde(flatten)]
    pub record: AnswerRecord,
}

/// A user's complete answer map, persisted as
/// `responses/<trunc_hash(user_id)>.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseSet {
    pub user_id: String,
    #[serde(default)]
    pub answers: Vec<AnswerEntry>,
}

impl ResponseSet {
    /// Empty answer map for a user.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            answers: Vec::new(),
        }
    }

    /// Look up an answer by its composite key.
    pub fn get(&self, session_key: &str, question: &str) -> Option<&AnswerRecord> {
        self.answers
            .iter()
            .find(|a| a.session_key == session_key && a.question == question)
            .map(|a| &a.record)
    }

    /// Insert or replace the answer for a composite key.
    pub fn upsert(&mut self, session_key: &str, question: &str, record: AnswerRecord) {
        if let Some(entry) = self
            .answers
            .iter_mut()
            .find(|a| a.session_key == session_key && a.question == question)
        {
            entry.record = record;
        } else {
            self.answers.push(AnswerEntry {
                session_key: session_key.to_string(),
                question: question.to_string(),
                record,
            });
        }
    }

    /// Remove an answer; returns whether one existed.
    pub fn remove(&mut self, session_key: &str, question: &str) -> bool {
        let before = self.answers.len();
        self.answers
            .retain(|a| !(a.session_key == session_key && a.question == question));
        self.answers.len() != before
    }
}
