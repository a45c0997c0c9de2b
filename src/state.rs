//! Workspace State
//!
//! A workspace binds one user's active question bank to their answer map
//! for an editing session. Answers are keyed by the session's stable
//! surrogate key plus the question text, so reordering sessions never
//! detaches an answer while renaming a question deliberately does.

use crate::models::answer::{AnswerEntry, AnswerRecord, ResponseSet};
use crate::models::image::{ImageDescriptor, ImageRef};
use crate::models::question_bank::{QuestionBank, SessionUnit};
use crate::services::responses::ResponseStore;
use crate::services::search::visible_word_count;
use crate::utils::error::AppResult;
use crate::utils::ids::now_rfc3339;

/// One user's active bank plus their answers over it
#[derive(Debug)]
pub struct Workspace {
    pub user_id: String,
    pub bank: QuestionBank,
    responses: ResponseSet,
    store: ResponseStore,
}

impl Workspace {
    /// Open a workspace over a loaded bank, pulling the user's answers
    /// from disk (missing file reads as no answers yet).
    pub fn open(store: ResponseStore, user_id: &str, bank: QuestionBank) -> AppResult<Self> {
        let responses = store.load(user_id)?;
        Ok(Self {
            user_id: user_id.to_string(),
            bank,
            responses,
            store,
        })
    }

    /// Record (or replace) the answer for a question. Word count is
    /// computed from the text with inline `[Image:...]` placeholders
    /// stripped; image references are repositioned 0-based in the order
    /// given.
    pub fn record_answer(
        &mut self,
        session_key: &str,
        question: &str,
        text: &str,
        images: Vec<ImageRef>,
    ) -> AppResult<()> {
        let descriptor = ImageDescriptor::from_refs(images);
        let record = AnswerRecord {
            text: text.to_string(),
            has_images: descriptor.has_images,
            images: descriptor.images,
            timestamp: now_rfc3339(),
            word_count: visible_word_count(text),
        };
        self.responses.upsert(session_key, question, record);
        self.save()
    }

    /// Drop the answer for a question; saving only when one existed.
    pub fn clear_answer(&mut self, session_key: &str, question: &str) -> AppResult<bool> {
        if self.responses.remove(session_key, question) {
            self.save()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Look up the stored answer for a question.
    pub fn answer(&self, session_key: &str, question: &str) -> Option<&AnswerRecord> {
        self.responses.get(session_key, question)
    }

    /// All answer entries, in insertion order.
    pub fn answers(&self) -> &[AnswerEntry] {
        &self.responses.answers
    }

    /// Session lookup by stable key within the active bank.
    pub fn session_by_key(&self, key: &str) -> Option<&SessionUnit> {
        self.bank.session_by_key(key)
    }

    fn save(&self) -> AppResult<()> {
        self.store.save(&self.responses)
    }
}
