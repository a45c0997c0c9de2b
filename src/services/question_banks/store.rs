//! Question Bank Store
//!
//! CRUD over user-owned question banks. Each user has a catalog file of
//! bank summaries alongside one full-content JSON file per bank. The bank
//! content is the single source of truth: its catalog entry is regenerated
//! from the content on every save, so the two files cannot drift.

use std::fs;

use crate::models::question_bank::{BankSummary, QuestionBank, SessionUnit};
use crate::services::question_banks::seed;
use crate::storage::layout::DataLayout;
use crate::utils::error::{AppError, AppResult};
use crate::utils::ids::{now_rfc3339, short_uuid};

/// Store for seed and user-owned question banks
#[derive(Debug)]
pub struct QuestionBankStore {
    layout: DataLayout,
}

impl QuestionBankStore {
    /// Create a store over the given layout.
    pub fn new(layout: DataLayout) -> Self {
        Self { layout }
    }

    // ========================================================================
    // Seed banks (read-only)
    // ========================================================================

    /// Summaries of the CSV seed banks. Counts are recomputed from the
    /// files on each call.
    pub fn list_seed_banks(&self) -> AppResult<Vec<BankSummary>> {
        seed::list_seed_banks(&self.layout)
    }

    /// Full sessions of one seed bank, by filename stem.
    pub fn load_seed_sessions(&self, stem: &str) -> AppResult<Option<Vec<SessionUnit>>> {
        seed::load_seed_sessions(&self.layout, stem)
    }

    // ========================================================================
    // User banks
    // ========================================================================

    /// Catalog entries for one user's banks.
    pub fn list_user_banks(&self, user_id: &str) -> AppResult<Vec<BankSummary>> {
        self.load_catalog(user_id)
    }

    /// Load one user bank's full content.
    pub fn load_user_bank(&self, user_id: &str, bank_id: &str) -> AppResult<Option<QuestionBank>> {
        let path = self.layout.bank_file(user_id, bank_id);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Write a bank's content file and regenerate its catalog entry.
    pub fn save_user_bank(&self, user_id: &str, bank: &QuestionBank) -> AppResult<()> {
        fs::create_dir_all(self.layout.user_banks_dir(user_id))?;
        fs::write(
            self.layout.bank_file(user_id, &bank.id),
            serde_json::to_string_pretty(bank)?,
        )?;

        let mut catalog = self.load_catalog(user_id)?;
        let summary = bank.summary();
        if let Some(existing) = catalog.iter_mut().find(|s| s.id == bank.id) {
            *existing = summary;
        } else {
            catalog.push(summary);
        }
        self.write_catalog(user_id, &catalog)
    }

    /// Create a new editable bank, optionally deep-copying a seed bank's
    /// sessions as the starting point. Returns the new bank id.
    pub fn create_custom_bank(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
        copy_from_seed: Option<&str>,
    ) -> AppResult<String> {
        if name.trim().is_empty() {
            return Err(AppError::validation("bank name is required"));
        }

        let sessions = match copy_from_seed {
            Some(stem) => self
                .load_seed_sessions(stem)?
                .ok_or_else(|| AppError::not_found(format!("seed bank {}", stem)))?,
            None => Vec::new(),
        };

        let now = now_rfc3339();
        let bank = QuestionBank {
            id: short_uuid(),
            name: name.trim().to_string(),
            description: description.to_string(),
            created_at: now.clone(),
            updated_at: now,
            sessions,
        };
        self.save_user_bank(user_id, &bank)?;
        tracing::info!("Created bank {} for user {}", bank.id, user_id);
        Ok(bank.id)
    }

    /// Remove a bank's content file and its catalog entry.
    pub fn delete_user_bank(&self, user_id: &str, bank_id: &str) -> AppResult<bool> {
        let path = self.layout.bank_file(user_id, bank_id);
        let existed = match fs::remove_file(&path) {
            Ok(()) => true,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => return Err(e.into()),
        };

        let mut catalog = self.load_catalog(user_id)?;
        let before = catalog.len();
        catalog.retain(|s| s.id != bank_id);
        if catalog.len() != before || existed {
            self.write_catalog(user_id, &catalog)?;
        }
        Ok(existed)
    }

    // ========================================================================
    // Session mutations
    // ========================================================================

    /// Append a session with a fresh surrogate key; returns it.
    pub fn add_session(
        &self,
        user_id: &str,
        bank_id: &str,
        title: &str,
        guidance: &str,
        word_target: u32,
    ) -> AppResult<Option<SessionUnit>> {
        if title.trim().is_empty() {
            return Err(AppError::validation("session title is required"));
        }
        let mut bank = match self.load_user_bank(user_id, bank_id)? {
            Some(bank) => bank,
            None => return Ok(None),
        };

        let position = (bank.sessions.len() + 1) as u32;
        let session = SessionUnit::new(position, title.trim(), guidance, word_target);
        bank.sessions.push(session.clone());
        self.commit(user_id, bank)?;
        Ok(Some(session))
    }

    /// Rename a session addressed by its stable key.
    pub fn rename_session(
        &self,
        user_id: &str,
        bank_id: &str,
        session_key: &str,
        new_title: &str,
    ) -> AppResult<bool> {
        if new_title.trim().is_empty() {
            return Err(AppError::validation("session title is required"));
        }
        self.mutate(user_id, bank_id, |bank| {
            match bank.session_by_key_mut(session_key) {
                Some(session) => {
                    session.title = new_title.trim().to_string();
                    true
                }
                None => false,
            }
        })
    }

    /// Update a session's guidance text and/or word target.
    pub fn update_session(
        &self,
        user_id: &str,
        bank_id: &str,
        session_key: &str,
        guidance: Option<&str>,
        word_target: Option<u32>,
    ) -> AppResult<bool> {
        self.mutate(user_id, bank_id, |bank| {
            match bank.session_by_key_mut(session_key) {
                Some(session) => {
                    if let Some(guidance) = guidance {
                        session.guidance = guidance.to_string();
                    }
                    if let Some(target) = word_target {
                        session.word_target = target;
                    }
                    true
                }
                None => false,
            }
        })
    }

    /// Append a question to a session.
    pub fn add_question(
        &self,
        user_id: &str,
        bank_id: &str,
        session_key: &str,
        question: &str,
    ) -> AppResult<bool> {
        if question.trim().is_empty() {
            return Err(AppError::validation("question text is required"));
        }
        self.mutate(user_id, bank_id, |bank| {
            match bank.session_by_key_mut(session_key) {
                Some(session) => {
                    session.questions.push(question.trim().to_string());
                    true
                }
                None => false,
            }
        })
    }

    /// Remove a question by its index within a session.
    pub fn remove_question(
        &self,
        user_id: &str,
        bank_id: &str,
        session_key: &str,
        index: usize,
    ) -> AppResult<bool> {
        self.mutate(user_id, bank_id, |bank| {
            match bank.session_by_key_mut(session_key) {
                Some(session) if index < session.questions.len() => {
                    session.questions.remove(index);
                    true
                }
                _ => false,
            }
        })
    }

    /// Move a session to a new 0-based position. Display ids are renumbered
    /// to the new order; stable keys are untouched.
    pub fn move_session(
        &self,
        user_id: &str,
        bank_id: &str,
        session_key: &str,
        new_index: usize,
    ) -> AppResult<bool> {
        self.mutate(user_id, bank_id, |bank| {
            let from = match bank.sessions.iter().position(|s| s.key == session_key) {
                Some(position) => position,
                None => return false,
            };
            let session = bank.sessions.remove(from);
            let to = new_index.min(bank.sessions.len());
            bank.sessions.insert(to, session);
            true
        })
    }

    /// Delete a session; remaining display ids close the gap.
    pub fn delete_session(
        &self,
        user_id: &str,
        bank_id: &str,
        session_key: &str,
    ) -> AppResult<bool> {
        self.mutate(user_id, bank_id, |bank| {
            let before = bank.sessions.len();
            bank.sessions.retain(|s| s.key != session_key);
            bank.sessions.len() != before
        })
    }

    // ========================================================================
    // Export
    // ========================================================================

    /// Render a user bank in the seed CSV format.
    pub fn export_to_csv(&self, user_id: &str, bank_id: &str) -> AppResult<Option<String>> {
        Ok(self
            .load_user_bank(user_id, bank_id)?
            .map(|bank| seed::sessions_to_csv(&bank.sessions)))
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    /// Load a bank, apply a mutation, and commit only when it reports a
    /// change.
    fn mutate(
        &self,
        user_id: &str,
        bank_id: &str,
        f: impl FnOnce(&mut QuestionBank) -> bool,
    ) -> AppResult<bool> {
        let mut bank = match self.load_user_bank(user_id, bank_id)? {
            Some(bank) => bank,
            None => return Ok(false),
        };
        if !f(&mut bank) {
            return Ok(false);
        }
        self.commit(user_id, bank)?;
        Ok(true)
    }

    fn commit(&self, user_id: &str, mut bank: QuestionBank) -> AppResult<()> {
        bank.renumber_sessions();
        bank.updated_at = now_rfc3339();
        self.save_user_bank(user_id, &bank)
    }

    fn load_catalog(&self, user_id: &str) -> AppResult<Vec<BankSummary>> {
        let path = self.layout.catalog_file(user_id);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn write_catalog(&self, user_id: &str, catalog: &[BankSummary]) -> AppResult<()> {
        fs::create_dir_all(self.layout.user_banks_dir(user_id))?;
        fs::write(
            self.layout.catalog_file(user_id),
            serde_json::to_string_pretty(catalog)?,
        )?;
        Ok(())
    }
}
