//! Vignette Store
//!
//! Short free-text stories per user, each with a theme, draft/published
//! flags and engagement counters. The per-user source file holds every
//! vignette; the published-only mirror file is regenerated from it after
//! every mutation, so the two can never disagree once an operation
//! completes.

use std::fs;

use crate::models::vignette::{Vignette, VignetteFilter};
use crate::storage::layout::DataLayout;
use crate::utils::error::{AppError, AppResult};
use crate::utils::ids::{now_rfc3339, short_uuid};

/// Store for per-user vignette files
#[derive(Debug)]
pub struct VignetteStore {
    layout: DataLayout,
}

impl VignetteStore {
    /// Create a store over the given layout.
    pub fn new(layout: DataLayout) -> Self {
        Self { layout }
    }

    // ========================================================================
    // Write operations
    // ========================================================================

    /// Create a vignette. Word count is a whitespace split of the content;
    /// entries are always appended, never deduplicated.
    pub fn create(
        &self,
        user_id: &str,
        title: &str,
        content: &str,
        theme: &str,
        is_draft: bool,
    ) -> AppResult<Vignette> {
        if title.trim().is_empty() {
            return Err(AppError::validation("vignette title is required"));
        }

        let now = now_rfc3339();
        let vignette = Vignette {
            id: short_uuid(),
            title: title.trim().to_string(),
            content: content.to_string(),
            theme: theme.to_string(),
            word_count: content.split_whitespace().count(),
            is_draft,
            is_published: false,
            created_at: now.clone(),
            updated_at: now,
            published_at: None,
            views: 0,
            likes: 0,
        };

        let mut all = self.load_all(user_id)?;
        all.push(vignette.clone());
        self.save_all(user_id, &all)?;
        tracing::debug!("Created vignette {} for user {}", vignette.id, user_id);
        Ok(vignette)
    }

    /// Replace a vignette's title, content and theme. The published mirror
    /// is regenerated, so a published copy can never go stale.
    pub fn update(
        &self,
        user_id: &str,
        id: &str,
        title: &str,
        content: &str,
        theme: &str,
    ) -> AppResult<bool> {
        self.mutate(user_id, id, |vignette| {
            vignette.title = title.trim().to_string();
            vignette.content = content.to_string();
            vignette.theme = theme.to_string();
            vignette.word_count = content.split_whitespace().count();
            vignette.updated_at = now_rfc3339();
        })
    }

    /// Mark a vignette published and stamp the publish time.
    pub fn publish(&self, user_id: &str, id: &str) -> AppResult<bool> {
        self.mutate(user_id, id, |vignette| {
            vignette.is_draft = false;
            vignette.is_published = true;
            vignette.published_at = Some(now_rfc3339());
            vignette.updated_at = now_rfc3339();
        })
    }

    /// Withdraw a vignette from the published listing, keeping it as a
    /// draft.
    pub fn unpublish(&self, user_id: &str, id: &str) -> AppResult<bool> {
        self.mutate(user_id, id, |vignette| {
            vignette.is_draft = true;
            vignette.is_published = false;
            vignette.published_at = None;
            vignette.updated_at = now_rfc3339();
        })
    }

    /// Increment the view counter.
    pub fn record_view(&self, user_id: &str, id: &str) -> AppResult<bool> {
        self.mutate(user_id, id, |vignette| {
            vignette.views += 1;
        })
    }

    /// Increment the like counter.
    pub fn record_like(&self, user_id: &str, id: &str) -> AppResult<bool> {
        self.mutate(user_id, id, |vignette| {
            vignette.likes += 1;
        })
    }

    /// Remove a vignette from both the source file and the published
    /// mirror. Idempotent: returns true once the id is absent from both,
    /// including when it never existed.
    pub fn delete(&self, user_id: &str, id: &str) -> AppResult<bool> {
        let mut all = self.load_all(user_id)?;
        let before = all.len();
        all.retain(|v| v.id != id);
        if all.len() != before {
            tracing::debug!("Deleted vignette {} for user {}", id, user_id);
        }
        self.save_all(user_id, &all)?;
        Ok(true)
    }

    // ========================================================================
    // Read operations
    // ========================================================================

    /// Load one vignette by id.
    pub fn get(&self, user_id: &str, id: &str) -> AppResult<Option<Vignette>> {
        Ok(self.load_all(user_id)?.into_iter().find(|v| v.id == id))
    }

    /// Filtered listing, most recently updated first.
    pub fn list(&self, user_id: &str, filter: VignetteFilter) -> AppResult<Vec<Vignette>> {
        let mut vignettes: Vec<Vignette> = self
            .load_all(user_id)?
            .into_iter()
            .filter(|v| filter.matches(v))
            .collect();
        vignettes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(vignettes)
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    fn mutate(
        &self,
        user_id: &str,
        id: &str,
        f: impl FnOnce(&mut Vignette),
    ) -> AppResult<bool> {
        let mut all = self.load_all(user_id)?;
        let Some(vignette) = all.iter_mut().find(|v| v.id == id) else {
            return Ok(false);
        };
        f(vignette);
        self.save_all(user_id, &all)?;
        Ok(true)
    }

    /// Missing source file reads as an empty collection.
    fn load_all(&self, user_id: &str) -> AppResult<Vec<Vignette>> {
        let path = self.layout.vignettes_file(user_id);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write the source file, then regenerate the published mirror from it.
    fn save_all(&self, user_id: &str, all: &[Vignette]) -> AppResult<()> {
        fs::write(
            self.layout.vignettes_file(user_id),
            serde_json::to_string_pretty(all)?,
        )?;

        let published: Vec<&Vignette> = all.iter().filter(|v| v.is_published).collect();
        fs::write(
            self.layout.published_file(user_id),
            serde_json::to_string_pretty(&published)?,
        )?;
        Ok(())
    }
}
