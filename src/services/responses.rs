//! Response Store
//!
//! Persistence for per-user answer maps. The file is named by a truncated
//! hash of the user id, the convention the administrative deletion path
//! also relies on.

use std::fs;

use crate::models::answer::ResponseSet;
use crate::storage::layout::DataLayout;
use crate::utils::error::AppResult;

/// Store for per-user answer maps
#[derive(Debug)]
pub struct ResponseStore {
    layout: DataLayout,
}

impl ResponseStore {
    /// Create a store over the given layout.
    pub fn new(layout: DataLayout) -> Self {
        Self { layout }
    }

    /// Load a user's answer map; a missing file is an empty map.
    pub fn load(&self, user_id: &str) -> AppResult<ResponseSet> {
        let path = self.layout.response_file(user_id);
        if !path.exists() {
            return Ok(ResponseSet::new(user_id));
        }
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Persist a user's answer map.
    pub fn save(&self, set: &ResponseSet) -> AppResult<()> {
        fs::write(
            self.layout.response_file(&set.user_id),
            serde_json::to_string_pretty(set)?,
        )?;
        Ok(())
    }
}
