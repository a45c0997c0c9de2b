//! On-Disk Layout
//!
//! Resolves every path of the persisted-state layout under a single data
//! root. The directory names are load-bearing: existing data written by
//! earlier deployments is addressed by exactly these conventions.

use std::path::{Path, PathBuf};

use crate::utils::error::{AppError, AppResult};
use crate::utils::ids::derive_data_stem;

/// Resolves store paths beneath one data root directory.
#[derive(Debug, Clone)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    /// Create a layout rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create a layout at the default per-user data root
    /// (`~/.memoir-vault/`).
    pub fn default_root() -> AppResult<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| AppError::storage("Could not determine home directory"))?;
        Ok(Self::new(home.join(".memoir-vault")))
    }

    /// Create every directory of the layout.
    pub fn ensure(&self) -> AppResult<()> {
        for dir in [
            self.accounts_dir(),
            self.responses_dir(),
            self.uploads_dir(),
            self.thumbnails_dir(),
            self.metadata_dir(),
            self.default_banks_dir(),
            self.root.join("question_banks").join("users"),
            self.root.join("user_vignettes"),
            self.root.join("published_vignettes"),
        ] {
            std::fs::create_dir_all(&dir)?;
        }
        Ok(())
    }

    /// The data root itself.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the store configuration file.
    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.json")
    }

    // ------------------------------------------------------------------
    // Accounts and responses
    // ------------------------------------------------------------------

    pub fn accounts_dir(&self) -> PathBuf {
        self.root.join("accounts")
    }

    pub fn account_file(&self, user_id: &str) -> PathBuf {
        self.accounts_dir().join(format!("{}.json", user_id))
    }

    pub fn responses_dir(&self) -> PathBuf {
        self.root.join("responses")
    }

    /// Per-user answer map, named by a truncated hash of the user id.
    pub fn response_file(&self, user_id: &str) -> PathBuf {
        self.responses_dir()
            .join(format!("{}.json", derive_data_stem(user_id)))
    }

    // ------------------------------------------------------------------
    // Uploads
    // ------------------------------------------------------------------

    pub fn uploads_dir(&self) -> PathBuf {
        self.root.join("uploads")
    }

    pub fn thumbnails_dir(&self) -> PathBuf {
        self.uploads_dir().join("thumbnails")
    }

    pub fn metadata_dir(&self) -> PathBuf {
        self.uploads_dir().join("metadata")
    }

    pub fn image_file(&self, image_id: &str) -> PathBuf {
        self.uploads_dir().join(format!("{}.jpg", image_id))
    }

    pub fn thumbnail_file(&self, image_id: &str) -> PathBuf {
        self.thumbnails_dir().join(format!("{}_thumb.jpg", image_id))
    }

    pub fn metadata_file(&self, image_id: &str) -> PathBuf {
        self.metadata_dir().join(format!("{}.json", image_id))
    }

    // ------------------------------------------------------------------
    // Question banks
    // ------------------------------------------------------------------

    /// Read-only seed banks, one CSV file per bank.
    pub fn default_banks_dir(&self) -> PathBuf {
        self.root.join("question_banks").join("default")
    }

    pub fn user_banks_dir(&self, user_id: &str) -> PathBuf {
        self.root.join("question_banks").join("users").join(user_id)
    }

    pub fn catalog_file(&self, user_id: &str) -> PathBuf {
        self.user_banks_dir(user_id).join("catalog.json")
    }

    pub fn bank_file(&self, user_id: &str, bank_id: &str) -> PathBuf {
        self.user_banks_dir(user_id).join(format!("{}.json", bank_id))
    }

    // ------------------------------------------------------------------
    // Vignettes
    // ------------------------------------------------------------------

    /// Source-of-truth vignette file for one user.
    pub fn vignettes_file(&self, user_id: &str) -> PathBuf {
        self.root
            .join("user_vignettes")
            .join(format!("{}.json", user_id))
    }

    /// Published-only mirror, regenerated from the source file.
    pub fn published_file(&self, user_id: &str) -> PathBuf {
        self.root
            .join("published_vignettes")
            .join(format!("{}.json", user_id))
    }
}
