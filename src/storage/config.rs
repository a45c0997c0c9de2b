//! JSON Configuration Management
//!
//! Handles reading and writing the store configuration file kept at the
//! data root.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::storage::layout::DataLayout;
use crate::utils::error::{AppError, AppResult};

/// Store configuration persisted in `config.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// JPEG quality for the full rendition of uploaded images
    pub jpeg_quality: u8,
    /// JPEG quality for thumbnails
    pub thumbnail_quality: u8,
    /// Maximum thumbnail edge in pixels (thumbnails fit within a square)
    pub thumbnail_edge: u32,
    /// PBKDF2 iteration count for password hashing
    pub pbkdf2_iterations: u32,
    /// Length of generated passwords when signup omits one
    pub generated_password_len: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: 85,
            thumbnail_quality: 70,
            thumbnail_edge: 200,
            pbkdf2_iterations: 100_000,
            generated_password_len: 12,
        }
    }
}

impl StoreConfig {
    /// Validate the configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err("jpeg_quality must be in 1..=100".to_string());
        }
        if self.thumbnail_quality == 0 || self.thumbnail_quality > 100 {
            return Err("thumbnail_quality must be in 1..=100".to_string());
        }
        if self.thumbnail_edge == 0 {
            return Err("thumbnail_edge must be nonzero".to_string());
        }
        if self.pbkdf2_iterations < 1_000 {
            return Err("pbkdf2_iterations must be at least 1000".to_string());
        }
        if self.generated_password_len < 8 {
            return Err("generated_password_len must be at least 8".to_string());
        }
        Ok(())
    }

    /// Apply a partial update to the configuration
    pub fn apply_update(&mut self, update: ConfigUpdate) {
        if let Some(quality) = update.jpeg_quality {
            self.jpeg_quality = quality;
        }
        if let Some(quality) = update.thumbnail_quality {
            self.thumbnail_quality = quality;
        }
        if let Some(edge) = update.thumbnail_edge {
            self.thumbnail_edge = edge;
        }
        if let Some(iterations) = update.pbkdf2_iterations {
            self.pbkdf2_iterations = iterations;
        }
        if let Some(len) = update.generated_password_len {
            self.generated_password_len = len;
        }
    }
}

/// Configuration update request (partial update)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigUpdate {
    pub jpeg_quality: Option<u8>,
    pub thumbnail_quality: Option<u8>,
    pub thumbnail_edge: Option<u32>,
    pub pbkdf2_iterations: Option<u32>,
    pub generated_password_len: Option<usize>,
}

/// Configuration service for managing store settings
#[derive(Debug)]
pub struct ConfigService {
    config_path: PathBuf,
    config: StoreConfig,
}

impl ConfigService {
    /// Create a new config service, loading existing config or creating defaults
    pub fn new(layout: &DataLayout) -> AppResult<Self> {
        layout.ensure()?;

        let config_path = layout.config_file();
        let config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            let default_config = StoreConfig::default();
            Self::save_to_file(&config_path, &default_config)?;
            default_config
        };

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Load configuration from a file
    fn load_from_file(path: &PathBuf) -> AppResult<StoreConfig> {
        let content = fs::read_to_string(path)?;
        let config: StoreConfig = serde_json::from_str(&content)?;
        config.validate().map_err(AppError::validation)?;
        Ok(config)
    }

    /// Save configuration to a file with pretty formatting
    fn save_to_file(path: &PathBuf, config: &StoreConfig) -> AppResult<()> {
        config.validate().map_err(AppError::validation)?;
        let content = serde_json::to_string_pretty(config)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the current configuration
    pub fn get_config(&self) -> &StoreConfig {
        &self.config
    }

    /// Update the configuration with a partial update
    pub fn update_config(&mut self, update: ConfigUpdate) -> AppResult<StoreConfig> {
        self.config.apply_update(update);
        self.save()?;
        Ok(self.config.clone())
    }

    /// Save the current configuration to disk
    pub fn save(&self) -> AppResult<()> {
        Self::save_to_file(&self.config_path, &self.config)
    }

    /// Reload configuration from disk
    pub fn reload(&mut self) -> AppResult<()> {
        self.config = Self::load_from_file(&self.config_path)?;
        Ok(())
    }

    /// Reset configuration to defaults
    pub fn reset(&mut self) -> AppResult<()> {
        self.config = StoreConfig::default();
        self.save()?;
        Ok(())
    }
}
