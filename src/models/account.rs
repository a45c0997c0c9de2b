//! Account Models
//!
//! User account records as persisted in `accounts/<user_id>.json`.

use serde::{Deserialize, Serialize};

/// Profile details supplied at signup
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Profile {
    /// Display name
    pub name: String,
    #[serde(default)]
    pub gender: Option<String>,
    /// Birthdate as an ISO date string
    #[serde(default)]
    pub birthdate: Option<String>,
}

/// Per-account preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSettings {
    pub email_reminders: bool,
    /// "daily", "weekly" or "monthly"
    pub reminder_frequency: String,
    pub theme: String,
}

impl Default for AccountSettings {
    fn default() -> Self {
        Self {
            email_reminders: true,
            reminder_frequency: "weekly".to_string(),
            theme: "light".to_string(),
        }
    }
}

/// Writing-progress counters
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AccountStats {
    pub sessions_completed: u32,
    pub questions_answered: u32,
    pub words_written: u64,
    pub images_uploaded: u32,
}

/// A stored user account. The password is kept only as a hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    /// Derived 12-hex-char id
    pub user_id: String,
    /// Lowercased email (unique by convention, not enforced)
    pub email: String,
    pub password_hash: String,
    pub account_type: String,
    pub created_at: String,
    #[serde(default)]
    pub last_login: Option<String>,
    pub profile: Profile,
    #[serde(default)]
    pub settings: AccountSettings,
    #[serde(default)]
    pub stats: AccountStats,
}

/// Result of account creation. Carries the plaintext password exactly once,
/// for handing to the new user; it is never persisted.
#[derive(Debug, Clone)]
pub struct CreatedAccount {
    pub user_id: String,
    pub password: String,
    pub account: UserAccount,
}

/// Result of a successful authentication
#[derive(Debug, Clone)]
pub struct AuthSuccess {
    pub user_id: String,
    pub account: UserAccount,
}

/// Partial settings update
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SettingsUpdate {
    pub email_reminders: Option<bool>,
    pub reminder_frequency: Option<String>,
    pub theme: Option<String>,
}

impl AccountSettings {
    /// Apply a partial update
    pub fn apply_update(&mut self, update: SettingsUpdate) {
        if let Some(reminders) = update.email_reminders {
            self.email_reminders = reminders;
        }
        if let Some(frequency) = update.reminder_frequency {
            self.reminder_frequency = frequency;
        }
        if let Some(theme) = update.theme {
            self.theme = theme;
        }
    }
}

/// Increments applied to the progress counters
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StatsDelta {
    pub sessions_completed: u32,
    pub questions_answered: u32,
    pub words_written: u64,
    pub images_uploaded: u32,
}

impl AccountStats {
    /// Apply counter increments
    pub fn apply_delta(&mut self, delta: &StatsDelta) {
        self.sessions_completed += delta.sessions_completed;
        self.questions_answered += delta.questions_answered;
        self.words_written += delta.words_written;
        self.images_uploaded += delta.images_uploaded;
    }
}
