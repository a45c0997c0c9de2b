//! Account Store
//!
//! Creates and authenticates user records stored as JSON files keyed by a
//! derived user id. Passwords are persisted only as PBKDF2-HMAC-SHA256
//! hashes with per-hash random salts; authentication is a fresh hash
//! comparison on every call — no lockout, no rate limiting, no tokens.

use std::fs;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use pbkdf2::pbkdf2_hmac;
use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use rand::{Rng, RngCore};
use sha2::Sha256;

use crate::models::account::{
    AuthSuccess, CreatedAccount, Profile, SettingsUpdate, StatsDelta, UserAccount,
};
use crate::storage::config::StoreConfig;
use crate::storage::layout::DataLayout;
use crate::utils::error::{AppError, AppResult};
use crate::utils::ids::{derive_user_id, now_rfc3339};

const SALT_SIZE: usize = 16;
const KEY_SIZE: usize = 32;
const HASH_SCHEME: &str = "pbkdf2-sha256";

/// Store for user account records
#[derive(Debug)]
pub struct AccountStore {
    layout: DataLayout,
    iterations: u32,
    generated_password_len: usize,
}

impl AccountStore {
    /// Create a store over the given layout.
    pub fn new(layout: DataLayout, config: &StoreConfig) -> Self {
        Self {
            layout,
            iterations: config.pbkdf2_iterations,
            generated_password_len: config.generated_password_len,
        }
    }

    // ========================================================================
    // Creation and authentication
    // ========================================================================

    /// Create an account. When `password` is `None`, a random alphanumeric
    /// one is generated; the plaintext is returned once and never stored.
    pub fn create(
        &self,
        email: &str,
        profile: Profile,
        password: Option<&str>,
    ) -> AppResult<CreatedAccount> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::validation("email address is required"));
        }
        if profile.name.trim().is_empty() {
            return Err(AppError::validation("profile name is required"));
        }

        let created_at = now_rfc3339();
        let user_id = derive_user_id(&email, &created_at);
        let password = match password {
            Some(given) => given.to_string(),
            None => self.generate_password(),
        };

        let account = UserAccount {
            user_id: user_id.clone(),
            email,
            password_hash: self.hash_password(&password),
            account_type: "standard".to_string(),
            created_at,
            last_login: None,
            profile,
            settings: Default::default(),
            stats: Default::default(),
        };
        self.save(&account)?;
        tracing::info!("Created account {}", user_id);

        Ok(CreatedAccount {
            user_id,
            password,
            account,
        })
    }

    /// Authenticate by email and password. Returns `Ok(None)` for the single
    /// invalid-credentials outcome (unknown email or wrong password);
    /// updates `last_login` on success.
    pub fn authenticate(&self, email: &str, password: &str) -> AppResult<Option<AuthSuccess>> {
        let mut account = match self.find_by_email(email)? {
            Some(account) => account,
            None => return Ok(None),
        };

        if !verify_password(&account.password_hash, password) {
            return Ok(None);
        }

        account.last_login = Some(now_rfc3339());
        self.save(&account)?;

        Ok(Some(AuthSuccess {
            user_id: account.user_id.clone(),
            account,
        }))
    }

    // ========================================================================
    // Lookup and updates
    // ========================================================================

    /// Load an account by user id.
    pub fn get(&self, user_id: &str) -> AppResult<Option<UserAccount>> {
        let path = self.layout.account_file(user_id);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Scan the accounts directory for a lowercased email match.
    pub fn find_by_email(&self, email: &str) -> AppResult<Option<UserAccount>> {
        let email = email.trim().to_lowercase();
        let dir = self.layout.accounts_dir();
        if !dir.exists() {
            return Ok(None);
        }

        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let account: UserAccount = match fs::read_to_string(&path)
                .map_err(AppError::from)
                .and_then(|content| Ok(serde_json::from_str(&content)?))
            {
                Ok(account) => account,
                Err(e) => {
                    tracing::warn!("Skipping unreadable account file {}: {}", path.display(), e);
                    continue;
                }
            };
            if account.email == email {
                return Ok(Some(account));
            }
        }
        Ok(None)
    }

    /// Apply a partial settings update.
    pub fn update_settings(&self, user_id: &str, update: SettingsUpdate) -> AppResult<UserAccount> {
        let mut account = self
            .get(user_id)?
            .ok_or_else(|| AppError::not_found(format!("account {}", user_id)))?;
        account.settings.apply_update(update);
        self.save(&account)?;
        Ok(account)
    }

    /// Apply progress-counter increments.
    pub fn update_stats(&self, user_id: &str, delta: &StatsDelta) -> AppResult<UserAccount> {
        let mut account = self
            .get(user_id)?
            .ok_or_else(|| AppError::not_found(format!("account {}", user_id)))?;
        account.stats.apply_delta(delta);
        self.save(&account)?;
        Ok(account)
    }

    /// Administrative deletion: removes the account file and the derived
    /// responses file named by the truncated user-id hash. Absence of either
    /// file is not an error; returns whether anything was removed.
    pub fn delete(&self, user_id: &str) -> AppResult<bool> {
        let mut removed = false;
        for path in [
            self.layout.account_file(user_id),
            self.layout.response_file(user_id),
        ] {
            match fs::remove_file(&path) {
                Ok(()) => removed = true,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!("Failed to remove {}: {}", path.display(), e);
                }
            }
        }
        if removed {
            tracing::info!("Deleted account {}", user_id);
        }
        Ok(removed)
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    fn save(&self, account: &UserAccount) -> AppResult<()> {
        let path = self.layout.account_file(&account.user_id);
        fs::write(&path, serde_json::to_string_pretty(account)?)?;
        Ok(())
    }

    fn generate_password(&self) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(self.generated_password_len)
            .map(char::from)
            .collect()
    }

    /// Encode as `pbkdf2-sha256$<iterations>$<salt_b64>$<hash_b64>`.
    fn hash_password(&self, password: &str) -> String {
        let mut salt = [0u8; SALT_SIZE];
        OsRng.fill_bytes(&mut salt);

        let mut derived = [0u8; KEY_SIZE];
        pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, self.iterations, &mut derived);

        format!(
            "{}${}${}${}",
            HASH_SCHEME,
            self.iterations,
            BASE64.encode(salt),
            BASE64.encode(derived)
        )
    }
}

/// Verify a password against a stored hash string.
fn verify_password(stored: &str, password: &str) -> bool {
    let parts: Vec<&str> = stored.split('$').collect();
    if parts.len() != 4 || parts[0] != HASH_SCHEME {
        return false;
    }
    let iterations: u32 = match parts[1].parse() {
        Ok(n) => n,
        Err(_) => return false,
    };
    let salt = match BASE64.decode(parts[2]) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };
    let expected = match BASE64.decode(parts[3]) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };

    let mut derived = vec![0u8; expected.len()];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, iterations, &mut derived);
    derived == expected
}
