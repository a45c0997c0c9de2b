//! Identifier Derivation
//!
//! Derived identifiers used across the stores: SHA-256 based ids for users
//! and images, truncated hashes for data filenames, and short UUID prefixes
//! for banks, sessions and vignettes.

use chrono::Utc;
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Hex length of a derived user id
const USER_ID_LEN: usize = 12;

/// Hex length of a derived image id
const IMAGE_ID_LEN: usize = 16;

/// Hex length of the truncated user-id hash used for data filenames
const DATA_STEM_LEN: usize = 16;

/// Length of the short UUID prefix used for bank/session/vignette ids
const SHORT_ID_LEN: usize = 8;

/// Current UTC timestamp as an RFC-3339 string.
///
/// Every timestamp in the persisted files uses this format, which keeps
/// lexicographic string ordering equal to chronological ordering.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

/// Derive a 12-hex-char user id from a lowercased email and a timestamp.
pub fn derive_user_id(email: &str, timestamp: &str) -> String {
    let digest = Sha256::digest(format!("{}{}", email.to_lowercase(), timestamp).as_bytes());
    hex_prefix(&digest, USER_ID_LEN)
}

/// Derive a 16-hex-char image id from the owning user, the answer slot and
/// the upload instant.
pub fn derive_image_id(user_id: &str, session_id: u32, question: &str, timestamp: &str) -> String {
    let digest = Sha256::digest(
        format!("{}|{}|{}|{}", user_id, session_id, question, timestamp).as_bytes(),
    );
    hex_prefix(&digest, IMAGE_ID_LEN)
}

/// Truncated hash of a user id, used to name the per-user responses file.
pub fn derive_data_stem(user_id: &str) -> String {
    let digest = Sha256::digest(user_id.as_bytes());
    hex_prefix(&digest, DATA_STEM_LEN)
}

/// Random 8-char id from a v4 UUID prefix.
pub fn short_uuid() -> String {
    Uuid::new_v4().simple().to_string()[..SHORT_ID_LEN].to_string()
}

/// Lowercase hex of the first `len` nibbles of a digest.
fn hex_prefix(bytes: &[u8], len: usize) -> String {
    let mut out = String::with_capacity(len);
    for byte in bytes {
        out.push_str(&format!("{:02x}", byte));
        if out.len() >= len {
            break;
        }
    }
    out.truncate(len);
    out
}
