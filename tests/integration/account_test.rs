//! Account Integration Tests
//!
//! Full account lifecycle over a real data root: creation with generated
//! passwords, authentication, and administrative deletion cascading to the
//! derived responses file.

use tempfile::TempDir;

use memoir_vault::models::account::{Profile, StatsDelta};
use memoir_vault::models::answer::AnswerRecord;
use memoir_vault::storage::StoreConfig;
use memoir_vault::{AccountStore, DataLayout, ResponseStore};

// ============================================================================
// Helper Functions
// ============================================================================

fn test_config() -> StoreConfig {
    // Low iteration count keeps the hashing fast under test
    StoreConfig {
        pbkdf2_iterations: 1_000,
        ..Default::default()
    }
}

fn setup() -> (TempDir, DataLayout) {
    let tmp = TempDir::new().unwrap();
    let layout = DataLayout::new(tmp.path());
    layout.ensure().unwrap();
    (tmp, layout)
}

fn profile(name: &str) -> Profile {
    Profile {
        name: name.to_string(),
        gender: None,
        birthdate: Some("1948-03-02".to_string()),
    }
}

// ============================================================================
// Lifecycle Tests
// ============================================================================

#[test]
fn test_generated_password_authenticates() {
    let (_tmp, layout) = setup();
    let store = AccountStore::new(layout, &test_config());

    let created = store
        .create("Grandma@Example.com", profile("Rose"), None)
        .unwrap();
    assert_eq!(created.account.email, "grandma@example.com");
    assert!(created.account.last_login.is_none());

    // The returned plaintext is the only way in
    let auth = store
        .authenticate("GRANDMA@example.com", &created.password)
        .unwrap()
        .unwrap();
    assert_eq!(auth.user_id, created.user_id);
    assert!(auth.account.last_login.is_some());
}

#[test]
fn test_invalid_credentials_are_one_outcome() {
    let (_tmp, layout) = setup();
    let store = AccountStore::new(layout, &test_config());
    store
        .create("a@b.com", profile("A"), Some("right"))
        .unwrap();

    // Unknown email and wrong password are indistinguishable
    assert!(store.authenticate("unknown@b.com", "right").unwrap().is_none());
    assert!(store.authenticate("a@b.com", "wrong").unwrap().is_none());
}

#[test]
fn test_stats_accumulate_across_updates() {
    let (_tmp, layout) = setup();
    let store = AccountStore::new(layout, &test_config());
    let created = store.create("a@b.com", profile("A"), None).unwrap();

    store
        .update_stats(
            &created.user_id,
            &StatsDelta {
                questions_answered: 2,
                words_written: 80,
                ..Default::default()
            },
        )
        .unwrap();
    let account = store
        .update_stats(
            &created.user_id,
            &StatsDelta {
                sessions_completed: 1,
                questions_answered: 1,
                words_written: 40,
                images_uploaded: 1,
            },
        )
        .unwrap();

    assert_eq!(account.stats.sessions_completed, 1);
    assert_eq!(account.stats.questions_answered, 3);
    assert_eq!(account.stats.words_written, 120);
    assert_eq!(account.stats.images_uploaded, 1);
}

#[test]
fn test_delete_cascades_to_responses_file() {
    let (_tmp, layout) = setup();
    let store = AccountStore::new(layout.clone(), &test_config());
    let responses = ResponseStore::new(layout.clone());

    let created = store.create("a@b.com", profile("A"), None).unwrap();
    let mut set = responses.load(&created.user_id).unwrap();
    set.upsert(
        "s-key",
        "Where were you born?",
        AnswerRecord {
            text: "On the kitchen table, or so they say.".to_string(),
            has_images: false,
            images: Vec::new(),
            timestamp: "2026-01-01T00:00:00+00:00".to_string(),
            word_count: 8,
        },
    );
    responses.save(&set).unwrap();
    assert!(layout.response_file(&created.user_id).exists());

    assert!(store.delete(&created.user_id).unwrap());
    assert!(store.get(&created.user_id).unwrap().is_none());
    assert!(!layout.response_file(&created.user_id).exists());
}
