//! Question Bank Integration Tests
//!
//! Seed bank discovery, custom bank editing over real files, and the
//! catalog staying consistent with bank content through every mutation.

use std::fs;

use tempfile::TempDir;

use memoir_vault::services::question_banks::parse_seed_csv;
use memoir_vault::{DataLayout, QuestionBankStore};

const SEED: &str = "\
session_id,title,guidance,question,word_target
1,Childhood,\"Take your time, go slow\",Where were you born?,400
1,,,What games did you play?,
2,Family,Describe the people,Who raised you?,600
3,School,First days,What was your first classroom like?,500
";

fn setup() -> (TempDir, QuestionBankStore) {
    let tmp = TempDir::new().unwrap();
    let layout = DataLayout::new(tmp.path());
    layout.ensure().unwrap();
    fs::write(layout.default_banks_dir().join("life_story.csv"), SEED).unwrap();
    (tmp, QuestionBankStore::new(layout))
}

#[test]
fn test_seed_discovery_and_copy() {
    let (tmp, store) = setup();

    let seeds = store.list_seed_banks().unwrap();
    assert_eq!(seeds.len(), 1);
    assert_eq!(seeds[0].name, "life story");
    assert_eq!(seeds[0].session_count, 3);
    assert_eq!(seeds[0].question_count, 4);

    let bank_id = store
        .create_custom_bank("u1", "My Life Story", "personal copy", Some("life_story"))
        .unwrap();
    let bank = store.load_user_bank("u1", &bank_id).unwrap().unwrap();
    assert_eq!(bank.sessions.len(), 3);
    assert_eq!(bank.sessions[0].guidance, "Take your time, go slow");

    // The copy is independent of the seed file
    fs::remove_file(
        tmp.path()
            .join("question_banks")
            .join("default")
            .join("life_story.csv"),
    )
    .unwrap();
    assert!(store.load_user_bank("u1", &bank_id).unwrap().is_some());
}

#[test]
fn test_session_keys_survive_reordering() {
    let (_tmp, store) = setup();
    let bank_id = store
        .create_custom_bank("u1", "B", "", Some("life_story"))
        .unwrap();
    let bank = store.load_user_bank("u1", &bank_id).unwrap().unwrap();
    let school_key = bank.sessions[2].key.clone();

    // Move "School" to the front, then delete "Childhood"
    assert!(store.move_session("u1", &bank_id, &school_key, 0).unwrap());
    let bank = store.load_user_bank("u1", &bank_id).unwrap().unwrap();
    let childhood_key = bank
        .sessions
        .iter()
        .find(|s| s.title == "Childhood")
        .unwrap()
        .key
        .clone();
    assert!(store.delete_session("u1", &bank_id, &childhood_key).unwrap());

    let bank = store.load_user_bank("u1", &bank_id).unwrap().unwrap();
    let ids: Vec<u32> = bank.sessions.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![1, 2]);
    // "School" kept its key through both mutations
    assert_eq!(bank.sessions[0].key, school_key);
    assert_eq!(bank.sessions[0].title, "School");
}

#[test]
fn test_catalog_matches_bank_content_after_edits() {
    let (_tmp, store) = setup();
    let bank_id = store.create_custom_bank("u1", "B", "", None).unwrap();

    let session = store
        .add_session("u1", &bank_id, "Career", "Working years", 700)
        .unwrap()
        .unwrap();
    store
        .add_question("u1", &bank_id, &session.key, "What was your first job?")
        .unwrap();
    store
        .add_question("u1", &bank_id, &session.key, "Who was your first boss?")
        .unwrap();
    store
        .remove_question("u1", &bank_id, &session.key, 0)
        .unwrap();

    let catalog = store.list_user_banks("u1").unwrap();
    let bank = store.load_user_bank("u1", &bank_id).unwrap().unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog[0].session_count, bank.sessions.len());
    assert_eq!(
        catalog[0].question_count,
        bank.sessions.iter().map(|s| s.questions.len()).sum::<usize>()
    );
    assert_eq!(bank.sessions[0].questions, vec!["Who was your first boss?"]);
}

#[test]
fn test_export_reimports_identically() {
    let (_tmp, store) = setup();
    let bank_id = store
        .create_custom_bank("u1", "B", "", Some("life_story"))
        .unwrap();

    let csv = store.export_to_csv("u1", &bank_id).unwrap().unwrap();
    let reparsed = parse_seed_csv(&csv).unwrap();
    let bank = store.load_user_bank("u1", &bank_id).unwrap().unwrap();

    assert_eq!(reparsed.len(), bank.sessions.len());
    for (a, b) in reparsed.iter().zip(bank.sessions.iter()) {
        assert_eq!(a.title, b.title);
        assert_eq!(a.guidance, b.guidance);
        assert_eq!(a.questions, b.questions);
        assert_eq!(a.word_target, b.word_target);
    }
}

#[test]
fn test_mutations_against_missing_bank_report_no_change() {
    let (_tmp, store) = setup();
    assert!(store
        .add_session("u1", "missing", "T", "", 500)
        .unwrap()
        .is_none());
    assert!(!store.rename_session("u1", "missing", "k", "T").unwrap());
    assert!(!store.delete_session("u1", "missing", "k").unwrap());
    assert!(store.export_to_csv("u1", "missing").unwrap().is_none());
}
