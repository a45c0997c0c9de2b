//! Search Integration Tests
//!
//! Cross-answer search over a workspace populated through the real stores,
//! including caption matches from uploaded images.

use std::io::Cursor;

use image::DynamicImage;
use tempfile::TempDir;

use memoir_vault::models::question_bank::{QuestionBank, SessionUnit};
use memoir_vault::storage::StoreConfig;
use memoir_vault::{search_all_answers, DataLayout, ImageStore, ResponseStore, Workspace};

fn png_bytes() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(24, 24, image::Rgb([10, 20, 30]));
    let mut out = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}

fn two_session_bank() -> QuestionBank {
    let mut childhood = SessionUnit::new(1, "Childhood", "", 400);
    childhood.questions = vec![
        "Where were you born?".to_string(),
        "What games did you play?".to_string(),
    ];
    let mut career = SessionUnit::new(2, "Career", "", 600);
    career.questions = vec!["What was your first job?".to_string()];
    QuestionBank {
        id: "b1".into(),
        name: "Test".into(),
        description: String::new(),
        created_at: "t".into(),
        updated_at: "t".into(),
        sessions: vec![childhood, career],
    }
}

fn populated_workspace(tmp: &TempDir) -> (Workspace, ImageStore) {
    let layout = DataLayout::new(tmp.path());
    layout.ensure().unwrap();
    let mut images = ImageStore::open(layout.clone(), &StoreConfig::default()).unwrap();
    let mut ws =
        Workspace::open(ResponseStore::new(layout), "u1", two_session_bank()).unwrap();

    let childhood_key = ws.bank.sessions[0].key.clone();
    let career_key = ws.bank.sessions[1].key.clone();

    ws.record_answer(
        &childhood_key,
        "Where were you born?",
        "In a farmhouse outside Dubuque.",
        Vec::new(),
    )
    .unwrap();

    let descriptor = images
        .save("u1", &png_bytes(), 1, "What games did you play?", "Marbles on the porch")
        .unwrap();
    ws.record_answer(
        &childhood_key,
        "What games did you play?",
        "Mostly outside until dark.",
        descriptor.images,
    )
    .unwrap();

    ws.record_answer(
        &career_key,
        "What was your first job?",
        "Sorting mail at the Dubuque post office.",
        Vec::new(),
    )
    .unwrap();

    (ws, images)
}

#[test]
fn test_search_spans_sessions() {
    let tmp = TempDir::new().unwrap();
    let (ws, _images) = populated_workspace(&tmp);

    let hits = search_all_answers(&ws, "dubuque");
    assert_eq!(hits.len(), 2);
    let titles: Vec<&str> = hits.iter().map(|h| h.session_title.as_str()).collect();
    assert!(titles.contains(&"Childhood"));
    assert!(titles.contains(&"Career"));
}

#[test]
fn test_search_finds_caption_matches() {
    let tmp = TempDir::new().unwrap();
    let (ws, _images) = populated_workspace(&tmp);

    let hits = search_all_answers(&ws, "marbles");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].question, "What games did you play?");
    assert_eq!(hits[0].matched_captions, vec!["Marbles on the porch"]);
}

#[test]
fn test_search_reports_session_position_and_preview() {
    let tmp = TempDir::new().unwrap();
    let (ws, _images) = populated_workspace(&tmp);

    let hits = search_all_answers(&ws, "post office");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].session_id, 2);
    assert_eq!(hits[0].preview, "Sorting mail at the Dubuque post office.");
    assert_eq!(hits[0].word_count, 7);
}

#[test]
fn test_search_survives_reopen() {
    let tmp = TempDir::new().unwrap();
    {
        let _ = populated_workspace(&tmp);
    }
    let layout = DataLayout::new(tmp.path());
    let ws = Workspace::open(ResponseStore::new(layout), "u1", two_session_bank()).unwrap();

    // New bank instance has fresh session keys, so session context is
    // unresolved, but the answers themselves still match
    let hits = search_all_answers(&ws, "farmhouse");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].question, "Where were you born?");
}
