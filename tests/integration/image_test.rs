//! Image Integration Tests
//!
//! Upload-to-answer flow over a real data root: both renditions land on
//! disk, references embed into answers, and export trees carry inlined
//! payloads.

use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use image::DynamicImage;
use tempfile::TempDir;

use memoir_vault::models::question_bank::{QuestionBank, SessionUnit};
use memoir_vault::storage::StoreConfig;
use memoir_vault::{DataLayout, ImageStore, ResponseStore, Workspace};

// ============================================================================
// Helper Functions
// ============================================================================

fn setup() -> (TempDir, DataLayout) {
    let tmp = TempDir::new().unwrap();
    let layout = DataLayout::new(tmp.path());
    layout.ensure().unwrap();
    (tmp, layout)
}

/// A small solid-color PNG, the shape uploads arrive in.
fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([90, 120, 60]));
    let mut out = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}

fn single_session_bank() -> QuestionBank {
    let mut session = SessionUnit::new(1, "Childhood", "", 400);
    session.questions = vec!["Where were you born?".to_string()];
    QuestionBank {
        id: "b1".into(),
        name: "Test".into(),
        description: String::new(),
        created_at: "t".into(),
        updated_at: "t".into(),
        sessions: vec![session],
    }
}

// ============================================================================
// Upload Flow Tests
// ============================================================================

#[test]
fn test_upload_produces_both_renditions_on_disk() {
    let (_tmp, layout) = setup();
    let mut images = ImageStore::open(layout.clone(), &StoreConfig::default()).unwrap();

    let descriptor = images
        .save("u1", &png_bytes(640, 480), 1, "Where were you born?", "The farmhouse")
        .unwrap();
    let id = &descriptor.images[0].id;

    assert!(layout.image_file(id).exists());
    assert!(layout.thumbnail_file(id).exists());
    assert!(layout.metadata_file(id).exists());

    let full = images.resolve(id, false).unwrap().unwrap();
    let decoded = image::load_from_memory(&BASE64.decode(&full.base64).unwrap()).unwrap();
    assert_eq!(decoded.width(), 640);
    assert_eq!(decoded.height(), 480);
    assert!(full.data_uri().starts_with("data:image/jpeg;base64,"));
}

#[test]
fn test_answer_carries_uploaded_references() {
    let (_tmp, layout) = setup();
    let mut images = ImageStore::open(layout.clone(), &StoreConfig::default()).unwrap();
    let mut ws = Workspace::open(ResponseStore::new(layout), "u1", single_session_bank()).unwrap();
    let key = ws.bank.sessions[0].key.clone();

    let descriptor = images
        .save("u1", &png_bytes(32, 32), 1, "Where were you born?", "Front porch")
        .unwrap();
    ws.record_answer(
        &key,
        "Where were you born?",
        "On the porch, apparently.",
        descriptor.images,
    )
    .unwrap();

    let record = ws.answer(&key, "Where were you born?").unwrap();
    assert!(record.has_images);
    assert_eq!(record.images.len(), 1);
    assert_eq!(record.images[0].caption, "Front porch");
    assert_eq!(record.images[0].position, 0);
}

#[test]
fn test_export_embeds_answer_images() {
    let (_tmp, layout) = setup();
    let mut images = ImageStore::open(layout.clone(), &StoreConfig::default()).unwrap();
    let mut ws =
        Workspace::open(ResponseStore::new(layout), "u1", single_session_bank()).unwrap();
    let key = ws.bank.sessions[0].key.clone();

    let descriptor = images
        .save("u1", &png_bytes(32, 32), 1, "Where were you born?", "c")
        .unwrap();
    ws.record_answer(&key, "Where were you born?", "text", descriptor.images)
        .unwrap();

    let mut tree = serde_json::to_value(ws.answers()).unwrap();
    images.embed_for_export(&mut tree).unwrap();

    let embedded = &tree[0]["images"][0];
    assert_eq!(embedded["mime_type"], "image/jpeg");
    assert!(!embedded["base64"].as_str().unwrap().is_empty());
}

#[test]
fn test_delete_leaves_answer_reference_dangling() {
    let (_tmp, layout) = setup();
    let mut images = ImageStore::open(layout.clone(), &StoreConfig::default()).unwrap();
    let mut ws =
        Workspace::open(ResponseStore::new(layout), "u1", single_session_bank()).unwrap();
    let key = ws.bank.sessions[0].key.clone();

    let descriptor = images
        .save("u1", &png_bytes(32, 32), 1, "Where were you born?", "c")
        .unwrap();
    let id = descriptor.images[0].id.clone();
    ws.record_answer(&key, "Where were you born?", "text", descriptor.images)
        .unwrap();

    assert!(images.delete(&id).unwrap());
    // The answer still references the image; resolution reports absence
    let record = ws.answer(&key, "Where were you born?").unwrap();
    assert_eq!(record.images[0].id, id);
    assert!(images.resolve(&id, false).unwrap().is_none());
}
