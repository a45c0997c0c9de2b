//! Image Store
//!
//! Persists uploaded images as a quality-85 full JPEG plus a bounded
//! thumbnail, with a JSON metadata sidecar per image. Lookups by
//! (user, session, question) are served from an in-memory index rebuilt
//! from the metadata directory at construction and kept current on every
//! save and delete.

use std::collections::HashMap;
use std::fs;
use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use serde_json::Value;

use crate::models::image::{ImageDescriptor, ImageMeta, ResolvedImage};
use crate::storage::config::StoreConfig;
use crate::storage::layout::DataLayout;
use crate::utils::error::{AppError, AppResult};
use crate::utils::ids::{derive_image_id, now_rfc3339};

/// Index key: (user id, session id, question text)
type AnswerSlot = (String, u32, String);

/// Store for uploaded images and their metadata sidecars
#[derive(Debug)]
pub struct ImageStore {
    layout: DataLayout,
    jpeg_quality: u8,
    thumbnail_quality: u8,
    thumbnail_edge: u32,
    index: HashMap<AnswerSlot, Vec<String>>,
}

impl ImageStore {
    /// Open the store, rebuilding the answer-slot index from the metadata
    /// directory.
    pub fn open(layout: DataLayout, config: &StoreConfig) -> AppResult<Self> {
        let mut store = Self {
            layout,
            jpeg_quality: config.jpeg_quality,
            thumbnail_quality: config.thumbnail_quality,
            thumbnail_edge: config.thumbnail_edge,
            index: HashMap::new(),
        };
        store.rebuild_index()?;
        Ok(store)
    }

    // ========================================================================
    // Write operations
    // ========================================================================

    /// Decode an upload, normalize to RGB, and persist the full rendition,
    /// the thumbnail and the metadata sidecar. Returns an embeddable
    /// descriptor for the new image.
    pub fn save(
        &mut self,
        user_id: &str,
        bytes: &[u8],
        session_id: u32,
        question: &str,
        caption: &str,
    ) -> AppResult<ImageDescriptor> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| AppError::image(format!("Failed to decode upload: {}", e)))?;
        let normalized = DynamicImage::ImageRgb8(decoded.to_rgb8());

        let timestamp = now_rfc3339();
        let id = derive_image_id(user_id, session_id, question, &timestamp);
        let filename = format!("{}.jpg", id);

        // Full rendition. A crash after this write but before the thumbnail
        // or sidecar lands leaves an orphaned file; no cleanup is attempted.
        let full = self.encode_jpeg(&normalized, self.jpeg_quality)?;
        fs::write(self.layout.image_file(&id), &full)?;

        let thumb_img = normalized.thumbnail(self.thumbnail_edge, self.thumbnail_edge);
        let thumb = self.encode_jpeg(&thumb_img, self.thumbnail_quality)?;
        fs::write(self.layout.thumbnail_file(&id), &thumb)?;

        let alt_text = if caption.trim().is_empty() {
            "Memoir photo".to_string()
        } else {
            caption.to_string()
        };
        let meta = ImageMeta {
            id: id.clone(),
            session_id,
            question: question.to_string(),
            caption: caption.to_string(),
            alt_text,
            filename,
            timestamp,
            file_size: full.len() as u64,
            dimensions: [normalized.width(), normalized.height()],
            user_id: user_id.to_string(),
        };
        fs::write(
            self.layout.metadata_file(&id),
            serde_json::to_string_pretty(&meta)?,
        )?;

        self.index
            .entry(slot(user_id, session_id, question))
            .or_default()
            .push(id.clone());
        tracing::debug!("Saved image {} for session {}", id, session_id);

        Ok(ImageDescriptor::from_refs(vec![meta.to_ref(0)]))
    }

    /// Best-effort removal of the full rendition, thumbnail, sidecar and
    /// index entry. Missing components are not errors; returns whether any
    /// component existed.
    pub fn delete(&mut self, image_id: &str) -> AppResult<bool> {
        // Read the sidecar first so the index entry can be dropped too.
        match self.load_meta(image_id) {
            Ok(Some(meta)) => {
                let key = slot(&meta.user_id, meta.session_id, &meta.question);
                if let Some(ids) = self.index.get_mut(&key) {
                    ids.retain(|id| id != image_id);
                    if ids.is_empty() {
                        self.index.remove(&key);
                    }
                }
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(
                    "Unreadable sidecar for image {}; index entry stays until reopen: {}",
                    image_id,
                    e
                );
            }
        }

        let mut removed = false;
        for path in [
            self.layout.image_file(image_id),
            self.layout.thumbnail_file(image_id),
            self.layout.metadata_file(image_id),
        ] {
            match fs::remove_file(&path) {
                Ok(()) => removed = true,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!("Failed to remove {}: {}", path.display(), e);
                }
            }
        }
        Ok(removed)
    }

    // ========================================================================
    // Read operations
    // ========================================================================

    /// Read a rendition and return it base64-encoded with its caption
    /// joined from the sidecar. `Ok(None)` when the rendition is absent.
    pub fn resolve(&self, image_id: &str, thumbnail: bool) -> AppResult<Option<ResolvedImage>> {
        let path = if thumbnail {
            self.layout.thumbnail_file(image_id)
        } else {
            self.layout.image_file(image_id)
        };
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&path)?;

        let (caption, alt_text) = match self.load_meta(image_id)? {
            Some(meta) => (meta.caption, meta.alt_text),
            None => {
                tracing::debug!("Image {} has no metadata sidecar", image_id);
                (String::new(), String::new())
            }
        };

        Ok(Some(ResolvedImage {
            id: image_id.to_string(),
            caption,
            alt_text,
            mime_type: "image/jpeg".to_string(),
            base64: BASE64.encode(bytes),
        }))
    }

    /// All metadata records for one answer slot, newest first.
    pub fn find_for_answer(
        &self,
        user_id: &str,
        session_id: u32,
        question: &str,
    ) -> AppResult<Vec<ImageMeta>> {
        let ids = match self.index.get(&slot(user_id, session_id, question)) {
            Some(ids) => ids.clone(),
            None => return Ok(Vec::new()),
        };

        let mut metas = Vec::with_capacity(ids.len());
        for id in &ids {
            match self.load_meta(id) {
                Ok(Some(meta)) => metas.push(meta),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!("Skipping unreadable metadata for image {}: {}", id, e);
                }
            }
        }
        // RFC-3339 strings with a shared timezone sort chronologically
        metas.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(metas)
    }

    /// Walk an export tree, inlining each image reference's full rendition
    /// as a base64 payload. Mutates the tree in place.
    pub fn embed_for_export(&self, tree: &mut Value) -> AppResult<()> {
        match tree {
            Value::Object(map) => {
                if let Some(Value::Array(images)) = map.get_mut("images") {
                    for entry in images.iter_mut() {
                        self.inline_image(entry)?;
                    }
                }
                for (_, value) in map.iter_mut() {
                    self.embed_for_export(value)?;
                }
            }
            Value::Array(items) => {
                for item in items.iter_mut() {
                    self.embed_for_export(item)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    fn inline_image(&self, entry: &mut Value) -> AppResult<()> {
        let id = match entry.get("id").and_then(Value::as_str) {
            Some(id) => id.to_string(),
            None => return Ok(()),
        };
        if let Some(resolved) = self.resolve(&id, false)? {
            if let Value::Object(map) = entry {
                map.insert("mime_type".to_string(), Value::String(resolved.mime_type.clone()));
                map.insert("base64".to_string(), Value::String(resolved.base64));
            }
        } else {
            tracing::debug!("Export references missing image {}", id);
        }
        Ok(())
    }

    fn load_meta(&self, image_id: &str) -> AppResult<Option<ImageMeta>> {
        let path = self.layout.metadata_file(image_id);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn rebuild_index(&mut self) -> AppResult<()> {
        self.index.clear();
        let dir = self.layout.metadata_dir();
        if !dir.exists() {
            return Ok(());
        }
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let meta: ImageMeta = match fs::read_to_string(&path)
                .map_err(AppError::from)
                .and_then(|content| Ok(serde_json::from_str(&content)?))
            {
                Ok(meta) => meta,
                Err(e) => {
                    tracing::warn!("Skipping unreadable sidecar {}: {}", path.display(), e);
                    continue;
                }
            };
            self.index
                .entry(slot(&meta.user_id, meta.session_id, &meta.question))
                .or_default()
                .push(meta.id);
        }
        Ok(())
    }

    fn encode_jpeg(&self, img: &DynamicImage, quality: u8) -> AppResult<Vec<u8>> {
        let mut out = Vec::new();
        let mut cursor = Cursor::new(&mut out);
        let encoder = JpegEncoder::new_with_quality(&mut cursor, quality);
        img.write_with_encoder(encoder)
            .map_err(|e| AppError::image(format!("JPEG encode failed: {}", e)))?;
        Ok(out)
    }
}

fn slot(user_id: &str, session_id: u32, question: &str) -> AnswerSlot {
    (user_id.to_string(), session_id, question.to_string())
}
