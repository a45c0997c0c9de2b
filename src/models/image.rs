//! Image Models
//!
//! Metadata sidecars and embeddable descriptors for uploaded images. Each
//! upload produces two physical renditions (full JPEG and thumbnail JPEG)
//! plus one metadata JSON record.

use serde::{Deserialize, Serialize};

/// Sidecar record persisted in `uploads/metadata/<id>.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageMeta {
    /// Derived 16-hex-char id
    pub id: String,
    pub session_id: u32,
    pub question: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub alt_text: String,
    pub filename: String,
    pub timestamp: String,
    pub file_size: u64,
    /// [width, height] of the full rendition
    pub dimensions: [u32; 2],
    pub user_id: String,
}

impl ImageMeta {
    /// Embeddable reference at the given position within an answer.
    pub fn to_ref(&self, position: u32) -> ImageRef {
        ImageRef {
            id: self.id.clone(),
            caption: self.caption.clone(),
            alt_text: self.alt_text.clone(),
            filename: self.filename.clone(),
            timestamp: self.timestamp.clone(),
            position,
        }
    }
}

/// Image reference embedded inside an answer record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRef {
    pub id: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub alt_text: String,
    #[serde(default)]
    pub filename: String,
    pub timestamp: String,
    pub position: u32,
}

/// Descriptor returned by a save, ready to embed into an answer
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ImageDescriptor {
    pub has_images: bool,
    pub images: Vec<ImageRef>,
}

impl ImageDescriptor {
    /// Build a descriptor from references, repositioning them 0-based.
    pub fn from_refs(mut images: Vec<ImageRef>) -> Self {
        for (index, image) in images.iter_mut().enumerate() {
            image.position = index as u32;
        }
        Self {
            has_images: !images.is_empty(),
            images,
        }
    }
}

/// A resolved rendition with its payload base64-encoded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedImage {
    pub id: String,
    pub caption: String,
    pub alt_text: String,
    pub mime_type: String,
    pub base64: String,
}

impl ResolvedImage {
    /// Data URI for direct embedding.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64)
    }
}
