//! Answer Search
//!
//! Case-insensitive substring search across every answer in a workspace.
//! A hit matches on answer text, question text, image captions or image
//! filenames; results come back newest first with a truncated preview of
//! the answer body.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::state::Workspace;

const PREVIEW_CHARS: usize = 300;
const MIN_QUERY_CHARS: usize = 2;

/// One search result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub session_id: u32,
    pub session_key: String,
    pub session_title: String,
    pub question: String,
    pub preview: String,
    pub word_count: usize,
    /// Captions of the answer's images that matched the query
    pub matched_captions: Vec<String>,
    pub timestamp: String,
}

/// Search every answer in the workspace, newest first. Queries shorter
/// than two characters after trimming return nothing.
pub fn search_all_answers(workspace: &Workspace, query: &str) -> Vec<SearchHit> {
    let needle = query.trim().to_lowercase();
    if needle.chars().count() < MIN_QUERY_CHARS {
        return Vec::new();
    }

    let mut hits = Vec::new();
    for entry in workspace.answers() {
        let record = &entry.record;

        let matched_captions: Vec<String> = record
            .images
            .iter()
            .filter(|image| {
                image.caption.to_lowercase().contains(&needle)
                    || image.filename.to_lowercase().contains(&needle)
            })
            .map(|image| image.caption.clone())
            .collect();

        let text_match = record.text.to_lowercase().contains(&needle);
        let question_match = entry.question.to_lowercase().contains(&needle);
        if !text_match && !question_match && matched_captions.is_empty() {
            continue;
        }

        let (session_id, session_title) = workspace
            .session_by_key(&entry.session_key)
            .map(|s| (s.id, s.title.clone()))
            .unwrap_or((0, String::new()));

        hits.push(SearchHit {
            session_id,
            session_key: entry.session_key.clone(),
            session_title,
            question: entry.question.clone(),
            preview: preview(&record.text),
            word_count: visible_word_count(&record.text),
            matched_captions,
            timestamp: record.timestamp.clone(),
        });
    }

    hits.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    hits
}

/// Word count of the text with inline image placeholders stripped.
pub fn visible_word_count(text: &str) -> usize {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    let re = PLACEHOLDER.get_or_init(|| Regex::new(r"\[Image:[^\]]*\]").unwrap());
    re.replace_all(text, " ").split_whitespace().count()
}

/// First 300 characters of the text, split on a char boundary.
fn preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_CHARS {
        return text.to_string();
    }
    let truncated: String = text.chars().take(PREVIEW_CHARS).collect();
    format!("{truncated}...")
}
