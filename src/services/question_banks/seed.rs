//! Seed Bank Format
//!
//! Seed question banks are row-per-question CSV files with columns
//! `session_id,title,guidance,question,word_target`. The first row of each
//! session group supplies the session-level metadata; rows with an empty
//! question cell are skipped. Export is the exact inverse: guidance and
//! word target are emitted only on each session's first row.

use std::collections::BTreeMap;
use std::fs;

use crate::models::question_bank::{BankSource, BankSummary, SessionUnit};
use crate::storage::layout::DataLayout;
use crate::utils::error::AppResult;
use crate::utils::ids::short_uuid;

const HEADER: &str = "session_id,title,guidance,question,word_target";

/// Parse seed CSV text into ordered sessions.
///
/// Sessions are sorted by their seed id and then renumbered 1-based
/// contiguous, so gaps in the source ids disappear.
pub fn parse_seed_csv(text: &str) -> AppResult<Vec<SessionUnit>> {
    let mut rows = parse_csv(text);
    let has_header = rows
        .first()
        .and_then(|row| row.first())
        .map(|cell| cell.trim().eq_ignore_ascii_case("session_id"))
        .unwrap_or(false);
    if has_header {
        rows.remove(0);
    }

    let mut sessions: BTreeMap<u32, SessionUnit> = BTreeMap::new();
    for row in rows {
        if row.len() < 4 {
            continue;
        }
        let session_id: u32 = match row[0].trim().parse() {
            Ok(id) => id,
            Err(_) => continue,
        };
        let question = row[3].trim();
        if question.is_empty() {
            continue;
        }

        let session = sessions.entry(session_id).or_insert_with(|| {
            let word_target = row
                .get(4)
                .and_then(|cell| cell.trim().parse().ok())
                .unwrap_or(500);
            SessionUnit {
                id: session_id,
                key: short_uuid(),
                title: row[1].trim().to_string(),
                guidance: row[2].trim().to_string(),
                questions: Vec::new(),
                word_target,
            }
        });
        session.questions.push(question.to_string());
    }

    let mut ordered: Vec<SessionUnit> = sessions.into_values().collect();
    for (index, session) in ordered.iter_mut().enumerate() {
        session.id = (index + 1) as u32;
    }
    Ok(ordered)
}

/// Render sessions back into the seed CSV format.
pub fn sessions_to_csv(sessions: &[SessionUnit]) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');
    for session in sessions {
        for (index, question) in session.questions.iter().enumerate() {
            let (guidance, word_target) = if index == 0 {
                (csv_escape(&session.guidance), session.word_target.to_string())
            } else {
                (String::new(), String::new())
            };
            out.push_str(&format!(
                "{},{},{},{},{}\n",
                session.id,
                csv_escape(&session.title),
                guidance,
                csv_escape(question),
                word_target
            ));
        }
    }
    out
}

/// Enumerate the seed files, re-parsing each for its counts.
pub fn list_seed_banks(layout: &DataLayout) -> AppResult<Vec<BankSummary>> {
    let dir = layout.default_banks_dir();
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut summaries = Vec::new();
    for entry in fs::read_dir(&dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("csv") {
            continue;
        }
        let stem = match path.file_stem().and_then(|s| s.to_str()) {
            Some(stem) => stem.to_string(),
            None => continue,
        };
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Skipping unreadable seed bank {}: {}", path.display(), e);
                continue;
            }
        };
        let sessions = parse_seed_csv(&text)?;
        summaries.push(BankSummary {
            id: stem.clone(),
            name: stem.replace('_', " "),
            description: String::new(),
            session_count: sessions.len(),
            question_count: sessions.iter().map(|s| s.questions.len()).sum(),
            updated_at: None,
            source: BankSource::Seed,
        });
    }
    summaries.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(summaries)
}

/// Load one seed bank's sessions by its filename stem.
pub fn load_seed_sessions(layout: &DataLayout, stem: &str) -> AppResult<Option<Vec<SessionUnit>>> {
    let path = layout.default_banks_dir().join(format!("{}.csv", stem));
    if !path.exists() {
        return Ok(None);
    }
    let text = fs::read_to_string(&path)?;
    Ok(Some(parse_seed_csv(&text)?))
}

/// Minimal CSV reader: quoted fields, doubled-quote escapes, CRLF line ends.
fn parse_csv(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }
        match c {
            '"' => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                if record.iter().any(|cell| !cell.is_empty()) {
                    records.push(std::mem::take(&mut record));
                } else {
                    record.clear();
                }
            }
            _ => field.push(c),
        }
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        if record.iter().any(|cell| !cell.is_empty()) {
            records.push(record);
        }
    }
    records
}

/// Escape a CSV value when it contains a delimiter, quote or newline.
fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
