// SPDX-FileCopyrightText: 2026 Brewline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion-to-draft extraction.
//!
//! The model is told to answer with bare JSON, but completions sometimes
//! arrive wrapped in prose or code fences. Extraction first tries the whole
//! text, then rescues the outermost bracketed slice.

use brewline_core::types::DraftEntry;

/// Attempts to extract draft entries from a completion.
///
/// Returns `None` when no parseable JSON is present; the caller degrades
/// to a note-only entry.
pub fn extract_entries(text: &str) -> Option<Vec<DraftEntry>> {
    let trimmed = text.trim();

    if let Some(entries) = parse_entries(trimmed) {
        return Some(entries);
    }

    // Rescue: the outermost [...] slice of a prose-wrapped answer.
    let start = trimmed.find('[')?;
    let end = trimmed.rfind(']')?;
    if end <= start {
        return None;
    }
    parse_entries(&trimmed[start..=end])
}

/// Parses either a JSON list of entries or a single bare entry object.
fn parse_entries(text: &str) -> Option<Vec<DraftEntry>> {
    if let Ok(entries) = serde_json::from_str::<Vec<DraftEntry>>(text) {
        return Some(entries);
    }
    serde_json::from_str::<DraftEntry>(text)
        .ok()
        .map(|entry| vec![entry])
}
