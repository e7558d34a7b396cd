//! JSON import/export for study sets.
//!
//! The exported shape is `{topic, cards}`. Star flags survive a round
//! trip; they are part of the card record, not session state.

use crate::error::{Result, SetError};
use crate::types::StudySet;

/// Serialize a set for export.
pub fn to_json(set: &StudySet) -> Result<String> {
    Ok(serde_json::to_string_pretty(set)?)
}

/// Parse an exported set, validating the record shape. A missing or
/// blank topic is rejected; unknown fields are ignored.
pub fn from_json(content: &str) -> Result<StudySet> {
    let set: StudySet = serde_json::from_str(content)?;
    if set.topic.trim().is_empty() {
        return Err(SetError::EmptyTopic);
    }
    Ok(set)
}

/// Derive an export filename from the topic: non-alphanumeric
/// characters become underscores, lowercased.
pub fn export_filename(topic: &str) -> String {
    let slug: String = topic
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    format!("{}.json", slug.to_lowercase())
}
