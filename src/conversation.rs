//! Extracted conversation type shared by all export formats.
//!
//! Every extractor converts its native schema into [`ConversationRecord`],
//! so the classifier never sees format-specific structure.
//!
//! # Example
//!
//! ```
//! use chatcat::ConversationRecord;
//! use chrono::{TimeZone, Utc};
//!
//! let record = ConversationRecord::new("Launch plan")
//!     .with_fragments(["Draft the email sequence.", "Here is a first pass."])
//!     .with_created_at(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap());
//!
//! assert_eq!(record.message_count, 2);
//! assert!(record.raw_text.contains("email sequence"));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::parser::ExportFormat;

/// Separator placed between message fragments in `raw_text`.
pub const FRAGMENT_SEPARATOR: &str = "\n\n";

/// One conversation as read from an export, before classification.
///
/// `raw_text` only ever holds message content; extractors never copy JSON
/// keys or structural wrapper into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationRecord {
    /// Original title, empty when the export had none.
    pub title: String,

    /// When the conversation was created, if the export recorded it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// All message fragments joined with [`FRAGMENT_SEPARATOR`], in thread order.
    pub raw_text: String,

    /// Number of fragments that make up `raw_text`.
    pub message_count: usize,

    /// Schema the record was extracted from.
    pub format: ExportFormat,

    /// Input file the record came from (batch runs).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
}

impl ConversationRecord {
    /// Creates an empty record with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            created_at: None,
            raw_text: String::new(),
            message_count: 0,
            format: ExportFormat::Unknown,
            source_file: None,
        }
    }

    /// Replaces the content with the given fragments.
    ///
    /// Blank fragments are dropped and do not count towards `message_count`.
    #[must_use]
    pub fn with_fragments<I, S>(mut self, fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let kept: Vec<String> = fragments
            .into_iter()
            .map(|f| f.as_ref().trim().to_string())
            .filter(|f| !f.is_empty())
            .collect();
        self.message_count = kept.len();
        self.raw_text = kept.join(FRAGMENT_SEPARATOR);
        self
    }

    #[must_use]
    pub fn with_created_at(mut self, ts: DateTime<Utc>) -> Self {
        self.created_at = Some(ts);
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_source_file(mut self, source: impl Into<String>) -> Self {
        self.source_file = Some(source.into());
        self
    }

    /// Returns `true` if the record carries no message content.
    pub fn is_empty(&self) -> bool {
        self.raw_text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        let record = ConversationRecord::new("Title");
        assert!(record.is_empty());
        assert_eq!(record.message_count, 0);
        assert_eq!(record.format, ExportFormat::Unknown);
    }

    #[test]
    fn test_with_fragments_skips_blank() {
        let record = ConversationRecord::new("t").with_fragments(["one", "   ", "", "two"]);
        assert_eq!(record.message_count, 2);
        assert_eq!(record.raw_text, "one\n\ntwo");
    }

    #[test]
    fn test_fragments_keep_word_boundaries() {
        let record = ConversationRecord::new("t").with_fragments(["end", "start"]);
        assert!(!record.raw_text.contains("endstart"));
    }

    #[test]
    fn test_serde_roundtrip() {
        let record = ConversationRecord::new("Roundtrip")
            .with_fragments(["hello there"])
            .with_format(ExportFormat::Claude)
            .with_source_file("a.json");
        let json = serde_json::to_string(&record).unwrap();
        let parsed: ConversationRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, parsed);
    }
}
