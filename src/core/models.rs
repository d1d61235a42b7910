//! Classified output record.

use serde::{Deserialize, Serialize};

use crate::core::taxonomy::{CATEGORY_SEPARATOR, TAG_SEPARATOR};

/// One conversation after classification; a single CSV row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedRecord {
    /// Cleaned display title
    pub name: String,
    /// Human-readable summary, bounded in length
    pub description: String,
    /// Non-empty, in taxonomy order
    pub categories: Vec<String>,
    /// Deduplicated, in vocabulary order; may be empty
    pub tags: Vec<String>,
    /// `YYYY-MM-DD`, or the unknown-date sentinel
    pub date: String,
    /// Heuristic confidence in `[0.0, 1.0]`
    pub relevance_score: f64,
    /// Number of message fragments in the source conversation
    pub message_volume: usize,
    /// Input file the conversation came from; not written to CSV
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
}

impl ClassifiedRecord {
    /// Categories joined for the CSV `category` column.
    pub fn category_field(&self) -> String {
        join(&self.categories, CATEGORY_SEPARATOR)
    }

    /// Tags joined for the CSV `tags` column.
    pub fn tags_field(&self) -> String {
        join(&self.tags, TAG_SEPARATOR)
    }

    /// Returns `true` if `date` is a real date rather than `sentinel`.
    pub fn has_date(&self, sentinel: &str) -> bool {
        self.date != sentinel
    }
}

fn join(labels: &[String], separator: char) -> String {
    let mut buf = [0u8; 4];
    labels.join(separator.encode_utf8(&mut buf))
}

/// Splits a joined CSV column back into labels.
pub(crate) fn split_field(field: &str, separator: char) -> Vec<String> {
    field
        .split(separator)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ClassifiedRecord {
        ClassifiedRecord {
            name: "Launch".into(),
            description: "Plan the launch.".into(),
            categories: vec!["Marketing".into(), "Business Strategy".into()],
            tags: vec!["Strategy".into(), "Funnel".into()],
            date: "2024-02-01".into(),
            relevance_score: 0.8,
            message_volume: 4,
            source_file: None,
        }
    }

    #[test]
    fn test_fields_join() {
        let record = sample();
        assert_eq!(record.category_field(), "Marketing|Business Strategy");
        assert_eq!(record.tags_field(), "Strategy,Funnel");
    }

    #[test]
    fn test_split_field() {
        assert_eq!(split_field("a|b", '|'), vec!["a", "b"]);
        assert!(split_field("", ',').is_empty());
    }

    #[test]
    fn test_has_date() {
        let mut record = sample();
        assert!(record.has_date("unknown"));
        record.date = "unknown".into();
        assert!(!record.has_date("unknown"));
    }
}
