//! Recovery of conversations from split, non-JSON archive pieces.
//!
//! Large ChatGPT exports are often cut with `split` into files such as
//! `conv_part_aa.txt`. Each piece is a window into one huge JSON array and
//! parses as nothing. This scanner cuts the text at every `"title": "`
//! marker and pulls the title, `create_time` and the first string of each
//! `parts` array out of the piece that follows.

use regex::Regex;
use tracing::debug;

use crate::conversation::ConversationRecord;
use crate::parser::{ExportFormat, Extraction, SkipReason};
use crate::parsing::from_epoch_seconds;

/// Compiled patterns for fragment recovery.
struct FragmentScanner {
    title_marker: Regex,
    title: Regex,
    create_time: Regex,
    parts: Regex,
}

impl FragmentScanner {
    fn new() -> Self {
        Self {
            title_marker: Regex::new(r#""title":\s*""#).unwrap(),
            title: Regex::new(r#"^((?:[^"\\]|\\.)*)""#).unwrap(),
            create_time: Regex::new(r#""create_time":\s*([0-9]+(?:\.[0-9]+)?)"#).unwrap(),
            parts: Regex::new(r#""parts":\s*\[\s*"((?:[^"\\]|\\.)*)""#).unwrap(),
        }
    }

    fn scan(&self, content: &str) -> Extraction {
        let mut extraction = Extraction::new();

        for (index, piece) in self.title_marker.split(content).skip(1).enumerate() {
            let Some(raw_title) = self.title.captures(piece).and_then(|c| c.get(1)) else {
                extraction.push_skip(SkipReason::new(index, None, "unterminated title in fragment"));
                continue;
            };

            let title = unescape(raw_title.as_str());
            if title.trim().is_empty() {
                extraction.push_skip(SkipReason::new(index, None, "fragment has an empty title"));
                continue;
            }

            let fragments: Vec<String> = self
                .parts
                .captures_iter(piece)
                .filter_map(|c| c.get(1))
                .map(|m| unescape(m.as_str()))
                .collect();

            let mut record = ConversationRecord::new(title)
                .with_fragments(fragments)
                .with_format(ExportFormat::ChatGpt);

            if let Some(ts) = self
                .create_time
                .captures(piece)
                .and_then(|c| c.get(1))
                .and_then(|m| m.as_str().parse::<f64>().ok())
                .and_then(from_epoch_seconds)
            {
                record = record.with_created_at(ts);
            }

            debug!(index, fragments = record.message_count, "recovered fragment");
            extraction.records.push(record);
        }

        extraction
    }
}

/// Decodes JSON string escapes; falls back to the raw text if they are broken.
fn unescape(raw: &str) -> String {
    serde_json::from_str::<String>(&format!("\"{raw}\"")).unwrap_or_else(|_| raw.to_string())
}

/// Scans split-archive text for conversations.
///
/// Returns an empty extraction when no `"title"` marker is present.
pub fn recover_fragments(content: &str) -> Extraction {
    FragmentScanner::new().scan(content)
}
