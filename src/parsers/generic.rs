//! Best-effort extractor for conversations in an unrecognised schema.

use serde_json::Value;

use crate::conversation::ConversationRecord;
use crate::parser::{ExportFormat, Extractor};
use crate::parsing::parse_timestamp_value;

/// Keys whose string values are treated as message content.
const CONTENT_KEYS: &[&str] = &["parts", "text", "value", "content", "body"];

const TITLE_KEYS: &[&str] = &["title", "name", "subject"];

const TIME_KEYS: &[&str] = &["create_time", "created_at", "timestamp", "date"];

/// Extractor used when neither known schema matches.
///
/// Walks the whole conversation object and keeps every string found under a
/// content-bearing key (`parts`, `text`, `value`, `content`, `body`), in
/// document order. A conversation with no such string is rejected.
pub struct GenericExtractor;

impl GenericExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GenericExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for GenericExtractor {
    fn name(&self) -> &'static str {
        "Generic"
    }

    fn format(&self) -> ExportFormat {
        ExportFormat::Unknown
    }

    fn extract_conversation(&self, conversation: &Value) -> Result<ConversationRecord, String> {
        let obj = match conversation {
            Value::Object(obj) => obj,
            Value::Null => return Err("conversation is null or unparseable".to_string()),
            _ => return Err("conversation is not a JSON object".to_string()),
        };

        let mut fragments = Vec::new();
        collect_content(conversation, false, &mut fragments);
        if fragments.iter().all(|f| f.trim().is_empty()) {
            return Err("unrecognized export format".to_string());
        }

        let title = TITLE_KEYS
            .iter()
            .find_map(|k| obj.get(*k).and_then(Value::as_str))
            .unwrap_or_default();

        let mut record = ConversationRecord::new(title)
            .with_fragments(fragments)
            .with_format(ExportFormat::Unknown);
        if let Some(ts) = TIME_KEYS
            .iter()
            .find_map(|k| obj.get(*k).and_then(parse_timestamp_value))
        {
            record = record.with_created_at(ts);
        }
        Ok(record)
    }
}

fn collect_content(value: &Value, under_content: bool, out: &mut Vec<String>) {
    match value {
        Value::String(s) if under_content => out.push(s.clone()),
        Value::Array(items) => {
            for item in items {
                collect_content(item, under_content, out);
            }
        }
        Value::Object(map) => {
            for (key, child) in map {
                collect_content(child, CONTENT_KEYS.contains(&key.as_str()), out);
            }
        }
        _ => {}
    }
}
