//! Claude `conversations.json` extractor.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::conversation::ConversationRecord;
use crate::parser::{ExportFormat, Extractor};
use crate::parsing::{ThreadNode, parse_timestamp_value, thread_order};

/// Extractor for Claude exports.
///
/// Claude exports a flat message list per conversation:
/// ```json
/// {
///   "uuid": "5f1c...",
///   "name": "Landing page rewrite",
///   "created_at": "2024-05-01T09:00:00.000000Z",
///   "chat_messages": [
///     {
///       "uuid": "a1", "sender": "human", "text": "Rewrite the hero section",
///       "content": [{"type": "text", "text": "Rewrite the hero section"}],
///       "parent_message_uuid": "00000000-0000-4000-8000-000000000000"
///     }
///   ]
/// }
/// ```
///
/// Messages are ordered by `parent_message_uuid` when present and kept in
/// source order otherwise.
pub struct ClaudeExtractor;

impl ClaudeExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ClaudeExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct RawConversation {
    #[serde(default)]
    name: Option<Value>,
    #[serde(default)]
    created_at: Option<Value>,
    chat_messages: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RawMessage {
    #[serde(default)]
    uuid: Option<String>,
    #[serde(default)]
    parent_message_uuid: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    content: Option<Vec<Value>>,
}

impl Extractor for ClaudeExtractor {
    fn name(&self) -> &'static str {
        "Claude"
    }

    fn format(&self) -> ExportFormat {
        ExportFormat::Claude
    }

    fn extract_conversation(&self, conversation: &Value) -> Result<ConversationRecord, String> {
        if !conversation.is_object() {
            return Err("conversation is not a JSON object".to_string());
        }
        let raw = RawConversation::deserialize(conversation)
            .map_err(|e| format!("malformed Claude conversation: {e}"))?;

        let messages: Vec<RawMessage> = raw
            .chat_messages
            .iter()
            .enumerate()
            .filter_map(|(i, value)| match RawMessage::deserialize(value) {
                Ok(message) => Some(message),
                Err(e) => {
                    debug!(message = i, error = %e, "skipping malformed chat message");
                    None
                }
            })
            .collect();

        let fragments: Vec<String> = ordered(&messages)
            .into_iter()
            .flat_map(|i| message_fragments(&messages[i]))
            .collect();

        let title = raw
            .name
            .as_ref()
            .and_then(Value::as_str)
            .unwrap_or_default();

        let mut record = ConversationRecord::new(title)
            .with_fragments(fragments)
            .with_format(ExportFormat::Claude);
        if let Some(ts) = raw.created_at.as_ref().and_then(parse_timestamp_value) {
            record = record.with_created_at(ts);
        }
        Ok(record)
    }
}

/// Thread order when every message can be linked, source order otherwise.
fn ordered(messages: &[RawMessage]) -> Vec<usize> {
    let linked = messages
        .iter()
        .all(|m| m.uuid.is_some() && m.parent_message_uuid.is_some());
    if !linked {
        return (0..messages.len()).collect();
    }

    let nodes: Vec<ThreadNode<'_>> = messages
        .iter()
        .map(|m| {
            ThreadNode::new(
                m.uuid.as_deref().unwrap_or_default(),
                m.parent_message_uuid.as_deref(),
            )
        })
        .collect();
    thread_order(&nodes)
}

/// Text blocks of a message, or its plain `text` when it has none.
fn message_fragments(message: &RawMessage) -> Vec<String> {
    let blocks: Vec<String> = message
        .content
        .iter()
        .flatten()
        .filter(|block| block.get("type").and_then(Value::as_str) == Some("text"))
        .filter_map(|block| block.get("text").and_then(Value::as_str))
        .filter(|text| !text.trim().is_empty())
        .map(ToString::to_string)
        .collect();

    if !blocks.is_empty() {
        return blocks;
    }

    message
        .text
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .map(|t| vec![t.to_string()])
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ROOT: &str = "00000000-0000-4000-8000-000000000000";

    #[test]
    fn test_extract_basic() {
        let conv = json!({
            "uuid": "c1",
            "name": "Landing page rewrite",
            "created_at": "2024-05-01T09:00:00.000000Z",
            "chat_messages": [
                {"uuid": "a", "sender": "human", "text": "Rewrite the hero section",
                 "content": [{"type": "text", "text": "Rewrite the hero section"}]},
                {"uuid": "b", "sender": "assistant", "text": "",
                 "content": [{"type": "text", "text": "Here is a sharper headline."},
                             {"type": "tool_use", "name": "artifacts", "input": {}}]}
            ]
        });

        let record = ClaudeExtractor::new().extract_conversation(&conv).unwrap();
        assert_eq!(record.title, "Landing page rewrite");
        assert_eq!(
            record.raw_text,
            "Rewrite the hero section\n\nHere is a sharper headline."
        );
        assert_eq!(record.message_count, 2);
        assert_eq!(
            record.created_at.unwrap().format("%Y-%m-%d").to_string(),
            "2024-05-01"
        );
    }

    #[test]
    fn test_parent_links_reorder_messages() {
        let conv = json!({
            "name": "Linked",
            "chat_messages": [
                {"uuid": "b", "parent_message_uuid": "a", "text": "answer"},
                {"uuid": "a", "parent_message_uuid": ROOT, "text": "question"}
            ]
        });
        let record = ClaudeExtractor::new().extract_conversation(&conv).unwrap();
        assert_eq!(record.raw_text, "question\n\nanswer");
    }

    #[test]
    fn test_partial_links_keep_source_order() {
        let conv = json!({
            "name": "Half linked",
            "chat_messages": [
                {"uuid": "b", "parent_message_uuid": "a", "text": "first in file"},
                {"uuid": "a", "text": "second in file"}
            ]
        });
        let record = ClaudeExtractor::new().extract_conversation(&conv).unwrap();
        assert_eq!(record.raw_text, "first in file\n\nsecond in file");
    }

    #[test]
    fn test_text_fallback_when_no_blocks() {
        let conv = json!({
            "name": "Legacy",
            "chat_messages": [{"uuid": "a", "text": "only plain text", "content": []}]
        });
        let record = ClaudeExtractor::new().extract_conversation(&conv).unwrap();
        assert_eq!(record.raw_text, "only plain text");
    }

    #[test]
    fn test_malformed_message_skipped() {
        let conv = json!({
            "name": "Broken message",
            "chat_messages": [
                "not an object",
                {"uuid": "a", "text": 42},
                {"uuid": "b", "text": "survivor"}
            ]
        });
        let record = ClaudeExtractor::new().extract_conversation(&conv).unwrap();
        assert_eq!(record.raw_text, "survivor");
        assert_eq!(record.message_count, 1);
    }

    #[test]
    fn test_missing_name_and_bad_date() {
        let conv = json!({"created_at": "not a date", "chat_messages": []});
        let record = ClaudeExtractor::new().extract_conversation(&conv).unwrap();
        assert_eq!(record.title, "");
        assert!(record.created_at.is_none());
    }

    #[test]
    fn test_chat_messages_wrong_type_is_error() {
        let conv = json!({"name": "Bad", "chat_messages": "nope"});
        let err = ClaudeExtractor::new().extract_conversation(&conv).unwrap_err();
        assert!(err.contains("malformed Claude conversation"));
    }
}
