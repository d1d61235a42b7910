//! ChatGPT `conversations.json` extractor.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::conversation::ConversationRecord;
use crate::parser::{ExportFormat, Extractor};
use crate::parsing::{ThreadNode, parse_timestamp_value, thread_order};

/// Extractor for ChatGPT exports.
///
/// ChatGPT stores each conversation as a message tree:
/// ```json
/// {
///   "title": "Archive and asset management",
///   "create_time": 1761376400.31522,
///   "mapping": {
///     "client-created-root": {"id": "client-created-root", "message": null, "parent": null, "children": ["m1"]},
///     "m1": {
///       "id": "m1", "parent": "client-created-root", "children": [],
///       "message": {
///         "author": {"role": "user"},
///         "content": {"content_type": "text", "parts": ["I need help organizing my Google Drive"]}
///       }
///     }
///   }
/// }
/// ```
///
/// The tree is walked depth-first from its roots; every branch is kept, so
/// regenerated answers contribute their text too.
pub struct ChatGptExtractor;

impl ChatGptExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ChatGptExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct RawConversation {
    #[serde(default)]
    title: Option<Value>,
    #[serde(default)]
    create_time: Option<Value>,
    mapping: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RawNode {
    #[serde(default)]
    parent: Option<String>,
    #[serde(default)]
    children: Option<Vec<String>>,
    #[serde(default)]
    message: Option<Value>,
}

impl Extractor for ChatGptExtractor {
    fn name(&self) -> &'static str {
        "ChatGPT"
    }

    fn format(&self) -> ExportFormat {
        ExportFormat::ChatGpt
    }

    fn extract_conversation(&self, conversation: &Value) -> Result<ConversationRecord, String> {
        if !conversation.is_object() {
            return Err("conversation is not a JSON object".to_string());
        }
        let raw = RawConversation::deserialize(conversation)
            .map_err(|e| format!("malformed ChatGPT conversation: {e}"))?;

        let nodes: Vec<(&str, RawNode)> = raw
            .mapping
            .iter()
            .filter_map(|(key, value)| match RawNode::deserialize(value) {
                Ok(node) => Some((key.as_str(), node)),
                Err(e) => {
                    debug!(node = %key, error = %e, "skipping malformed mapping node");
                    None
                }
            })
            .collect();

        let thread: Vec<ThreadNode<'_>> = nodes
            .iter()
            .map(|(id, node)| {
                let thread_node = ThreadNode::new(id, node.parent.as_deref());
                match &node.children {
                    Some(children) => {
                        thread_node.with_children(children.iter().map(String::as_str).collect())
                    }
                    None => thread_node,
                }
            })
            .collect();

        let fragments: Vec<String> = thread_order(&thread)
            .into_iter()
            .filter_map(|i| nodes[i].1.message.as_ref())
            .flat_map(message_fragments)
            .collect();

        let title = raw
            .title
            .as_ref()
            .and_then(Value::as_str)
            .unwrap_or_default();

        let mut record = ConversationRecord::new(title)
            .with_fragments(fragments)
            .with_format(ExportFormat::ChatGpt);
        if let Some(ts) = raw.create_time.as_ref().and_then(parse_timestamp_value) {
            record = record.with_created_at(ts);
        }
        Ok(record)
    }
}

/// Collects the text pieces of one ChatGPT message.
///
/// System-authored and hidden messages contribute nothing; neither does a
/// message that is not an object.
fn message_fragments(message: &Value) -> Vec<String> {
    let Some(obj) = message.as_object() else {
        return Vec::new();
    };

    let role = obj
        .get("author")
        .and_then(|a| a.get("role"))
        .and_then(Value::as_str);
    if role == Some("system") {
        return Vec::new();
    }

    let hidden = obj
        .get("metadata")
        .and_then(|m| m.get("is_visually_hidden_from_conversation"))
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if hidden {
        return Vec::new();
    }

    let Some(content) = obj.get("content") else {
        return Vec::new();
    };

    let pieces: Vec<String> = match content {
        Value::String(s) => vec![s.clone()],
        Value::Object(c) => match c.get("parts") {
            Some(Value::Array(parts)) => parts.iter().filter_map(part_text).collect(),
            _ => c
                .get("text")
                .and_then(Value::as_str)
                .map(|s| vec![s.to_string()])
                .unwrap_or_default(),
        },
        _ => Vec::new(),
    };

    pieces
        .into_iter()
        .filter(|p| !p.trim().is_empty())
        .collect()
}

/// Text of one `parts` entry: plain strings, or objects carrying `text`.
fn part_text(part: &Value) -> Option<String> {
    match part {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => obj
            .get("text")
            .and_then(Value::as_str)
            .map(ToString::to_string),
        _ => None,
    }
}
