//! Format detection and the unified extraction interface.
//!
//! Every supported export schema is handled by an [`Extractor`]; callers
//! never branch on the schema themselves:
//!
//! ```rust
//! use chatcat::parser::{ExportFormat, detect, extract};
//! use serde_json::json;
//!
//! let doc = json!({
//!     "name": "Weekly planning",
//!     "created_at": "2024-05-01T09:00:00Z",
//!     "chat_messages": [
//!         {"uuid": "a", "sender": "human", "text": "Draft the roadmap for Q3."}
//!     ]
//! });
//!
//! let format = detect(&doc);
//! assert_eq!(format, ExportFormat::Claude);
//!
//! let extraction = extract(&doc, format);
//! assert_eq!(extraction.records.len(), 1);
//! assert_eq!(extraction.records[0].title, "Weekly planning");
//! ```
//!
//! Adding a third schema means adding an `ExportFormat` variant, a detector
//! marker and an `Extractor`; the classifier is untouched.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ConvertConfig;
use crate::conversation::ConversationRecord;
use crate::error::{ChatcatError, Result};
use crate::parsers::{ChatGptExtractor, ClaudeExtractor, GenericExtractor};

/// Known export schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum ExportFormat {
    /// ChatGPT `conversations.json` (message tree under `mapping`)
    #[serde(alias = "gpt", alias = "openai")]
    ChatGpt,

    /// Claude `conversations.json` (flat `chat_messages` list)
    #[serde(alias = "anthropic")]
    Claude,

    /// Neither schema's markers were found
    Unknown,
}

impl ExportFormat {
    /// Returns all recognised formats (excluding `Unknown`).
    pub fn known() -> &'static [ExportFormat] {
        &[ExportFormat::ChatGpt, ExportFormat::Claude]
    }

    /// Returns all format names including aliases.
    pub fn all_names() -> &'static [&'static str] {
        &["chatgpt", "gpt", "openai", "claude", "anthropic", "unknown"]
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::ChatGpt => write!(f, "ChatGPT"),
            ExportFormat::Claude => write!(f, "Claude"),
            ExportFormat::Unknown => write!(f, "Unknown"),
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chatgpt" | "gpt" | "openai" => Ok(ExportFormat::ChatGpt),
            "claude" | "anthropic" => Ok(ExportFormat::Claude),
            "unknown" => Ok(ExportFormat::Unknown),
            _ => Err(format!(
                "Unknown export format: '{}'. Expected one of: {}",
                s,
                ExportFormat::all_names().join(", ")
            )),
        }
    }
}

/// Inspects a document's structural markers and names its schema.
///
/// Arrays report the format of their first recognisable element. Never
/// fails: anything unrecognised is [`ExportFormat::Unknown`].
pub fn detect(doc: &Value) -> ExportFormat {
    match doc {
        Value::Object(obj) => {
            if obj.get("mapping").is_some_and(Value::is_object) {
                ExportFormat::ChatGpt
            } else if obj.get("chat_messages").is_some_and(Value::is_array) {
                ExportFormat::Claude
            } else {
                ExportFormat::Unknown
            }
        }
        Value::Array(items) => items
            .iter()
            .map(detect)
            .find(|f| *f != ExportFormat::Unknown)
            .unwrap_or(ExportFormat::Unknown),
        _ => ExportFormat::Unknown,
    }
}

/// Why a conversation was left out of the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipReason {
    /// Zero-based position of the conversation in its input
    pub index: usize,
    /// Title, when one could be read
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Human-readable cause
    pub reason: String,
}

impl SkipReason {
    pub fn new(index: usize, title: Option<String>, reason: impl Into<String>) -> Self {
        Self {
            index,
            title,
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.title {
            Some(title) => write!(f, "#{} \"{}\": {}", self.index, title, self.reason),
            None => write!(f, "#{}: {}", self.index, self.reason),
        }
    }
}

/// Records extracted from an input together with the conversations skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub records: Vec<ConversationRecord>,
    pub skipped: Vec<SkipReason>,
}

impl Extraction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of conversations seen, extracted or not.
    pub fn total(&self) -> usize {
        self.records.len() + self.skipped.len()
    }

    /// Appends another extraction's records and skips.
    pub fn extend(&mut self, other: Extraction) {
        self.records.extend(other.records);
        self.skipped.extend(other.skipped);
    }

    /// Records a skipped conversation and logs it.
    pub(crate) fn push_skip(&mut self, skip: SkipReason) {
        warn!(index = skip.index, reason = %skip.reason, "skipping conversation");
        self.skipped.push(skip);
    }
}

/// Converts one schema's conversation objects into [`ConversationRecord`]s.
///
/// Implementations handle a single conversation at a time; [`extract`]
/// drives them over whole documents and turns their errors into skips.
pub trait Extractor: Send + Sync {
    /// Returns the human-readable name of this extractor.
    fn name(&self) -> &'static str;

    /// Returns the format this extractor handles.
    fn format(&self) -> ExportFormat;

    /// Extracts a single conversation.
    ///
    /// The error string is the skip reason reported to the user.
    fn extract_conversation(&self, conversation: &Value)
    -> std::result::Result<ConversationRecord, String>;
}

/// Creates the extractor for a format.
///
/// `Unknown` maps to the best-effort [`GenericExtractor`].
pub fn create_extractor(format: ExportFormat) -> Box<dyn Extractor> {
    match format {
        ExportFormat::ChatGpt => Box::new(ChatGptExtractor::new()),
        ExportFormat::Claude => Box::new(ClaudeExtractor::new()),
        ExportFormat::Unknown => Box::new(GenericExtractor::new()),
    }
}

/// Extracts every conversation in `doc` using the extractor for `format`.
///
/// `doc` may be one conversation object or an array of them. Failures of
/// individual conversations are collected in [`Extraction::skipped`].
pub fn extract(doc: &Value, format: ExportFormat) -> Extraction {
    let extractor = create_extractor(format);
    let mut extraction = Extraction::new();

    let conversations: Vec<&Value> = match doc {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };

    for (index, conversation) in conversations.into_iter().enumerate() {
        run_extractor(extractor.as_ref(), index, conversation, &mut extraction);
    }

    extraction
}

/// Detects and extracts each conversation of a loaded document list.
///
/// Detection happens per conversation, so archives mixing both schemas are
/// handled. Unknown conversations go through the generic extractor when
/// `config.generic_fallback` is set and are skipped otherwise.
pub fn extract_documents(documents: &[Value], config: &ConvertConfig) -> Extraction {
    let mut extraction = Extraction::new();

    for (index, doc) in documents.iter().enumerate() {
        let format = detect(doc);
        if format == ExportFormat::Unknown && !config.generic_fallback {
            extraction.push_skip(SkipReason::new(
                index,
                peek_title(doc),
                "unrecognized export format",
            ));
            continue;
        }
        let extractor = create_extractor(format);
        run_extractor(extractor.as_ref(), index, doc, &mut extraction);
    }

    extraction
}

fn run_extractor(
    extractor: &dyn Extractor,
    index: usize,
    conversation: &Value,
    extraction: &mut Extraction,
) {
    match extractor.extract_conversation(conversation) {
        Ok(record) => {
            debug!(
                index,
                extractor = extractor.name(),
                fragments = record.message_count,
                "extracted conversation"
            );
            extraction.records.push(record);
        }
        Err(reason) => {
            extraction.push_skip(SkipReason::new(index, peek_title(conversation), reason));
        }
    }
}

/// Reads a title from any conversation-like object, for skip messages.
fn peek_title(doc: &Value) -> Option<String> {
    ["title", "name"]
        .iter()
        .find_map(|key| doc.get(*key).and_then(Value::as_str))
        .filter(|t| !t.trim().is_empty())
        .map(ToString::to_string)
}

/// Splits raw input into conversation documents.
///
/// Accepted layouts:
/// - a JSON array of conversations
/// - a single conversation object
/// - an object wrapping a `conversations` array
/// - JSON Lines, one conversation per line
///
/// Blank input yields no documents. In JSON Lines input an unparseable line
/// becomes `Value::Null` (skipped later) as long as most lines are objects.
pub fn load_documents(content: &str) -> Result<Vec<Value>> {
    let trimmed = content.trim_start_matches('\u{feff}').trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => unwrap_documents(value),
        Err(whole_err) => {
            load_json_lines(trimmed).ok_or_else(|| ChatcatError::export_parse(whole_err, None))
        }
    }
}

fn unwrap_documents(value: Value) -> Result<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut obj) => {
            let is_wrapper = !obj.contains_key("mapping")
                && !obj.contains_key("chat_messages")
                && obj.get("conversations").is_some_and(Value::is_array);
            if is_wrapper {
                match obj.remove("conversations") {
                    Some(Value::Array(items)) => Ok(items),
                    _ => Ok(Vec::new()),
                }
            } else {
                Ok(vec![Value::Object(obj)])
            }
        }
        other => Err(ChatcatError::invalid_format(
            "JSON export",
            format!(
                "expected an object or array at the top level, found {}",
                json_kind(&other)
            ),
        )),
    }
}

/// Accepts JSON Lines only when the first line is an object, every line that
/// parses is an object, and unparseable lines are a minority.
///
/// Pretty-printed or truncated JSON fails these checks and keeps its
/// original parse error.
fn load_json_lines(content: &str) -> Option<Vec<Value>> {
    let lines: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.len() < 2 {
        return None;
    }

    let mut documents = Vec::with_capacity(lines.len());
    let mut bad_lines = Vec::new();
    for (n, line) in lines.iter().enumerate() {
        match serde_json::from_str::<Value>(line) {
            Ok(value) if value.is_object() => documents.push(value),
            Ok(_) => return None,
            Err(_) if n == 0 => return None,
            Err(e) => {
                bad_lines.push((n + 1, e));
                documents.push(Value::Null);
            }
        }
    }

    if bad_lines.len() * 2 >= lines.len() {
        return None;
    }
    for (line, error) in bad_lines {
        warn!(line, error = %error, "unparseable JSON line");
    }
    Some(documents)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Loads, detects and extracts an export held in memory.
///
/// With `config.recover_fragments`, content that is not JSON is scanned for
/// split-archive fragments instead of failing.
pub fn parse_str(content: &str, config: &ConvertConfig) -> Result<Extraction> {
    match load_documents(content) {
        Ok(documents) => Ok(extract_documents(&documents, config)),
        Err(err) if config.recover_fragments && err.is_parse() => recover(content, err),
        Err(err) => Err(err),
    }
}

#[cfg(feature = "fragments")]
fn recover(content: &str, err: ChatcatError) -> Result<Extraction> {
    let extraction = crate::parsers::recover_fragments(content);
    if extraction.total() == 0 {
        return Err(err);
    }
    Ok(extraction)
}

#[cfg(not(feature = "fragments"))]
fn recover(_content: &str, err: ChatcatError) -> Result<Extraction> {
    Err(err)
}

/// Reads and extracts an export file.
///
/// Each record is tagged with the file name. Unreadable or unparseable
/// input is fatal; everything below the document level is skip-and-log.
pub fn parse_file(path: &Path, config: &ConvertConfig) -> Result<Extraction> {
    let content = fs::read_to_string(path)?;
    let mut extraction = parse_str(&content, config).map_err(|err| match err {
        ChatcatError::Parse { format, source, .. } => ChatcatError::Parse {
            format,
            source,
            path: Some(path.to_path_buf()),
        },
        other => other,
    })?;

    if let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) {
        for record in &mut extraction.records {
            record.source_file = Some(name.clone());
        }
    }

    Ok(extraction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn test_format_from_str() {
        assert_eq!(ExportFormat::from_str("chatgpt").unwrap(), ExportFormat::ChatGpt);
        assert_eq!(ExportFormat::from_str("GPT").unwrap(), ExportFormat::ChatGpt);
        assert_eq!(ExportFormat::from_str("claude").unwrap(), ExportFormat::Claude);
        assert_eq!(ExportFormat::from_str("anthropic").unwrap(), ExportFormat::Claude);
        assert!(ExportFormat::from_str("gemini").is_err());
    }

    #[test]
    fn test_format_display() {
        assert_eq!(ExportFormat::ChatGpt.to_string(), "ChatGPT");
        assert_eq!(ExportFormat::Claude.to_string(), "Claude");
        assert_eq!(ExportFormat::Unknown.to_string(), "Unknown");
    }

    #[test]
    fn test_format_serde() {
        assert_eq!(serde_json::to_string(&ExportFormat::ChatGpt).unwrap(), "\"chatgpt\"");
        let parsed: ExportFormat = serde_json::from_str("\"openai\"").unwrap();
        assert_eq!(parsed, ExportFormat::ChatGpt);
    }

    #[test]
    fn test_detect_chatgpt() {
        let doc = json!({"title": "t", "mapping": {}});
        assert_eq!(detect(&doc), ExportFormat::ChatGpt);
    }

    #[test]
    fn test_detect_claude() {
        let doc = json!({"name": "t", "chat_messages": []});
        assert_eq!(detect(&doc), ExportFormat::Claude);
    }

    #[test]
    fn test_detect_wrong_marker_types() {
        assert_eq!(detect(&json!({"mapping": []})), ExportFormat::Unknown);
        assert_eq!(detect(&json!({"chat_messages": {}})), ExportFormat::Unknown);
    }

    #[test]
    fn test_detect_array_uses_first_known() {
        let doc = json!([42, {"foo": 1}, {"chat_messages": []}, {"mapping": {}}]);
        assert_eq!(detect(&doc), ExportFormat::Claude);
    }

    #[test]
    fn test_detect_never_fails_on_scalars() {
        assert_eq!(detect(&json!(null)), ExportFormat::Unknown);
        assert_eq!(detect(&json!("text")), ExportFormat::Unknown);
        assert_eq!(detect(&json!([])), ExportFormat::Unknown);
    }

    #[test]
    fn test_load_documents_array() {
        let docs = load_documents(r#"[{"a": 1}, {"b": 2}]"#).unwrap();
        assert_eq!(docs.len(), 2);
    }

    #[test]
    fn test_load_documents_single_object() {
        let docs = load_documents(r#"{"title": "x", "mapping": {}}"#).unwrap();
        assert_eq!(docs.len(), 1);
    }

    #[test]
    fn test_load_documents_wrapper() {
        let docs =
            load_documents(r#"{"conversations": [{"mapping": {}}, {"mapping": {}}]}"#).unwrap();
        assert_eq!(docs.len(), 2);
    }

    #[test]
    fn test_load_documents_json_lines() {
        let content = "{\"mapping\": {}}\n\n{\"chat_messages\": []}\nnot json\n";
        let docs = load_documents(content).unwrap();
        assert_eq!(docs.len(), 3);
        assert!(docs[2].is_null());
    }

    #[test]
    fn test_load_documents_rejects_pretty_printed_truncation() {
        let content = "[\n  {\n    \"title\": \"A\",\n    \"parts\": [\n      \"hello\"\n    ]\n  }\n";
        let err = load_documents(content).unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn test_load_documents_json_lines_needs_objects() {
        assert!(load_documents("{\"mapping\": {}}\n\"text\"\n").is_err());
        assert!(load_documents("not json\n{\"mapping\": {}}\n{\"mapping\": {}}\n").is_err());
        assert!(load_documents("{\"mapping\": {}}\nbroken\nalso broken\n").is_err());
    }

    #[test]
    fn test_load_documents_blank() {
        assert!(load_documents("   \n").unwrap().is_empty());
    }

    #[test]
    fn test_load_documents_invalid() {
        let err = load_documents("this is not json").unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn test_load_documents_scalar_top_level() {
        assert!(load_documents("42").is_err());
    }

    #[test]
    fn test_extract_documents_skips_unknown_without_fallback() {
        let docs = vec![json!({"title": "Mystery", "stuff": {"text": "hello world"}})];
        let config = ConvertConfig::new().with_generic_fallback(false);
        let extraction = extract_documents(&docs, &config);
        assert!(extraction.records.is_empty());
        assert_eq!(extraction.skipped.len(), 1);
        assert_eq!(extraction.skipped[0].title.as_deref(), Some("Mystery"));
        assert_eq!(extraction.skipped[0].reason, "unrecognized export format");
    }

    #[test]
    fn test_extract_documents_mixed_formats() {
        let docs = vec![
            json!({"title": "A", "mapping": {
                "root": {"id": "root", "message": null, "parent": null, "children": ["m1"]},
                "m1": {"id": "m1", "parent": "root", "children": [], "message": {
                    "author": {"role": "user"},
                    "content": {"content_type": "text", "parts": ["Hello from ChatGPT"]}
                }}
            }}),
            json!({"name": "B", "chat_messages": [{"uuid": "1", "text": "Hello from Claude"}]}),
            json!("garbage"),
        ];
        let extraction = extract_documents(&docs, &ConvertConfig::default());
        assert_eq!(extraction.records.len(), 2);
        assert_eq!(extraction.records[0].format, ExportFormat::ChatGpt);
        assert_eq!(extraction.records[1].format, ExportFormat::Claude);
        assert_eq!(extraction.skipped.len(), 1);
        assert_eq!(extraction.skipped[0].index, 2);
        assert_eq!(extraction.total(), 3);
    }

    #[test]
    fn test_skip_reason_display() {
        let skip = SkipReason::new(3, Some("Notes".into()), "mapping is not an object");
        assert_eq!(skip.to_string(), "#3 \"Notes\": mapping is not an object");
        let skip = SkipReason::new(4, None, "conversation is not a JSON object");
        assert_eq!(skip.to_string(), "#4: conversation is not a JSON object");
    }

    #[test]
    fn test_create_extractor_names() {
        assert_eq!(create_extractor(ExportFormat::ChatGpt).name(), "ChatGPT");
        assert_eq!(create_extractor(ExportFormat::Claude).name(), "Claude");
        assert_eq!(create_extractor(ExportFormat::Unknown).name(), "Generic");
    }

    #[test]
    fn test_parse_str_invalid_json_is_fatal_by_default() {
        let result = parse_str("\"title\": \"broken", &ConvertConfig::default());
        assert!(result.unwrap_err().is_parse());
    }
}
