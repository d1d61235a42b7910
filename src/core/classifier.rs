//! Keyword classifier: description, categories, tags and relevance.
//!
//! Classification is a pure function of the record, the taxonomy and the
//! configuration. It never fails; a conversation with no usable content
//! still gets a description, the fallback category and the floor score.
//!
//! # Example
//!
//! ```rust
//! use chatcat::ConversationRecord;
//! use chatcat::core::classifier::Classifier;
//!
//! let classifier = Classifier::default();
//! let record = ConversationRecord::new("Archive and asset management").with_fragments([
//!     "I want to organize my Google Drive archive into an asset management system.",
//! ]);
//!
//! let classified = classifier.classify(&record);
//! assert!(classified.categories.contains(&"Google Drive".to_string()));
//! assert!(classified.categories.contains(&"Project Management".to_string()));
//! assert!(classified.relevance_score > 0.5);
//! ```

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::ClassifierConfig;
use crate::conversation::ConversationRecord;
use crate::core::models::ClassifiedRecord;
use crate::core::taxonomy::{FALLBACK_CATEGORY, Taxonomy};

/// Score of a record that only received the fallback category.
pub const RELEVANCE_FLOOR: f64 = 0.10;

/// Base score once at least one real category matched.
pub const RELEVANCE_BASE: f64 = 0.40;

/// Added per matched category, up to [`MAX_SCORED_CATEGORIES`].
pub const CATEGORY_WEIGHT: f64 = 0.15;

/// Added per matched tag, up to [`MAX_SCORED_TAGS`].
pub const TAG_WEIGHT: f64 = 0.05;

pub const MAX_SCORED_CATEGORIES: usize = 4;
pub const MAX_SCORED_TAGS: usize = 6;

/// Longest display name, in characters.
pub const MAX_NAME_LEN: usize = 100;

/// Name used when a conversation has no title.
pub const UNTITLED: &str = "Untitled conversation";

const ELLIPSIS: &str = "...";

/// Sentences shorter than either bound are never used as descriptions.
const MIN_DESCRIPTION_WORDS: usize = 4;
const MIN_DESCRIPTION_CHARS: usize = 20;

/// Greetings and acknowledgements below this many words are boilerplate.
const GREETING_MAX_WORDS: usize = 8;

const SYSTEM_PROMPT_OPENERS: &[&str] = &["you are ", "you're a ", "act as "];

const GREETING_OPENERS: &[&str] = &[
    "hi",
    "hello",
    "hey",
    "thanks",
    "thank you",
    "sure",
    "ok",
    "okay",
    "great",
    "certainly",
    "of course",
    "absolutely",
];

/// Classifies conversation records against a taxonomy.
#[derive(Debug, Clone)]
pub struct Classifier<'t> {
    taxonomy: &'t Taxonomy,
    config: ClassifierConfig,
}

impl Default for Classifier<'static> {
    fn default() -> Self {
        Self::new(Taxonomy::builtin(), ClassifierConfig::default())
    }
}

impl<'t> Classifier<'t> {
    pub fn new(taxonomy: &'t Taxonomy, config: ClassifierConfig) -> Self {
        Self { taxonomy, config }
    }

    pub fn taxonomy(&self) -> &'t Taxonomy {
        self.taxonomy
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classifies one record.
    pub fn classify(&self, record: &ConversationRecord) -> ClassifiedRecord {
        let (categories, tags) = if record.is_empty() {
            (Vec::new(), Vec::new())
        } else {
            let haystack = format!("{}\n{}", record.title, record.raw_text).to_lowercase();
            (
                to_owned(self.taxonomy.match_categories(&haystack)),
                to_owned(self.taxonomy.match_tags(&haystack)),
            )
        };

        let relevance_score = relevance_score(categories.len(), tags.len());
        let categories = if categories.is_empty() {
            vec![FALLBACK_CATEGORY.to_string()]
        } else {
            categories
        };

        let classified = ClassifiedRecord {
            name: display_name(&record.title, record.created_at),
            description: describe(
                &record.raw_text,
                &record.title,
                self.config.description_max_len,
            ),
            categories,
            tags,
            date: format_date(record.created_at, &self.config.unknown_date),
            relevance_score,
            message_volume: record.message_count,
            source_file: record.source_file.clone(),
        };

        debug!(
            name = %classified.name,
            categories = classified.categories.len(),
            tags = classified.tags.len(),
            score = classified.relevance_score,
            "classified conversation"
        );

        classified
    }
}

fn to_owned(labels: Vec<&str>) -> Vec<String> {
    labels.into_iter().map(ToString::to_string).collect()
}

/// Scores a classification from its match counts.
///
/// `category_matches` counts real taxonomy hits; zero means only the
/// fallback category applies. The result is clamped to `[0.0, 1.0]` and
/// rounded to two decimals, and never decreases when either count grows.
///
/// ```rust
/// use chatcat::core::classifier::{RELEVANCE_FLOOR, relevance_score};
///
/// assert_eq!(relevance_score(0, 0), RELEVANCE_FLOOR);
/// assert_eq!(relevance_score(2, 4), 0.9);
/// assert_eq!(relevance_score(10, 10), 1.0);
/// ```
pub fn relevance_score(category_matches: usize, tag_matches: usize) -> f64 {
    let base = if category_matches == 0 {
        RELEVANCE_FLOOR
    } else {
        RELEVANCE_BASE + CATEGORY_WEIGHT * category_matches.min(MAX_SCORED_CATEGORIES) as f64
    };
    let score = base + TAG_WEIGHT * tag_matches.min(MAX_SCORED_TAGS) as f64;
    (score.clamp(0.0, 1.0) * 100.0).round() / 100.0
}

/// Formats a creation time as `YYYY-MM-DD` in UTC, or returns `sentinel`.
pub fn format_date(created_at: Option<DateTime<Utc>>, sentinel: &str) -> String {
    created_at.map_or_else(
        || sentinel.to_string(),
        |ts| ts.format("%Y-%m-%d").to_string(),
    )
}

/// Cleans a title for display.
///
/// Whitespace runs collapse to single spaces and long titles are cut on a
/// word boundary. A blank title becomes [`UNTITLED`], with the date appended
/// when known.
pub fn display_name(title: &str, created_at: Option<DateTime<Utc>>) -> String {
    let collapsed = collapse_whitespace(title);
    if collapsed.is_empty() {
        return match created_at {
            Some(ts) => format!("{UNTITLED} ({})", ts.format("%Y-%m-%d")),
            None => UNTITLED.to_string(),
        };
    }
    truncate_at_word(&collapsed, MAX_NAME_LEN)
}

/// Builds a description from the first substantive sentence.
///
/// Falls back to `"Conversation about {title}"`, or to a fixed message when
/// the title is blank too.
pub fn describe(raw_text: &str, title: &str, max_len: usize) -> String {
    let sentence = split_sentences(raw_text)
        .into_iter()
        .map(collapse_whitespace)
        .find(|s| !is_boilerplate(s));

    let text = match sentence {
        Some(sentence) => sentence,
        None => {
            let title = collapse_whitespace(title);
            if title.is_empty() {
                "Conversation with no recoverable content".to_string()
            } else {
                format!("Conversation about {title}")
            }
        }
    };

    truncate_at_word(&text, max_len)
}

/// Shortens `text` to at most `max_len` characters without splitting words.
///
/// Text within the bound is returned unchanged. Otherwise it is cut at the
/// last word boundary that leaves room for a trailing `"..."`; a single word
/// longer than the bound is cut mid-word.
///
/// ```rust
/// use chatcat::core::classifier::truncate_at_word;
///
/// assert_eq!(truncate_at_word("short enough", 20), "short enough");
/// assert_eq!(truncate_at_word("the quick brown fox jumps", 16), "the quick...");
/// ```
pub fn truncate_at_word(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }

    let budget = max_len.saturating_sub(ELLIPSIS.len());
    let head: String = text.chars().take(budget).collect();
    let ends_on_boundary = text.chars().nth(budget).is_some_and(char::is_whitespace);

    let kept = if ends_on_boundary {
        head.trim_end()
    } else {
        match head.rfind(char::is_whitespace) {
            Some(idx) if !head[..idx].trim().is_empty() => head[..idx].trim_end(),
            _ => head.as_str(),
        }
    };

    format!("{kept}{ELLIPSIS}")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Splits on `.`, `!` or `?` followed by whitespace, and on newlines.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        let end = match c {
            '\n' => Some(idx),
            '.' | '!' | '?' if chars.peek().is_some_and(|(_, next)| next.is_whitespace()) => {
                Some(idx + c.len_utf8())
            }
            _ => None,
        };
        if let Some(end) = end {
            let sentence = text[start..end].trim();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            start = idx + c.len_utf8();
        }
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

fn is_boilerplate(sentence: &str) -> bool {
    let words = sentence.split_whitespace().count();
    if words < MIN_DESCRIPTION_WORDS || sentence.chars().count() < MIN_DESCRIPTION_CHARS {
        return true;
    }

    let lower = sentence.to_lowercase();
    if SYSTEM_PROMPT_OPENERS.iter().any(|p| lower.starts_with(p)) {
        return true;
    }

    words < GREETING_MAX_WORDS && GREETING_OPENERS.iter().any(|g| starts_with_word(&lower, g))
}

fn starts_with_word(text: &str, word: &str) -> bool {
    text.strip_prefix(word)
        .is_some_and(|rest| rest.chars().next().is_none_or(|c| !c.is_alphanumeric()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::taxonomy::TaxonomyEntry;
    use chrono::TimeZone;

    fn record(title: &str, fragments: &[&str]) -> ConversationRecord {
        ConversationRecord::new(title).with_fragments(fragments.iter().copied())
    }

    #[test]
    fn test_empty_text_gets_fallback_and_floor() {
        let classified = Classifier::default().classify(&record("Google Drive cleanup", &[]));
        assert_eq!(classified.categories, vec![FALLBACK_CATEGORY]);
        assert!(classified.tags.is_empty());
        assert_eq!(classified.relevance_score, RELEVANCE_FLOOR);
        assert_eq!(classified.description, "Conversation about Google Drive cleanup");
        assert_eq!(classified.message_volume, 0);
    }

    #[test]
    fn test_empty_everything() {
        let classified = Classifier::default().classify(&record("", &[]));
        assert_eq!(classified.name, UNTITLED);
        assert_eq!(classified.description, "Conversation with no recoverable content");
        assert_eq!(classified.date, "unknown");
    }

    #[test]
    fn test_archive_scenario() {
        let rec = record(
            "Archive and asset management",
            &[
                "I need to reorganize everything sitting in my Google Drive folders.",
                "Let's design an asset management system with copywriting templates per client.",
            ],
        );
        let classified = Classifier::default().classify(&rec);
        assert_eq!(classified.categories, vec!["Google Drive", "Project Management"]);
        assert!(classified.tags.contains(&"Template".to_string()));
        assert!(classified.tags.contains(&"Google Drive".to_string()));
        assert!(classified.relevance_score > 0.5);
        assert_eq!(
            classified.description,
            "I need to reorganize everything sitting in my Google Drive folders."
        );
    }

    #[test]
    fn test_description_skips_boilerplate() {
        let rec = record(
            "t",
            &[
                "You are a helpful assistant that writes marketing copy for small brands.",
                "Hi there, thanks!",
                "Okay.",
                "Can you outline a three part welcome email series for a bakery?",
            ],
        );
        let description = Classifier::default().classify(&rec).description;
        assert_eq!(
            description,
            "Can you outline a three part welcome email series for a bakery?"
        );
    }

    #[test]
    fn test_long_greeting_is_substantive() {
        let rec = record(
            "t",
            &["Sure, here is the revised onboarding plan for the new support hires."],
        );
        let description = Classifier::default().classify(&rec).description;
        assert!(description.starts_with("Sure, here is"));
    }

    #[test]
    fn test_description_is_bounded() {
        let long = "word ".repeat(200);
        let config = ClassifierConfig::new().with_description_max_len(50);
        let classifier = Classifier::new(Taxonomy::builtin(), config);
        let description = classifier.classify(&record("t", &[&long])).description;
        assert!(description.chars().count() <= 50);
        assert!(description.ends_with("..."));
    }

    #[test]
    fn test_split_sentences() {
        let parts = split_sentences("First one. Second! Third?\nFourth v1.2 stays whole");
        assert_eq!(parts, vec!["First one.", "Second!", "Third?", "Fourth v1.2 stays whole"]);
    }

    #[test]
    fn test_starts_with_word() {
        assert!(starts_with_word("ok, let's go", "ok"));
        assert!(!starts_with_word("okra recipes", "ok"));
        assert!(starts_with_word("hi", "hi"));
    }

    #[test]
    fn test_truncate_at_word() {
        assert_eq!(truncate_at_word("the quick brown fox", 19), "the quick brown fox");
        assert_eq!(truncate_at_word("the quick brown fox", 18), "the quick brown...");
        assert_eq!(truncate_at_word("supercalifragilistic", 10), "superca...");
    }

    #[test]
    fn test_truncate_multibyte() {
        let text = "café crème brûlée à la carte";
        let cut = truncate_at_word(text, 15);
        assert!(cut.chars().count() <= 15);
        assert_eq!(cut, "café crème...");
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("  Weekly\n\tsync  ", None), "Weekly sync");
        let ts = Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();
        assert_eq!(display_name("   ", Some(ts)), "Untitled conversation (2024-03-09)");
        let long = "title ".repeat(40);
        assert!(display_name(&long, None).chars().count() <= MAX_NAME_LEN);
    }

    #[test]
    fn test_date_formatting() {
        let ts = Utc.with_ymd_and_hms(2025, 10, 25, 7, 13, 20).unwrap();
        assert_eq!(format_date(Some(ts), "unknown"), "2025-10-25");
        assert_eq!(format_date(None, "n/a"), "n/a");
    }

    #[test]
    fn test_relevance_score_steps() {
        assert_eq!(relevance_score(0, 0), 0.1);
        assert_eq!(relevance_score(0, 2), 0.2);
        assert_eq!(relevance_score(1, 0), 0.55);
        assert_eq!(relevance_score(4, 0), 1.0);
        assert_eq!(relevance_score(3, 1), 0.9);
    }

    #[test]
    fn test_custom_taxonomy() {
        let taxonomy = Taxonomy::new(
            vec![TaxonomyEntry::new("Cooking", ["recipe"])],
            vec![TaxonomyEntry::new("Baking", ["oven"])],
        )
        .unwrap();
        let classifier = Classifier::new(&taxonomy, ClassifierConfig::default());
        let classified =
            classifier.classify(&record("Bread", &["A simple recipe that needs a hot oven."]));
        assert_eq!(classified.categories, vec!["Cooking"]);
        assert_eq!(classified.tags, vec!["Baking"]);
        assert_eq!(classified.relevance_score, 0.6);
    }

    #[test]
    fn test_source_file_carried() {
        let rec = record("t", &["some text here for testing"]).with_source_file("a.json");
        assert_eq!(
            Classifier::default().classify(&rec).source_file.as_deref(),
            Some("a.json")
        );
    }
}
