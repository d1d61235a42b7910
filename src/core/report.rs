//! Summary statistics over a classified run.
//!
//! A [`Report`] is computed from the classified records alone and never
//! fails: an empty run produces an empty report whose text form says so.
//!
//! # Example
//!
//! ```rust
//! use chatcat::ConversationRecord;
//! use chatcat::core::classifier::Classifier;
//! use chatcat::core::report::Report;
//!
//! let classifier = Classifier::default();
//! let records: Vec<_> = ["Plan the webinar funnel for next month", "Tidy the shared drive"]
//!     .iter()
//!     .map(|text| classifier.classify(&ConversationRecord::new("").with_fragments([*text])))
//!     .collect();
//!
//! let report = Report::build(&records, "unknown");
//! assert_eq!(report.total_conversations, 2);
//! assert_eq!(report.missing_dates, 2);
//! assert!(report.date_range.is_none());
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::Serialize;

use crate::core::models::ClassifiedRecord;
use crate::parser::SkipReason;

/// Scores at or above this are "high".
pub const HIGH_RELEVANCE: f64 = 0.8;

/// Scores at or above this (and below [`HIGH_RELEVANCE`]) are "medium".
pub const MEDIUM_RELEVANCE: f64 = 0.5;

/// Category labels starting with this word and a dash count as client projects.
pub const PROJECT_PREFIX: &str = "Project";

const PROJECT_DASHES: [char; 3] = ['–', '-', '—'];

/// True for labels such as `Project – TNT Media` or `Project - Acme`.
pub fn is_project_label(label: &str) -> bool {
    label
        .strip_prefix(PROJECT_PREFIX)
        .is_some_and(|rest| rest.trim_start().starts_with(PROJECT_DASHES))
}

/// Entries shown per table in the text summary.
const TOP_N: usize = 5;

/// A label and how many records carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

/// Records per relevance band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RelevanceHistogram {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl RelevanceHistogram {
    fn add(&mut self, score: f64) {
        if score >= HIGH_RELEVANCE {
            self.high += 1;
        } else if score >= MEDIUM_RELEVANCE {
            self.medium += 1;
        } else {
            self.low += 1;
        }
    }
}

/// Earliest and latest known dates, as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub earliest: String,
    pub latest: String,
}

/// Aggregated statistics for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    pub total_conversations: usize,
    /// Sorted by count descending, then label ascending
    pub categories: Vec<LabelCount>,
    /// Sorted by count descending, then label ascending
    pub tags: Vec<LabelCount>,
    pub relevance: RelevanceHistogram,
    pub date_range: Option<DateRange>,
    pub missing_dates: usize,
    /// `YYYY-MM` to record count
    pub by_month: BTreeMap<String, usize>,
    pub by_source_file: BTreeMap<String, usize>,
    /// Categories accepted by [`is_project_label`], same order as `categories`
    pub top_projects: Vec<LabelCount>,
    /// Conversations left out during extraction
    pub skipped: Vec<SkipReason>,
}

impl Report {
    /// Computes the report for `records`.
    ///
    /// Dates equal to `unknown_date` count as missing.
    pub fn build(records: &[ClassifiedRecord], unknown_date: &str) -> Self {
        let mut categories: HashMap<&str, usize> = HashMap::new();
        let mut tags: HashMap<&str, usize> = HashMap::new();
        let mut relevance = RelevanceHistogram::default();
        let mut by_month = BTreeMap::new();
        let mut by_source_file = BTreeMap::new();
        let mut missing_dates = 0;
        let mut earliest: Option<&str> = None;
        let mut latest: Option<&str> = None;

        for record in records {
            for category in &record.categories {
                *categories.entry(category.as_str()).or_default() += 1;
            }
            for tag in &record.tags {
                *tags.entry(tag.as_str()).or_default() += 1;
            }
            relevance.add(record.relevance_score);

            if record.has_date(unknown_date) {
                let date = record.date.as_str();
                earliest = Some(earliest.map_or(date, |e| e.min(date)));
                latest = Some(latest.map_or(date, |l| l.max(date)));
                if let Some(month) = date.get(..7) {
                    *by_month.entry(month.to_string()).or_default() += 1;
                }
            } else {
                missing_dates += 1;
            }

            if let Some(source) = &record.source_file {
                *by_source_file.entry(source.clone()).or_default() += 1;
            }
        }

        let categories = ranked(categories);
        let top_projects = categories
            .iter()
            .filter(|c| is_project_label(&c.label))
            .cloned()
            .collect();

        Self {
            total_conversations: records.len(),
            categories,
            tags: ranked(tags),
            relevance,
            date_range: earliest.zip(latest).map(|(earliest, latest)| DateRange {
                earliest: earliest.to_string(),
                latest: latest.to_string(),
            }),
            missing_dates,
            by_month,
            by_source_file,
            top_projects,
            skipped: Vec::new(),
        }
    }

    /// Attaches the extraction skip list.
    #[must_use]
    pub fn with_skipped(mut self, skipped: Vec<SkipReason>) -> Self {
        self.skipped = skipped;
        self
    }

    /// Returns `true` if no record was classified.
    pub fn is_empty(&self) -> bool {
        self.total_conversations == 0
    }

    /// Number of records carrying `label` as a category.
    pub fn category_count(&self, label: &str) -> usize {
        count_of(&self.categories, label)
    }

    /// Number of records carrying `label` as a tag.
    pub fn tag_count(&self, label: &str) -> usize {
        count_of(&self.tags, label)
    }
}

fn ranked(counts: HashMap<&str, usize>) -> Vec<LabelCount> {
    let mut ranked: Vec<LabelCount> = counts
        .into_iter()
        .map(|(label, count)| LabelCount {
            label: label.to_string(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    ranked
}

fn count_of(table: &[LabelCount], label: &str) -> usize {
    table
        .iter()
        .find(|entry| entry.label == label)
        .map_or(0, |entry| entry.count)
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(f, "📊 Conversion report")?;
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;

        if self.is_empty() {
            writeln!(f, "   No data: no conversations were classified.")?;
        } else {
            writeln!(f, "   Conversations:  {}", self.total_conversations)?;
            match &self.date_range {
                Some(range) => {
                    writeln!(f, "   Date range:     {} → {}", range.earliest, range.latest)?;
                }
                None => writeln!(f, "   Date range:     none recorded")?,
            }
            if self.missing_dates > 0 {
                writeln!(f, "   Missing dates:  {}", self.missing_dates)?;
            }
            writeln!(
                f,
                "   Relevance:      high {} · medium {} · low {}",
                self.relevance.high, self.relevance.medium, self.relevance.low
            )?;

            writeln!(f)?;
            writeln!(f, "🏷️  Top categories:")?;
            write_top(f, &self.categories)?;

            if !self.tags.is_empty() {
                writeln!(f)?;
                writeln!(f, "🔖 Top tags:")?;
                write_top(f, &self.tags)?;
            }

            if !self.top_projects.is_empty() {
                writeln!(f)?;
                writeln!(f, "📁 Projects:")?;
                write_top(f, &self.top_projects)?;
            }
        }

        if !self.skipped.is_empty() {
            writeln!(f)?;
            writeln!(f, "⚠️  Skipped {} conversation(s):", self.skipped.len())?;
            for skip in self.skipped.iter().take(TOP_N) {
                writeln!(f, "   {skip}")?;
            }
            if self.skipped.len() > TOP_N {
                writeln!(f, "   ... and {} more", self.skipped.len() - TOP_N)?;
            }
        }

        Ok(())
    }
}

fn write_top(f: &mut fmt::Formatter<'_>, table: &[LabelCount]) -> fmt::Result {
    for entry in table.iter().take(TOP_N) {
        writeln!(f, "   {:>5}  {}", entry.count, entry.label)?;
    }
    Ok(())
}
