//! Run pipeline: classify, write chunks, build the report.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::ConvertConfig;
use crate::conversation::ConversationRecord;
use crate::core::classifier::{Classifier, UNTITLED};
use crate::core::models::ClassifiedRecord;
use crate::core::output::{write_chunks, write_report_json};
use crate::core::report::Report;
use crate::error::Result;
use crate::parser::{Extraction, SkipReason};
use crate::progress::{Progress, ProgressCallback};

/// Counts for one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessingStats {
    /// Conversations found in the input, classified or not
    pub conversations_seen: usize,
    /// Records written
    pub processed: usize,
    /// Duplicates dropped (batch runs)
    pub duplicates_removed: usize,
    /// Conversations left out, with reasons
    pub skipped: Vec<SkipReason>,
}

impl ProcessingStats {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Share of conversations that made it to the output, in percent.
    pub fn success_rate(&self) -> f64 {
        if self.conversations_seen == 0 {
            return 0.0;
        }
        (self.processed as f64 / self.conversations_seen as f64) * 100.0
    }
}

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub stats: ProcessingStats,
    pub chunks: Vec<PathBuf>,
    pub report: Report,
    pub report_path: Option<PathBuf>,
}

/// Classifies every record in order.
///
/// `progress` is called every `interval` records and after the last one.
pub fn classify_all(
    records: &[ConversationRecord],
    classifier: &Classifier<'_>,
    interval: usize,
    progress: Option<&ProgressCallback>,
) -> Vec<ClassifiedRecord> {
    let total = records.len();
    let interval = interval.max(1);
    let mut classified = Vec::with_capacity(total);

    for record in records {
        classified.push(classifier.classify(record));
        let done = classified.len();
        if let Some(callback) = progress {
            if done % interval == 0 || done == total {
                callback(Progress::new(done, total));
            }
        }
    }

    classified
}

/// Drops records whose `(name, date)` pair was already seen.
///
/// Records named with the untitled placeholder also compare description and
/// message volume, so distinct untitled conversations on one date survive.
/// The first occurrence wins. Returns the kept records and the number
/// dropped.
pub fn dedupe_records(records: Vec<ClassifiedRecord>) -> (Vec<ClassifiedRecord>, usize) {
    let before = records.len();
    let mut seen = HashSet::new();
    let kept: Vec<ClassifiedRecord> = records
        .into_iter()
        .filter(|r| seen.insert(dedupe_key(r)))
        .collect();
    let removed = before - kept.len();
    if removed > 0 {
        debug!(removed, "dropped duplicate conversations");
    }
    (kept, removed)
}

fn dedupe_key(record: &ClassifiedRecord) -> (String, String, Option<(String, usize)>) {
    let content = record
        .name
        .starts_with(UNTITLED)
        .then(|| (record.description.clone(), record.message_volume));
    (record.name.clone(), record.date.clone(), content)
}

/// Sorts by date ascending, with `unknown_date` records last.
///
/// The sort is stable, so records sharing a date keep their input order.
pub fn sort_by_date(records: &mut [ClassifiedRecord], unknown_date: &str) {
    records.sort_by(|a, b| {
        (!a.has_date(unknown_date), &a.date).cmp(&(!b.has_date(unknown_date), &b.date))
    });
}

/// Writes chunks and the optional report for already classified records.
///
/// `conversations_seen` is the input total before skips and de-duplication.
pub fn write_outputs(
    records: &[ClassifiedRecord],
    skipped: Vec<SkipReason>,
    conversations_seen: usize,
    prefix: &Path,
    config: &ConvertConfig,
) -> Result<RunSummary> {
    config.validate()?;

    let chunks = write_chunks(records, prefix, config.chunk_size)?;
    let report =
        Report::build(records, &config.classifier.unknown_date).with_skipped(skipped.clone());
    let report_path = if config.write_report {
        Some(write_report_json(&report, prefix)?)
    } else {
        None
    };

    info!(
        records = records.len(),
        chunks = chunks.len(),
        skipped = skipped.len(),
        "run complete"
    );

    Ok(RunSummary {
        stats: ProcessingStats {
            conversations_seen,
            processed: records.len(),
            duplicates_removed: 0,
            skipped,
        },
        chunks,
        report,
        report_path,
    })
}

/// Full pipeline for one extraction: classify, chunk, report.
pub fn run(
    extraction: Extraction,
    classifier: &Classifier<'_>,
    prefix: &Path,
    config: &ConvertConfig,
    progress: Option<&ProgressCallback>,
) -> Result<RunSummary> {
    config.validate()?;

    let seen = extraction.total();
    let classified = classify_all(
        &extraction.records,
        classifier,
        config.progress_interval,
        progress,
    );
    write_outputs(&classified, extraction.skipped, seen, prefix, config)
}
