//! Classification and output.
//!
//! This module contains:
//! - [`taxonomy`] - category and tag tables
//! - [`classifier`] - description, categories, tags and relevance per record
//! - [`models`] - the classified record
//! - [`report`] - run statistics
//! - [`output`] - CSV chunks and the JSON report
//! - [`processor`] - the run pipeline tying them together
//!
//! # Quick Start
//!
//! ```rust
//! use chatcat::core::{Classifier, Report};
//! use chatcat::ConversationRecord;
//!
//! let classifier = Classifier::default();
//! let record = classifier.classify(
//!     &ConversationRecord::new("Newsletter").with_fragments(["Draft this week's newsletter intro for the email list."]),
//! );
//! let report = Report::build(&[record], "unknown");
//! assert_eq!(report.category_count("Email & Newsletters"), 1);
//! ```

pub mod classifier;
pub mod models;
pub mod output;
pub mod processor;
pub mod report;
pub mod taxonomy;

pub use classifier::{Classifier, relevance_score, truncate_at_word};
pub use models::ClassifiedRecord;
pub use output::{merge_chunks, read_chunk, to_csv, write_chunks, write_report_json};
pub use processor::{
    ProcessingStats, RunSummary, classify_all, dedupe_records, run, sort_by_date, write_outputs,
};
pub use report::Report;
pub use taxonomy::{FALLBACK_CATEGORY, Taxonomy, TaxonomyEntry};
