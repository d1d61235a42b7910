//! # chatcat
//!
//! Converts ChatGPT and Claude conversation exports into chunked CSV files
//! for document-analysis tools, replacing raw JSON with a description,
//! categories, tags and a relevance score per conversation.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chatcat::prelude::*;
//! use std::path::Path;
//!
//! fn main() -> Result<()> {
//!     let config = ConvertConfig::default();
//!     let extraction = parse_file(Path::new("conversations.json"), &config)?;
//!
//!     let classifier = Classifier::default();
//!     let summary = run(extraction, &classifier, Path::new("gemini_ready"), &config, None)?;
//!
//!     println!("{}", summary.report);
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! 1. [`parser::detect`] names the export schema of a document
//! 2. [`parser::extract`] turns it into [`ConversationRecord`]s
//! 3. [`core::Classifier`] assigns description, categories, tags and score
//! 4. [`core::output::write_chunks`] writes `{prefix}_chunk_NNN.csv`
//! 5. [`core::Report`] summarizes the run
//!
//! ## Module Structure
//!
//! - [`parser`] - format detection, the [`Extractor`](parser::Extractor) trait, document loading
//! - [`parsers`] - one extractor per schema, plus split-archive recovery
//! - [`parsing`] - thread ordering and timestamp helpers shared by extractors
//! - [`conversation`] - [`ConversationRecord`]
//! - [`core`] - taxonomy, classifier, report, output and pipeline
//! - [`config`] - [`ConvertConfig`](config::ConvertConfig), [`ClassifierConfig`](config::ClassifierConfig)
//! - [`progress`] - progress callbacks
//! - [`error`] - [`ChatcatError`], [`Result`]
//! - `cli` - argument definitions for the binaries (feature `cli`)

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod conversation;
pub mod core;
pub mod error;
pub mod parser;
pub mod parsers;
pub mod parsing;
pub mod progress;

pub use conversation::ConversationRecord;
pub use error::{ChatcatError, Result};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use chatcat::prelude::*;
/// ```
pub mod prelude {
    pub use crate::ConversationRecord;
    pub use crate::config::{ClassifierConfig, ConvertConfig};
    pub use crate::error::{ChatcatError, Result};

    pub use crate::parser::{
        ExportFormat, Extraction, Extractor, SkipReason, detect, extract, parse_file, parse_str,
    };

    pub use crate::core::models::ClassifiedRecord;
    pub use crate::core::output::{read_chunk, write_chunks, write_report_json};
    pub use crate::core::processor::{ProcessingStats, RunSummary, run};
    pub use crate::core::report::Report;
    pub use crate::core::{Classifier, Taxonomy};

    pub use crate::progress::{Progress, ProgressCallback};
}
