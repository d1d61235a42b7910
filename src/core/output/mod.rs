//! Output writers.
//!
//! - [`write_chunks`] / [`to_csv`] - classified records as chunked CSV
//! - [`read_chunk`] / [`from_csv_str`] - parse a chunk back into records
//! - [`merge_chunks`] - join chunk files into one CSV
//! - [`write_report_json`] - the run report as `{prefix}_report.json`
//!
//! # Example
//!
//! ```rust,no_run
//! # fn main() -> chatcat::Result<()> {
//! use chatcat::core::classifier::Classifier;
//! use chatcat::core::output::{write_chunks, write_report_json};
//! use chatcat::core::report::Report;
//! use chatcat::ConversationRecord;
//! use std::path::Path;
//!
//! let classifier = Classifier::default();
//! let records = vec![classifier.classify(
//!     &ConversationRecord::new("Q3 budget").with_fragments(["Review the Q3 budget and invoices."]),
//! )];
//!
//! let prefix = Path::new("out/gemini_ready");
//! let chunks = write_chunks(&records, prefix, 500)?;
//! write_report_json(&Report::build(&records, "unknown"), prefix)?;
//! assert_eq!(chunks.len(), 1);
//! # Ok(())
//! # }
//! ```

mod csv_writer;
mod json_writer;

pub use csv_writer::{
    CSV_HEADER, chunk_path, from_csv_str, merge_chunks, read_chunk, to_csv, write_chunks,
};
pub use json_writer::{report_path, to_json, write_report_json};
