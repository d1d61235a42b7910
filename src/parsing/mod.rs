//! Shared parsing utilities for all export formats.
//!
//! Helpers used by more than one extractor live here so the
//! format-specific modules only describe their schema.

pub mod thread;
pub mod time;

pub use thread::{ThreadNode, thread_order};
pub use time::{from_epoch_seconds, parse_rfc3339, parse_timestamp_value};
