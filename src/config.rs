//! Configuration types for conversion runs and the classifier.
//!
//! These are plain serde structs with builder methods, free of any CLI
//! framework dependency, so library users configure a run the same way the
//! binaries do.
//!
//! # Example
//!
//! ```rust
//! use chatcat::config::{ClassifierConfig, ConvertConfig};
//!
//! let config = ConvertConfig::new()
//!     .with_chunk_size(250)
//!     .with_progress_interval(100)
//!     .with_classifier(ClassifierConfig::new().with_unknown_date("n/a"));
//!
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{ChatcatError, Result};

/// Default number of records per CSV chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Default number of records between progress updates.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 50;

/// Default maximum description length, in characters.
pub const DEFAULT_DESCRIPTION_MAX_LEN: usize = 200;

/// Default value written to the `date` column when no timestamp exists.
pub const DEFAULT_UNKNOWN_DATE: &str = "unknown";

/// Smallest description bound that still leaves room for a word and `...`.
const MIN_DESCRIPTION_LEN: usize = 16;

/// Settings that shape the classifier's output.
///
/// # Example
///
/// ```rust
/// use chatcat::config::ClassifierConfig;
///
/// let config = ClassifierConfig::new().with_description_max_len(120);
/// assert_eq!(config.description_max_len, 120);
/// assert_eq!(config.unknown_date, "unknown");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Upper bound on description length in characters (default: 200)
    pub description_max_len: usize,

    /// Sentinel written as the date when a conversation has no timestamp (default: "unknown")
    pub unknown_date: String,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            description_max_len: DEFAULT_DESCRIPTION_MAX_LEN,
            unknown_date: DEFAULT_UNKNOWN_DATE.to_string(),
        }
    }
}

impl ClassifierConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum description length.
    #[must_use]
    pub fn with_description_max_len(mut self, len: usize) -> Self {
        self.description_max_len = len;
        self
    }

    /// Sets the unknown-date sentinel.
    #[must_use]
    pub fn with_unknown_date(mut self, sentinel: impl Into<String>) -> Self {
        self.unknown_date = sentinel.into();
        self
    }
}

/// Configuration for a whole conversion run.
///
/// # Example
///
/// ```rust
/// use chatcat::config::ConvertConfig;
///
/// let config = ConvertConfig::new()
///     .with_generic_fallback(false)
///     .with_report(false);
///
/// assert_eq!(config.chunk_size, 500);
/// assert!(!config.generic_fallback);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Records per CSV chunk (default: 500)
    pub chunk_size: usize,

    /// Records between progress callbacks (default: 50)
    pub progress_interval: usize,

    /// Attempt best-effort extraction for unrecognised schemas (default: true)
    pub generic_fallback: bool,

    /// Scan non-JSON input for split-archive fragments (default: false)
    pub recover_fragments: bool,

    /// Write `{prefix}_report.json` next to the chunks (default: true)
    pub write_report: bool,

    /// Classifier settings
    pub classifier: ClassifierConfig,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            generic_fallback: true,
            recover_fragments: false,
            write_report: true,
            classifier: ClassifierConfig::default(),
        }
    }
}

impl ConvertConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of records per chunk.
    #[must_use]
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    /// Sets how often progress is reported.
    #[must_use]
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Enables or disables generic extraction for unknown formats.
    #[must_use]
    pub fn with_generic_fallback(mut self, enabled: bool) -> Self {
        self.generic_fallback = enabled;
        self
    }

    /// Enables or disables split-archive fragment recovery.
    #[must_use]
    pub fn with_recover_fragments(mut self, enabled: bool) -> Self {
        self.recover_fragments = enabled;
        self
    }

    /// Enables or disables the JSON report file.
    #[must_use]
    pub fn with_report(mut self, enabled: bool) -> Self {
        self.write_report = enabled;
        self
    }

    /// Replaces the classifier settings.
    #[must_use]
    pub fn with_classifier(mut self, classifier: ClassifierConfig) -> Self {
        self.classifier = classifier;
        self
    }

    /// Checks that every value is usable.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(ChatcatError::invalid_config("chunk size must be at least 1"));
        }
        if self.progress_interval == 0 {
            return Err(ChatcatError::invalid_config(
                "progress interval must be at least 1",
            ));
        }
        if self.classifier.description_max_len < MIN_DESCRIPTION_LEN {
            return Err(ChatcatError::invalid_config(format!(
                "description length must be at least {MIN_DESCRIPTION_LEN} characters"
            )));
        }
        if self.classifier.unknown_date.trim().is_empty() {
            return Err(ChatcatError::invalid_config(
                "unknown-date sentinel must not be blank",
            ));
        }
        Ok(())
    }
}
