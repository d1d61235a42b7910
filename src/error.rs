//! Unified error types for chatcat.
//!
//! A single [`ChatcatError`] enum covers every fatal condition in the
//! library. Problems with an individual conversation are *not* errors: they
//! are reported as [`SkipReason`](crate::parser::SkipReason) values and the
//! run continues.
//!
//! # Fatal vs. non-fatal
//!
//! | Situation | Outcome |
//! |-----------|---------|
//! | Input file missing or unreadable | [`ChatcatError::Io`] |
//! | Input is not valid structured text | [`ChatcatError::Parse`] |
//! | Output directory or file not writable | [`ChatcatError::Output`] |
//! | Malformed conversation inside an export | skipped and logged |
//! | Unknown export schema | generic extraction, or skipped |

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for chatcat operations.
///
/// # Example
///
/// ```rust
/// use chatcat::error::Result;
/// use chatcat::ConversationRecord;
///
/// fn load() -> Result<Vec<ConversationRecord>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ChatcatError>;

/// The error type for all chatcat operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatcatError {
    /// An I/O error occurred while reading input.
    ///
    /// This typically happens when the input file doesn't exist or
    /// permission is denied.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Failed to parse the input file.
    #[error("Failed to parse {format} input{}: {source}", path.as_ref().map(|p| format!(" (file: {})", p.display())).unwrap_or_default())]
    Parse {
        /// The format being parsed (e.g., "JSON export", "taxonomy")
        format: &'static str,
        /// The underlying parse error
        #[source]
        source: ParseErrorKind,
        /// The file path, if available
        path: Option<PathBuf>,
    },

    /// A document has valid syntax but the wrong structure.
    #[error("Invalid {format} format: {message}")]
    InvalidFormat {
        /// The format that was expected
        format: &'static str,
        /// Description of what's wrong
        message: String,
    },

    /// A taxonomy table failed validation.
    #[error("Invalid taxonomy: {0}")]
    InvalidTaxonomy(String),

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Writing an output file failed.
    ///
    /// Output failures are always fatal: a run never reports success after
    /// writing only part of its chunks.
    #[error("Cannot write output {}: {source}", path.display())]
    Output {
        /// The file or directory that could not be written
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// CSV reading or writing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Kinds of parse errors that can occur.
#[derive(Debug, Error)]
pub enum ParseErrorKind {
    /// JSON parsing error
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    /// Generic parsing error
    #[error("{0}")]
    Other(String),
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ChatcatError {
    /// Creates a parse error for a JSON export.
    pub fn export_parse(source: serde_json::Error, path: Option<PathBuf>) -> Self {
        ChatcatError::Parse {
            format: "JSON export",
            source: ParseErrorKind::Json(source),
            path,
        }
    }

    /// Creates a parse error for a taxonomy document.
    pub fn taxonomy_parse(source: serde_json::Error, path: Option<PathBuf>) -> Self {
        ChatcatError::Parse {
            format: "taxonomy",
            source: ParseErrorKind::Json(source),
            path,
        }
    }

    /// Creates a parse error with a free-form message.
    pub fn parse_other(
        format: &'static str,
        message: impl Into<String>,
        path: Option<PathBuf>,
    ) -> Self {
        ChatcatError::Parse {
            format,
            source: ParseErrorKind::Other(message.into()),
            path,
        }
    }

    /// Creates an invalid format error.
    pub fn invalid_format(format: &'static str, message: impl Into<String>) -> Self {
        ChatcatError::InvalidFormat {
            format,
            message: message.into(),
        }
    }

    /// Creates an invalid taxonomy error.
    pub fn invalid_taxonomy(message: impl Into<String>) -> Self {
        ChatcatError::InvalidTaxonomy(message.into())
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        ChatcatError::InvalidConfig(message.into())
    }

    /// Creates an output error for the given path.
    pub fn output(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ChatcatError::Output {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ChatcatError::Io(_))
    }

    /// Returns `true` if this is a parse error.
    pub fn is_parse(&self) -> bool {
        matches!(self, ChatcatError::Parse { .. })
    }

    /// Returns `true` if this is an output error.
    pub fn is_output(&self) -> bool {
        matches!(self, ChatcatError::Output { .. })
    }

    /// Returns `true` if this is a configuration error.
    pub fn is_invalid_config(&self) -> bool {
        matches!(self, ChatcatError::InvalidConfig(_))
    }
}
