//! Command-line argument definitions using clap.
//!
//! This module defines:
//! - [`Args`] - the full-featured `chatcat` converter
//! - [`QuickArgs`] - `chatcat-quick`, defaults everywhere
//! - [`BatchArgs`] - `chatcat-batch`, several exports into one archive
//!
//! Each argument set converts into a [`ConvertConfig`], so the binaries and
//! library users share one configuration path.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::{
    ClassifierConfig, ConvertConfig, DEFAULT_CHUNK_SIZE, DEFAULT_DESCRIPTION_MAX_LEN,
    DEFAULT_PROGRESS_INTERVAL, DEFAULT_UNKNOWN_DATE,
};

/// Output prefix used by `chatcat` and `chatcat-quick`.
pub const DEFAULT_PREFIX: &str = "gemini_ready";

/// Output prefix used by `chatcat-batch`.
pub const DEFAULT_BATCH_PREFIX: &str = "complete_archive";

/// Convert ChatGPT and Claude conversation exports into categorized,
/// chunked CSV files.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatcat")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatcat conversations.json
    chatcat conversations.json out/archive --chunk-size 250
    chatcat claude_export.json --taxonomy my_taxonomy.json --no-report
    chatcat conv_part_aa.txt --recover-fragments -v")]
pub struct Args {
    /// Path to the export file
    pub input: PathBuf,

    /// Output prefix; chunks are written as PREFIX_chunk_NNN.csv
    #[arg(default_value = DEFAULT_PREFIX)]
    pub prefix: PathBuf,

    /// Records per CSV chunk
    #[arg(short = 'c', long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Print progress every N conversations
    #[arg(long = "progress-every", value_name = "N", default_value_t = DEFAULT_PROGRESS_INTERVAL)]
    pub progress_every: usize,

    /// Value written to the date column when a conversation has no timestamp
    #[arg(long, default_value = DEFAULT_UNKNOWN_DATE)]
    pub unknown_date: String,

    /// Maximum description length in characters
    #[arg(long = "description-len", default_value_t = DEFAULT_DESCRIPTION_MAX_LEN)]
    pub description_len: usize,

    /// Load categories and tags from a JSON taxonomy file
    #[arg(long, value_name = "FILE")]
    pub taxonomy: Option<PathBuf>,

    /// Do not write PREFIX_report.json
    #[arg(long)]
    pub no_report: bool,

    /// Skip conversations in unrecognized formats instead of guessing
    #[arg(long)]
    pub no_fallback: bool,

    /// Scan input that is not valid JSON for split-archive fragments
    #[arg(long)]
    pub recover_fragments: bool,

    /// Log per-conversation details to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn to_config(&self) -> ConvertConfig {
        ConvertConfig::new()
            .with_chunk_size(self.chunk_size)
            .with_progress_interval(self.progress_every)
            .with_generic_fallback(!self.no_fallback)
            .with_recover_fragments(self.recover_fragments)
            .with_report(!self.no_report)
            .with_classifier(
                ClassifierConfig::new()
                    .with_description_max_len(self.description_len)
                    .with_unknown_date(self.unknown_date.clone()),
            )
    }
}

/// Quick conversion with default settings and a preview of the result.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatcat-quick")]
#[command(version, about, long_about = None)]
pub struct QuickArgs {
    /// Path to the export file
    pub input: PathBuf,

    /// Log per-conversation details to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl QuickArgs {
    pub fn to_config(&self) -> ConvertConfig {
        ConvertConfig::new()
    }
}

/// Convert several exports into one de-duplicated, date-sorted archive.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatcat-batch")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatcat-batch chatgpt.json claude.json
    chatcat-batch conv_part_*.txt --recover-fragments --merge")]
pub struct BatchArgs {
    /// Export files to process
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output prefix
    #[arg(short, long, default_value = DEFAULT_BATCH_PREFIX)]
    pub prefix: PathBuf,

    /// Records per CSV chunk
    #[arg(short = 'c', long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Print progress every N conversations
    #[arg(long = "progress-every", value_name = "N", default_value_t = DEFAULT_PROGRESS_INTERVAL)]
    pub progress_every: usize,

    /// Load categories and tags from a JSON taxonomy file
    #[arg(long, value_name = "FILE")]
    pub taxonomy: Option<PathBuf>,

    /// Scan inputs that are not valid JSON for split-archive fragments
    #[arg(long)]
    pub recover_fragments: bool,

    /// Also write every chunk into PREFIX_merged.csv
    #[arg(long)]
    pub merge: bool,

    /// Do not write PREFIX_report.json
    #[arg(long)]
    pub no_report: bool,

    /// Log per-conversation details to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl BatchArgs {
    pub fn to_config(&self) -> ConvertConfig {
        ConvertConfig::new()
            .with_chunk_size(self.chunk_size)
            .with_progress_interval(self.progress_every)
            .with_recover_fragments(self.recover_fragments)
            .with_report(!self.no_report)
    }

    /// Path of the merged CSV: `{prefix}_merged.csv`.
    pub fn merged_path(&self) -> PathBuf {
        let mut name = self.prefix.as_os_str().to_owned();
        name.push("_merged.csv");
        PathBuf::from(name)
    }
}

/// Installs the stderr log subscriber for the binaries.
///
/// Only warnings are shown unless `verbose` is set.
pub fn init_logging(verbose: bool) {
    let directive = if verbose { "chatcat=debug" } else { "chatcat=warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directive))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["chatcat", "conversations.json"]).unwrap();
        assert_eq!(args.prefix, PathBuf::from("gemini_ready"));
        assert_eq!(args.to_config(), ConvertConfig::default());
    }

    #[test]
    fn test_args_flags() {
        let args = Args::try_parse_from([
            "chatcat",
            "in.json",
            "out/run",
            "-c",
            "10",
            "--progress-every",
            "5",
            "--unknown-date",
            "n/a",
            "--description-len",
            "80",
            "--no-report",
            "--no-fallback",
            "--recover-fragments",
            "-v",
        ])
        .unwrap();
        let config = args.to_config();
        assert_eq!(config.chunk_size, 10);
        assert_eq!(config.progress_interval, 5);
        assert_eq!(config.classifier.unknown_date, "n/a");
        assert_eq!(config.classifier.description_max_len, 80);
        assert!(!config.write_report);
        assert!(!config.generic_fallback);
        assert!(config.recover_fragments);
        assert!(args.verbose);
    }

    #[test]
    fn test_batch_requires_input() {
        assert!(BatchArgs::try_parse_from(["chatcat-batch"]).is_err());
    }

    #[test]
    fn test_batch_merged_path() {
        let args =
            BatchArgs::try_parse_from(["chatcat-batch", "a.json", "b.json", "--merge"]).unwrap();
        assert_eq!(args.inputs.len(), 2);
        assert!(args.merge);
        assert_eq!(args.merged_path(), PathBuf::from("complete_archive_merged.csv"));
    }
}
