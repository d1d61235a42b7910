//! CSV chunk writer.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::models::{ClassifiedRecord, split_field};
use crate::core::taxonomy::{CATEGORY_SEPARATOR, TAG_SEPARATOR};
use crate::error::{ChatcatError, Result};

/// Column order of every chunk file.
pub const CSV_HEADER: [&str; 7] = [
    "name",
    "description",
    "category",
    "tags",
    "date",
    "relevance_score",
    "message_volume",
];

/// Flat row layout; the field order defines the header.
#[derive(Serialize, Deserialize)]
struct CsvRow {
    name: String,
    description: String,
    category: String,
    tags: String,
    date: String,
    relevance_score: f64,
    message_volume: usize,
}

impl CsvRow {
    fn from_record(record: &ClassifiedRecord) -> Self {
        Self {
            name: record.name.clone(),
            description: record.description.clone(),
            category: record.category_field(),
            tags: record.tags_field(),
            date: record.date.clone(),
            relevance_score: record.relevance_score,
            message_volume: record.message_volume,
        }
    }

    fn into_record(self) -> ClassifiedRecord {
        ClassifiedRecord {
            name: self.name,
            description: self.description,
            categories: split_field(&self.category, CATEGORY_SEPARATOR),
            tags: split_field(&self.tags, TAG_SEPARATOR),
            date: self.date,
            relevance_score: self.relevance_score,
            message_volume: self.message_volume,
            source_file: None,
        }
    }
}

/// Path of the one-based chunk `index` for `prefix`.
///
/// ```rust
/// use chatcat::core::output::chunk_path;
/// use std::path::Path;
///
/// assert_eq!(
///     chunk_path(Path::new("out/gemini_ready"), 7),
///     Path::new("out/gemini_ready_chunk_007.csv")
/// );
/// ```
pub fn chunk_path(prefix: &Path, index: usize) -> PathBuf {
    let mut name = prefix.as_os_str().to_owned();
    name.push(format!("_chunk_{index:03}.csv"));
    PathBuf::from(name)
}

/// Writes records into `ceil(N / chunk_size)` CSV files.
///
/// # Format
/// - Delimiter: `,`
/// - Columns: `name`, `description`, `category`, `tags`, `date`,
///   `relevance_score`, `message_volume`
/// - `category` joined with `|`, `tags` joined with `,`
/// - Files: `{prefix}_chunk_001.csv`, `{prefix}_chunk_002.csv`, ...
///
/// The parent directory of `prefix` is created when missing. The first
/// write failure aborts the run with [`ChatcatError::Output`]. No records
/// means no files.
pub fn write_chunks(
    records: &[ClassifiedRecord],
    prefix: &Path,
    chunk_size: usize,
) -> Result<Vec<PathBuf>> {
    if chunk_size == 0 {
        return Err(ChatcatError::invalid_config("chunk size must be at least 1"));
    }
    if records.is_empty() {
        return Ok(Vec::new());
    }

    ensure_parent(prefix)?;

    let mut written = Vec::with_capacity(records.len().div_ceil(chunk_size));
    for (n, chunk) in records.chunks(chunk_size).enumerate() {
        let path = chunk_path(prefix, n + 1);
        write_csv_file(&path, chunk)?;
        info!(path = %path.display(), records = chunk.len(), "wrote chunk");
        written.push(path);
    }

    Ok(written)
}

/// Renders records as one CSV document, header included.
pub fn to_csv(records: &[ClassifiedRecord]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer.serialize(CsvRow::from_record(record))?;
    }
    if records.is_empty() {
        writer.write_record(CSV_HEADER)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ChatcatError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| ChatcatError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// Parses CSV text in chunk layout back into records.
pub fn from_csv_str(content: &str) -> Result<Vec<ClassifiedRecord>> {
    read_rows(csv::Reader::from_reader(content.as_bytes()))
}

/// Reads one chunk file back into records.
///
/// `source_file` is not part of the CSV and comes back as `None`.
pub fn read_chunk(path: &Path) -> Result<Vec<ClassifiedRecord>> {
    read_rows(csv::Reader::from_path(path)?)
}

/// Concatenates chunk files into a single CSV with one header.
///
/// Returns the number of records written.
pub fn merge_chunks(inputs: &[PathBuf], output: &Path) -> Result<usize> {
    let mut records = Vec::new();
    for input in inputs {
        records.extend(read_chunk(input)?);
    }

    ensure_parent(output)?;
    write_csv_file(output, &records)?;
    info!(path = %output.display(), records = records.len(), "merged chunks");
    Ok(records.len())
}

fn read_rows<R: io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<ClassifiedRecord>> {
    let mut records = Vec::new();
    for row in reader.deserialize::<CsvRow>() {
        records.push(row?.into_record());
    }
    Ok(records)
}

fn write_csv_file(path: &Path, records: &[ClassifiedRecord]) -> Result<()> {
    let file = File::create(path).map_err(|e| ChatcatError::output(path, e))?;
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .from_writer(file);

    if records.is_empty() {
        writer
            .write_record(CSV_HEADER)
            .map_err(|e| write_failure(path, e))?;
    }
    for record in records {
        writer
            .serialize(CsvRow::from_record(record))
            .map_err(|e| write_failure(path, e))?;
    }

    writer.flush().map_err(|e| ChatcatError::output(path, e))
}

pub(super) fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| ChatcatError::output(parent, e))
        }
        _ => Ok(()),
    }
}

fn write_failure(path: &Path, err: csv::Error) -> ChatcatError {
    let source = match err.into_kind() {
        csv::ErrorKind::Io(e) => e,
        other => io::Error::other(format!("{other:?}")),
    };
    ChatcatError::output(path, source)
}
