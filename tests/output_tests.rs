//! Tests for output writers (CSV chunks, JSON report)

use std::fs;

use chatcat::core::output::{
    CSV_HEADER, chunk_path, from_csv_str, merge_chunks, read_chunk, to_csv, write_chunks,
    write_report_json,
};
use chatcat::core::{ClassifiedRecord, Report};
use tempfile::tempdir;

fn record(name: &str, date: &str) -> ClassifiedRecord {
    ClassifiedRecord {
        name: name.to_string(),
        description: format!("Notes for {name}."),
        categories: vec!["Finance".to_string()],
        tags: vec!["Strategy".to_string()],
        date: date.to_string(),
        relevance_score: 0.6,
        message_volume: 4,
        source_file: None,
    }
}

fn sample_records(n: usize) -> Vec<ClassifiedRecord> {
    (0..n)
        .map(|i| record(&format!("Conversation {i}"), "2024-01-15"))
        .collect()
}

// ============================================================================
// CSV Writer Tests
// ============================================================================

mod csv_writer_tests {
    use super::*;

    #[test]
    fn test_write_chunks_header_order() {
        let dir = tempdir().unwrap();
        let prefix = dir.path().join("gemini_ready");

        let paths = write_chunks(&sample_records(2), &prefix, 500).unwrap();
        assert_eq!(paths.len(), 1);

        let content = fs::read_to_string(&paths[0]).unwrap();
        let header = content.lines().next().unwrap();
        assert_eq!(header, CSV_HEADER.join(","));
        assert_eq!(
            header,
            "name,description,category,tags,date,relevance_score,message_volume"
        );
    }

    #[test]
    fn test_write_chunks_count_and_sizes() {
        let dir = tempdir().unwrap();
        let prefix = dir.path().join("out");

        let paths = write_chunks(&sample_records(1_247), &prefix, 500).unwrap();
        assert_eq!(paths.len(), 3);
        assert_eq!(paths[0], chunk_path(&prefix, 1));
        assert!(paths[2].ends_with("out_chunk_003.csv"));

        let sizes: Vec<usize> = paths.iter().map(|p| read_chunk(p).unwrap().len()).collect();
        assert_eq!(sizes, vec![500, 500, 247]);
    }

    #[test]
    fn test_write_chunks_exact_multiple() {
        let dir = tempdir().unwrap();
        let prefix = dir.path().join("out");

        let paths = write_chunks(&sample_records(10), &prefix, 5).unwrap();
        assert_eq!(paths.len(), 2);
        assert!(!chunk_path(&prefix, 3).exists());
    }

    #[test]
    fn test_write_chunks_empty_writes_nothing() {
        let dir = tempdir().unwrap();
        let prefix = dir.path().join("out");

        let paths = write_chunks(&[], &prefix, 500).unwrap();
        assert!(paths.is_empty());
        assert!(!chunk_path(&prefix, 1).exists());
    }

    #[test]
    fn test_write_chunks_zero_size_is_config_error() {
        let dir = tempdir().unwrap();
        let err = write_chunks(&sample_records(1), &dir.path().join("out"), 0).unwrap_err();
        assert!(err.is_invalid_config());
    }

    #[test]
    fn test_write_chunks_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let prefix = dir.path().join("nested").join("deeper").join("run");

        let paths = write_chunks(&sample_records(1), &prefix, 10).unwrap();
        assert!(paths[0].exists());
    }

    #[test]
    fn test_write_chunks_unwritable_target_is_output_error() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let err = write_chunks(&sample_records(1), &blocker.join("run"), 10).unwrap_err();
        assert!(err.is_output());
    }

    #[test]
    fn test_special_characters_survive_round_trip() {
        let dir = tempdir().unwrap();
        let prefix = dir.path().join("special");

        let mut tricky = record("Quotes \"and\", commas", "2024-02-01");
        tricky.description = "Line one\nline two, with \"quotes\" and; semicolons".to_string();
        tricky.categories = vec!["Copywriting - Emails".to_string(), "Finance".to_string()];
        tricky.tags = vec!["Email Sequence".to_string(), "Webinar".to_string()];

        let paths = write_chunks(std::slice::from_ref(&tricky), &prefix, 10).unwrap();
        let back = read_chunk(&paths[0]).unwrap();

        assert_eq!(back, vec![tricky]);
    }

    #[test]
    fn test_multi_label_columns() {
        let mut rec = record("Launch", "2024-03-01");
        rec.categories = vec!["Finance".to_string(), "Legal".to_string()];
        rec.tags = vec!["Strategy".to_string(), "Webinar".to_string()];

        let csv = to_csv(&[rec]).unwrap();
        assert!(csv.contains("Finance|Legal"));
        assert!(csv.contains("\"Strategy,Webinar\""));
    }

    #[test]
    fn test_empty_tags_column() {
        let mut rec = record("Bare", "unknown");
        rec.tags.clear();

        let back = from_csv_str(&to_csv(&[rec.clone()]).unwrap()).unwrap();
        assert!(back[0].tags.is_empty());
        assert_eq!(back[0].date, "unknown");
    }

    #[test]
    fn test_to_csv_empty_has_header_only() {
        let csv = to_csv(&[]).unwrap();
        assert_eq!(csv.trim_end(), CSV_HEADER.join(","));
    }

    #[test]
    fn test_unicode_round_trip() {
        let mut rec = record("Встреча 🎉", "2024-01-15");
        rec.description = "日本語のメモ, with Zalgo h̸̢e̵l̶l̴o".to_string();

        let back = from_csv_str(&to_csv(&[rec.clone()]).unwrap()).unwrap();
        assert_eq!(back, vec![rec]);
    }

    #[test]
    fn test_source_file_not_written() {
        let mut rec = record("Sourced", "2024-01-15");
        rec.source_file = Some("part1.json".to_string());

        let csv = to_csv(&[rec]).unwrap();
        assert!(!csv.contains("part1.json"));
    }
}

// ============================================================================
// Merge Tests
// ============================================================================

mod merge_tests {
    use super::*;

    #[test]
    fn test_merge_chunks_single_header() {
        let dir = tempdir().unwrap();
        let prefix = dir.path().join("archive");
        let paths = write_chunks(&sample_records(7), &prefix, 3).unwrap();
        assert_eq!(paths.len(), 3);

        let merged = dir.path().join("archive_merged.csv");
        let count = merge_chunks(&paths, &merged).unwrap();
        assert_eq!(count, 7);

        let content = fs::read_to_string(&merged).unwrap();
        let headers = content.lines().filter(|l| l.starts_with("name,")).count();
        assert_eq!(headers, 1);

        let back = read_chunk(&merged).unwrap();
        assert_eq!(back.len(), 7);
        assert_eq!(back[0].name, "Conversation 0");
        assert_eq!(back[6].name, "Conversation 6");
    }

    #[test]
    fn test_merge_missing_input_fails() {
        let dir = tempdir().unwrap();
        let err = merge_chunks(
            &[dir.path().join("missing_chunk_001.csv")],
            &dir.path().join("merged.csv"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("CSV"));
    }
}

// ============================================================================
// JSON Report Tests
// ============================================================================

mod json_report_tests {
    use super::*;

    #[test]
    fn test_write_report_json() {
        let dir = tempdir().unwrap();
        let prefix = dir.path().join("gemini_ready");

        let mut records = sample_records(3);
        records[2].date = "unknown".to_string();
        let report = Report::build(&records, "unknown");

        let path = write_report_json(&report, &prefix).unwrap();
        assert!(path.ends_with("gemini_ready_report.json"));

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["total_conversations"], 3);
        assert_eq!(value["missing_dates"], 1);
        assert_eq!(value["categories"][0]["label"], "Finance");
        assert_eq!(value["categories"][0]["count"], 3);
    }

    #[test]
    fn test_report_json_empty_run() {
        let dir = tempdir().unwrap();
        let report = Report::build(&[], "unknown");
        let path = write_report_json(&report, &dir.path().join("empty")).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["total_conversations"], 0);
    }
}
