//! # chatcat-batch
//!
//! Processes several exports (or split archive pieces) into one
//! de-duplicated archive sorted by date. A file that cannot be read or
//! parsed is reported and skipped; the run fails only when every file does.

use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use tracing::warn;

use chatcat::ChatcatError;
use chatcat::cli::{BatchArgs, init_logging};
use chatcat::core::{
    Classifier, Taxonomy, classify_all, dedupe_records, merge_chunks, sort_by_date, write_outputs,
};
use chatcat::parser::{Extraction, SkipReason, parse_file};
use chatcat::progress::stdout_progress;

fn main() {
    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), ChatcatError> {
    let start = Instant::now();
    let args = <BatchArgs as ClapParser>::parse();
    init_logging(args.verbose);

    let config = args.to_config();
    config.validate()?;

    println!("📦 chatcat-batch v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📂 Inputs:  {} file(s)", args.inputs.len());
    println!("💾 Prefix:  {}", args.prefix.display());
    println!();

    let custom;
    let taxonomy = match &args.taxonomy {
        Some(path) => {
            custom = Taxonomy::from_path(path)?;
            &custom
        }
        None => Taxonomy::builtin(),
    };

    let mut extraction = Extraction::new();
    let mut first_error = None;
    let mut failed = 0;
    for (index, input) in args.inputs.iter().enumerate() {
        match parse_file(input, &config) {
            Ok(part) => {
                println!(
                    "   📄 {}: {} conversations, {} skipped",
                    input.display(),
                    part.records.len(),
                    part.skipped.len()
                );
                extraction.extend(part);
            }
            Err(e) => {
                println!("   ⚠️  {}: {}", input.display(), e);
                warn!(file = %input.display(), error = %e, "skipping input file");
                extraction.skipped.push(SkipReason::new(
                    index,
                    Some(input.display().to_string()),
                    format!("input file not processed: {e}"),
                ));
                failed += 1;
                first_error.get_or_insert(e);
            }
        }
    }
    if failed == args.inputs.len() {
        if let Some(e) = first_error {
            return Err(e);
        }
    }
    let seen = extraction.total();

    println!();
    println!("🧠 Classifying {} conversations...", extraction.records.len());
    let classifier = Classifier::new(taxonomy, config.classifier.clone());
    let progress = stdout_progress();
    let classified = classify_all(
        &extraction.records,
        &classifier,
        config.progress_interval,
        Some(&progress),
    );

    let (mut records, removed) = dedupe_records(classified);
    if removed > 0 {
        println!("🔀 Removed {} duplicate(s)", removed);
    }
    sort_by_date(&mut records, &config.classifier.unknown_date);

    let mut summary = write_outputs(&records, extraction.skipped, seen, &args.prefix, &config)?;
    summary.stats.duplicates_removed = removed;

    println!();
    for chunk in &summary.chunks {
        println!("💾 Wrote {}", chunk.display());
    }
    if let Some(path) = &summary.report_path {
        println!("📝 Report {}", path.display());
    }

    if args.merge && !summary.chunks.is_empty() {
        let merged = args.merged_path();
        let count = merge_chunks(&summary.chunks, &merged)?;
        println!("🧷 Merged {} records into {}", count, merged.display());
    }

    println!();
    println!("{}", summary.report);
    println!("✅ Done!");
    println!("   Processed:   {}", summary.stats.processed);
    println!("   Duplicates:  {}", summary.stats.duplicates_removed);
    println!("   Skipped:     {}", summary.stats.skipped_count());
    println!("   Total time:  {:.2}s", start.elapsed().as_secs_f64());

    Ok(())
}
