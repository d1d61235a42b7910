//! # chatcat-quick
//!
//! Converts an export with default settings and previews the first records.

use std::path::Path;
use std::process;

use clap::Parser as ClapParser;

use chatcat::ChatcatError;
use chatcat::cli::{DEFAULT_PREFIX, QuickArgs, init_logging};
use chatcat::core::{Classifier, run as run_pipeline};
use chatcat::parser::parse_file;
use chatcat::progress::stdout_progress;

const PREVIEW_COUNT: usize = 3;

fn main() {
    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), ChatcatError> {
    let args = <QuickArgs as ClapParser>::parse();
    init_logging(args.verbose);
    let config = args.to_config();

    println!("🚀 chatcat-quick v{}", env!("CARGO_PKG_VERSION"));
    println!("📂 Input: {}", args.input.display());

    let extraction = parse_file(&args.input, &config)?;
    println!("   Found {} conversations", extraction.records.len());

    let classifier = Classifier::default();
    let progress = stdout_progress();
    let summary = run_pipeline(
        extraction,
        &classifier,
        Path::new(DEFAULT_PREFIX),
        &config,
        Some(&progress),
    )?;

    let preview = summary
        .chunks
        .first()
        .map(|path| chatcat::core::read_chunk(path))
        .transpose()?
        .unwrap_or_default();

    if !preview.is_empty() {
        println!();
        println!("👀 Preview:");
        for (n, record) in preview.iter().take(PREVIEW_COUNT).enumerate() {
            println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
            println!("{}. {}", n + 1, record.name);
            println!("   📝 {}", record.description);
            println!("   🏷️  {}", record.category_field());
            if !record.tags.is_empty() {
                println!("   🔖 {}", record.tags_field());
            }
            println!("   📅 {}  ⭐ {:.2}", record.date, record.relevance_score);
        }
    }

    println!();
    println!("{}", summary.report);
    println!(
        "✅ Done! Wrote {} chunk(s) with prefix {}",
        summary.chunks.len(),
        DEFAULT_PREFIX
    );

    Ok(())
}
