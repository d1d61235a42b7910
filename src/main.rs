//! # chatcat CLI
//!
//! Full-featured converter: one export in, CSV chunks and a report out.

use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;

use chatcat::ChatcatError;
use chatcat::cli::{Args, init_logging};
use chatcat::core::{Classifier, Taxonomy, run as run_pipeline};
use chatcat::parser::parse_file;
use chatcat::progress::stdout_progress;

fn main() {
    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), ChatcatError> {
    let total_start = Instant::now();
    let args = <Args as ClapParser>::parse();
    init_logging(args.verbose);

    let config = args.to_config();
    config.validate()?;

    println!("📦 chatcat v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📂 Input:    {}", args.input.display());
    println!("💾 Prefix:   {}", args.prefix.display());
    println!("📄 Chunks:   {} records each", config.chunk_size);

    let custom;
    let taxonomy = match &args.taxonomy {
        Some(path) => {
            custom = Taxonomy::from_path(path)?;
            println!("🏷️  Taxonomy: {}", path.display());
            &custom
        }
        None => Taxonomy::builtin(),
    };
    if config.recover_fragments {
        println!("🧩 Mode:     fragment recovery enabled");
    }
    println!();

    println!("⏳ Parsing export...");
    let parse_start = Instant::now();
    let extraction = parse_file(&args.input, &config)?;
    println!(
        "   Found {} conversations, {} skipped ({:.2}s)",
        extraction.records.len(),
        extraction.skipped.len(),
        parse_start.elapsed().as_secs_f64()
    );

    println!("🧠 Classifying...");
    let classifier = Classifier::new(taxonomy, config.classifier.clone());
    let progress = stdout_progress();
    let summary = run_pipeline(
        extraction,
        &classifier,
        &args.prefix,
        &config,
        Some(&progress),
    )?;

    println!();
    for chunk in &summary.chunks {
        println!("💾 Wrote {}", chunk.display());
    }
    if let Some(path) = &summary.report_path {
        println!("📝 Report {}", path.display());
    }

    println!();
    println!("{}", summary.report);

    let total_time = total_start.elapsed();
    println!("✅ Done! {} conversations in {} chunk(s)", summary.stats.processed, summary.chunks.len());
    println!();
    println!("⚡ Performance:");
    println!("   Total time:  {:.2}s", total_time.as_secs_f64());
    println!("   Success:     {:.1}%", summary.stats.success_rate());

    Ok(())
}
