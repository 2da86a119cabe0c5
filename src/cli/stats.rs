use anyhow::Context;
use clap::Args;

use crate::catalog::index::{IndexStats, ReferenceIndex};
use crate::cli::{log_progress, OutputFormat, ReferenceArgs};
use crate::core::types::ProgressCallback;
use crate::matching::engine::DEFAULT_PROGRESS_INTERVAL;

#[derive(Args)]
pub struct StatsArgs {
    #[command(flatten)]
    pub reference: ReferenceArgs,
}

/// Execute stats subcommand
///
/// # Errors
///
/// Returns an error if the reference cannot be read or exceeds the index
/// capacity limit.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: StatsArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let reference = args.reference.load()?;

    if verbose {
        eprintln!("Loaded {} reference keys", reference.len());
    }

    let progress: Option<ProgressCallback<'_>> = if verbose {
        Some(&log_progress)
    } else {
        None
    };
    let index = ReferenceIndex::build_with_progress(
        &reference,
        args.reference.limits(),
        DEFAULT_PROGRESS_INTERVAL,
        progress,
    )
    .context("Failed to build reference index")?;
    let stats = index.stats();

    match format {
        OutputFormat::Text => print_text_stats(&stats),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Tsv => print_tsv_stats(&stats),
    }

    Ok(())
}

fn print_text_stats(stats: &IndexStats) {
    println!("Reference Index");
    println!("{}", "=".repeat(40));
    println!("  Entries indexed:   {}", stats.entries);
    println!("  Entries skipped:   {}", stats.skipped);
    println!("  Normalized keys:   {}", stats.normalized_keys);
    println!("  Expanded spans:    {}", stats.expanded_keys);
    println!("  Prefixes:          {}", stats.prefix_keys);
    println!("  Suffixes:          {}", stats.suffix_keys);
    println!("  Total postings:    {}", stats.postings);
}

fn print_tsv_stats(stats: &IndexStats) {
    println!("entries\tskipped\tnormalized_keys\texpanded_keys\tprefix_keys\tsuffix_keys\tpostings");
    println!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}",
        stats.entries,
        stats.skipped,
        stats.normalized_keys,
        stats.expanded_keys,
        stats.prefix_keys,
        stats.suffix_keys,
        stats.postings,
    );
}
