use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use indexmap::IndexMap;

use crate::catalog::index::ReferenceIndex;
use crate::cli::{log_progress, OutputFormat, ReferenceArgs};
use crate::core::types::ProgressCallback;
use crate::matching::engine::{DetailedResultMap, MatchingEngine, ResolveConfig};
use crate::parsing::queries::{parse_queries_text, read_queries_file};

#[derive(Args)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub reference: ReferenceArgs,

    /// Query file, one identifier per line. Use '-' for stdin
    #[arg(short, long, required = true)]
    pub queries: PathBuf,

    /// Take queries from this 0-based tab-separated column instead of whole lines
    #[arg(long)]
    pub query_column: Option<usize>,

    /// Query file starts with a header line
    #[arg(long)]
    pub query_header: bool,

    /// Worker threads (0 = one per CPU)
    #[arg(short = 't', long, default_value = "0")]
    pub threads: usize,

    /// Resolve queries on the current thread only
    #[arg(long)]
    pub sequential: bool,

    /// Include the matching strategy in the output
    #[arg(long)]
    pub show_strategy: bool,
}

/// Execute resolve subcommand
///
/// # Errors
///
/// Returns an error if the reference or queries cannot be read, or the
/// reference exceeds the index capacity limit.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ResolveArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let reference = args.reference.load()?;
    let queries = load_queries(&args)?;

    if verbose {
        eprintln!(
            "Loaded {} reference keys and {} queries",
            reference.len(),
            queries.len()
        );
    }

    let config = ResolveConfig {
        parallel: !args.sequential,
        threads: args.threads,
        limits: args.reference.limits(),
        ..ResolveConfig::default()
    };

    let progress: Option<ProgressCallback<'_>> = if verbose {
        Some(&log_progress)
    } else {
        None
    };

    let index = ReferenceIndex::build_with_progress(
        &reference,
        config.limits,
        config.progress_interval,
        progress,
    )
    .context("Failed to build reference index")?;

    let engine = MatchingEngine::with_config(&index, config);
    let results = engine.resolve_all_detailed(&queries, progress);

    if verbose {
        eprintln!("Matched {} of {} queries", results.len(), queries.len());
    }

    match format {
        OutputFormat::Text => print_text_results(&results, args.show_strategy),
        OutputFormat::Json => print_json_results(&results, args.show_strategy)?,
        OutputFormat::Tsv => print_tsv_results(&results, args.show_strategy),
    }

    Ok(())
}

fn load_queries(args: &ResolveArgs) -> anyhow::Result<Vec<String>> {
    if args.queries.to_string_lossy() == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        return Ok(parse_queries_text(
            &buffer,
            args.query_column,
            args.query_header,
        )?);
    }

    read_queries_file(&args.queries, args.query_column, args.query_header)
        .with_context(|| format!("Failed to read queries from {}", args.queries.display()))
}

fn print_text_results(results: &DetailedResultMap, show_strategy: bool) {
    for (query, resolution) in results {
        let values = resolution.values.join(", ");
        if show_strategy {
            println!("{query} => {values} ({})", resolution.strategy);
        } else {
            println!("{query} => {values}");
        }
    }
}

fn print_json_results(results: &DetailedResultMap, show_strategy: bool) -> anyhow::Result<()> {
    // Serialize the ordered maps directly so keys stay in query order
    let output = if show_strategy {
        serde_json::to_string_pretty(results)?
    } else {
        let values: IndexMap<&str, &[String]> = results
            .iter()
            .map(|(query, resolution)| (query.as_str(), resolution.values.as_slice()))
            .collect();
        serde_json::to_string_pretty(&values)?
    };

    println!("{output}");
    Ok(())
}

/// One row per (query, value) pair, ready for bulk loading.
fn print_tsv_results(results: &DetailedResultMap, show_strategy: bool) {
    if show_strategy {
        println!("query\tvalue\tstrategy");
    } else {
        println!("query\tvalue");
    }
    for (query, resolution) in results {
        for value in &resolution.values {
            if show_strategy {
                println!("{query}\t{value}\t{}", resolution.strategy);
            } else {
                println!("{query}\t{value}");
            }
        }
    }
}
