use std::io::Read;

use clap::Args;

use crate::cli::OutputFormat;
use crate::core::normalize::normalize;

#[derive(Args)]
pub struct NormalizeArgs {
    /// Identifiers to normalize. Use '-' to read one per line from stdin
    #[arg(required = true)]
    pub inputs: Vec<String>,
}

/// Execute normalize subcommand
///
/// # Errors
///
/// Returns an error if stdin cannot be read or JSON output fails.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: NormalizeArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let inputs = if args.inputs.len() == 1 && args.inputs[0] == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
            .lines()
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    } else {
        args.inputs
    };

    let pairs: Vec<(&str, String)> = inputs
        .iter()
        .map(|raw| (raw.as_str(), normalize(raw)))
        .collect();

    if verbose {
        let empty = pairs.iter().filter(|(_, n)| n.is_empty()).count();
        eprintln!(
            "Normalized {} identifiers ({empty} unmatchable)",
            pairs.len()
        );
    }

    match format {
        OutputFormat::Text => {
            for (raw, normalized) in &pairs {
                println!("{raw} => {normalized}");
            }
        }
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = pairs
                .iter()
                .map(|(raw, normalized)| {
                    serde_json::json!({
                        "raw": raw,
                        "normalized": normalized,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("raw\tnormalized");
            for (raw, normalized) in &pairs {
                println!("{raw}\t{normalized}");
            }
        }
    }

    Ok(())
}
