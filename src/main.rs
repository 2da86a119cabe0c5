use clap::Parser;
use gene_match::cli;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("gene_match=debug,info")
    } else {
        EnvFilter::new("gene_match=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Resolve(args) => {
            cli::resolve::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Normalize(args) => {
            cli::normalize::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Stats(args) => {
            cli::stats::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
