use clap::Parser;
use miette::Result;
use piecetrim::cli::{Cli, Commands};
use piecetrim::output::Printer;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    let printer = Printer::new(cli.global.verbose);
    let global = &cli.global;

    match cli.command {
        Commands::Optimize(args) => piecetrim::cli::optimize::run(args, global, &printer)?,
        Commands::Benchmark(args) => piecetrim::cli::benchmark::run(args, global, &printer)?,
        Commands::Verify(args) => piecetrim::cli::verify::run(args, global, &printer)?,
        Commands::Init(args) => piecetrim::cli::init::run(args, global, &printer)?,
        Commands::Completions(args) => piecetrim::cli::completions::run(args)?,
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise the default filter below.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Debug events from this crate only with `--verbose`, warnings otherwise.
fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "piecetrim=debug"
    } else {
        "warn"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(true), "piecetrim=debug");
        assert_eq!(default_filter(false), "warn");
        assert!(EnvFilter::try_new(default_filter(true)).is_ok());
    }
}
