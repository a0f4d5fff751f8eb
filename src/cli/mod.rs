pub mod benchmark;
pub mod completions;
pub mod init;
pub mod optimize;
pub mod verify;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::OptimizeConfig;
use crate::discovery::PuzzlePaths;
use crate::error::Result;

/// piecetrim - Puzzle piece sprite trimmer
#[derive(Parser, Debug)]
#[command(name = "piecetrim")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Project root containing assets/puzzles/
    #[arg(long, global = true, default_value = ".")]
    pub base_path: PathBuf,

    /// Config file (default: <base-path>/piecetrim.yaml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print per-piece progress
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    /// Load `--config` if given, otherwise discover the config under the base path.
    pub fn load_config(&self) -> Result<OptimizeConfig> {
        match &self.config {
            Some(path) => OptimizeConfig::load(path),
            None => OptimizeConfig::discover(&self.base_path),
        }
    }

    pub fn puzzle(&self, puzzle_id: &str) -> PuzzlePaths {
        PuzzlePaths::new(&self.base_path, puzzle_id)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Trim transparent padding from a puzzle's pieces and write metadata
    Optimize(optimize::OptimizeArgs),

    /// Compare original and optimized memory use across grid sizes
    Benchmark(benchmark::BenchmarkArgs),

    /// Check optimized output against its metadata
    Verify(verify::VerifyArgs),

    /// Write a default piecetrim.yaml
    Init(init::InitArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "piecetrim",
            "optimize",
            "puzzle_01",
            "--grid-sizes",
            "8x8",
            "12x12",
            "--base-path",
            "game",
            "-v",
        ])
        .unwrap();

        assert!(cli.global.verbose);
        assert_eq!(cli.global.base_path, PathBuf::from("game"));
        match cli.command {
            Commands::Optimize(args) => {
                assert_eq!(args.puzzle_id, "puzzle_01");
                assert_eq!(args.grid_sizes, vec!["8x8", "12x12"]);
                assert_eq!(args.padding, None);
                assert!(!args.analyze_only);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let global = GlobalArgs {
            base_path: PathBuf::from("."),
            config: Some(PathBuf::from("/nonexistent/piecetrim.yaml")),
            verbose: false,
        };
        assert!(global.load_config().is_err());
    }
}
