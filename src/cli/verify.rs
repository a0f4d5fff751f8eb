//! Verify command implementation.

use std::path::PathBuf;

use clap::Args;

use crate::error::{Result, TrimError};
use crate::output::{plural, Printer};
use crate::validation::{print_diagnostics, verify_puzzle};

use super::GlobalArgs;

/// Check optimized output against its metadata
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Puzzle identifier (directory under assets/puzzles/)
    pub puzzle_id: String,

    /// Grid sizes to verify (default: all discovered)
    #[arg(long, num_args = 1..)]
    pub grid_sizes: Vec<String>,

    /// Flutter pubspec.yaml that should list the optimized directories
    #[arg(long)]
    pub pubspec: Option<PathBuf>,
}

pub fn run(args: VerifyArgs, global: &GlobalArgs, printer: &Printer) -> Result<()> {
    let paths = global.puzzle(&args.puzzle_id);
    let grid_sizes = (!args.grid_sizes.is_empty()).then_some(args.grid_sizes.as_slice());

    printer.status("Verifying", &args.puzzle_id);
    let result = verify_puzzle(&paths, grid_sizes, args.pubspec.as_deref())?;
    print_diagnostics(&result, printer);

    if result.has_errors() {
        return Err(TrimError::Build {
            message: format!(
                "verification found {}",
                plural(result.error_count(), "error", "errors")
            ),
            help: Some(format!("Re-run `piecetrim optimize {}`", args.puzzle_id)),
        });
    }

    Ok(())
}
