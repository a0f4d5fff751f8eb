//! Verification of optimized output.
//!
//! Reads back what `optimize` wrote and reports anything a renderer would
//! trip over. Used by `piecetrim verify`.

mod checks;
mod diagnostic;

use std::path::Path;

pub use diagnostic::{Diagnostic, Severity, ValidationResult};

use crate::discovery::{discover_grid_sizes, PuzzlePaths};
use crate::error::Result;
use crate::output::Printer;

/// Run every check against one grid's optimized output.
pub fn verify_grid(paths: &PuzzlePaths, grid: &str) -> ValidationResult {
    let mut result = ValidationResult::new();

    let batch = match checks::load_metadata(paths, grid) {
        Ok(batch) => batch,
        Err(diagnostic) => {
            result.push(diagnostic);
            return result;
        }
    };

    let pieces_dir = paths.optimized_pieces_dir(grid);
    result.merge(checks::check_statistics(&batch, grid));
    result.merge(checks::check_written_pieces(&batch, &pieces_dir, grid));
    result.merge(checks::check_canvas_extent(&batch, grid));
    result.merge(checks::check_orphans(&batch, &pieces_dir, grid));
    result.merge(checks::check_duplicates(&batch, grid));

    result
}

/// Verify the given grid sizes (or every discovered one), optionally
/// checking that a Flutter `pubspec.yaml` lists the optimized directories.
pub fn verify_puzzle(
    paths: &PuzzlePaths,
    grid_sizes: Option<&[String]>,
    pubspec: Option<&Path>,
) -> Result<ValidationResult> {
    let grids = match grid_sizes {
        Some(grids) if !grids.is_empty() => grids.to_vec(),
        _ => discover_grid_sizes(&paths.layouts_dir())?,
    };

    let mut result = ValidationResult::new();
    for grid in &grids {
        result.merge(verify_grid(paths, grid));
    }

    if let Some(pubspec) = pubspec {
        result.merge(checks::check_pubspec(paths, &grids, pubspec));
    }

    Ok(result)
}

/// Print diagnostics to stderr.
pub fn print_diagnostics(result: &ValidationResult, printer: &Printer) {
    for d in result.iter() {
        eprintln!("  {}", printer.severity(&d.to_string(), d.severity == Severity::Error));
        if let Some(help) = &d.help {
            eprintln!("    {} {}", printer.dim("help:"), help);
        }
    }

    let errors = result.error_count();
    let warnings = result.warning_count();

    if errors > 0 {
        printer.error(
            "Failed",
            &format!("{} error(s), {} warning(s)", errors, warnings),
        );
    } else if warnings > 0 {
        printer.warning("Verified", &format!("passed with {} warning(s)", warnings));
    } else {
        printer.success("Verified", "all checks passed");
    }
}
