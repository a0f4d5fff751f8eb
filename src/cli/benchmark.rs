//! Benchmark command implementation.
//!
//! Compares original and optimized texture memory across grid sizes and
//! optionally writes the full report as JSON.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;

use crate::error::{Result, TrimError};
use crate::output::{display_path, plural, Printer};
use crate::report::{benchmark_puzzle, format_mib, BenchmarkReport, BenchmarkSummary, GridBenchmark, Measurement};

use super::GlobalArgs;

const GIB: u64 = 1024 * 1024 * 1024;
const MIB: u64 = 1024 * 1024;

/// Compare original and optimized memory use
#[derive(Args, Debug)]
pub struct BenchmarkArgs {
    /// Puzzle identifier (directory under assets/puzzles/)
    pub puzzle_id: String,

    /// Grid sizes to compare (default: all discovered)
    #[arg(long, num_args = 1..)]
    pub grid_sizes: Vec<String>,

    /// Write the JSON report here (`-` for stdout)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

pub fn run(args: BenchmarkArgs, global: &GlobalArgs, printer: &Printer) -> Result<()> {
    let config = global.load_config()?;
    let paths = global.puzzle(&args.puzzle_id);
    let grid_sizes = (!args.grid_sizes.is_empty()).then_some(args.grid_sizes.as_slice());

    printer.status("Benchmarking", &args.puzzle_id);
    let report = benchmark_puzzle(&paths, grid_sizes, config.bytes_per_pixel)?;

    for grid in &report.grid_sizes {
        print_grid(grid, printer);
    }

    if let Some(summary) = &report.summary {
        print_summary(summary, printer);
    }

    if let Some(output) = &args.output {
        write_report(&report, output, printer)?;
    }

    if report.optimized_grids() == 0 {
        return Err(TrimError::Build {
            message: format!("No optimized grids found for '{}'", args.puzzle_id),
            help: Some(format!("Run `piecetrim optimize {}` first", args.puzzle_id)),
        });
    }

    Ok(())
}

fn print_grid(grid: &GridBenchmark, printer: &Printer) {
    let original = match &grid.original {
        Measurement::Measured(original) => original,
        Measurement::Failed { error } => {
            printer.error("Failed", &format!("{}: {}", grid.grid_size, error));
            return;
        }
    };

    let optimized = match &grid.optimized {
        Measurement::Measured(optimized) => optimized,
        Measurement::Failed { error } => {
            printer.warning(
                "Original",
                &format!(
                    "{}: {}, {} (no optimized output: {})",
                    grid.grid_size,
                    plural(original.pieces_count, "piece", "pieces"),
                    format_mib(original.total_bytes),
                    error
                ),
            );
            return;
        }
    };

    printer.info(
        "Compared",
        &format!(
            "{}: {} -> {} ({:.1}% smaller, {:.1}x)",
            grid.grid_size,
            format_mib(original.total_bytes),
            format_mib(optimized.decoded_total_bytes),
            grid.analysis.reduction_percent.unwrap_or(0.0),
            grid.analysis.compression_ratio.unwrap_or(0.0)
        ),
    );
    printer.verbose(
        "Files",
        &format!(
            "{}: {} on disk, {} to {} bytes per file",
            grid.grid_size,
            format_mib(optimized.encoded_total_bytes),
            optimized.min_file_bytes,
            optimized.max_file_bytes
        ),
    );

    for d in &optimized.discrepancies {
        let written = d.written.as_deref().unwrap_or("missing");
        printer.warning(
            "Mismatch",
            &format!(
                "{}/{}: recorded {}, written {}",
                grid.grid_size, d.piece_id, d.recorded, written
            ),
        );
    }
}

fn print_summary(summary: &BenchmarkSummary, printer: &Printer) {
    printer.success(
        "Summary",
        &format!(
            "{} of {} optimized ({}), {} -> {}, {} saved ({:.1}%)",
            summary.optimized_grids,
            plural(summary.total_grids_analyzed, "grid", "grids"),
            summary.optimization_status,
            format_mib(summary.total_original_bytes),
            format_mib(summary.total_optimized_bytes),
            format_mib(summary.total_bytes_saved),
            summary.overall_reduction_percent
        ),
    );

    printer.info("Before", memory_verdict(summary.total_original_bytes, 2 * GIB, GIB));
    printer.info("After", memory_verdict(summary.total_optimized_bytes, GIB, 512 * MIB));
}

/// Classify a texture memory total against device thresholds.
fn memory_verdict(bytes: u64, critical: u64, high: u64) -> &'static str {
    if bytes > critical {
        "critical memory use, likely to crash low-end devices"
    } else if bytes > high {
        "high memory use, may struggle on low-end devices"
    } else {
        "acceptable memory use"
    }
}

fn write_report(report: &BenchmarkReport, output: &std::path::Path, printer: &Printer) -> Result<()> {
    if output.as_os_str() == "-" {
        let json = report.to_json()?;
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", json)?;
        return Ok(());
    }

    report.write_json(output)?;
    printer.success("Wrote", &display_path(output));
    Ok(())
}
