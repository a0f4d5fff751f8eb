//! Optimize command implementation.
//!
//! Trims every piece of the requested grid sizes, then prints a memory
//! analysis of the puzzle.

use clap::Args;

use crate::discovery::CanvasSource;
use crate::error::{Result, TrimError};
use crate::optimize::{GridOutcome, GridReport, Optimizer};
use crate::output::{display_path, plural, Printer};
use crate::report::{analyze_puzzle, format_mib, GridAnalysis, OptimizedStatus};

use super::GlobalArgs;

/// Trim transparent padding from a puzzle's pieces
#[derive(Args, Debug)]
pub struct OptimizeArgs {
    /// Puzzle identifier (directory under assets/puzzles/)
    pub puzzle_id: String,

    /// Grid sizes to process (default: all discovered)
    #[arg(long, num_args = 1..)]
    pub grid_sizes: Vec<String>,

    /// Pixels kept around detected content (overrides config)
    #[arg(long)]
    pub padding: Option<u32>,

    /// Report memory use without writing anything
    #[arg(long)]
    pub analyze_only: bool,
}

pub fn run(args: OptimizeArgs, global: &GlobalArgs, printer: &Printer) -> Result<()> {
    let mut config = global.load_config()?;
    if let Some(padding) = args.padding {
        config = config.with_padding(padding);
    }
    let paths = global.puzzle(&args.puzzle_id);

    if args.analyze_only {
        printer.status("Analyzing", &args.puzzle_id);
        let analyses = analyze_puzzle(&paths, config.bytes_per_pixel)?;
        print_analysis(&analyses, printer);
        return Ok(());
    }

    let bytes_per_pixel = config.bytes_per_pixel;
    let optimizer = Optimizer::new(paths, config);
    let grid_sizes = (!args.grid_sizes.is_empty()).then_some(args.grid_sizes.as_slice());

    printer.status("Optimizing", &args.puzzle_id);
    let report = optimizer.optimize_puzzle(grid_sizes)?;

    for (grid, outcome) in &report.grids {
        match outcome {
            GridOutcome::Optimized(grid_report) => print_grid(grid_report, printer),
            GridOutcome::Failed { reason } => printer.error("Failed", &format!("{}: {}", grid, reason)),
        }
    }

    let analyses = analyze_puzzle(optimizer.paths(), bytes_per_pixel)?;
    print_analysis(&analyses, printer);

    let total = report.grids.len();
    if !report.all_succeeded() {
        return Err(TrimError::Build {
            message: format!(
                "{} of {} optimized",
                report.succeeded(),
                plural(total, "grid", "grids")
            ),
            help: Some("See the failures above".to_string()),
        });
    }

    printer.success(
        "Finished",
        &format!("{} ({})", args.puzzle_id, plural(total, "grid", "grids")),
    );
    Ok(())
}

fn print_grid(report: &GridReport, printer: &Printer) {
    if let CanvasSource::Fallback { reason } = &report.canvas_source {
        printer.warning(
            "Canvas",
            &format!("{}: using {} ({})", report.grid_size, report.canvas_size, reason),
        );
    }

    for (piece_id, reason) in &report.skipped {
        printer.warning("Skipped", &format!("{}/{}: {}", report.grid_size, piece_id, reason));
    }

    let stats = &report.statistics;
    printer.verbose(
        "Wrote",
        &format!(
            "{} -> {}",
            plural(stats.total_pieces, "piece", "pieces"),
            display_path(&report.output_dir)
        ),
    );
    printer.success(
        "Optimized",
        &format!(
            "{}: {}, {} -> {} ({:.1}% smaller)",
            report.grid_size,
            plural(stats.total_pieces, "piece", "pieces"),
            format_mib(stats.original_total_bytes),
            format_mib(stats.optimized_total_bytes),
            stats.memory_reduction_percent
        ),
    );
}

/// Print one line per analyzed grid.
pub fn print_analysis(analyses: &[GridAnalysis], printer: &Printer) {
    if analyses.is_empty() {
        printer.warning("Analysis", "no grids with source pieces");
        return;
    }

    for analysis in analyses {
        let original = format!(
            "{}: {}, {}",
            analysis.grid_size,
            plural(analysis.original.pieces_count, "piece", "pieces"),
            format_mib(analysis.original.total_bytes)
        );

        match &analysis.optimized {
            OptimizedStatus::Optimized { statistics } => printer.info(
                "Analysis",
                &format!(
                    "{} -> {} ({:.1}% reduction)",
                    original,
                    format_mib(statistics.optimized_total_bytes),
                    statistics.memory_reduction_percent
                ),
            ),
            OptimizedStatus::NotOptimized => {
                printer.info("Analysis", &format!("{} {}", original, printer.dim("(not optimized)")))
            }
            OptimizedStatus::Unavailable { reason } => printer.warning(
                "Analysis",
                &format!("{} (optimization data unavailable: {})", original, reason),
            ),
        }

        if analysis.original.unreadable > 0 {
            printer.verbose(
                "Unreadable",
                &format!(
                    "{}: {}",
                    analysis.grid_size,
                    plural(analysis.original.unreadable, "piece", "pieces")
                ),
            );
        }
    }
}
