//! Memory reports over optimized output.
//!
//! - `analysis` - quick per-grid status from stored metadata statistics
//! - `benchmark` - cross-batch comparison re-measured from the files on disk

mod analysis;
mod benchmark;

pub use analysis::{
    analyze_puzzle, measure_original, read_optimized_status, GridAnalysis, OptimizedStatus,
    OriginalFootprint,
};
pub use benchmark::{
    benchmark_grid, benchmark_puzzle, measure_optimized, BenchmarkReport, BenchmarkSummary,
    Comparison, Discrepancy, GridBenchmark, Measurement, OptimizationStatus, OptimizedFootprint,
};

/// Bytes in a mebibyte, for display.
pub const MIB: f64 = 1024.0 * 1024.0;

/// Format a byte count as mebibytes with one decimal.
pub fn format_mib(bytes: u64) -> String {
    format!("{:.1} MB", bytes as f64 / MIB)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_mib() {
        assert_eq!(format_mib(0), "0.0 MB");
        assert_eq!(format_mib(1024 * 1024), "1.0 MB");
        assert_eq!(format_mib(2048 * 2048 * 4), "16.0 MB");
    }
}
