//! Cross-batch benchmark: original pieces versus optimized output on disk.
//!
//! Optimized sizes are recomputed from the pixel dimensions of the written
//! files, not from the stored statistics, so anything the encode step got
//! wrong shows up as a discrepancy.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::discovery::{discover_grid_sizes, PuzzlePaths};
use crate::error::{Result, TrimError};
use crate::optimize::stats::{compression_ratio, image_bytes, reduction_percent};
use crate::optimize::{MemoryStats, OptimizationBatch};

use super::analysis::{measure_original, OriginalFootprint};

/// A measurement that may have failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Measurement<T> {
    Measured(T),
    Failed { error: String },
}

impl<T> Measurement<T> {
    pub fn measured(&self) -> Option<&T> {
        match self {
            Measurement::Measured(value) => Some(value),
            Measurement::Failed { .. } => None,
        }
    }

    fn from_result(result: std::result::Result<T, String>) -> Self {
        match result {
            Ok(value) => Measurement::Measured(value),
            Err(error) => Measurement::Failed { error },
        }
    }
}

/// A piece whose written file disagrees with its recorded bounds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Discrepancy {
    pub piece_id: String,
    /// `WxH` from the metadata bounds.
    pub recorded: String,
    /// `WxH` of the written file, or `None` if it is missing or unreadable.
    pub written: Option<String>,
}

/// Optimized output of a grid as found on disk.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizedFootprint {
    pub pieces_count: usize,
    /// Decoded size from the written files' dimensions.
    pub decoded_total_bytes: u64,
    /// Encoded PNG bytes on disk.
    pub encoded_total_bytes: u64,
    pub min_file_bytes: u64,
    pub max_file_bytes: u64,
    pub avg_file_bytes: u64,
    /// Statistics as stored at optimization time.
    pub recorded: MemoryStats,
    pub discrepancies: Vec<Discrepancy>,
}

/// Whether a grid has usable optimized output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationStatus {
    Optimized,
    NotOptimized,
    Unavailable,
}

/// Original versus optimized comparison for one grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub status: OptimizationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes_saved: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reduction_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression_ratio: Option<f64>,
}

impl Comparison {
    fn without(status: OptimizationStatus) -> Self {
        Self {
            status,
            bytes_saved: None,
            reduction_percent: None,
            compression_ratio: None,
        }
    }
}

/// Benchmark result for one grid size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridBenchmark {
    pub grid_size: String,
    pub original: Measurement<OriginalFootprint>,
    pub optimized: Measurement<OptimizedFootprint>,
    pub analysis: Comparison,
}

/// Totals across optimized grids.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkSummary {
    pub total_grids_analyzed: usize,
    pub optimized_grids: usize,
    pub total_original_bytes: u64,
    pub total_optimized_bytes: u64,
    pub total_bytes_saved: u64,
    pub overall_reduction_percent: f64,
    pub overall_compression_ratio: Option<f64>,
    pub optimization_status: String,
}

/// Benchmark of a whole puzzle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkReport {
    pub puzzle_id: String,
    pub grid_sizes: Vec<GridBenchmark>,
    /// Present only when at least one grid is optimized.
    pub summary: Option<BenchmarkSummary>,
}

impl BenchmarkReport {
    pub fn optimized_grids(&self) -> usize {
        self.summary.as_ref().map_or(0, |s| s.optimized_grids)
    }

    /// Write the report as pretty JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| TrimError::Io {
                path: parent.to_path_buf(),
                message: format!("Failed to create report directory: {}", e),
            })?;
        }

        fs::write(path, self.to_json()?).map_err(|e| TrimError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to write benchmark report: {}", e),
        })
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| TrimError::Build {
            message: format!("Failed to serialize benchmark report: {}", e),
            help: None,
        })
    }
}

/// Measure a grid's optimized output from its metadata and written files.
pub fn measure_optimized(paths: &PuzzlePaths, grid_size: &str, bytes_per_pixel: u64) -> std::result::Result<OptimizedFootprint, String> {
    let metadata = paths.metadata_file(grid_size);
    if !metadata.exists() {
        return Err(format!("Optimization metadata not found: {}", metadata.display()));
    }

    let batch = OptimizationBatch::load(&metadata)
        .map_err(|e| format!("Optimization data unavailable: {}", e))?;

    let pieces_dir = paths.optimized_pieces_dir(grid_size);
    let mut decoded_total_bytes = 0;
    let mut file_sizes = Vec::with_capacity(batch.pieces.len());
    let mut discrepancies = Vec::new();

    for (piece_id, record) in &batch.pieces {
        let path = pieces_dir.join(&record.cropped_filename);
        let (recorded_w, recorded_h) = record.bounds.size();

        let written = image::image_dimensions(&path).ok();
        if let Some((w, h)) = written {
            decoded_total_bytes += image_bytes(w, h, bytes_per_pixel);
        }
        if let Ok(meta) = fs::metadata(&path) {
            file_sizes.push(meta.len());
        }

        if written != Some((recorded_w, recorded_h)) {
            discrepancies.push(Discrepancy {
                piece_id: piece_id.clone(),
                recorded: format!("{}x{}", recorded_w, recorded_h),
                written: written.map(|(w, h)| format!("{}x{}", w, h)),
            });
        }
    }

    let encoded_total_bytes: u64 = file_sizes.iter().sum();
    let avg_file_bytes = if file_sizes.is_empty() {
        0
    } else {
        encoded_total_bytes / file_sizes.len() as u64
    };

    Ok(OptimizedFootprint {
        pieces_count: batch.pieces.len(),
        decoded_total_bytes,
        encoded_total_bytes,
        min_file_bytes: file_sizes.iter().copied().min().unwrap_or(0),
        max_file_bytes: file_sizes.iter().copied().max().unwrap_or(0),
        avg_file_bytes,
        recorded: batch.statistics,
        discrepancies,
    })
}

/// Benchmark one grid size.
pub fn benchmark_grid(paths: &PuzzlePaths, grid_size: &str, bytes_per_pixel: u64) -> GridBenchmark {
    let original = Measurement::from_result(measure_original(&paths.pieces_dir(grid_size), bytes_per_pixel));
    let optimized = Measurement::from_result(measure_optimized(paths, grid_size, bytes_per_pixel));

    let analysis = match (original.measured(), optimized.measured()) {
        (Some(original), Some(optimized)) => {
            let before = original.total_bytes;
            let after = optimized.decoded_total_bytes;
            Comparison {
                status: OptimizationStatus::Optimized,
                bytes_saved: Some(before.saturating_sub(after)),
                reduction_percent: Some(reduction_percent(before, after)),
                compression_ratio: compression_ratio(before, after),
            }
        }
        (Some(_), None) => Comparison::without(OptimizationStatus::NotOptimized),
        (None, _) => Comparison::without(OptimizationStatus::Unavailable),
    };

    GridBenchmark {
        grid_size: grid_size.to_string(),
        original,
        optimized,
        analysis,
    }
}

/// Benchmark the given grid sizes, or every discovered one.
pub fn benchmark_puzzle(
    paths: &PuzzlePaths,
    grid_sizes: Option<&[String]>,
    bytes_per_pixel: u64,
) -> Result<BenchmarkReport> {
    let grids = match grid_sizes {
        Some(grids) if !grids.is_empty() => grids.to_vec(),
        _ => discover_grid_sizes(&paths.layouts_dir())?,
    };

    let results: Vec<GridBenchmark> = grids
        .iter()
        .map(|grid| benchmark_grid(paths, grid, bytes_per_pixel))
        .collect();

    let summary = summarize(&results);

    Ok(BenchmarkReport {
        puzzle_id: paths.puzzle_id().to_string(),
        grid_sizes: results,
        summary,
    })
}

fn summarize(results: &[GridBenchmark]) -> Option<BenchmarkSummary> {
    let mut optimized_grids = 0;
    let mut total_original_bytes = 0;
    let mut total_optimized_bytes = 0;

    for result in results {
        if let (Some(original), Some(optimized)) = (result.original.measured(), result.optimized.measured()) {
            optimized_grids += 1;
            total_original_bytes += original.total_bytes;
            total_optimized_bytes += optimized.decoded_total_bytes;
        }
    }

    if optimized_grids == 0 {
        return None;
    }

    let status = if optimized_grids < results.len() {
        "partial"
    } else {
        "complete"
    };

    Some(BenchmarkSummary {
        total_grids_analyzed: results.len(),
        optimized_grids,
        total_original_bytes,
        total_optimized_bytes,
        total_bytes_saved: total_original_bytes.saturating_sub(total_optimized_bytes),
        overall_reduction_percent: reduction_percent(total_original_bytes, total_optimized_bytes),
        overall_compression_ratio: compression_ratio(total_original_bytes, total_optimized_bytes),
        optimization_status: status.to_string(),
    })
}
