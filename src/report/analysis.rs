//! Per-grid memory analysis from stored metadata.

use std::path::Path;

use serde::Serialize;

use crate::discovery::{discover_grid_sizes, scan_pieces, PuzzlePaths};
use crate::error::Result;
use crate::optimize::stats::image_bytes;
use crate::optimize::{MemoryStats, OptimizationBatch};

/// Decoded size of a grid's source pieces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OriginalFootprint {
    pub pieces_count: usize,
    pub total_bytes: u64,
    /// Source files whose header could not be read; not counted in `total_bytes`.
    pub unreadable: usize,
}

/// What is known about a grid's optimized output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OptimizedStatus {
    Optimized { statistics: MemoryStats },
    NotOptimized,
    /// Metadata exists but cannot be used; treated as not optimized.
    Unavailable { reason: String },
}

impl OptimizedStatus {
    pub fn statistics(&self) -> Option<&MemoryStats> {
        match self {
            OptimizedStatus::Optimized { statistics } => Some(statistics),
            _ => None,
        }
    }
}

/// Analysis of one grid size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridAnalysis {
    pub grid_size: String,
    pub original: OriginalFootprint,
    pub optimized: OptimizedStatus,
}

/// Measure the source pieces of a grid from their PNG headers.
pub fn measure_original(pieces_dir: &Path, bytes_per_pixel: u64) -> std::result::Result<OriginalFootprint, String> {
    if !pieces_dir.is_dir() {
        return Err(format!("Pieces directory not found: {}", pieces_dir.display()));
    }

    let mut footprint = OriginalFootprint {
        pieces_count: 0,
        total_bytes: 0,
        unreadable: 0,
    };

    for path in scan_pieces(pieces_dir) {
        footprint.pieces_count += 1;
        match image::image_dimensions(&path) {
            Ok((w, h)) => footprint.total_bytes += image_bytes(w, h, bytes_per_pixel),
            Err(e) => {
                tracing::warn!(path = %path.display(), "cannot read image header: {}", e);
                footprint.unreadable += 1;
            }
        }
    }

    Ok(footprint)
}

/// Read the stored statistics of a grid's optimized output.
pub fn read_optimized_status(paths: &PuzzlePaths, grid_size: &str) -> OptimizedStatus {
    let metadata = paths.metadata_file(grid_size);
    if !metadata.exists() {
        return OptimizedStatus::NotOptimized;
    }

    match OptimizationBatch::load(&metadata) {
        Ok(batch) => OptimizedStatus::Optimized {
            statistics: batch.statistics,
        },
        Err(e) => OptimizedStatus::Unavailable {
            reason: e.to_string(),
        },
    }
}

/// Analyze every source grid of a puzzle.
///
/// Grids without a pieces directory are left out.
pub fn analyze_puzzle(paths: &PuzzlePaths, bytes_per_pixel: u64) -> Result<Vec<GridAnalysis>> {
    let grids = discover_grid_sizes(&paths.layouts_dir())?;

    let mut analyses = Vec::with_capacity(grids.len());
    for grid in grids {
        let Ok(original) = measure_original(&paths.pieces_dir(&grid), bytes_per_pixel) else {
            continue;
        };
        let optimized = read_optimized_status(paths, &grid);
        analyses.push(GridAnalysis {
            grid_size: grid,
            original,
            optimized,
        });
    }

    Ok(analyses)
}
