//! piecetrim - Puzzle piece sprite trimmer
//!
//! Crops the transparent padding from puzzle piece images, records where
//! each trimmed piece sits on its original canvas, and reports the texture
//! memory saved.

pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod optimize;
pub mod output;
pub mod report;
pub mod types;
pub mod validation;

pub use config::{OptimizeConfig, CONFIG_FILENAME};
pub use discovery::{discover_grid_sizes, load_canvas_size, scan_pieces, CanvasSource, PuzzlePaths};
pub use error::{Result, TrimError};
pub use optimize::{
    build_batch, content_hash, crop, detect, ContentHash, CroppedPiece, Detection, GridOutcome,
    MemoryAccountant, MemoryStats, MetadataBuilder, OptimizationBatch, OptimizedPiece, Optimizer,
    PieceRecord, PuzzleReport,
};
pub use report::{analyze_puzzle, benchmark_puzzle, BenchmarkReport, GridAnalysis};
pub use types::{BoundingBox, CanvasPosition, CanvasSize, CropRect};
pub use validation::{verify_grid, verify_puzzle, Diagnostic, Severity, ValidationResult};
