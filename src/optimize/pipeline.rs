//! Batch driver: runs the pipeline over every piece of a puzzle's grids.
//!
//! Pieces are processed sequentially. All pieces of a grid are validated in
//! memory before anything is written, so a fatal error leaves the previous
//! output untouched. Once writing starts the previous metadata is removed
//! first, so a failed write leaves no metadata rather than stale metadata.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};

use crate::config::OptimizeConfig;
use crate::discovery::{
    discover_grid_sizes, load_canvas_size, piece_id, scan_pieces, CanvasSource, PuzzlePaths,
};
use crate::error::{Result, TrimError};
use crate::types::CanvasSize;

use super::bounds::detect;
use super::crop::crop;
use super::hash::content_hash;
use super::metadata::MetadataBuilder;
use super::piece::OptimizedPiece;
use super::stats::MemoryStats;

/// Why a piece was left out of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No pixel has non-zero alpha.
    Transparent,
    /// The file could not be decoded.
    Unreadable(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Transparent => write!(f, "fully transparent"),
            SkipReason::Unreadable(message) => write!(f, "unreadable: {}", message),
        }
    }
}

/// Result of processing one source file.
#[derive(Debug)]
pub enum PieceOutcome {
    Optimized(OptimizedPiece),
    Skipped { piece_id: String, reason: SkipReason },
}

/// Summary of a successfully optimized grid.
#[derive(Debug, Clone)]
pub struct GridReport {
    pub grid_size: String,
    pub output_dir: PathBuf,
    pub canvas_size: CanvasSize,
    pub canvas_source: CanvasSource,
    pub statistics: MemoryStats,
    /// Pieces left out, with the reason.
    pub skipped: Vec<(String, SkipReason)>,
}

/// Outcome of optimizing one grid size.
#[derive(Debug, Clone)]
pub enum GridOutcome {
    Optimized(GridReport),
    /// Recoverable failure; other grids still run.
    Failed { reason: String },
}

impl GridOutcome {
    pub fn is_optimized(&self) -> bool {
        matches!(self, GridOutcome::Optimized(_))
    }
}

/// Outcome of optimizing every requested grid of a puzzle.
#[derive(Debug, Clone)]
pub struct PuzzleReport {
    pub puzzle_id: String,
    pub grids: Vec<(String, GridOutcome)>,
}

impl PuzzleReport {
    pub fn succeeded(&self) -> usize {
        self.grids.iter().filter(|(_, g)| g.is_optimized()).count()
    }

    /// True when every requested grid was optimized.
    pub fn all_succeeded(&self) -> bool {
        !self.grids.is_empty() && self.succeeded() == self.grids.len()
    }
}

/// Runs the optimization pipeline for one puzzle.
#[derive(Debug, Clone)]
pub struct Optimizer {
    paths: PuzzlePaths,
    config: OptimizeConfig,
}

impl Optimizer {
    pub fn new(paths: PuzzlePaths, config: OptimizeConfig) -> Self {
        Self { paths, config }
    }

    pub fn paths(&self) -> &PuzzlePaths {
        &self.paths
    }

    pub fn config(&self) -> &OptimizeConfig {
        &self.config
    }

    /// Detect, crop and hash one decoded image.
    ///
    /// Returns `None` for a fully transparent image.
    pub fn optimize_image(&self, piece_id: &str, img: &RgbaImage) -> Result<Option<OptimizedPiece>> {
        let Some(bounds) = detect(img).bounds() else {
            return Ok(None);
        };

        let cropped = crop(img, bounds, self.config.padding)?;
        let content_hash = content_hash(&cropped.image, self.config.hash_length);

        tracing::debug!(
            piece = piece_id,
            content = %bounds,
            crop = %cropped.bounds,
            hash = %content_hash,
            "cropped {}x{} -> {}x{}",
            img.width(),
            img.height(),
            cropped.width(),
            cropped.height()
        );

        Ok(Some(OptimizedPiece {
            piece_id: piece_id.to_string(),
            original_size: (img.width(), img.height()),
            cropped,
            content_hash,
        }))
    }

    /// Load and optimize one piece file.
    ///
    /// Undecodable and fully transparent images are skipped, not errors.
    pub fn optimize_piece_file(&self, path: &Path) -> Result<PieceOutcome> {
        let Some(id) = piece_id(path) else {
            return Ok(PieceOutcome::Skipped {
                piece_id: path.display().to_string(),
                reason: SkipReason::Unreadable("file name is not valid UTF-8".to_string()),
            });
        };

        let img = match image::open(path) {
            Ok(img) => img.to_rgba8(),
            Err(e) => {
                return Ok(PieceOutcome::Skipped {
                    piece_id: id,
                    reason: SkipReason::Unreadable(e.to_string()),
                })
            }
        };

        match self.optimize_image(&id, &img)? {
            Some(piece) => Ok(PieceOutcome::Optimized(piece)),
            None => Ok(PieceOutcome::Skipped {
                piece_id: id,
                reason: SkipReason::Transparent,
            }),
        }
    }

    /// Optimize every piece of one grid size and write its output directory.
    pub fn optimize_grid(&self, grid_size: &str) -> Result<GridOutcome> {
        let pieces_dir = self.paths.pieces_dir(grid_size);
        if !pieces_dir.is_dir() {
            return Ok(GridOutcome::Failed {
                reason: format!("pieces directory not found: {}", pieces_dir.display()),
            });
        }

        let files = scan_pieces(&pieces_dir);
        if files.is_empty() {
            return Ok(GridOutcome::Failed {
                reason: format!("no piece images in {}", pieces_dir.display()),
            });
        }

        let (canvas_size, canvas_source) =
            load_canvas_size(&self.paths.layout_file(grid_size), self.config.fallback_canvas);

        let mut builder = MetadataBuilder::new(canvas_size, self.config.bytes_per_pixel);
        let mut optimized = Vec::with_capacity(files.len());
        let mut skipped = Vec::new();

        for file in &files {
            match self.optimize_piece_file(file)? {
                PieceOutcome::Optimized(piece) => {
                    builder.add(&piece)?;
                    optimized.push(piece);
                }
                PieceOutcome::Skipped { piece_id, reason } => {
                    tracing::warn!(grid = grid_size, piece = %piece_id, "skipping piece: {}", reason);
                    skipped.push((piece_id, reason));
                }
            }
        }

        if builder.is_empty() {
            return Ok(GridOutcome::Failed {
                reason: format!("no pieces were optimized ({} skipped)", skipped.len()),
            });
        }

        let output_dir = self.paths.optimized_dir(grid_size);
        let output_pieces = self.paths.optimized_pieces_dir(grid_size);
        create_dir(&output_pieces)?;
        remove_metadata(&self.paths.metadata_file(grid_size))?;

        for piece in &optimized {
            write_piece(&output_pieces.join(piece.cropped_filename()), &piece.cropped.image)?;
        }
        remove_stale_pieces(&output_pieces, &optimized)?;

        let layout = self.paths.layout_file(grid_size);
        if self.config.copy_layout && layout.is_file() {
            let target = output_dir.join(crate::discovery::LAYOUT_FILENAME);
            fs::copy(&layout, &target).map_err(|e| TrimError::Io {
                path: target.clone(),
                message: format!("Failed to copy layout: {}", e),
            })?;
        }

        let batch = builder.build();
        batch.write(&self.paths.metadata_file(grid_size))?;

        tracing::info!(
            grid = grid_size,
            pieces = batch.statistics.total_pieces,
            "saved {} bytes ({:.1}%)",
            batch.statistics.bytes_saved,
            batch.statistics.memory_reduction_percent
        );

        Ok(GridOutcome::Optimized(GridReport {
            grid_size: grid_size.to_string(),
            output_dir,
            canvas_size,
            canvas_source,
            statistics: batch.statistics,
            skipped,
        }))
    }

    /// Optimize the given grid sizes, or every discovered one.
    ///
    /// Grid failures are collected in the report; fatal errors abort.
    pub fn optimize_puzzle(&self, grid_sizes: Option<&[String]>) -> Result<PuzzleReport> {
        let grids = match grid_sizes {
            Some(grids) if !grids.is_empty() => grids.to_vec(),
            _ => discover_grid_sizes(&self.paths.layouts_dir())?,
        };

        if grids.is_empty() {
            return Err(TrimError::Build {
                message: format!("No grid sizes found for puzzle '{}'", self.paths.puzzle_id()),
                help: Some(format!(
                    "Expected layout directories under {}",
                    self.paths.layouts_dir().display()
                )),
            });
        }

        let mut report = PuzzleReport {
            puzzle_id: self.paths.puzzle_id().to_string(),
            grids: Vec::with_capacity(grids.len()),
        };

        for grid in grids {
            let outcome = self.optimize_grid(&grid)?;
            if let GridOutcome::Failed { reason } = &outcome {
                tracing::warn!(grid = %grid, "grid not optimized: {}", reason);
            }
            report.grids.push((grid, outcome));
        }

        Ok(report)
    }
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| TrimError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to create output directory: {}", e),
    })
}

fn remove_metadata(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(TrimError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to remove previous metadata: {}", e),
        }),
    }
}

fn write_piece(path: &Path, img: &RgbaImage) -> Result<()> {
    img.save_with_format(path, ImageFormat::Png)
        .map_err(|e| TrimError::Image {
            path: path.to_path_buf(),
            message: format!("Failed to write PNG: {}", e),
        })
}

/// Remove PNGs left over from an earlier run that are not part of this batch.
fn remove_stale_pieces(dir: &Path, pieces: &[OptimizedPiece]) -> Result<()> {
    let keep: BTreeSet<String> = pieces.iter().map(|p| p.cropped_filename()).collect();

    for path in scan_pieces(dir) {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        if keep.contains(name) {
            continue;
        }
        tracing::debug!(path = %path.display(), "removing stale piece");
        fs::remove_file(&path).map_err(|e| TrimError::Io {
            path: path.clone(),
            message: format!("Failed to remove stale piece: {}", e),
        })?;
    }

    Ok(())
}
