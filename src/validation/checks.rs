//! Individual verification checks over optimized output.

use std::collections::BTreeSet;
use std::path::Path;

use crate::discovery::{scan_pieces, PuzzlePaths};
use crate::optimize::{content_hash, OptimizationBatch, PieceRecord};

use super::diagnostic::{Diagnostic, ValidationResult};

const MISSING_METADATA: &str = "piecetrim::verify::missing-metadata";
const UNREADABLE_METADATA: &str = "piecetrim::verify::unreadable-metadata";
const STATISTICS_MISMATCH: &str = "piecetrim::verify::statistics-mismatch";
const MISSING_PIECE: &str = "piecetrim::verify::missing-piece";
const UNREADABLE_PIECE: &str = "piecetrim::verify::unreadable-piece";
const DIMENSION_MISMATCH: &str = "piecetrim::verify::dimension-mismatch";
const HASH_DRIFT: &str = "piecetrim::verify::hash-drift";
const OUTSIDE_CANVAS: &str = "piecetrim::verify::outside-canvas";
const ORPHAN_PIECE: &str = "piecetrim::verify::orphan-piece";
const DUPLICATE_CONTENT: &str = "piecetrim::verify::duplicate-content";
const MISSING_PUBSPEC: &str = "piecetrim::verify::missing-pubspec";
const UNLISTED_ASSETS: &str = "piecetrim::verify::unlisted-assets";

/// Load a grid's metadata, reporting why it cannot be used.
pub fn load_metadata(paths: &PuzzlePaths, grid: &str) -> Result<OptimizationBatch, Diagnostic> {
    let path = paths.metadata_file(grid);
    if !path.exists() {
        return Err(Diagnostic::error(
            MISSING_METADATA,
            format!("no optimization metadata at {}", path.display()),
        )
        .in_grid(grid)
        .with_help("Run `piecetrim optimize` for this grid size"));
    }

    OptimizationBatch::load(&path).map_err(|e| {
        Diagnostic::error(UNREADABLE_METADATA, format!("optimization data unavailable: {}", e))
            .in_grid(grid)
            .with_help("Re-run `piecetrim optimize` to regenerate it")
    })
}

/// The stored piece count must match the recorded pieces.
pub fn check_statistics(batch: &OptimizationBatch, grid: &str) -> ValidationResult {
    let mut result = ValidationResult::new();
    if batch.statistics.total_pieces != batch.pieces.len() {
        result.push(
            Diagnostic::error(
                STATISTICS_MISMATCH,
                format!(
                    "statistics report {} pieces but {} are recorded",
                    batch.statistics.total_pieces,
                    batch.pieces.len()
                ),
            )
            .in_grid(grid),
        );
    }
    result
}

/// Every recorded piece must exist with exactly its recorded size and hash.
pub fn check_written_pieces(batch: &OptimizationBatch, pieces_dir: &Path, grid: &str) -> ValidationResult {
    let mut result = ValidationResult::new();

    for (id, record) in &batch.pieces {
        if let Some(d) = check_piece(id, record, pieces_dir) {
            result.push(d.in_grid(grid));
        }
    }

    result
}

fn check_piece(id: &str, record: &PieceRecord, pieces_dir: &Path) -> Option<Diagnostic> {
    let path = pieces_dir.join(&record.cropped_filename);
    if !path.is_file() {
        return Some(Diagnostic::error(
            MISSING_PIECE,
            format!("piece {}: {} is missing", id, record.cropped_filename),
        ));
    }

    let img = match image::open(&path) {
        Ok(img) => img.to_rgba8(),
        Err(e) => {
            return Some(Diagnostic::error(
                UNREADABLE_PIECE,
                format!("piece {}: cannot decode {}: {}", id, record.cropped_filename, e),
            ))
        }
    };

    let written = (img.width(), img.height());
    if written != record.bounds.size() {
        return Some(
            Diagnostic::error(
                DIMENSION_MISMATCH,
                format!(
                    "piece {}: bounds {} but file is {}x{}",
                    id, record.bounds, written.0, written.1
                ),
            )
            .with_help("Renderers place pieces by these bounds; re-run optimize"),
        );
    }

    let expected = record.content_hash.as_str();
    let actual = content_hash(&img, expected.len());
    if actual.as_str() != expected {
        return Some(Diagnostic::error(
            HASH_DRIFT,
            format!("piece {}: content hash {} but recorded {}", id, actual, expected),
        ));
    }

    None
}

/// Pieces should lie inside their canvas.
pub fn check_canvas_extent(batch: &OptimizationBatch, grid: &str) -> ValidationResult {
    let mut result = ValidationResult::new();
    for (id, record) in &batch.pieces {
        if record.exceeds_canvas() {
            result.push(
                Diagnostic::warning(
                    OUTSIDE_CANVAS,
                    format!(
                        "piece {}: bounds {} extend past the {} canvas",
                        id, record.bounds, record.canvas_size
                    ),
                )
                .in_grid(grid),
            );
        }
    }
    result
}

/// PNGs in the output directory that the metadata does not mention.
pub fn check_orphans(batch: &OptimizationBatch, pieces_dir: &Path, grid: &str) -> ValidationResult {
    let recorded: BTreeSet<&str> = batch
        .pieces
        .values()
        .map(|r| r.cropped_filename.as_str())
        .collect();

    let mut result = ValidationResult::new();
    for path in scan_pieces(pieces_dir) {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !recorded.contains(name) {
            result.push(
                Diagnostic::warning(ORPHAN_PIECE, format!("{} is not in the metadata", name))
                    .in_grid(grid),
            );
        }
    }
    result
}

/// Identical pieces could share one texture.
pub fn check_duplicates(batch: &OptimizationBatch, grid: &str) -> ValidationResult {
    let mut result = ValidationResult::new();
    for (hash, ids) in batch.duplicate_hashes() {
        result.push(
            Diagnostic::warning(
                DUPLICATE_CONTENT,
                format!("pieces {} share content hash {}", ids.join(", "), hash),
            )
            .in_grid(grid),
        );
    }
    result
}

/// Optimized directories must be listed in the Flutter asset manifest.
pub fn check_pubspec(paths: &PuzzlePaths, grids: &[String], pubspec: &Path) -> ValidationResult {
    let mut result = ValidationResult::new();

    let content = match std::fs::read_to_string(pubspec) {
        Ok(content) => content,
        Err(e) => {
            result.push(Diagnostic::error(
                MISSING_PUBSPEC,
                format!("cannot read {}: {}", pubspec.display(), e),
            ));
            return result;
        }
    };

    for grid in grids {
        let asset_path = paths.optimized_asset_path(grid);
        if !content.contains(&asset_path) {
            result.push(
                Diagnostic::warning(UNLISTED_ASSETS, format!("{} is missing from {}", asset_path, pubspec.display()))
                    .in_grid(grid)
                    .with_help("Add the optimized directory under flutter.assets"),
            );
        }
    }

    result
}
