//! Optimization metadata documents.
//!
//! `optimization_metadata.json` is the only durable output of a batch. It is
//! written once after every piece has been validated, and read back by the
//! analysis, benchmark and verify commands.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrimError};
use crate::types::{BoundingBox, CanvasPosition, CanvasSize};

use super::hash::ContentHash;
use super::piece::OptimizedPiece;
use super::stats::{MemoryAccountant, MemoryStats};

/// Schema version written to every document.
pub const METADATA_VERSION: &str = "1.0";

/// File name of the batch document inside an optimized layout directory.
pub const METADATA_FILENAME: &str = "optimization_metadata.json";

/// Metadata for a single cropped piece.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieceRecord {
    /// Extracted rectangle; its size equals the cropped image size.
    pub bounds: BoundingBox,
    pub canvas_size: CanvasSize,
    pub content_hash: ContentHash,
    pub cropped_filename: String,
}

impl PieceRecord {
    pub fn canvas_position(&self) -> CanvasPosition {
        self.bounds.position()
    }

    /// Check whether the piece extends past the right or bottom canvas edge.
    pub fn exceeds_canvas(&self) -> bool {
        self.bounds.right() >= self.canvas_size.width
            || self.bounds.bottom() >= self.canvas_size.height
    }
}

/// A complete batch document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationBatch {
    pub version: String,
    pub canvas_size: CanvasSize,
    pub pieces: BTreeMap<String, PieceRecord>,
    pub statistics: MemoryStats,
}

impl OptimizationBatch {
    /// Read a batch document from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| TrimError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read optimization metadata: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse a batch document from JSON.
    pub fn parse(content: &str) -> Result<Self> {
        let batch: Self = serde_json::from_str(content).map_err(|e| TrimError::Parse {
            message: format!("Invalid optimization metadata: {}", e),
            help: Some("Re-run `piecetrim optimize` to regenerate it".to_string()),
        })?;

        if batch.version != METADATA_VERSION {
            return Err(TrimError::Parse {
                message: format!(
                    "Unsupported optimization metadata version '{}' (expected '{}')",
                    batch.version, METADATA_VERSION
                ),
                help: Some("Re-run `piecetrim optimize` to regenerate it".to_string()),
            });
        }

        Ok(batch)
    }

    /// Write the document as pretty JSON.
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| TrimError::Build {
            message: format!("Failed to serialize optimization metadata: {}", e),
            help: None,
        })?;
        fs::write(path, json).map_err(|e| TrimError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to write optimization metadata: {}", e),
        })?;
        Ok(())
    }

    /// Groups of piece ids sharing a content hash, for pieces that could be
    /// deduplicated.
    pub fn duplicate_hashes(&self) -> Vec<(ContentHash, Vec<String>)> {
        let mut by_hash: BTreeMap<&ContentHash, Vec<String>> = BTreeMap::new();
        for (id, record) in &self.pieces {
            by_hash.entry(&record.content_hash).or_default().push(id.clone());
        }

        by_hash
            .into_iter()
            .filter(|(_, ids)| ids.len() > 1)
            .map(|(hash, ids)| (hash.clone(), ids))
            .collect()
    }
}

/// Collects piece results into an [`OptimizationBatch`].
#[derive(Debug)]
pub struct MetadataBuilder {
    canvas_size: CanvasSize,
    pieces: BTreeMap<String, PieceRecord>,
    accountant: MemoryAccountant,
}

impl MetadataBuilder {
    pub fn new(canvas_size: CanvasSize, bytes_per_pixel: u64) -> Self {
        Self {
            canvas_size,
            pieces: BTreeMap::new(),
            accountant: MemoryAccountant::new(bytes_per_pixel),
        }
    }

    /// Add a piece.
    ///
    /// Fails if the recorded bounds do not describe the cropped image exactly,
    /// or if the piece id was already added.
    pub fn add(&mut self, piece: &OptimizedPiece) -> Result<()> {
        let bounds = piece.cropped.bounds;
        let actual = piece.cropped_size();

        if bounds.size() != actual {
            return Err(TrimError::dimension_mismatch(
                &piece.piece_id,
                bounds.size(),
                actual,
            ));
        }

        if self.pieces.contains_key(&piece.piece_id) {
            return Err(TrimError::Build {
                message: format!("Duplicate piece id '{}'", piece.piece_id),
                help: Some("Piece ids come from file stems and must be unique".to_string()),
            });
        }

        self.pieces.insert(
            piece.piece_id.clone(),
            PieceRecord {
                bounds,
                canvas_size: self.canvas_size,
                content_hash: piece.content_hash.clone(),
                cropped_filename: piece.cropped_filename(),
            },
        );
        self.accountant.record(piece.original_size, actual);

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Statistics accumulated so far.
    pub fn statistics(&self) -> MemoryStats {
        self.accountant.statistics()
    }

    pub fn build(self) -> OptimizationBatch {
        let statistics = self.accountant.statistics();
        OptimizationBatch {
            version: METADATA_VERSION.to_string(),
            canvas_size: self.canvas_size,
            pieces: self.pieces,
            statistics,
        }
    }
}

/// Build a batch document from a sequence of piece results.
pub fn build_batch<'a, I>(pieces: I, canvas_size: CanvasSize, bytes_per_pixel: u64) -> Result<OptimizationBatch>
where
    I: IntoIterator<Item = &'a OptimizedPiece>,
{
    let mut builder = MetadataBuilder::new(canvas_size, bytes_per_pixel);
    for piece in pieces {
        builder.add(piece)?;
    }
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimize::crop::CroppedPiece;
    use crate::optimize::hash::content_hash;
    use crate::optimize::stats::RGBA_BYTES_PER_PIXEL;
    use image::{Rgba, RgbaImage};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn piece(id: &str, left: u32, top: u32, w: u32, h: u32) -> OptimizedPiece {
        let image = RgbaImage::from_pixel(w, h, Rgba([200, 100, 50, 255]));
        let content_hash = content_hash(&image, 8);
        OptimizedPiece {
            piece_id: id.to_string(),
            original_size: (400, 400),
            cropped: CroppedPiece {
                image,
                bounds: BoundingBox::new(left, top, left + w - 1, top + h - 1).unwrap(),
            },
            content_hash,
        }
    }

    #[test]
    fn test_builder_records_pieces_and_statistics() {
        let pieces: Vec<_> = ["0_0", "0_1", "1_0", "1_1"]
            .iter()
            .map(|id| piece(id, 50, 30, 100, 90))
            .collect();

        let batch = build_batch(&pieces, CanvasSize::new(400, 400), RGBA_BYTES_PER_PIXEL).unwrap();

        assert_eq!(batch.version, "1.0");
        assert_eq!(batch.pieces.len(), 4);
        assert_eq!(batch.statistics.total_pieces, 4);
        assert_eq!(batch.statistics.original_total_bytes, 4 * 400 * 400 * 4);
        assert_eq!(batch.statistics.optimized_total_bytes, 4 * 100 * 90 * 4);

        let record = &batch.pieces["1_0"];
        assert_eq!(record.cropped_filename, "1_0.png");
        assert_eq!(record.canvas_size, CanvasSize::new(400, 400));
        assert_eq!(record.canvas_position(), CanvasPosition { left: 50, top: 30 });
        assert_eq!(record.bounds.size(), (100, 90));
    }

    #[test]
    fn test_builder_rejects_dimension_mismatch() {
        let mut bad = piece("broken", 10, 10, 20, 20);
        // Bounds one pixel wider than the pixels actually extracted
        bad.cropped.bounds = BoundingBox::new(10, 10, 30, 29).unwrap();

        let mut builder = MetadataBuilder::new(CanvasSize::FALLBACK, RGBA_BYTES_PER_PIXEL);
        let err = builder.add(&bad).unwrap_err();

        assert!(matches!(err, TrimError::DimensionMismatch { .. }));
        assert!(err.to_string().contains("21x20"));
        assert!(err.to_string().contains("20x20"));
        assert!(builder.is_empty());
    }

    #[test]
    fn test_builder_rejects_duplicate_ids() {
        let mut builder = MetadataBuilder::new(CanvasSize::FALLBACK, RGBA_BYTES_PER_PIXEL);
        builder.add(&piece("a", 0, 0, 4, 4)).unwrap();
        assert!(builder.add(&piece("a", 0, 0, 4, 4)).is_err());
        assert_eq!(builder.len(), 1);
        assert_eq!(builder.statistics().total_pieces, 1);
    }

    #[test]
    fn test_json_schema() {
        let batch = build_batch(
            &[piece("0_0", 50, 30, 100, 90)],
            CanvasSize::new(400, 400),
            RGBA_BYTES_PER_PIXEL,
        )
        .unwrap();

        let value: serde_json::Value = serde_json::to_value(&batch).unwrap();

        assert_eq!(value["version"], "1.0");
        assert_eq!(value["canvas_size"]["width"], 400);
        let p = &value["pieces"]["0_0"];
        assert_eq!(p["bounds"]["left"], 50);
        assert_eq!(p["bounds"]["right"], 149);
        assert_eq!(p["bounds"]["bottom"], 119);
        assert_eq!(p["bounds"]["width"], 100);
        assert_eq!(p["bounds"]["height"], 90);
        assert_eq!(p["content_hash"].as_str().unwrap().len(), 8);
        assert_eq!(p["cropped_filename"], "0_0.png");
        assert_eq!(value["statistics"]["total_pieces"], 1);
        assert_eq!(value["statistics"]["bytes_saved"], 604_000);
        assert_eq!(value["statistics"]["memory_reduction_percent"], 94.375);
    }

    #[test]
    fn test_write_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(METADATA_FILENAME);

        let batch = build_batch(
            &[piece("a", 1, 2, 3, 4), piece("b", 5, 6, 7, 8)],
            CanvasSize::new(64, 64),
            RGBA_BYTES_PER_PIXEL,
        )
        .unwrap();
        batch.write(&path).unwrap();

        let loaded = OptimizationBatch::load(&path).unwrap();
        assert_eq!(loaded, batch);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = OptimizationBatch::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, TrimError::Io { .. }));
    }

    #[test]
    fn test_parse_rejects_corrupt_json() {
        assert!(OptimizationBatch::parse("{ not json").is_err());
        assert!(OptimizationBatch::parse("{}").is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_version() {
        let json = r#"{
            "version": "2.0",
            "canvas_size": {"width": 10, "height": 10},
            "pieces": {},
            "statistics": {"memory_reduction_percent": 0.0, "total_pieces": 0,
                "original_total_bytes": 0, "optimized_total_bytes": 0, "bytes_saved": 0}
        }"#;
        let err = OptimizationBatch::parse(json).unwrap_err();
        assert!(err.to_string().contains("2.0"));
    }

    #[test]
    fn test_duplicate_hashes() {
        let batch = build_batch(
            &[piece("a", 0, 0, 4, 4), piece("b", 9, 9, 4, 4), piece("c", 0, 0, 5, 4)],
            CanvasSize::new(64, 64),
            RGBA_BYTES_PER_PIXEL,
        )
        .unwrap();

        let dups = batch.duplicate_hashes();
        assert_eq!(dups.len(), 1);
        assert_eq!(dups[0].1, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_exceeds_canvas() {
        let batch = build_batch(
            &[piece("in", 0, 0, 10, 10), piece("out", 60, 0, 10, 10)],
            CanvasSize::new(64, 64),
            RGBA_BYTES_PER_PIXEL,
        )
        .unwrap();

        assert!(!batch.pieces["in"].exceeds_canvas());
        assert!(batch.pieces["out"].exceeds_canvas());
    }
}
