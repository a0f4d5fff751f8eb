//! Per-piece optimization result.

use crate::types::CanvasPosition;

use super::crop::CroppedPiece;
use super::hash::ContentHash;

/// One source image after detection, cropping and hashing.
#[derive(Debug, Clone)]
pub struct OptimizedPiece {
    /// Source file stem.
    pub piece_id: String,
    /// `(width, height)` of the source image.
    pub original_size: (u32, u32),
    pub cropped: CroppedPiece,
    pub content_hash: ContentHash,
}

impl OptimizedPiece {
    /// File name the cropped image is written under.
    pub fn cropped_filename(&self) -> String {
        cropped_filename(&self.piece_id)
    }

    pub fn canvas_position(&self) -> CanvasPosition {
        self.cropped.canvas_position()
    }

    /// `(width, height)` of the cropped pixels.
    pub fn cropped_size(&self) -> (u32, u32) {
        (self.cropped.width(), self.cropped.height())
    }
}

/// File name for a piece id.
pub fn cropped_filename(piece_id: &str) -> String {
    format!("{}.png", piece_id)
}
