//! Canvas geometry.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Size of the canvas a piece is repositioned onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    /// Canvas used when a layout does not describe one.
    pub const FALLBACK: Self = Self::new(2048, 2048);

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A canvas with a zero dimension cannot hold any piece.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::FALLBACK
    }
}

impl fmt::Display for CanvasSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Top-left coordinate at which a cropped piece is drawn on its canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CanvasPosition {
    pub left: u32,
    pub top: u32,
}

impl fmt::Display for CanvasPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.left, self.top)
    }
}
