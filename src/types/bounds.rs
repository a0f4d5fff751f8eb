//! Inclusive content bounding boxes.
//!
//! Every bounding box in piecetrim stores inclusive endpoints: `right` and
//! `bottom` are themselves content pixels. Width and height are derived with
//! a single `+ 1` rule, and the only conversion to an exclusive rectangle is
//! [`BoundingBox::to_crop_rect`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrimError};

use super::CanvasPosition;

/// Minimal inclusive pixel rectangle.
///
/// Invariant: `left <= right` and `top <= bottom`. Fields are private so the
/// invariant cannot be broken after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "BoundsRecord", try_from = "BoundsRecord")]
pub struct BoundingBox {
    left: u32,
    top: u32,
    right: u32,
    bottom: u32,
}

/// Exclusive crop rectangle in the `(x, y, width, height)` form used by
/// `image::imageops::crop_imm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    /// Create a bounding box from inclusive endpoints.
    pub fn new(left: u32, top: u32, right: u32, bottom: u32) -> Result<Self> {
        if left > right || top > bottom {
            return Err(TrimError::InvalidBounds {
                message: format!(
                    "left/top must not exceed right/bottom (got {},{} -> {},{})",
                    left, top, right, bottom
                ),
            });
        }

        Ok(Self {
            left,
            top,
            right,
            bottom,
        })
    }

    /// Smallest box spanning two corner pixels, in either order.
    pub fn spanning(a: (u32, u32), b: (u32, u32)) -> Self {
        Self {
            left: a.0.min(b.0),
            top: a.1.min(b.1),
            right: a.0.max(b.0),
            bottom: a.1.max(b.1),
        }
    }

    /// Bounding box covering a whole `width` x `height` image.
    pub fn covering(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(TrimError::InvalidBounds {
                message: format!("cannot cover an empty {}x{} image", width, height),
            });
        }
        Self::new(0, 0, width - 1, height - 1)
    }

    pub fn left(&self) -> u32 {
        self.left
    }

    pub fn top(&self) -> u32 {
        self.top
    }

    pub fn right(&self) -> u32 {
        self.right
    }

    pub fn bottom(&self) -> u32 {
        self.bottom
    }

    /// Width in pixels (inclusive endpoints).
    pub fn width(&self) -> u32 {
        self.right - self.left + 1
    }

    /// Height in pixels (inclusive endpoints).
    pub fn height(&self) -> u32 {
        self.bottom - self.top + 1
    }

    /// `(width, height)` pair.
    pub fn size(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    /// Top-left corner as a canvas position.
    pub fn position(&self) -> CanvasPosition {
        CanvasPosition {
            left: self.left,
            top: self.top,
        }
    }

    /// Check whether a pixel lies inside the box.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }

    /// Check whether the box lies entirely inside a `width` x `height` image.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right < width && self.bottom < height
    }

    /// Grow the box by `padding` pixels on every side, clamped to the
    /// inclusive pixel range of a `width` x `height` image.
    pub fn padded(&self, padding: u32, width: u32, height: u32) -> Result<Self> {
        if !self.fits_within(width, height) {
            return Err(TrimError::InvalidBounds {
                message: format!("{} does not fit a {}x{} image", self, width, height),
            });
        }

        Self::new(
            self.left.saturating_sub(padding),
            self.top.saturating_sub(padding),
            self.right.saturating_add(padding).min(width - 1),
            self.bottom.saturating_add(padding).min(height - 1),
        )
    }

    /// Convert to an exclusive crop rectangle.
    pub fn to_crop_rect(&self) -> CropRect {
        CropRect {
            x: self.left,
            y: self.top,
            width: self.width(),
            height: self.height(),
        }
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{})..=({},{}) [{}x{}]",
            self.left,
            self.top,
            self.right,
            self.bottom,
            self.width(),
            self.height()
        )
    }
}

/// Wire form of a bounding box: endpoints plus the derived size.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BoundsRecord {
    left: u32,
    top: u32,
    right: u32,
    bottom: u32,
    width: u32,
    height: u32,
}

impl From<BoundingBox> for BoundsRecord {
    fn from(b: BoundingBox) -> Self {
        Self {
            left: b.left,
            top: b.top,
            right: b.right,
            bottom: b.bottom,
            width: b.width(),
            height: b.height(),
        }
    }
}

impl TryFrom<BoundsRecord> for BoundingBox {
    type Error = String;

    fn try_from(r: BoundsRecord) -> std::result::Result<Self, Self::Error> {
        let bounds = BoundingBox::new(r.left, r.top, r.right, r.bottom).map_err(|e| e.to_string())?;
        if bounds.size() != (r.width, r.height) {
            return Err(format!(
                "recorded size {}x{} disagrees with endpoints {}",
                r.width, r.height, bounds
            ));
        }
        Ok(bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_inclusive_width_and_height() {
        let b = BoundingBox::new(50, 30, 149, 119).unwrap();
        assert_eq!(b.width(), 100);
        assert_eq!(b.height(), 90);
    }

    #[test]
    fn test_single_pixel_box() {
        let b = BoundingBox::new(7, 7, 7, 7).unwrap();
        assert_eq!(b.size(), (1, 1));
        assert!(b.contains(7, 7));
        assert!(!b.contains(8, 7));
    }

    #[test]
    fn test_inverted_box_rejected() {
        assert!(BoundingBox::new(10, 0, 9, 0).is_err());
        assert!(BoundingBox::new(0, 10, 0, 9).is_err());
    }

    #[test]
    fn test_spanning_orders_corners() {
        let bounds = BoundingBox::spanning((149, 30), (50, 119));
        assert_eq!(bounds, BoundingBox::new(50, 30, 149, 119).unwrap());
        assert_eq!(bounds.size(), (100, 90));
        assert_eq!(BoundingBox::spanning((7, 7), (7, 7)).size(), (1, 1));
    }

    #[test]
    fn test_covering() {
        let b = BoundingBox::covering(400, 300).unwrap();
        assert_eq!((b.left(), b.top(), b.right(), b.bottom()), (0, 0, 399, 299));
        assert!(BoundingBox::covering(0, 10).is_err());
    }

    #[test]
    fn test_crop_rect_is_exclusive_form() {
        let b = BoundingBox::new(50, 30, 149, 119).unwrap();
        assert_eq!(
            b.to_crop_rect(),
            CropRect {
                x: 50,
                y: 30,
                width: 100,
                height: 90
            }
        );
    }

    #[test]
    fn test_padded_interior() {
        let b = BoundingBox::new(50, 30, 149, 119).unwrap();
        let p = b.padded(2, 400, 400).unwrap();
        assert_eq!((p.left(), p.top(), p.right(), p.bottom()), (48, 28, 151, 121));
        assert_eq!(p.size(), (104, 94));
    }

    #[test]
    fn test_padded_clamps_to_image() {
        let b = BoundingBox::new(1, 0, 98, 99).unwrap();
        let p = b.padded(5, 100, 100).unwrap();
        assert_eq!((p.left(), p.top(), p.right(), p.bottom()), (0, 0, 99, 99));
    }

    #[test]
    fn test_padded_zero_is_identity() {
        let b = BoundingBox::new(3, 4, 5, 6).unwrap();
        assert_eq!(b.padded(0, 10, 10).unwrap(), b);
    }

    #[test]
    fn test_padded_rejects_out_of_image_bounds() {
        let b = BoundingBox::new(0, 0, 10, 10).unwrap();
        assert!(b.padded(0, 10, 10).is_err());
    }

    #[test]
    fn test_serializes_with_derived_size() {
        let b = BoundingBox::new(50, 30, 149, 119).unwrap();
        insta::assert_json_snapshot!(b, @r###"
        {
          "left": 50,
          "top": 30,
          "right": 149,
          "bottom": 119,
          "width": 100,
          "height": 90
        }
        "###);
    }

    #[test]
    fn test_deserialize_rejects_inconsistent_size() {
        let json = r#"{"left":0,"top":0,"right":9,"bottom":9,"width":9,"height":10}"#;
        assert!(serde_json::from_str::<BoundingBox>(json).is_err());

        let json = r#"{"left":0,"top":0,"right":9,"bottom":9,"width":10,"height":10}"#;
        let b: BoundingBox = serde_json::from_str(json).unwrap();
        assert_eq!(b.size(), (10, 10));
    }
}
