//! Crop policy.
//!
//! A crop is computed once: the detected bounds are padded and clamped to the
//! image, and that single clamped rectangle drives the extracted pixels, the
//! canvas position and the recorded bounds.

use image::RgbaImage;

use crate::error::{Result, TrimError};
use crate::types::{BoundingBox, CanvasPosition};

/// A cropped image together with where it belongs on the original canvas.
#[derive(Debug, Clone)]
pub struct CroppedPiece {
    /// Extracted pixels.
    pub image: RgbaImage,
    /// The clamped rectangle that was extracted, in source image coordinates.
    pub bounds: BoundingBox,
}

impl CroppedPiece {
    /// Where the cropped image is drawn on the canvas.
    pub fn canvas_position(&self) -> CanvasPosition {
        self.bounds.position()
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Paste the piece onto a transparent canvas at its canvas position.
    ///
    /// Pixels falling outside the canvas are dropped.
    pub fn place_on_canvas(&self, canvas_width: u32, canvas_height: u32) -> RgbaImage {
        let mut canvas = RgbaImage::new(canvas_width, canvas_height);
        let pos = self.canvas_position();
        image::imageops::replace(&mut canvas, &self.image, pos.left as i64, pos.top as i64);
        canvas
    }
}

/// Crop `img` to `bounds` grown by `padding` pixels.
///
/// `padding` is a tolerance for anti-aliased edge pixels; `0` gives an exact
/// content crop. Fails if `bounds` does not lie inside the image or if the
/// extracted pixels disagree with the rectangle used to extract them.
pub fn crop(img: &RgbaImage, bounds: BoundingBox, padding: u32) -> Result<CroppedPiece> {
    let clamped = bounds.padded(padding, img.width(), img.height())?;
    let rect = clamped.to_crop_rect();

    let image = image::imageops::crop_imm(img, rect.x, rect.y, rect.width, rect.height).to_image();

    if (image.width(), image.height()) != clamped.size() {
        return Err(TrimError::InvalidBounds {
            message: format!(
                "extracted {}x{} pixels for {}",
                image.width(),
                image.height(),
                clamped
            ),
        });
    }

    Ok(CroppedPiece {
        image,
        bounds: clamped,
    })
}
