//! Content bounds detection.
//!
//! Only the alpha channel is inspected: any pixel with non-zero alpha is
//! content, whatever its colour.

use image::RgbaImage;

use crate::types::BoundingBox;

/// Detected content of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
    /// Tightest inclusive box around every non-transparent pixel.
    Content(BoundingBox),
    /// No pixel has non-zero alpha.
    Empty,
}

impl Detection {
    /// The detected bounds, if any.
    pub fn bounds(self) -> Option<BoundingBox> {
        match self {
            Detection::Content(bounds) => Some(bounds),
            Detection::Empty => None,
        }
    }

    pub fn is_empty(self) -> bool {
        matches!(self, Detection::Empty)
    }
}

/// Find the minimal inclusive bounding box of non-transparent pixels.
pub fn detect(img: &RgbaImage) -> Detection {
    let mut extent: Option<(u32, u32, u32, u32)> = None;

    for (y, row) in img.enumerate_rows() {
        let mut first = None;
        let mut last = 0;
        for (x, _, pixel) in row {
            if pixel[3] != 0 {
                first.get_or_insert(x);
                last = x;
            }
        }

        let Some(first) = first else {
            continue;
        };

        extent = Some(match extent {
            None => (first, y, last, y),
            Some((left, top, right, _)) => (left.min(first), top, right.max(last), y),
        });
    }

    match extent {
        Some((left, top, right, bottom)) => {
            Detection::Content(BoundingBox::spanning((left, top), (right, bottom)))
        }
        None => Detection::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn transparent(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([0, 0, 0, 0]))
    }

    fn fill(img: &mut RgbaImage, left: u32, top: u32, right: u32, bottom: u32, px: Rgba<u8>) {
        for y in top..=bottom {
            for x in left..=right {
                img.put_pixel(x, y, px);
            }
        }
    }

    #[test]
    fn test_detect_opaque_rectangle() {
        let mut img = transparent(400, 400);
        fill(&mut img, 50, 30, 149, 119, Rgba([255, 0, 0, 255]));

        let bounds = detect(&img).bounds().unwrap();
        assert_eq!(
            (bounds.left(), bounds.top(), bounds.right(), bounds.bottom()),
            (50, 30, 149, 119)
        );
        assert_eq!(bounds.size(), (100, 90));
    }

    #[test]
    fn test_detect_fully_transparent_is_empty() {
        let img = transparent(100, 100);
        assert_eq!(detect(&img), Detection::Empty);
        assert!(detect(&img).is_empty());
    }

    #[test]
    fn test_detect_single_opaque_corner_pixel() {
        let mut img = transparent(16, 16);
        img.put_pixel(15, 15, Rgba([0, 0, 0, 255]));

        assert_eq!(detect(&img), Detection::Content(BoundingBox::spanning((15, 15), (15, 15))));
    }

    #[test]
    fn test_detect_ignores_colour_of_transparent_pixels() {
        // Colour data under zero alpha is not content
        let mut img = RgbaImage::from_pixel(20, 20, Rgba([255, 255, 255, 0]));
        img.put_pixel(4, 9, Rgba([0, 0, 0, 1]));

        let bounds = detect(&img).bounds().unwrap();
        assert_eq!(
            (bounds.left(), bounds.top(), bounds.right(), bounds.bottom()),
            (4, 9, 4, 9)
        );
    }

    #[test]
    fn test_detect_same_result_for_different_colours() {
        let mut red = transparent(32, 32);
        let mut blue = transparent(32, 32);
        fill(&mut red, 3, 5, 20, 11, Rgba([255, 0, 0, 255]));
        fill(&mut blue, 3, 5, 20, 11, Rgba([0, 0, 255, 40]));

        assert_eq!(detect(&red), detect(&blue));
    }

    #[test]
    fn test_detect_scattered_pixels() {
        let mut img = transparent(64, 48);
        img.put_pixel(10, 40, Rgba([1, 2, 3, 255]));
        img.put_pixel(60, 2, Rgba([1, 2, 3, 255]));
        img.put_pixel(33, 20, Rgba([1, 2, 3, 255]));

        let bounds = detect(&img).bounds().unwrap();
        assert_eq!(
            (bounds.left(), bounds.top(), bounds.right(), bounds.bottom()),
            (10, 2, 60, 40)
        );
    }

    #[test]
    fn test_detect_full_image() {
        let img = RgbaImage::from_pixel(7, 5, Rgba([9, 9, 9, 255]));
        let bounds = detect(&img).bounds().unwrap();
        assert_eq!(bounds, BoundingBox::covering(7, 5).unwrap());
    }

    #[test]
    fn test_detected_box_is_tight() {
        // Every pixel outside is transparent; every edge touches content
        let mut img = transparent(50, 50);
        img.put_pixel(12, 8, Rgba([0, 0, 0, 255]));
        img.put_pixel(30, 15, Rgba([0, 0, 0, 128]));
        img.put_pixel(20, 44, Rgba([0, 0, 0, 3]));
        img.put_pixel(5, 25, Rgba([0, 0, 0, 255]));

        let b = detect(&img).bounds().unwrap();

        for (x, y, p) in img.enumerate_pixels() {
            if !b.contains(x, y) {
                assert_eq!(p[3], 0, "pixel ({}, {}) outside bounds has alpha", x, y);
            }
        }

        let edge_has_content = |xs: Vec<(u32, u32)>| xs.iter().any(|&(x, y)| img.get_pixel(x, y)[3] != 0);
        assert!(edge_has_content((b.left()..=b.right()).map(|x| (x, b.top())).collect()));
        assert!(edge_has_content((b.left()..=b.right()).map(|x| (x, b.bottom())).collect()));
        assert!(edge_has_content((b.top()..=b.bottom()).map(|y| (b.left(), y)).collect()));
        assert!(edge_has_content((b.top()..=b.bottom()).map(|y| (b.right(), y)).collect()));
    }
}
