//! Content hashing for cropped pieces.
//!
//! The digest is SHA-256 over the row-major RGBA bytes of the image,
//! truncated to a short hex identifier.

use std::fmt;

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Default number of hex characters kept from the digest.
pub const DEFAULT_HASH_LENGTH: usize = 8;

/// Full SHA-256 length in hex characters.
const MAX_HASH_LENGTH: usize = 64;

/// Short hex digest of a piece's pixel data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash(String);

impl ContentHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hash the pixel bytes of `img`, keeping `length` hex characters.
///
/// `length` is clamped to `1..=64`.
pub fn content_hash(img: &RgbaImage, length: usize) -> ContentHash {
    let mut hasher = Sha256::new();
    hasher.update(img.as_raw());
    let digest = hex::encode(hasher.finalize());

    let length = length.clamp(1, MAX_HASH_LENGTH);
    ContentHash(digest[..length].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_hash_length() {
        let img = RgbaImage::from_pixel(3, 3, Rgba([1, 2, 3, 4]));
        assert_eq!(content_hash(&img, DEFAULT_HASH_LENGTH).as_str().len(), 8);
        assert_eq!(content_hash(&img, 0).as_str().len(), 1);
        assert_eq!(content_hash(&img, 500).as_str().len(), 64);
    }

    #[test]
    fn test_hash_is_deterministic() {
        let a = RgbaImage::from_pixel(16, 9, Rgba([10, 20, 30, 255]));
        let b = a.clone();
        assert_eq!(content_hash(&a, 8), content_hash(&b, 8));
    }

    #[test]
    fn test_hash_detects_single_pixel_change() {
        let a = RgbaImage::from_pixel(16, 9, Rgba([10, 20, 30, 255]));
        let mut b = a.clone();
        b.put_pixel(15, 8, Rgba([10, 20, 31, 255]));
        assert_ne!(content_hash(&a, 8), content_hash(&b, 8));
    }

    #[test]
    fn test_known_digest_of_empty_buffer() {
        // SHA-256 of zero bytes
        let img = RgbaImage::new(0, 0);
        assert_eq!(content_hash(&img, 8).as_str(), "e3b0c442");
    }

    #[test]
    fn test_hash_is_lowercase_hex() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([255, 255, 255, 255]));
        let hash = content_hash(&img, 64);
        assert!(hash
            .as_str()
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }
}
