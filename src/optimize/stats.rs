//! Memory accounting for optimized pieces.
//!
//! Sizes are decoded texture sizes (`width * height * bytes_per_pixel`), not
//! encoded file sizes.

use serde::{Deserialize, Serialize};

/// Bytes per pixel of an RGBA8 texture.
pub const RGBA_BYTES_PER_PIXEL: u64 = 4;

/// Decoded size of a `width` x `height` image.
pub fn image_bytes(width: u32, height: u32, bytes_per_pixel: u64) -> u64 {
    width as u64 * height as u64 * bytes_per_pixel
}

/// Percentage of `original` saved by shrinking it to `optimized`.
///
/// Defined as `0.0` when `original` is zero.
pub fn reduction_percent(original: u64, optimized: u64) -> f64 {
    if original == 0 {
        return 0.0;
    }
    original.saturating_sub(optimized) as f64 / original as f64 * 100.0
}

/// `original / optimized`, or `None` when nothing is left to divide by.
pub fn compression_ratio(original: u64, optimized: u64) -> Option<f64> {
    if optimized == 0 {
        return None;
    }
    Some(original as f64 / optimized as f64)
}

/// Aggregate statistics for one batch, in the order they are written.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MemoryStats {
    pub memory_reduction_percent: f64,
    pub total_pieces: usize,
    pub original_total_bytes: u64,
    pub optimized_total_bytes: u64,
    pub bytes_saved: u64,
}

impl MemoryStats {
    pub fn compression_ratio(&self) -> Option<f64> {
        compression_ratio(self.original_total_bytes, self.optimized_total_bytes)
    }
}

/// Running totals owned by the batch loop.
#[derive(Debug, Clone)]
pub struct MemoryAccountant {
    bytes_per_pixel: u64,
    total_pieces: usize,
    original_total_bytes: u64,
    optimized_total_bytes: u64,
}

impl Default for MemoryAccountant {
    fn default() -> Self {
        Self::new(RGBA_BYTES_PER_PIXEL)
    }
}

impl MemoryAccountant {
    pub fn new(bytes_per_pixel: u64) -> Self {
        Self {
            bytes_per_pixel,
            total_pieces: 0,
            original_total_bytes: 0,
            optimized_total_bytes: 0,
        }
    }

    /// Record one piece by its original and optimized pixel dimensions.
    pub fn record(&mut self, original: (u32, u32), optimized: (u32, u32)) {
        self.total_pieces += 1;
        self.original_total_bytes += image_bytes(original.0, original.1, self.bytes_per_pixel);
        self.optimized_total_bytes += image_bytes(optimized.0, optimized.1, self.bytes_per_pixel);
    }

    pub fn total_pieces(&self) -> usize {
        self.total_pieces
    }

    /// Snapshot of the totals so far.
    pub fn statistics(&self) -> MemoryStats {
        MemoryStats {
            memory_reduction_percent: reduction_percent(
                self.original_total_bytes,
                self.optimized_total_bytes,
            ),
            total_pieces: self.total_pieces,
            original_total_bytes: self.original_total_bytes,
            optimized_total_bytes: self.optimized_total_bytes,
            bytes_saved: self
                .original_total_bytes
                .saturating_sub(self.optimized_total_bytes),
        }
    }
}

/// Accumulate statistics from `(original, optimized)` dimension pairs.
pub fn accumulate<I>(pieces: I, bytes_per_pixel: u64) -> MemoryStats
where
    I: IntoIterator<Item = ((u32, u32), (u32, u32))>,
{
    let mut accountant = MemoryAccountant::new(bytes_per_pixel);
    for (original, optimized) in pieces {
        accountant.record(original, optimized);
    }
    accountant.statistics()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_image_bytes() {
        assert_eq!(image_bytes(400, 400, 4), 640_000);
        assert_eq!(image_bytes(0, 400, 4), 0);
    }

    #[test]
    fn test_single_piece_reduction() {
        let stats = accumulate([((400, 400), (100, 90))], RGBA_BYTES_PER_PIXEL);

        assert_eq!(stats.total_pieces, 1);
        assert_eq!(stats.original_total_bytes, 640_000);
        assert_eq!(stats.optimized_total_bytes, 36_000);
        assert_eq!(stats.bytes_saved, 604_000);
        assert!((stats.memory_reduction_percent - 94.375).abs() < 1e-9);
    }

    #[test]
    fn test_batch_of_four() {
        let stats = accumulate(vec![((400, 400), (100, 90)); 4], RGBA_BYTES_PER_PIXEL);

        assert_eq!(stats.total_pieces, 4);
        assert_eq!(stats.original_total_bytes, 4 * 400 * 400 * 4);
        assert_eq!(stats.optimized_total_bytes, 4 * 100 * 90 * 4);
        assert_eq!(stats.bytes_saved, 4 * (400 * 400 - 100 * 90) * 4);

        let single = accumulate([((400, 400), (100, 90))], RGBA_BYTES_PER_PIXEL);
        assert!((stats.memory_reduction_percent - single.memory_reduction_percent).abs() < 1e-9);
    }

    #[test]
    fn test_empty_batch_has_zero_reduction() {
        let stats = accumulate(std::iter::empty(), RGBA_BYTES_PER_PIXEL);
        assert_eq!(stats, MemoryStats::default());
        assert_eq!(stats.memory_reduction_percent, 0.0);
    }

    #[test]
    fn test_reduction_percent_guards_zero() {
        assert_eq!(reduction_percent(0, 0), 0.0);
        assert_eq!(reduction_percent(0, 10), 0.0);
        assert_eq!(reduction_percent(100, 25), 75.0);
    }

    #[test]
    fn test_compression_ratio() {
        assert_eq!(compression_ratio(100, 25), Some(4.0));
        assert_eq!(compression_ratio(100, 0), None);
    }

    #[test]
    fn test_custom_bytes_per_pixel() {
        let mut accountant = MemoryAccountant::new(1);
        accountant.record((10, 10), (5, 5));
        let stats = accountant.statistics();
        assert_eq!(stats.original_total_bytes, 100);
        assert_eq!(stats.optimized_total_bytes, 25);
    }
}
