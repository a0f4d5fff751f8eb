//! The optimization pipeline.
//!
//! For each source image: detect content bounds, crop, hash, then collect
//! the results into a batch document with memory statistics.

pub mod bounds;
pub mod crop;
pub mod hash;
pub mod metadata;
mod piece;
mod pipeline;
pub mod stats;

pub use bounds::{detect, Detection};
pub use crop::{crop, CroppedPiece};
pub use hash::{content_hash, ContentHash};
pub use metadata::{
    build_batch, MetadataBuilder, OptimizationBatch, PieceRecord, METADATA_FILENAME,
    METADATA_VERSION,
};
pub use piece::{cropped_filename, OptimizedPiece};
pub use pipeline::{GridOutcome, GridReport, Optimizer, PieceOutcome, PuzzleReport, SkipReason};
pub use stats::{accumulate, MemoryAccountant, MemoryStats};
