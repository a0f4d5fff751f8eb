//! Core geometry types for piecetrim.
//!
//! - `BoundingBox` - inclusive content bounds
//! - `CropRect` - the exclusive rectangle handed to the image crate
//! - `CanvasSize` / `CanvasPosition` - placement on the original canvas

mod bounds;
mod canvas;

pub use bounds::{BoundingBox, CropRect};
pub use canvas::{CanvasPosition, CanvasSize};
