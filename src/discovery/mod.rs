//! Puzzle asset discovery.
//!
//! Resolves the on-disk layout of a puzzle:
//!
//! ```text
//! <base>/assets/puzzles/<puzzle_id>/layouts/<grid_size>/pieces/*.png
//! <base>/assets/puzzles/<puzzle_id>/layouts/<grid_size>/layout.ipuz.json
//! <base>/assets/puzzles/<puzzle_id>/layouts/<grid_size>_optimized/pieces/*.png
//! <base>/assets/puzzles/<puzzle_id>/layouts/<grid_size>_optimized/optimization_metadata.json
//! ```

mod layout;
mod paths;
mod scanner;

pub use layout::{load_canvas_size, CanvasSource};
pub use paths::{PuzzlePaths, LAYOUT_FILENAME, OPTIMIZED_SUFFIX, PIECES_DIR};
pub use scanner::{discover_grid_sizes, is_png, piece_id, scan_pieces};
