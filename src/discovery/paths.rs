//! Path conventions for puzzle layouts.

use std::path::{Path, PathBuf};

use crate::optimize::METADATA_FILENAME;

/// Directory holding piece images inside a layout directory.
pub const PIECES_DIR: &str = "pieces";

/// Layout description next to the pieces directory.
pub const LAYOUT_FILENAME: &str = "layout.ipuz.json";

/// Suffix appended to a grid size for its optimized output directory.
pub const OPTIMIZED_SUFFIX: &str = "_optimized";

/// Paths of one puzzle under a project base directory.
#[derive(Debug, Clone)]
pub struct PuzzlePaths {
    base: PathBuf,
    puzzle_id: String,
}

impl PuzzlePaths {
    pub fn new(base: impl Into<PathBuf>, puzzle_id: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            puzzle_id: puzzle_id.into(),
        }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn puzzle_id(&self) -> &str {
        &self.puzzle_id
    }

    /// `<base>/assets/puzzles/<puzzle_id>/layouts`
    pub fn layouts_dir(&self) -> PathBuf {
        self.base
            .join("assets")
            .join("puzzles")
            .join(&self.puzzle_id)
            .join("layouts")
    }

    pub fn grid_dir(&self, grid_size: &str) -> PathBuf {
        self.layouts_dir().join(grid_size)
    }

    pub fn pieces_dir(&self, grid_size: &str) -> PathBuf {
        self.grid_dir(grid_size).join(PIECES_DIR)
    }

    pub fn layout_file(&self, grid_size: &str) -> PathBuf {
        self.grid_dir(grid_size).join(LAYOUT_FILENAME)
    }

    pub fn optimized_dir(&self, grid_size: &str) -> PathBuf {
        self.layouts_dir()
            .join(format!("{}{}", grid_size, OPTIMIZED_SUFFIX))
    }

    pub fn optimized_pieces_dir(&self, grid_size: &str) -> PathBuf {
        self.optimized_dir(grid_size).join(PIECES_DIR)
    }

    pub fn metadata_file(&self, grid_size: &str) -> PathBuf {
        self.optimized_dir(grid_size).join(METADATA_FILENAME)
    }

    /// Asset path of the optimized directory as listed in a Flutter
    /// `pubspec.yaml` (always `/`-separated, with a trailing slash).
    pub fn optimized_asset_path(&self, grid_size: &str) -> String {
        format!(
            "assets/puzzles/{}/layouts/{}{}/",
            self.puzzle_id, grid_size, OPTIMIZED_SUFFIX
        )
    }
}
