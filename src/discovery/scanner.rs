//! Directory scanning for grid sizes and piece images.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Result, TrimError};

use super::paths::OPTIMIZED_SUFFIX;

/// List the source grid sizes under a puzzle's `layouts` directory.
///
/// Returns immediate sub-directory names, skipping `*_optimized` output,
/// sorted by name.
pub fn discover_grid_sizes(layouts_dir: &Path) -> Result<Vec<String>> {
    if !layouts_dir.is_dir() {
        return Err(TrimError::Io {
            path: layouts_dir.to_path_buf(),
            message: "Puzzle layouts directory not found".to_string(),
        });
    }

    let mut grids: Vec<String> = WalkDir::new(layouts_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
        .filter_map(|e| e.file_name().to_str().map(str::to_string))
        .filter(|name| !name.ends_with(OPTIMIZED_SUFFIX))
        .collect();

    grids.sort();
    Ok(grids)
}

/// List `*.png` files directly inside `dir`, sorted by file name.
///
/// A missing directory yields an empty list.
pub fn scan_pieces(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }

    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| is_png(p))
        .collect()
}

/// Check for a lowercase `.png` extension.
///
/// Case-sensitive so `a.png` and `a.PNG` can never both map to piece `a`.
pub fn is_png(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("png")
}

/// Piece id of an image path (its file stem).
pub fn piece_id(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
}
