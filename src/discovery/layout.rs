//! Canvas information from `layout.ipuz.json`.
//!
//! The layout file is produced elsewhere, so a missing or malformed one is
//! recoverable: the configured fallback canvas is used instead.

use std::path::Path;

use serde::Deserialize;

use crate::types::CanvasSize;

/// Where a canvas size came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanvasSource {
    /// Read from the layout file.
    Layout,
    /// The fallback was used.
    Fallback { reason: String },
}

impl CanvasSource {
    pub fn is_fallback(&self) -> bool {
        matches!(self, CanvasSource::Fallback { .. })
    }
}

/// The subset of an ipuz layout that matters here.
#[derive(Debug, Deserialize)]
struct IpuzLayout {
    #[serde(default)]
    canvas: Option<CanvasSize>,
}

/// Read the canvas size from a layout file, falling back to `fallback`.
pub fn load_canvas_size(path: &Path, fallback: CanvasSize) -> (CanvasSize, CanvasSource) {
    match read_canvas(path) {
        Ok(canvas) => (canvas, CanvasSource::Layout),
        Err(reason) => {
            tracing::warn!(
                path = %path.display(),
                %reason,
                "using fallback canvas {}",
                fallback
            );
            (fallback, CanvasSource::Fallback { reason })
        }
    }
}

fn read_canvas(path: &Path) -> std::result::Result<CanvasSize, String> {
    let content = std::fs::read_to_string(path).map_err(|e| format!("cannot read layout: {}", e))?;
    let layout: IpuzLayout =
        serde_json::from_str(&content).map_err(|e| format!("malformed layout: {}", e))?;

    match layout.canvas {
        Some(canvas) if !canvas.is_empty() => Ok(canvas),
        Some(canvas) => Err(format!("layout canvas {} is empty", canvas)),
        None => Err("layout has no canvas entry".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_canvas_from_layout() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("layout.ipuz.json");
        fs::write(
            &path,
            r#"{"version": "http://ipuz.org/v2", "kind": ["http://ipuz.org/jigsaw#1"],
                "canvas": {"width": 400, "height": 300}}"#,
        )
        .unwrap();

        let (canvas, source) = load_canvas_size(&path, CanvasSize::FALLBACK);
        assert_eq!(canvas, CanvasSize::new(400, 300));
        assert_eq!(source, CanvasSource::Layout);
    }

    #[test]
    fn test_missing_layout_falls_back() {
        let dir = tempdir().unwrap();
        let (canvas, source) = load_canvas_size(&dir.path().join("missing.json"), CanvasSize::FALLBACK);
        assert_eq!(canvas, CanvasSize::new(2048, 2048));
        assert!(source.is_fallback());
    }

    #[test]
    fn test_malformed_layout_falls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("layout.ipuz.json");
        fs::write(&path, "{ this is not json").unwrap();

        let (canvas, source) = load_canvas_size(&path, CanvasSize::new(10, 20));
        assert_eq!(canvas, CanvasSize::new(10, 20));
        assert!(matches!(source, CanvasSource::Fallback { reason } if reason.contains("malformed")));
    }

    #[test]
    fn test_layout_without_canvas_falls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("layout.ipuz.json");
        fs::write(&path, r#"{"version": "http://ipuz.org/v2"}"#).unwrap();

        let (_, source) = load_canvas_size(&path, CanvasSize::FALLBACK);
        assert!(matches!(source, CanvasSource::Fallback { reason } if reason.contains("no canvas")));
    }

    #[test]
    fn test_layout_with_bad_canvas_type_falls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("layout.ipuz.json");
        fs::write(&path, r#"{"canvas": {"width": "wide", "height": 10}}"#).unwrap();

        let (canvas, source) = load_canvas_size(&path, CanvasSize::FALLBACK);
        assert_eq!(canvas, CanvasSize::FALLBACK);
        assert!(source.is_fallback());
    }
}
