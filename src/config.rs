//! Optimizer configuration (piecetrim.yaml).
//!
//! Policy values that would otherwise be constants live here so detection
//! and cropping code never hard-codes them.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrimError};
use crate::optimize::hash::DEFAULT_HASH_LENGTH;
use crate::optimize::stats::RGBA_BYTES_PER_PIXEL;
use crate::types::CanvasSize;

/// The name of the configuration file looked up under the base path.
pub const CONFIG_FILENAME: &str = "piecetrim.yaml";

/// Settings for an optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizeConfig {
    /// Extra pixels kept around detected content so anti-aliased edges are
    /// not clipped. `0` crops exactly to content.
    pub padding: u32,

    /// Decoded bytes per pixel used for memory statistics.
    pub bytes_per_pixel: u64,

    /// Canvas used when `layout.ipuz.json` is missing or has no canvas.
    pub fallback_canvas: CanvasSize,

    /// Copy `layout.ipuz.json` next to the optimized pieces.
    pub copy_layout: bool,

    /// Number of hex characters kept from each content hash.
    pub hash_length: usize,
}

impl Default for OptimizeConfig {
    fn default() -> Self {
        Self {
            padding: 0,
            bytes_per_pixel: RGBA_BYTES_PER_PIXEL,
            fallback_canvas: CanvasSize::FALLBACK,
            copy_layout: true,
            hash_length: DEFAULT_HASH_LENGTH,
        }
    }
}

impl OptimizeConfig {
    /// Load configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| TrimError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read config: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content).map_err(|e| TrimError::Parse {
            message: format!("Invalid config: {}", e),
            help: Some(format!("Check {} syntax", CONFIG_FILENAME)),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load `piecetrim.yaml` from `base` if it exists, defaults otherwise.
    pub fn discover(base: &Path) -> Result<Self> {
        let path = base.join(CONFIG_FILENAME);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Override the padding tolerance.
    pub fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.bytes_per_pixel == 0 {
            return Err(TrimError::Parse {
                message: "bytes_per_pixel must be at least 1".to_string(),
                help: Some("RGBA textures use 4".to_string()),
            });
        }
        if self.fallback_canvas.is_empty() {
            return Err(TrimError::Parse {
                message: format!("fallback_canvas must be non-empty, got {}", self.fallback_canvas),
                help: None,
            });
        }
        Ok(())
    }
}
