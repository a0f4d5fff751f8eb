//! Init command implementation.
//!
//! Writes a commented `piecetrim.yaml` holding the default settings.

use std::fs;

use clap::Args;

use crate::config::{OptimizeConfig, CONFIG_FILENAME};
use crate::error::{Result, TrimError};
use crate::output::{display_path, Printer};

use super::GlobalArgs;

/// Write a default piecetrim.yaml under the base path
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite existing piecetrim.yaml
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, global: &GlobalArgs, printer: &Printer) -> Result<()> {
    let config_path = global.base_path.join(CONFIG_FILENAME);

    if config_path.exists() && !args.force {
        return Err(TrimError::Build {
            message: format!("{} already exists", display_path(&config_path)),
            help: Some("Use --force to overwrite".to_string()),
        });
    }

    fs::write(&config_path, default_yaml()).map_err(|e| TrimError::Io {
        path: config_path.clone(),
        message: format!("Failed to write config: {}", e),
    })?;

    printer.success("Created", &display_path(&config_path));
    Ok(())
}

// Built by hand so each setting carries a comment.
fn default_yaml() -> String {
    let config = OptimizeConfig::default();
    let mut yaml = String::new();

    yaml.push_str("# Pixels kept around detected content (anti-aliasing tolerance).\n");
    yaml.push_str(&format!("padding: {}\n\n", config.padding));

    yaml.push_str("# Decoded bytes per pixel used for memory statistics.\n");
    yaml.push_str(&format!("bytes_per_pixel: {}\n\n", config.bytes_per_pixel));

    yaml.push_str("# Canvas used when layout.ipuz.json has no canvas entry.\n");
    yaml.push_str("fallback_canvas:\n");
    yaml.push_str(&format!("  width: {}\n", config.fallback_canvas.width));
    yaml.push_str(&format!("  height: {}\n\n", config.fallback_canvas.height));

    yaml.push_str("# Copy layout.ipuz.json into each optimized directory.\n");
    yaml.push_str(&format!("copy_layout: {}\n\n", config.copy_layout));

    yaml.push_str("# Hex characters kept from each content hash (1-64).\n");
    yaml.push_str(&format!("hash_length: {}\n", config.hash_length));

    yaml
}
