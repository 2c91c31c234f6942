//! CLI command implementations

pub mod check;
pub mod dump;
pub mod splice;

use anyhow::{Context, Result};
use shard_build::ShardConfig;
use shard_parse::{parse_with_options, ShaderFileModel};

/// Read and parse a shader file with the configured options
pub fn load_model(path: &str, config: &ShardConfig) -> Result<ShaderFileModel> {
    let source =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
    let model = parse_with_options(&source, path, &config.parse_options())
        .with_context(|| format!("Failed to parse {}", path))?;
    Ok(model)
}
