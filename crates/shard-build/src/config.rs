//! Layered configuration system
//!
//! Config is loaded with three layers of precedence (highest wins):
//! 1. Environment variables: `SHARD_STRATEGIES`, `SHARD_CODE_BOUNDARY`, `SHARD_PAD_LINES`
//! 2. Project-local: `shard.toml`
//! 3. Built-in defaults

use crate::collaborator::TargetDialect;
use serde::{Deserialize, Serialize};
use shard_binding::{SpliceOptions, Strategy};
use shard_core::{Result, ShardError};
use shard_parse::{CodeBoundary, ParseOptions};
use std::path::{Path, PathBuf};

/// Project-local config file name
pub const CONFIG_FILE: &str = "shard.toml";

/// Parsing options
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParseConfig {
    #[serde(default)]
    pub code_boundary: CodeBoundary,
}

/// Code generation options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodegenConfig {
    /// Strategies to splice in addition to `legacy`, which is always built
    #[serde(default = "default_strategies")]
    pub strategies: Vec<Strategy>,
    #[serde(default)]
    pub pad_lines: bool,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            strategies: default_strategies(),
            pad_lines: false,
        }
    }
}

fn default_strategies() -> Vec<Strategy> {
    vec![Strategy::Legacy, Strategy::Bindless]
}

/// Compiler collaborator options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    #[serde(default)]
    pub dialects: Vec<TargetDialect>,
    #[serde(default = "default_vertex_target")]
    pub vertex_target: String,
    #[serde(default = "default_pixel_target")]
    pub pixel_target: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            dialects: Vec::new(),
            vertex_target: default_vertex_target(),
            pixel_target: default_pixel_target(),
        }
    }
}

fn default_vertex_target() -> String {
    "vs_6_0".to_string()
}
fn default_pixel_target() -> String {
    "ps_6_0".to_string()
}

/// Top-level config file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShardConfigFile {
    #[serde(default)]
    pub parse: ParseConfig,
    #[serde(default)]
    pub codegen: CodegenConfig,
    #[serde(default)]
    pub build: BuildConfig,
}

/// Resolved configuration with environment variable overrides applied
#[derive(Debug, Clone, Default)]
pub struct ShardConfig {
    pub parse: ParseConfig,
    pub codegen: CodegenConfig,
    pub build: BuildConfig,
}

impl ShardConfig {
    /// Load config with layered precedence: defaults < shard.toml < env vars
    pub fn load() -> Result<Self> {
        let local_path = PathBuf::from(CONFIG_FILE);
        let mut config = if local_path.exists() {
            Self::load_file(&local_path)?
        } else {
            ShardConfigFile::default()
        };

        Self::apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
        Ok(config.into())
    }

    /// Load config from a specific file path, then apply env overrides
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let mut config = Self::load_file(path)?;
        Self::apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
        Ok(config.into())
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            code_boundary: self.parse.code_boundary,
        }
    }

    pub fn splice_options(&self) -> SpliceOptions {
        SpliceOptions {
            pad_lines: self.codegen.pad_lines,
        }
    }

    /// Strategies to splice: `legacy` first, then the configured ones without repeats
    pub fn strategies(&self) -> Vec<Strategy> {
        let mut strategies = vec![Strategy::Legacy];
        for strategy in &self.codegen.strategies {
            if !strategies.contains(strategy) {
                strategies.push(*strategy);
            }
        }
        strategies
    }

    fn load_file(path: &Path) -> Result<ShardConfigFile> {
        let content = std::fs::read_to_string(path)?;
        let config: ShardConfigFile = toml::from_str(&content).map_err(|e| {
            ShardError::ConfigError(format!("Failed to parse config {}: {}", path.display(), e))
        })?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn apply_env_overrides(
        config: &mut ShardConfigFile,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<()> {
        if let Some(value) = var("SHARD_STRATEGIES") {
            config.codegen.strategies = value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::parse::<Strategy>)
                .collect::<Result<_>>()?;
        }
        if let Some(value) = var("SHARD_CODE_BOUNDARY") {
            config.parse.code_boundary = parse_code_boundary(&value)?;
        }
        if let Some(value) = var("SHARD_PAD_LINES") {
            config.codegen.pad_lines = parse_flag("SHARD_PAD_LINES", &value)?;
        }
        Ok(())
    }
}

impl From<ShardConfigFile> for ShardConfig {
    fn from(file: ShardConfigFile) -> Self {
        Self {
            parse: file.parse,
            codegen: file.codegen,
            build: file.build,
        }
    }
}

/// Parse a code boundary mode name (`literal` or `line-start`)
pub fn parse_code_boundary(value: &str) -> Result<CodeBoundary> {
    match value.trim().to_ascii_lowercase().as_str() {
        "literal" => Ok(CodeBoundary::Literal),
        "line-start" | "line_start" => Ok(CodeBoundary::LineStart),
        other => Err(ShardError::ConfigError(format!("Unknown code boundary: {}", other))),
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ShardError::ConfigError(format!(
            "{}: expected a boolean, got {}",
            name, other
        ))),
    }
}
