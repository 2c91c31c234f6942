//! Shard Build - Build driver for Shard shader files
//!
//! This crate ties the pipeline together:
//! - `ShardConfig` - Layered configuration (env > shard.toml > defaults)
//! - `ShaderCompiler` / `ShaderReflector` - Interfaces to external shader tools
//! - `BuildDriver` - Parse, resolve, splice, then compile every render program

mod collaborator;
mod config;
mod driver;

pub use collaborator::{
    BoundResource, InterfaceVariable, Reflection, ShaderCompiler, ShaderReflector, ShaderStage,
    TargetDialect, UniformBlock,
};
pub use config::{
    parse_code_boundary, BuildConfig, CodegenConfig, ParseConfig, ShardConfig, ShardConfigFile,
    CONFIG_FILE,
};
pub use driver::{BuildDriver, BuildOutput, CompiledProgram, StageOutput};
