//! Interfaces to the external shader compiler and reflector
//!
//! Compilation, reflection and cross-compilation are performed by native
//! tools outside this workspace. The build driver only sees these traits;
//! failures come back as the tool's own diagnostic text.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pipeline stage an entry point is compiled for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShaderStage {
    Vertex,
    Pixel,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Pixel => write!(f, "pixel"),
        }
    }
}

/// Shading dialect a compiled blob can be translated into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetDialect {
    Glsl,
    Essl,
    Msl,
}

impl fmt::Display for TargetDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetDialect::Glsl => write!(f, "glsl"),
            TargetDialect::Essl => write!(f, "essl"),
            TargetDialect::Msl => write!(f, "msl"),
        }
    }
}

/// A stage input or output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceVariable {
    pub name: String,
    pub location: u32,
    pub type_name: String,
}

/// A uniform block as laid out in the compiled blob
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniformBlock {
    pub name: String,
    pub set: u32,
    pub binding: u32,
    pub size: u32,
}

/// A texture or sampler binding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundResource {
    pub name: String,
    pub set: u32,
    pub binding: u32,
}

/// Layout discovered by reflecting a compiled entry point
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reflection {
    pub inputs: Vec<InterfaceVariable>,
    pub outputs: Vec<InterfaceVariable>,
    pub uniform_blocks: Vec<UniformBlock>,
    pub textures: Vec<BoundResource>,
    pub samplers: Vec<BoundResource>,
    pub push_constant_size: u32,
}

/// Compiles rewritten shader text into a binary blob
pub trait ShaderCompiler {
    /// Compile one entry point. `target` is the profile string, e.g. `vs_6_0`.
    fn compile(
        &self,
        source: &str,
        entry_point: &str,
        stage: ShaderStage,
        target: &str,
    ) -> Result<Vec<u8>, String>;
}

/// Inspects and translates compiled blobs
pub trait ShaderReflector {
    fn reflect(&self, blob: &[u8]) -> Result<Reflection, String>;

    fn cross_compile(&self, blob: &[u8], dialect: TargetDialect) -> Result<String, String>;
}
