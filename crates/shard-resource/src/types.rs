//! Resource type table

use serde::{Deserialize, Serialize};
use std::fmt;

/// Size in bytes of one addressable word of group data
pub const WORD_SIZE: u32 = 4;

/// Binding kind of a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Constant,
    Texture,
    Sampler,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] = [
        ResourceKind::Constant,
        ResourceKind::Texture,
        ResourceKind::Sampler,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Constant => "constant",
            ResourceKind::Texture => "texture",
            ResourceKind::Sampler => "sampler",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar component type of a constant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scalar {
    Float,
    Int,
    Uint,
    Bool,
}

/// A scalar or vector constant type such as `float3`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstantType {
    pub scalar: Scalar,
    pub components: u32,
}

impl ConstantType {
    /// Parse `float`, `int2`, `uint4`, `bool3`...
    pub fn parse(type_name: &str) -> Option<Self> {
        let (scalar, rest) = [
            ("float", Scalar::Float),
            ("uint", Scalar::Uint),
            ("int", Scalar::Int),
            ("bool", Scalar::Bool),
        ]
        .into_iter()
        .find_map(|(prefix, scalar)| type_name.strip_prefix(prefix).map(|rest| (scalar, rest)))?;

        let components = match rest {
            "" => 1,
            "2" => 2,
            "3" => 3,
            "4" => 4,
            _ => return None,
        };
        Some(Self { scalar, components })
    }

    pub fn byte_size(&self) -> u32 {
        WORD_SIZE * self.components
    }
}

/// Resolved type of an annotated resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceType {
    Constant(ConstantType),
    Texture,
    Sampler,
}

impl ResourceType {
    /// Classify a shading-language type name. `None` for unknown constant types.
    pub fn parse(type_name: &str) -> Option<Self> {
        match type_name {
            "Texture2D" => Some(ResourceType::Texture),
            "SamplerState" => Some(ResourceType::Sampler),
            other => ConstantType::parse(other).map(ResourceType::Constant),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceType::Constant(_) => ResourceKind::Constant,
            ResourceType::Texture => ResourceKind::Texture,
            ResourceType::Sampler => ResourceKind::Sampler,
        }
    }

    /// Bytes occupied in group data. Textures and samplers store a 4-byte index.
    pub fn byte_size(&self) -> u32 {
        match self {
            ResourceType::Constant(c) => c.byte_size(),
            ResourceType::Texture | ResourceType::Sampler => WORD_SIZE,
        }
    }
}
