//! Typed records for declarative sections
//!
//! Key/value entries are bridged into a `toml::Value` table and deserialized
//! with serde, so each record gets defaults, enum validation and unknown-key
//! detection for free.

use crate::section::{KeyValue, SectionRecord, ValueKind};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Links a program name to vertex and pixel entry points of one code block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RenderProgramDecl {
    pub name: String,
    #[serde(alias = "vs")]
    pub vertex_shader: String,
    #[serde(alias = "ps")]
    pub pixel_shader: String,
    /// Code block name; may be omitted when the file has a single block
    #[serde(default)]
    pub code: Option<String>,
    /// Header line of the declaring section
    #[serde(skip)]
    pub line: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Filter {
    Point,
    #[default]
    Linear,
    Anisotropic,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AddressMode {
    #[default]
    Wrap,
    Clamp,
    Mirror,
    Border,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompareFunc {
    Never,
    Less,
    Equal,
    LessEqual,
    Greater,
    NotEqual,
    GreaterEqual,
    Always,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SamplerStateDesc {
    pub name: String,
    #[serde(default)]
    pub filter: Filter,
    #[serde(default)]
    pub address_u: AddressMode,
    #[serde(default)]
    pub address_v: AddressMode,
    #[serde(default)]
    pub address_w: AddressMode,
    #[serde(default = "default_max_anisotropy")]
    pub max_anisotropy: u32,
    #[serde(default)]
    pub mip_lod_bias: f32,
    #[serde(default)]
    pub min_lod: f32,
    #[serde(default = "default_max_lod")]
    pub max_lod: f32,
    #[serde(default)]
    pub comparison: Option<CompareFunc>,
}

fn default_max_anisotropy() -> u32 {
    1
}

fn default_max_lod() -> f32 {
    1000.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DepthStencilDesc {
    pub name: String,
    #[serde(default = "default_true")]
    pub depth_test: bool,
    #[serde(default = "default_true")]
    pub depth_write: bool,
    #[serde(default = "default_depth_func")]
    pub depth_func: CompareFunc,
    #[serde(default)]
    pub stencil_enable: bool,
    #[serde(default = "default_stencil_mask")]
    pub stencil_read_mask: u8,
    #[serde(default = "default_stencil_mask")]
    pub stencil_write_mask: u8,
}

fn default_true() -> bool {
    true
}

fn default_depth_func() -> CompareFunc {
    CompareFunc::LessEqual
}

fn default_stencil_mask() -> u8 {
    0xff
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FillMode {
    #[default]
    Solid,
    Wireframe,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CullMode {
    None,
    Front,
    #[default]
    Back,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RasterStateDesc {
    pub name: String,
    #[serde(default)]
    pub fill_mode: FillMode,
    #[serde(default)]
    pub cull_mode: CullMode,
    #[serde(default)]
    pub front_counter_clockwise: bool,
    #[serde(default)]
    pub depth_bias: i32,
    #[serde(default)]
    pub slope_scaled_depth_bias: f32,
    #[serde(default = "default_true")]
    pub depth_clip: bool,
    #[serde(default)]
    pub scissor: bool,
}

/// A material: a program plus optional state presets and parameter overrides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialDesc {
    pub name: String,
    pub program: String,
    #[serde(default)]
    pub depth_stencil: Option<String>,
    #[serde(default)]
    pub raster_state: Option<String>,
    #[serde(skip)]
    pub line: u32,
    #[serde(flatten)]
    pub params: BTreeMap<String, toml::Value>,
}

/// Convert a section's entries into a typed record.
///
/// Later duplicate keys override earlier ones.
pub fn from_section<T: DeserializeOwned>(section: &SectionRecord) -> Result<T, toml::de::Error> {
    let mut table = toml::Table::new();
    for entry in &section.entries {
        table.insert(entry.key.clone(), entry_value(entry));
    }
    toml::Value::Table(table).try_into()
}

fn entry_value(entry: &KeyValue) -> toml::Value {
    if entry.key == "name" {
        return toml::Value::String(entry.value.clone());
    }
    match entry.kind {
        ValueKind::Bool => toml::Value::Boolean(entry.value == "true"),
        ValueKind::Number => entry
            .value
            .parse::<i64>()
            .map(toml::Value::Integer)
            .unwrap_or_else(|_| toml::Value::String(entry.value.clone())),
        ValueKind::String => {
            if let Ok(integer) = entry.value.parse::<i64>() {
                return toml::Value::Integer(integer);
            }
            let numeric = !entry.value.is_empty() && entry.value.chars().all(is_number_char);
            match entry.value.parse::<f64>() {
                Ok(number) if numeric => toml::Value::Float(number),
                _ => toml::Value::String(entry.value.clone()),
            }
        }
    }
}

fn is_number_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | '-' | '+')
}
