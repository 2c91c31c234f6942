//! Shard Parse - Hybrid shader file parser
//!
//! A shader file interleaves declarative sections (`[ResGroup]`,
//! `[RenderProgram]`, `[Material]`, state presets) with `[Code]` sections
//! whose bodies are shading-language text carrying `[[rx::...]]` resource
//! annotations. This crate turns such a file into a [`ShaderFileModel`].

mod annotation;
mod code;
mod model;
mod presets;
mod section;

pub use annotation::{
    match_annotation, scan_code, Annotation, AnnotationMatch, CodeBoundary, CodeScan, ReplaceSpan,
};
pub use code::{CodeBlock, SlotBinding};
pub use model::{parse, parse_with_options, ParseOptions, ShaderFileModel};
pub use presets::{
    AddressMode, CompareFunc, CullMode, DepthStencilDesc, FillMode, Filter, MaterialDesc,
    RasterStateDesc, RenderProgramDecl, SamplerStateDesc,
};
pub use section::{Category, CodeContent, KeyValue, SectionParser, SectionRecord, ValueKind};
