//! Model dump formatting

use crate::resolve::BindingTable;
use serde::Serialize;
use shard_parse::ShaderFileModel;

/// Everything known about a shader file after resolution
#[derive(Debug, Serialize)]
pub struct DumpReport<'a> {
    pub model: &'a ShaderFileModel,
    pub bindings: Vec<BindingTable>,
}

impl<'a> DumpReport<'a> {
    pub fn new(model: &'a ShaderFileModel, bindings: Vec<BindingTable>) -> Self {
        Self { model, bindings }
    }
}

/// Format a report as JSON
pub fn format_json(report: &DumpReport<'_>) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|e| {
        log::warn!("Failed to format report as JSON: {}", e);
        "{}".to_string()
    })
}

/// Format a report as TOML
pub fn format_toml(report: &DumpReport<'_>) -> String {
    toml::to_string_pretty(report).unwrap_or_else(|e| {
        log::warn!("Failed to format report as TOML: {}", e);
        String::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::resolve_block;
    use shard_parse::parse;

    fn report_for(source: &str, f: impl Fn(&DumpReport<'_>) -> String) -> String {
        let model = parse(source, "test.shard").unwrap();
        let registry = model.group_registry();
        let tables = model
            .code_blocks
            .iter()
            .map(|block| resolve_block(block, &registry).unwrap())
            .collect();
        f(&DumpReport::new(&model, tables))
    }

    #[test]
    fn test_format_json() {
        let json = report_for(
            "[ResGroup]\nname = Foo\nbaseColor = float4\n[Code]\nname=C\nresGroup0=Foo\n\
             [[rx::resGroup0()]] float4 baseColor();\n",
            format_json,
        );
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["model"]["file_name"], "test.shard");
        assert_eq!(value["bindings"][0]["block"], "C");
        assert_eq!(value["bindings"][0]["slots"][0]["constants"][0]["name"], "baseColor");
        assert_eq!(value["bindings"][0]["slots"][0]["constants"][0]["byte_size"], 16);
    }

    #[test]
    fn test_format_toml() {
        let source = "[Code]\nname=C\n[[rx::resGroup1()]] Texture2D albedo();\n";
        let text = report_for(source, format_toml);
        assert!(text.contains("albedo"));
        assert!(text.contains("Texture2D"));
    }
}
