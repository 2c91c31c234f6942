//! Whole-file shader model

use crate::annotation::CodeBoundary;
use crate::code::CodeBlock;
use crate::presets::{
    from_section, DepthStencilDesc, MaterialDesc, RasterStateDesc, RenderProgramDecl,
    SamplerStateDesc,
};
use crate::section::{Category, SectionParser, SectionRecord};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shard_core::{Diagnostics, Result, ShardError};
use shard_resource::{GroupRegistry, GroupSlot, ResourceGroup};

/// Parser settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    #[serde(default)]
    pub code_boundary: CodeBoundary,
}

/// Everything parsed from one shader file
#[derive(Debug, Serialize)]
pub struct ShaderFileModel {
    pub file_name: String,
    #[serde(skip)]
    pub source: String,
    pub render_programs: Vec<RenderProgramDecl>,
    pub code_blocks: Vec<CodeBlock>,
    pub resource_groups: Vec<ResourceGroup>,
    pub materials: Vec<MaterialDesc>,
    pub sampler_states: Vec<SamplerStateDesc>,
    pub depth_stencil_states: Vec<DepthStencilDesc>,
    pub raster_states: Vec<RasterStateDesc>,
    pub diagnostics: Diagnostics,
}

/// Parse a shader file with default options
pub fn parse(source: &str, file_name: &str) -> Result<ShaderFileModel> {
    parse_with_options(source, file_name, &ParseOptions::default())
}

/// Parse a shader file.
///
/// Section syntax errors abort with an error. Everything else (unknown
/// sections, bad presets, duplicate or unknown resources) is recorded in
/// the model's diagnostics so that all problems are reported at once.
pub fn parse_with_options(
    source: &str,
    file_name: &str,
    options: &ParseOptions,
) -> Result<ShaderFileModel> {
    let mut model = ShaderFileModel::new(file_name, source);
    let mut parser = SectionParser::new(source, file_name, options.code_boundary);

    while let Some(section) = parser.next_section()? {
        model.add_section(section, parser.diagnostics_mut());
    }

    model.diagnostics = parser.into_diagnostics();
    model.validate_references();
    log::debug!(
        "Parsed {}: {} code block(s), {} resource group(s), {} program(s)",
        file_name,
        model.code_blocks.len(),
        model.resource_groups.len(),
        model.render_programs.len()
    );
    Ok(model)
}

impl ShaderFileModel {
    fn new(file_name: &str, source: &str) -> Self {
        Self {
            file_name: file_name.to_string(),
            source: source.to_string(),
            render_programs: Vec::new(),
            code_blocks: Vec::new(),
            resource_groups: Vec::new(),
            materials: Vec::new(),
            sampler_states: Vec::new(),
            depth_stencil_states: Vec::new(),
            raster_states: Vec::new(),
            diagnostics: Diagnostics::new(file_name),
        }
    }

    fn add_section(&mut self, section: SectionRecord, diagnostics: &mut Diagnostics) {
        match section.category {
            Category::Code => self.add_code_block(section, diagnostics),
            Category::ResGroup => self.add_resource_group(&section, diagnostics),
            Category::RenderProgram => {
                if let Some(mut decl) = typed::<RenderProgramDecl>(&section, diagnostics) {
                    decl.line = section.line;
                    warn_redefined(
                        &self.render_programs,
                        |p| &p.name,
                        &decl.name,
                        &section,
                        diagnostics,
                    );
                    self.render_programs.push(decl);
                }
            }
            Category::Material => {
                if let Some(mut desc) = typed::<MaterialDesc>(&section, diagnostics) {
                    desc.line = section.line;
                    warn_redefined(&self.materials, |m| &m.name, &desc.name, &section, diagnostics);
                    self.materials.push(desc);
                }
            }
            Category::SamplerState => {
                if let Some(desc) = typed::<SamplerStateDesc>(&section, diagnostics) {
                    warn_redefined(
                        &self.sampler_states,
                        |s| &s.name,
                        &desc.name,
                        &section,
                        diagnostics,
                    );
                    self.sampler_states.push(desc);
                }
            }
            Category::DepthStencil => {
                if let Some(desc) = typed::<DepthStencilDesc>(&section, diagnostics) {
                    warn_redefined(
                        &self.depth_stencil_states,
                        |s| &s.name,
                        &desc.name,
                        &section,
                        diagnostics,
                    );
                    self.depth_stencil_states.push(desc);
                }
            }
            Category::RasterState => {
                if let Some(desc) = typed::<RasterStateDesc>(&section, diagnostics) {
                    warn_redefined(
                        &self.raster_states,
                        |s| &s.name,
                        &desc.name,
                        &section,
                        diagnostics,
                    );
                    self.raster_states.push(desc);
                }
            }
        }
    }

    fn add_code_block(&mut self, mut section: SectionRecord, diagnostics: &mut Diagnostics) {
        let Some(content) = section.code.take() else {
            return;
        };
        let name = section
            .get("name")
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("code{}", self.code_blocks.len()));
        warn_redefined(&self.code_blocks, |c| &c.name, &name, &section, diagnostics);

        let mut block = CodeBlock::new(name, content.span, content.line);
        for slot in GroupSlot::ALL {
            if let Some(group) = section.get(slot.key()) {
                block.group_names[slot.index()] = group.to_string();
            }
        }
        block.add_annotations(content.annotations, diagnostics);
        self.code_blocks.push(block);
    }

    fn add_resource_group(&mut self, section: &SectionRecord, diagnostics: &mut Diagnostics) {
        let Some(name) = section.get("name").filter(|n| !n.is_empty()) else {
            diagnostics.error(section.line, "[ResGroup] section without a name");
            return;
        };
        warn_redefined(&self.resource_groups, |g| &g.name, name, section, diagnostics);

        let mut group = ResourceGroup::named(name);
        for entry in section.entries.iter().filter(|e| e.key != "name") {
            if let Err(err) = group.declare(&entry.key, &entry.value) {
                diagnostics.error(entry.line, err.to_string());
            }
        }
        self.resource_groups.push(group);
    }

    /// Cross-section checks run once the whole file is known
    fn validate_references(&mut self) {
        let group_names: Vec<String> =
            self.resource_groups.iter().map(|g| g.name.clone()).collect();
        for block in &self.code_blocks {
            for slot in GroupSlot::ALL {
                if let Some(name) = block.group_name(slot) {
                    if !group_names.iter().any(|g| g == name) {
                        self.diagnostics.warning(
                            block.line_offset,
                            format!(
                                "code block {}: {} references unknown resource group '{}', \
                                 using local declarations",
                                block.name, slot, name
                            ),
                        );
                    }
                }
            }
        }

        for program in &self.render_programs {
            if let Err(err) = code_block_for(&self.code_blocks, program) {
                self.diagnostics.error(program.line, err.to_string());
            }
        }

        for material in &self.materials {
            if !self.render_programs.iter().any(|p| p.name == material.program) {
                self.diagnostics.error(
                    material.line,
                    format!(
                        "material {}: unknown render program '{}'",
                        material.name, material.program
                    ),
                );
            }
            if let Some(ds) = &material.depth_stencil {
                if !self.depth_stencil_states.iter().any(|s| &s.name == ds) {
                    self.diagnostics.error(
                        material.line,
                        format!("material {}: unknown depth-stencil state '{}'", material.name, ds),
                    );
                }
            }
            if let Some(rs) = &material.raster_state {
                if !self.raster_states.iter().any(|s| &s.name == rs) {
                    self.diagnostics.error(
                        material.line,
                        format!("material {}: unknown raster state '{}'", material.name, rs),
                    );
                }
            }
        }
    }

    /// Build the registry of global groups. Later definitions win.
    pub fn group_registry(&self) -> GroupRegistry {
        let mut registry = GroupRegistry::new();
        for group in &self.resource_groups {
            registry.register(group.clone());
        }
        registry
    }

    pub fn code_block(&self, name: &str) -> Option<&CodeBlock> {
        self.code_blocks.iter().rev().find(|c| c.name == name)
    }

    pub fn render_program(&self, name: &str) -> Option<&RenderProgramDecl> {
        self.render_programs.iter().rev().find(|p| p.name == name)
    }

    /// The code block a program's entry points are compiled from
    pub fn code_block_for(&self, program: &RenderProgramDecl) -> Result<&CodeBlock> {
        code_block_for(&self.code_blocks, program)
    }

    /// Body text of a code block
    pub fn code_text(&self, block: &CodeBlock) -> &str {
        block.text(&self.source)
    }
}

fn code_block_for<'a>(
    blocks: &'a [CodeBlock],
    program: &RenderProgramDecl,
) -> Result<&'a CodeBlock> {
    match &program.code {
        Some(name) => blocks
            .iter()
            .rev()
            .find(|c| &c.name == name)
            .ok_or_else(|| ShardError::CodeBlockNotFound(name.clone())),
        None => match blocks {
            [only] => Ok(only),
            [] => Err(ShardError::MissingCodeBlock {
                program: program.name.clone(),
                reason: "the file has no [Code] section".to_string(),
            }),
            _ => Err(ShardError::MissingCodeBlock {
                program: program.name.clone(),
                reason: "several [Code] sections exist, set 'code'".to_string(),
            }),
        },
    }
}

fn typed<T: DeserializeOwned>(section: &SectionRecord, diagnostics: &mut Diagnostics) -> Option<T> {
    match from_section(section) {
        Ok(value) => Some(value),
        Err(err) => {
            diagnostics.error(
                section.line,
                format!("invalid [{}] section: {}", section.category, err.message()),
            );
            None
        }
    }
}

fn warn_redefined<T>(
    existing: &[T],
    name_of: impl Fn(&T) -> &String,
    name: &str,
    section: &SectionRecord,
    diagnostics: &mut Diagnostics,
) {
    if existing.iter().any(|item| name_of(item) == name) {
        diagnostics.warning(
            section.line,
            format!("[{}] '{}' redefined, the last definition wins", section.category, name),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shard_resource::ResourceKind;

    const SCENARIO: &str = "[ResGroup]
name = Foo
baseColor = float4
[Code]
name=C
resGroup0=Foo
[[rx::resGroup0()]] float4 baseColor();
float4 PSMain() : SV_Target { return baseColor(); }
";

    #[test]
    fn test_parse_scenario() {
        let model = parse(SCENARIO, "scenario.shard").unwrap();
        assert!(model.diagnostics.entries.is_empty(), "{:?}", model.diagnostics);

        assert_eq!(model.resource_groups.len(), 1);
        let foo = &model.resource_groups[0];
        assert_eq!(foo.name, "Foo");
        let decl = foo.find(ResourceKind::Constant, "baseColor").unwrap();
        assert_eq!(decl.type_name, "float4");
        assert_eq!(decl.byte_size, 16);

        let block = model.code_block("C").unwrap();
        assert_eq!(block.group_name(GroupSlot::ResGroup0), Some("Foo"));
        assert_eq!(block.line_offset, 7);
        assert_eq!(block.replace_spans.len(), 1);
        assert_eq!(
            block.replace_spans[0].range().text(&model.source),
            "[[rx::resGroup0()]] float4 baseColor();"
        );
        assert!(model.code_text(block).starts_with("[[rx::"));
    }

    #[test]
    fn test_forward_reference_to_group() {
        let source = "[Code]\nname = C\nresGroup1 = Late\nfloat x;\n\
                      [ResGroup]\nname = Late\ntint = float3\n";
        let model = parse(source, "fwd.shard").unwrap();
        assert!(model.diagnostics.entries.is_empty());
        let registry = model.group_registry();
        let block = model.code_block("C").unwrap();
        assert!(block.binding(GroupSlot::ResGroup1, &registry).is_global());
    }

    #[test]
    fn test_unknown_group_reference_warns() {
        let source = "[Code]\nname = C\nresGroup0 = Nope\nfloat x;\n";
        let model = parse(source, "t.shard").unwrap();
        assert!(model.diagnostics.is_valid());
        assert_eq!(model.diagnostics.warning_count(), 1);
    }

    #[test]
    fn test_duplicate_group_last_wins() {
        let source = "[ResGroup]\nname = Foo\na = float\n[ResGroup]\nname = Foo\nb = float2\n";
        let model = parse(source, "t.shard").unwrap();
        assert_eq!(model.diagnostics.warning_count(), 1);
        let registry = model.group_registry();
        let foo = registry.get("Foo").unwrap();
        assert!(foo.find_any("a").is_none());
        assert!(foo.find_any("b").is_some());
    }

    #[test]
    fn test_bad_group_entry_is_error() {
        let source = "[ResGroup]\nname = Foo\nm = float4x4\nok = float\n";
        let model = parse(source, "t.shard").unwrap();
        assert_eq!(model.diagnostics.error_count(), 1);
        assert_eq!(model.diagnostics.entries[0].line, 3);
        assert_eq!(model.resource_groups[0].len(), 1);
    }

    #[test]
    fn test_program_code_resolution() {
        let source = "[RenderProgram]\nname = Lit\nvs = VSMain\nps = PSMain\n\
                      [Code]\nname = Main\nfloat4 x;\n";
        let model = parse(source, "t.shard").unwrap();
        assert!(model.diagnostics.is_valid());
        let program = model.render_program("Lit").unwrap();
        assert_eq!(model.code_block_for(program).unwrap().name, "Main");
    }

    #[test]
    fn test_program_with_ambiguous_code_is_error() {
        let source = "[RenderProgram]\nname = Lit\nvs = V\nps = P\n\
                      [Code]\nname = A\nx;\n[Code]\nname = B\ny;\n";
        let model = parse(source, "t.shard").unwrap();
        assert_eq!(model.diagnostics.error_count(), 1);
    }

    #[test]
    fn test_material_references() {
        let source = "[RenderProgram]\nname = Lit\nvs = V\nps = P\n\
                      [RasterState]\nname = Solid\n\
                      [Material]\nname = Brick\nprogram = Lit\nrasterState = Solid\n\
                      depthStencil = Missing\n\
                      [Code]\nname = C\nx;\n";
        let model = parse(source, "t.shard").unwrap();
        assert_eq!(model.materials.len(), 1);
        assert_eq!(model.diagnostics.error_count(), 1);
        assert!(model.diagnostics.entries[0].message.contains("Missing"));
    }

    #[test]
    fn test_invalid_preset_is_error() {
        let source = "[SamplerState]\nname = S\nfilter = cubic\n";
        let model = parse(source, "t.shard").unwrap();
        assert!(model.sampler_states.is_empty());
        assert_eq!(model.diagnostics.error_count(), 1);
        assert_eq!(model.diagnostics.entries[0].line, 1);
    }

    #[test]
    fn test_unnamed_code_blocks_get_default_names() {
        let source = "[Code]\nfloat a;\n[Code]\nfloat b;\n";
        let model = parse(source, "t.shard").unwrap();
        let names: Vec<&str> = model.code_blocks.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["code0", "code1"]);
    }

    #[test]
    fn test_code_block_keeps_name_and_slot_bindings() {
        let source = "[Code]\nname = C\nresGroup1 = Foo\nfloat4 main();\n";
        let model = parse(source, "t.shard").unwrap();
        assert_eq!(model.code_blocks.len(), 1);
        let block = &model.code_blocks[0];
        assert_eq!(block.name, "C");
        assert_eq!(block.group_name(GroupSlot::ResGroup1), Some("Foo"));
        assert!(model.code_text(block).contains("float4 main();"));
    }

    #[test]
    fn test_line_start_boundary_option() {
        let source = "[Code]\nname = C\nint arr[4];\n[[rx::resGroup0()]] float a();\n";
        let options = ParseOptions {
            code_boundary: CodeBoundary::LineStart,
        };
        let model = parse_with_options(source, "t.shard", &options).unwrap();
        let block = model.code_block("C").unwrap();
        assert_eq!(block.local_group(GroupSlot::ResGroup0).len(), 1);
        assert!(model.code_text(block).contains("arr[4]"));
    }
}
