//! Resolve and splice every code block of a parsed file

use crate::codegen::{generate, BindingStrategy, Strategy};
use crate::resolve::{resolve_block, BindingTable};
use crate::splice::{restore, splice_body, SpliceOptions};
use serde::Serialize;
use shard_core::{Result, Span};
use shard_parse::{CodeBlock, ShaderFileModel};
use shard_resource::GroupRegistry;

/// A code block with its resolved binding table
#[derive(Debug, Clone)]
pub struct ResolvedBlock<'m> {
    pub block: &'m CodeBlock,
    pub table: BindingTable,
}

/// Rewritten source for one code block under one strategy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplicedBlock {
    pub block: String,
    pub strategy: Strategy,
    /// Spliced body followed by the generated bindings
    pub text: String,
    /// Range of the replayed body within `text`
    pub body: Span,
    /// Commented-out annotation ranges within `text`
    pub commented: Vec<Span>,
}

impl SplicedBlock {
    /// The generated bindings appended after the body
    pub fn generated(&self) -> &str {
        &self.text[self.body.end()..]
    }

    /// Recover the original body text
    pub fn restore(&self) -> String {
        restore(&self.text, self.body, &self.commented)
    }
}

/// Resolve every code block of `model`. Fails if parsing recorded errors.
pub fn resolve_file<'m>(
    model: &'m ShaderFileModel,
    registry: &GroupRegistry,
) -> Result<Vec<ResolvedBlock<'m>>> {
    model.diagnostics.ensure_valid()?;

    model
        .code_blocks
        .iter()
        .map(|block| {
            Ok(ResolvedBlock {
                block,
                table: resolve_block(block, registry)?,
            })
        })
        .collect()
}

/// Splice one resolved block and append its generated bindings
pub fn splice_block(
    model: &ShaderFileModel,
    resolved: &ResolvedBlock<'_>,
    strategy: &dyn BindingStrategy,
    options: SpliceOptions,
) -> Result<SplicedBlock> {
    let spliced = splice_body(resolved.block, &model.source, options)?;
    let generated = generate(&resolved.table, strategy)?;

    let mut text = spliced.text;
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    text.push_str(&generated);

    Ok(SplicedBlock {
        block: resolved.block.name.clone(),
        strategy: strategy.strategy(),
        text,
        body: spliced.body,
        commented: spliced.commented,
    })
}

/// Rewritten source for every code block of `model` under `strategy`
pub fn resolve_and_splice(
    model: &ShaderFileModel,
    registry: &GroupRegistry,
    strategy: Strategy,
    options: SpliceOptions,
) -> Result<Vec<SplicedBlock>> {
    let generator = strategy.generator();
    resolve_file(model, registry)?
        .iter()
        .map(|resolved| splice_block(model, resolved, generator.as_ref(), options))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shard_core::ShardError;
    use shard_parse::parse;

    const SOURCE: &str = "[ResGroup]\nname = Foo\nbaseColor = float4\n\
                          [Code]\nname=C\nresGroup0=Foo\n\
                          [[rx::resGroup0()]] float4 baseColor();\n\
                          float4 main() : SV_Target { return baseColor(); }\n";

    #[test]
    fn test_resolve_and_splice_both_strategies() {
        let model = parse(SOURCE, "test.shard").unwrap();
        let registry = model.group_registry();

        let options = SpliceOptions::default();
        let legacy = resolve_and_splice(&model, &registry, Strategy::Legacy, options).unwrap();
        let bindless = resolve_and_splice(&model, &registry, Strategy::Bindless, options).unwrap();
        assert_eq!(legacy.len(), 1);
        assert_eq!(bindless.len(), 1);

        // Same body, different bindings
        assert_eq!(
            &legacy[0].text[..legacy[0].body.end()],
            &bindless[0].text[..bindless[0].body.end()]
        );
        assert!(legacy[0].generated().contains("rx legacy bindings"));
        assert!(bindless[0].generated().contains("rx bindless bindings"));
        assert_eq!(legacy[0].restore(), model.code_text(&model.code_blocks[0]));
    }

    #[test]
    fn test_parse_errors_abort_resolution() {
        let source = "[Code]\nname=C\n\
                      [[rx::resGroup0()]] float4 a();\n\
                      [[rx::resGroup0()]] float4 a();\n";
        let model = parse(source, "test.shard").unwrap();
        let err = resolve_file(&model, &model.group_registry()).unwrap_err();
        assert!(matches!(err, ShardError::ValidationError { .. }));
    }

    #[test]
    fn test_resolution_error_propagates() {
        let source = SOURCE.replace("float4 baseColor();", "float2 baseColor();");
        let model = parse(&source, "test.shard").unwrap();
        let registry = model.group_registry();
        let err = resolve_and_splice(&model, &registry, Strategy::Legacy, SpliceOptions::default())
            .unwrap_err();
        assert!(err.to_string().contains("baseColor"));
    }

    #[test]
    fn test_unresolved_block_names_are_reported() {
        let model = parse(SOURCE, "test.shard").unwrap();
        let resolved = resolve_file(&model, &model.group_registry()).unwrap();
        assert_eq!(resolved[0].block.name, "C");
        assert_eq!(resolved[0].table.block, "C");
    }
}
