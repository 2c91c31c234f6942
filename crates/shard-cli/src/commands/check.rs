//! Shader file check command

use super::load_model;
use anyhow::Result;
use shard_binding::resolve_file;
use shard_build::ShardConfig;
use shard_core::Severity;

pub fn run(file: &str, config: &ShardConfig) -> Result<()> {
    let model = load_model(file, config)?;

    for diagnostic in &model.diagnostics.entries {
        match diagnostic.severity {
            Severity::Error => eprintln!("{}", diagnostic),
            _ => println!("{}", diagnostic),
        }
    }

    if !model.diagnostics.is_valid() {
        eprintln!("\n{}", model.diagnostics.summary());
        std::process::exit(1);
    }

    let registry = model.group_registry();
    let resolved = match resolve_file(&model, &registry) {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("{}: {}", file, e);
            std::process::exit(1);
        }
    };

    println!(
        "{}: {} code block(s), {} resource group(s), {} render program(s)",
        file,
        model.code_blocks.len(),
        model.resource_groups.len(),
        model.render_programs.len()
    );
    for block in &resolved {
        let bound = block.table.slots.iter().filter(|s| !s.is_empty()).count();
        let resources = block.table.iter().count();
        println!(
            "  {}: {} resource(s) across {} slot(s)",
            block.block.name, resources, bound
        );
    }
    println!("{}", model.diagnostics.summary());

    Ok(())
}
