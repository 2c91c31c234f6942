//! Model dump command

use super::load_model;
use anyhow::Result;
use shard_binding::{format_json, format_toml, resolve_file, DumpReport};
use shard_build::ShardConfig;

pub fn run(file: &str, format: &str, config: &ShardConfig) -> Result<()> {
    let model = load_model(file, config)?;

    // Binding tables need a valid model; dump what parsed otherwise
    let bindings = if model.diagnostics.is_valid() {
        let registry = model.group_registry();
        resolve_file(&model, &registry)?
            .into_iter()
            .map(|resolved| resolved.table)
            .collect()
    } else {
        log::warn!("{}: {}, skipping binding tables", file, model.diagnostics.summary());
        Vec::new()
    };

    let report = DumpReport::new(&model, bindings);
    let output = match format {
        "json" => format_json(&report),
        "toml" => format_toml(&report),
        _ => anyhow::bail!("Unknown format: {}", format),
    };

    println!("{}", output);

    Ok(())
}
