//! Splice command

use super::load_model;
use anyhow::{Context, Result};
use shard_binding::{resolve_and_splice, Strategy};
use shard_build::ShardConfig;
use std::path::PathBuf;

pub struct SpliceArgs {
    pub file: String,
    pub strategy: String,
    pub out: Option<String>,
}

pub fn run(args: SpliceArgs, config: &ShardConfig) -> Result<()> {
    let strategy: Strategy = args.strategy.parse()?;
    let model = load_model(&args.file, config)?;
    let registry = model.group_registry();

    let blocks = resolve_and_splice(&model, &registry, strategy, config.splice_options())
        .with_context(|| format!("Failed to splice {}", args.file))?;

    match args.out {
        Some(dir) => {
            let dir = PathBuf::from(dir);
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
            for block in &blocks {
                let path = dir.join(format!("{}.{}.hlsl", block.block, block.strategy));
                std::fs::write(&path, &block.text)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("Wrote {}", path.display());
            }
        }
        None => {
            for block in &blocks {
                println!("// {} ({})", block.block, block.strategy);
                println!("{}", block.text);
            }
        }
    }

    Ok(())
}
