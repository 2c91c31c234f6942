//! Shard CLI - Command-line interface for Shard shader files

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{check, dump, splice};
use shard_build::ShardConfig;

#[derive(Parser)]
#[command(name = "shard")]
#[command(about = "Shader resource binding preprocessor", long_about = None)]
#[command(version)]
struct Cli {
    /// Log pass progress (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Code boundary rule: literal or line-start
    #[arg(long, global = true, value_parser = parse_boundary)]
    code_boundary: Option<shard_parse::CodeBoundary>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and resolve a shader file, reporting diagnostics
    Check {
        /// Path to shader file
        file: String,
    },

    /// Write rewritten source for every code block
    Splice {
        /// Path to shader file
        file: String,

        /// Binding strategy (legacy or bindless)
        #[arg(long, default_value = "legacy")]
        strategy: String,

        /// Output directory; prints to stdout when omitted
        #[arg(long)]
        out: Option<String>,

        /// Pad output so line numbers match the shader file
        #[arg(long)]
        pad_lines: bool,
    },

    /// Print the parsed model and binding tables
    Dump {
        /// Path to shader file
        file: String,

        /// Output format (json or toml)
        #[arg(long, default_value = "json")]
        format: String,
    },
}

fn parse_boundary(s: &str) -> Result<shard_parse::CodeBoundary, String> {
    shard_build::parse_code_boundary(s).map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let mut config = ShardConfig::load()?;
    if let Some(boundary) = cli.code_boundary {
        config.parse.code_boundary = boundary;
    }

    match cli.command {
        Commands::Check { file } => check::run(&file, &config),
        Commands::Splice {
            file,
            strategy,
            out,
            pad_lines,
        } => {
            if pad_lines {
                config.codegen.pad_lines = true;
            }
            splice::run(
                splice::SpliceArgs {
                    file,
                    strategy,
                    out,
                },
                &config,
            )
        }
        Commands::Dump { file, format } => dump::run(&file, &format, &config),
    }
}
