//! Shard Binding - Resource binding and source rewriting
//!
//! Takes a parsed shader file and produces compiler-ready source:
//! - `resolve_block` - Offset and slot tables per code block
//! - `splice_body` - Comment out annotations, preserving every other byte
//! - `BindingStrategy` - Legacy register or bindless accessor generation
//! - `resolve_and_splice` - The whole pass over a file

pub mod codegen;
mod output;
mod pipeline;
mod resolve;
mod splice;

pub use codegen::{generate, Bindless, BindingStrategy, Legacy, Strategy};
pub use output::{format_json, format_toml, DumpReport};
pub use pipeline::{resolve_and_splice, resolve_file, splice_block, ResolvedBlock, SplicedBlock};
pub use resolve::{resolve_block, BindingTable, ResolvedResource, ResolvedSlot};
pub use splice::{splice_body, SpliceOptions, SplicedBody};
