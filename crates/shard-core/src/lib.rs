//! Shard Core - Foundational types for the Shard shader front-end
//!
//! This crate provides the types that all other Shard crates depend on:
//! - `Span` - Byte ranges into a source buffer
//! - `Diagnostics` - Collected warnings and errors for one input file
//! - Error types and Result alias

mod diagnostic;
mod error;
mod span;

pub use diagnostic::{Diagnostic, Diagnostics, Severity};
pub use error::{Result, ShardError};
pub use span::Span;
