//! Shard Resource - Resource binding model
//!
//! This crate provides the resource side of the shader model:
//! - `ResourceType` / `ResourceKind` - Type table for annotated resources
//! - `ResourceGroup` - Named (global) or anonymous (local) declaration sets
//! - `GroupSlot` - The six binding slots every code block exposes
//! - `GroupRegistry` - File-wide lookup of global groups

mod group;
mod registry;
mod slot;
mod types;

pub use group::{ResourceDeclaration, ResourceGroup};
pub use registry::GroupRegistry;
pub use slot::GroupSlot;
pub use types::{ConstantType, ResourceKind, ResourceType, Scalar, WORD_SIZE};
