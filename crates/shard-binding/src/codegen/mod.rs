//! Binding code generation strategies

mod bindless;
mod legacy;

pub use bindless::Bindless;
pub use legacy::Legacy;

use crate::resolve::{BindingTable, ResolvedResource, ResolvedSlot};
use serde::{Deserialize, Serialize};
use shard_core::{Result, ShardError};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Emits the declarations and accessor functions that stand in for the
/// commented-out annotations of a code block
pub trait BindingStrategy {
    fn strategy(&self) -> Strategy;

    /// Generated text for one resolved block
    fn emit(&self, table: &BindingTable) -> Result<String>;
}

/// Available binding models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Per-slot constant buffers and register-bound textures and samplers
    Legacy,
    /// Indices into global descriptor arrays, read from byte-address buffers
    Bindless,
}

impl Strategy {
    pub const ALL: [Strategy; 2] = [Strategy::Legacy, Strategy::Bindless];

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Legacy => "legacy",
            Strategy::Bindless => "bindless",
        }
    }

    pub fn generator(self) -> Box<dyn BindingStrategy> {
        match self {
            Strategy::Legacy => Box::new(Legacy),
            Strategy::Bindless => Box::new(Bindless),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = ShardError;

    fn from_str(s: &str) -> Result<Self> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ShardError::ConfigError(format!("Unknown binding strategy: {}", s)))
    }
}

/// Generate binding text for `table`.
///
/// Accessors share one namespace, so a resource name used in more than one
/// slot of the same block is rejected.
pub fn generate(table: &BindingTable, strategy: &dyn BindingStrategy) -> Result<String> {
    check_accessor_names(table)?;
    let text = strategy.emit(table)?;
    log::debug!(
        "{}: generated {} byte(s) of {} bindings",
        table.block,
        text.len(),
        strategy.strategy()
    );
    Ok(text)
}

fn check_accessor_names(table: &BindingTable) -> Result<()> {
    let mut seen: BTreeMap<&str, &ResolvedSlot> = BTreeMap::new();
    for (slot, resource) in table.iter() {
        if let Some(previous) = seen.insert(&resource.name, slot) {
            return Err(ShardError::SpliceError {
                block: table.block.clone(),
                message: format!(
                    "accessor `{}` is declared in both {} and {}",
                    resource.name, previous.slot, slot.slot
                ),
            });
        }
    }
    Ok(())
}

/// Symbol of a resource in generated declarations
fn symbol(slot: &ResolvedSlot, resource: &ResolvedResource) -> String {
    format!("rx_{}_{}", slot.slot.key(), resource.name)
}
