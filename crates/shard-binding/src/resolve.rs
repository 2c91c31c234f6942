//! Binding resolution: reconcile code-block usage with referenced groups

use serde::Serialize;
use shard_core::{Result, ShardError};
use shard_parse::CodeBlock;
use shard_resource::{GroupRegistry, GroupSlot, ResourceDeclaration, ResourceKind, WORD_SIZE};

/// A declaration with its assigned location
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedResource {
    pub name: String,
    pub type_name: String,
    pub kind: ResourceKind,
    pub byte_size: u32,
    /// Byte offset within the group's constant data; zero for textures and samplers
    pub offset: u32,
    /// Sequential index per kind within the group
    pub slot: u32,
    /// Whether the code block itself annotated this resource
    pub used: bool,
}

/// Resolved layout of one group slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSlot {
    pub slot: GroupSlot,
    /// Global group bound to the slot, `None` for a local group
    pub group_name: Option<String>,
    pub constants: Vec<ResolvedResource>,
    pub textures: Vec<ResolvedResource>,
    pub samplers: Vec<ResolvedResource>,
    /// Sum of all constant sizes
    pub constant_bytes: u32,
}

impl ResolvedSlot {
    fn new(slot: GroupSlot, group_name: Option<String>) -> Self {
        Self {
            slot,
            group_name,
            constants: Vec::new(),
            textures: Vec::new(),
            samplers: Vec::new(),
            constant_bytes: 0,
        }
    }

    pub fn resources(&self, kind: ResourceKind) -> &[ResolvedResource] {
        match kind {
            ResourceKind::Constant => &self.constants,
            ResourceKind::Texture => &self.textures,
            ResourceKind::Sampler => &self.samplers,
        }
    }

    /// Constants, then textures, then samplers
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedResource> {
        self.constants
            .iter()
            .chain(self.textures.iter())
            .chain(self.samplers.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.constants.is_empty() && self.textures.is_empty() && self.samplers.is_empty()
    }

    /// Word position of a resource in the group's data: constant words first,
    /// then one index word per texture, then one per sampler
    pub fn data_word(&self, resource: &ResolvedResource) -> u32 {
        let constant_words = self.constant_bytes / WORD_SIZE;
        match resource.kind {
            ResourceKind::Constant => resource.offset / WORD_SIZE,
            ResourceKind::Texture => constant_words + resource.slot,
            ResourceKind::Sampler => constant_words + self.textures.len() as u32 + resource.slot,
        }
    }

    /// Total words of group data
    pub fn data_words(&self) -> u32 {
        self.constant_bytes / WORD_SIZE + (self.textures.len() + self.samplers.len()) as u32
    }

    fn push(&mut self, decl: &ResourceDeclaration, used: bool) {
        let mut resource = ResolvedResource {
            name: decl.name.clone(),
            type_name: decl.type_name.clone(),
            kind: decl.kind,
            byte_size: decl.byte_size,
            offset: 0,
            slot: 0,
            used,
        };
        match decl.kind {
            ResourceKind::Constant => {
                resource.offset = self.constant_bytes;
                resource.slot = self.constants.len() as u32;
                self.constant_bytes += decl.byte_size;
                self.constants.push(resource);
            }
            ResourceKind::Texture => {
                resource.slot = self.textures.len() as u32;
                self.textures.push(resource);
            }
            ResourceKind::Sampler => {
                resource.slot = self.samplers.len() as u32;
                self.samplers.push(resource);
            }
        }
    }
}

/// Offset and slot table for all six slots of one code block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BindingTable {
    pub block: String,
    pub slots: Vec<ResolvedSlot>,
}

impl BindingTable {
    pub fn slot(&self, slot: GroupSlot) -> &ResolvedSlot {
        &self.slots[slot.index()]
    }

    /// Look up a resolved resource by (slot, kind, name)
    pub fn lookup(
        &self,
        slot: GroupSlot,
        kind: ResourceKind,
        name: &str,
    ) -> Option<&ResolvedResource> {
        self.slot(slot).resources(kind).iter().find(|r| r.name == name)
    }

    /// Every resolved resource with its slot
    pub fn iter(&self) -> impl Iterator<Item = (&ResolvedSlot, &ResolvedResource)> {
        self.slots
            .iter()
            .flat_map(|slot| slot.iter().map(move |resource| (slot, resource)))
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(ResolvedSlot::is_empty)
    }
}

/// Resolve all six slots of a code block against the global registry.
///
/// A slot bound to an existing global group takes its layout from that group;
/// the block's own annotations must then match it by kind, name and type.
/// Otherwise the slot's layout comes from the block's local declarations.
pub fn resolve_block(block: &CodeBlock, registry: &GroupRegistry) -> Result<BindingTable> {
    let mut slots = Vec::with_capacity(GroupSlot::COUNT);

    for slot in GroupSlot::ALL {
        let binding = block.binding(slot, registry);
        let referenced = binding.group();
        let local = block.local_group(slot);
        let group_label = if binding.is_global() {
            referenced.name.clone()
        } else {
            format!("{}.{}", block.name, slot)
        };

        let mut resolved = ResolvedSlot::new(
            slot,
            binding.is_global().then(|| referenced.name.clone()),
        );

        for kind in ResourceKind::ALL {
            for decl in referenced.declarations(kind) {
                let used = match local.find(kind, &decl.name) {
                    Some(usage) if usage.type_name != decl.type_name => {
                        return Err(ShardError::TypeMismatch {
                            group: group_label,
                            name: decl.name.clone(),
                            expected: decl.type_name.clone(),
                            found: usage.type_name.clone(),
                        });
                    }
                    Some(_) => true,
                    None => !binding.is_global(),
                };
                resolved.push(decl, used);
            }
        }

        if binding.is_global() {
            for usage in local.iter() {
                if referenced.find(usage.kind, &usage.name).is_some() {
                    continue;
                }
                return Err(match referenced.find_any(&usage.name) {
                    Some(decl) => ShardError::TypeMismatch {
                        group: group_label,
                        name: usage.name.clone(),
                        expected: decl.type_name.clone(),
                        found: usage.type_name.clone(),
                    },
                    None => ShardError::UndeclaredResource {
                        group: group_label,
                        name: usage.name.clone(),
                    },
                });
            }
        }

        log::debug!(
            "{}: {} -> {} ({} constant byte(s), {} texture(s), {} sampler(s))",
            block.name,
            slot,
            if binding.is_global() { referenced.name.as_str() } else { "<local>" },
            resolved.constant_bytes,
            resolved.textures.len(),
            resolved.samplers.len()
        );
        slots.push(resolved);
    }

    Ok(BindingTable {
        block: block.name.clone(),
        slots,
    })
}
