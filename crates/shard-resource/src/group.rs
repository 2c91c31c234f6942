//! Resource declarations and groups

use crate::types::{ResourceKind, ResourceType};
use serde::{Deserialize, Serialize};
use shard_core::{Result, ShardError};

/// A single declared resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDeclaration {
    pub name: String,
    /// Shading-language type token, e.g. `float4` or `Texture2D`
    pub type_name: String,
    pub kind: ResourceKind,
    pub byte_size: u32,
    /// Index within the group's list for this kind
    pub slot: u32,
}

/// A collection of constant, texture and sampler declarations bound as one unit.
///
/// A named group is global: declared once by a `[ResGroup]` section and shared
/// by reference. An unnamed group is local to one code block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceGroup {
    pub name: String,
    pub constants: Vec<ResourceDeclaration>,
    pub textures: Vec<ResourceDeclaration>,
    pub samplers: Vec<ResourceDeclaration>,
}

impl ResourceGroup {
    /// Create a global group
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Create an anonymous group owned by one code block
    pub fn local() -> Self {
        Self::default()
    }

    pub fn is_local(&self) -> bool {
        self.name.is_empty()
    }

    /// Name used in diagnostics
    pub fn display_name(&self) -> &str {
        if self.is_local() {
            "<local>"
        } else {
            &self.name
        }
    }

    /// Declare a resource, classifying its kind and size from `type_name`.
    ///
    /// Fails on an unknown constant type or a name already used in the group;
    /// the group is left unchanged in both cases.
    pub fn declare(&mut self, name: &str, type_name: &str) -> Result<&ResourceDeclaration> {
        let resource_type =
            ResourceType::parse(type_name).ok_or_else(|| ShardError::UnknownConstantType {
                name: name.to_string(),
                type_name: type_name.to_string(),
            })?;
        let kind = resource_type.kind();

        if self.find_any(name).is_some() {
            return Err(ShardError::DuplicateResource {
                group: self.display_name().to_string(),
                kind: kind.to_string(),
                name: name.to_string(),
            });
        }

        let list = self.list_mut(kind);
        list.push(ResourceDeclaration {
            name: name.to_string(),
            type_name: type_name.to_string(),
            kind,
            byte_size: resource_type.byte_size(),
            slot: list.len() as u32,
        });
        Ok(&list[list.len() - 1])
    }

    /// Declarations of one kind, in declaration order
    pub fn declarations(&self, kind: ResourceKind) -> &[ResourceDeclaration] {
        match kind {
            ResourceKind::Constant => &self.constants,
            ResourceKind::Texture => &self.textures,
            ResourceKind::Sampler => &self.samplers,
        }
    }

    fn list_mut(&mut self, kind: ResourceKind) -> &mut Vec<ResourceDeclaration> {
        match kind {
            ResourceKind::Constant => &mut self.constants,
            ResourceKind::Texture => &mut self.textures,
            ResourceKind::Sampler => &mut self.samplers,
        }
    }

    /// Find a declaration by kind then name
    pub fn find(&self, kind: ResourceKind, name: &str) -> Option<&ResourceDeclaration> {
        self.declarations(kind).iter().find(|d| d.name == name)
    }

    /// Find a declaration of any kind by name
    pub fn find_any(&self, name: &str) -> Option<&ResourceDeclaration> {
        self.iter().find(|d| d.name == name)
    }

    /// All declarations: constants, then textures, then samplers
    pub fn iter(&self) -> impl Iterator<Item = &ResourceDeclaration> {
        self.constants
            .iter()
            .chain(self.textures.iter())
            .chain(self.samplers.iter())
    }

    pub fn len(&self) -> usize {
        self.constants.len() + self.textures.len() + self.samplers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declare_classifies_kinds() {
        let mut group = ResourceGroup::named("Foo");
        group.declare("baseColor", "float4").unwrap();
        group.declare("albedo", "Texture2D").unwrap();
        group.declare("linear", "SamplerState").unwrap();
        group.declare("roughness", "float").unwrap();

        assert_eq!(group.constants.len(), 2);
        assert_eq!(group.textures.len(), 1);
        assert_eq!(group.samplers.len(), 1);
        assert_eq!(group.find(ResourceKind::Constant, "baseColor").unwrap().byte_size, 16);
        assert_eq!(group.find(ResourceKind::Constant, "roughness").unwrap().slot, 1);
        assert!(group.find(ResourceKind::Texture, "baseColor").is_none());
    }

    #[test]
    fn test_duplicate_is_rejected_and_first_kept() {
        let mut group = ResourceGroup::local();
        group.declare("tex", "Texture2D").unwrap();
        group.declare("other", "Texture2D").unwrap();

        let err = group.declare("tex", "Texture2D").unwrap_err();
        assert!(matches!(err, ShardError::DuplicateResource { ref name, .. } if name == "tex"));

        assert_eq!(group.textures.len(), 2);
        assert_eq!(group.find(ResourceKind::Texture, "tex").unwrap().slot, 0);
        assert_eq!(group.find(ResourceKind::Texture, "other").unwrap().slot, 1);
    }

    #[test]
    fn test_duplicate_across_kinds_is_rejected() {
        let mut group = ResourceGroup::named("Foo");
        group.declare("shadow", "Texture2D").unwrap();
        assert!(group.declare("shadow", "SamplerState").is_err());
        assert!(group.samplers.is_empty());
    }

    #[test]
    fn test_unknown_constant_type() {
        let mut group = ResourceGroup::local();
        let err = group.declare("m", "float4x4").unwrap_err();
        assert!(matches!(err, ShardError::UnknownConstantType { .. }));
        assert!(group.is_empty());
    }

    #[test]
    fn test_display_name() {
        assert_eq!(ResourceGroup::local().display_name(), "<local>");
        assert_eq!(ResourceGroup::named("Scene").display_name(), "Scene");
    }
}
