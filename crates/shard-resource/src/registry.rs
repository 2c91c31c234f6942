//! Registry of global resource groups

use crate::group::ResourceGroup;
use serde::Serialize;
use std::collections::BTreeMap;

/// File-wide lookup of named resource groups.
///
/// Built once after a whole file has been parsed, then only read.
#[derive(Debug, Default, Serialize)]
pub struct GroupRegistry {
    groups: BTreeMap<String, ResourceGroup>,
}

impl GroupRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a global group. Returns the group it replaced, if any.
    pub fn register(&mut self, group: ResourceGroup) -> Option<ResourceGroup> {
        let previous = self.groups.insert(group.name.clone(), group);
        if let Some(prev) = &previous {
            log::debug!("Resource group '{}' redefined", prev.name);
        }
        previous
    }

    /// Get a group by name. Empty names never match.
    pub fn get(&self, name: &str) -> Option<&ResourceGroup> {
        if name.is_empty() {
            return None;
        }
        self.groups.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// List all group names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.groups.keys().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_get() {
        let mut registry = GroupRegistry::new();
        let mut group = ResourceGroup::named("Foo");
        group.declare("baseColor", "float4").unwrap();
        assert!(registry.register(group).is_none());

        assert!(registry.contains("Foo"));
        assert_eq!(registry.get("Foo").unwrap().len(), 1);
        assert!(registry.get("Bar").is_none());
        assert!(registry.get("").is_none());
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = GroupRegistry::new();
        registry.register(ResourceGroup::named("Foo"));

        let mut replacement = ResourceGroup::named("Foo");
        replacement.declare("x", "float").unwrap();
        let previous = registry.register(replacement).unwrap();

        assert!(previous.is_empty());
        assert_eq!(registry.get("Foo").unwrap().len(), 1);
        assert_eq!(registry.names(), vec!["Foo"]);
    }
}
