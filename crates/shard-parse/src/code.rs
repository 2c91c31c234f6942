//! Per-code-block model

use crate::annotation::{Annotation, ReplaceSpan};
use serde::Serialize;
use shard_core::{Diagnostics, Span};
use shard_resource::{GroupRegistry, GroupSlot, ResourceGroup};

/// A `[Code]` section after annotation scanning
#[derive(Debug, Clone, Serialize)]
pub struct CodeBlock {
    pub name: String,
    /// Byte range of the code body in the file
    pub span: Span,
    /// Line of the first body line, used to pad generated text for diagnostics
    pub line_offset: u32,
    /// Global group name bound to each slot; empty when unbound
    pub group_names: [String; GroupSlot::COUNT],
    /// Groups built from this block's own annotations
    pub local_groups: [ResourceGroup; GroupSlot::COUNT],
    /// Annotation ranges to comment out, in source order
    pub replace_spans: Vec<ReplaceSpan>,
}

/// The group a slot resolves to
#[derive(Debug, Clone, Copy)]
pub enum SlotBinding<'a> {
    /// Shared reference to a global group
    Global(&'a ResourceGroup),
    /// The block's own anonymous group
    Local(&'a ResourceGroup),
}

impl<'a> SlotBinding<'a> {
    pub fn group(&self) -> &'a ResourceGroup {
        match self {
            SlotBinding::Global(group) | SlotBinding::Local(group) => group,
        }
    }

    pub fn is_global(&self) -> bool {
        matches!(self, SlotBinding::Global(_))
    }
}

impl CodeBlock {
    pub fn new(name: impl Into<String>, span: Span, line_offset: u32) -> Self {
        Self {
            name: name.into(),
            span,
            line_offset,
            group_names: Default::default(),
            local_groups: Default::default(),
            replace_spans: Vec::new(),
        }
    }

    /// Record scanned annotations into the local groups.
    ///
    /// Every annotation is commented out during splicing, but declarations that
    /// fail (duplicate name, unknown constant type) are dropped and reported.
    pub fn add_annotations(&mut self, annotations: Vec<Annotation>, diagnostics: &mut Diagnostics) {
        for annotation in annotations {
            self.replace_spans.push(annotation.span);
            let group = &mut self.local_groups[annotation.slot.index()];
            if let Err(err) = group.declare(&annotation.name, &annotation.type_name) {
                diagnostics.error(
                    annotation.line,
                    format!("code block {}, {}: {}", self.name, annotation.slot, err),
                );
            }
        }
    }

    /// Global group name bound to `slot`, if any
    pub fn group_name(&self, slot: GroupSlot) -> Option<&str> {
        let name = self.group_names[slot.index()].as_str();
        (!name.is_empty()).then_some(name)
    }

    pub fn local_group(&self, slot: GroupSlot) -> &ResourceGroup {
        &self.local_groups[slot.index()]
    }

    /// Resolve the group bound to `slot`: the named global group when it
    /// exists in `registry`, otherwise this block's local group
    pub fn binding<'a>(&'a self, slot: GroupSlot, registry: &'a GroupRegistry) -> SlotBinding<'a> {
        match self.group_name(slot).and_then(|name| registry.get(name)) {
            Some(global) => SlotBinding::Global(global),
            None => SlotBinding::Local(self.local_group(slot)),
        }
    }

    /// The body text within `source`
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        self.span.text(source)
    }
}
