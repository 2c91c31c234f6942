//! Binding slots exposed by every code block

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the six resource-group slots of a code block.
///
/// Slots 0-3 are static, the two `DynResGroup` slots are dynamic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GroupSlot {
    ResGroup0,
    ResGroup1,
    ResGroup2,
    ResGroup3,
    DynResGroup0,
    DynResGroup1,
}

impl GroupSlot {
    pub const COUNT: usize = 6;

    pub const ALL: [GroupSlot; GroupSlot::COUNT] = [
        GroupSlot::ResGroup0,
        GroupSlot::ResGroup1,
        GroupSlot::ResGroup2,
        GroupSlot::ResGroup3,
        GroupSlot::DynResGroup0,
        GroupSlot::DynResGroup1,
    ];

    /// Position in [`GroupSlot::ALL`], also the push-constant index of the slot
    pub fn index(self) -> usize {
        self as usize
    }

    /// Key used both in `[Code]` bindings and in `rx::` annotations
    pub fn key(self) -> &'static str {
        match self {
            GroupSlot::ResGroup0 => "resGroup0",
            GroupSlot::ResGroup1 => "resGroup1",
            GroupSlot::ResGroup2 => "resGroup2",
            GroupSlot::ResGroup3 => "resGroup3",
            GroupSlot::DynResGroup0 => "dynResGroup0",
            GroupSlot::DynResGroup1 => "dynResGroup1",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.key() == key)
    }

    pub fn is_dynamic(self) -> bool {
        matches!(self, GroupSlot::DynResGroup0 | GroupSlot::DynResGroup1)
    }
}

impl fmt::Display for GroupSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
