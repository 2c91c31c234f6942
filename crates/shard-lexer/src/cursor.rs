//! Scan position within a source buffer

use serde::{Deserialize, Serialize};

/// A position in the source: byte offset plus 1-based line and column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    pub offset: usize,
    pub line: u32,
    pub column: u32,
}

impl Cursor {
    /// Cursor at the beginning of a buffer
    pub fn start() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn new(offset: usize, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::start()
    }
}
