//! Byte spans into an immutable source buffer

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// A byte range (`start..start + len`) into a source buffer
#[derive(Clone, Copy, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub len: usize,
}

impl Span {
    /// Create a span from a start offset and a length
    pub fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    /// Create a span covering `start..end`
    pub fn from_range(start: usize, end: usize) -> Self {
        Self {
            start,
            len: end.saturating_sub(start),
        }
    }

    /// Exclusive end offset
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }

    /// Smallest span covering both `self` and `other`
    pub fn join(&self, other: Span) -> Span {
        Span::from_range(self.start.min(other.start), self.end().max(other.end()))
    }

    /// Slice the covered text out of `source`
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.range()).unwrap_or("")
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Span({}..{})", self.start, self.end())
    }
}
