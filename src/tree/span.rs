use std::fmt;

use serde::{Deserialize, Serialize};

/// Byte offsets of a construct in its source file, `start..end`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Zero-width spans carry no position (front-ends emit them for
    /// synthesized nodes).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `inner` lies within `self`. Positionless spans on either
    /// side are accepted.
    pub fn contains(&self, inner: &Span) -> bool {
        if inner.is_empty() || self.is_empty() {
            return true;
        }
        inner.start >= self.start && inner.end <= self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
