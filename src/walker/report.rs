//! In-memory result of one walk.
//!
//! The walker defines only the shape; rendering to tables or JSON lives
//! with the caller.

use std::fmt;

use serde::Serialize;

use crate::error::{AnalysisError, Result};
use crate::rules::RuleKind;
use crate::tree::Span;

/// Complexity level classification (SonarQube cognitive thresholds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityLevel {
    Simple,
    Moderate,
    Complex,
    VeryComplex,
    Extreme,
}

impl ComplexityLevel {
    /// Map a numeric complexity value to a level classification.
    pub fn from_complexity(c: usize) -> Self {
        match c {
            0..=4 => Self::Simple,
            5..=9 => Self::Moderate,
            10..=14 => Self::Complex,
            15..=24 => Self::VeryComplex,
            _ => Self::Extreme,
        }
    }

    /// Human-readable label for display in reports and JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Moderate => "moderate",
            Self::Complex => "complex",
            Self::VeryComplex => "very complex",
            Self::Extreme => "extreme",
        }
    }
}

/// Why a trace entry exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    /// Branch, loop, match or other priced construct at depth 0.
    Structure,
    /// Same, with a depth surcharge.
    NestedStructure,
    /// Arm priced by its pattern alone.
    Arm,
    /// Arm or conditional carrying a guard.
    Guarded,
    /// Or-pattern priced as an `or` chain.
    AlternativesSequence,
    /// Standalone boolean chain.
    BooleanSequence,
    /// Subtree skipped as malformed; never carries points.
    Malformed,
}

impl Reason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Structure => "structure",
            Self::NestedStructure => "nested structure",
            Self::Arm => "arm",
            Self::Guarded => "guarded",
            Self::AlternativesSequence => "alternatives sequence",
            Self::BooleanSequence => "boolean sequence",
            Self::Malformed => "malformed",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an increment's points came from. Sums to the entry's increment.
///
/// All arithmetic on points saturates at `usize::MAX`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Breakdown {
    pub base: usize,
    pub nesting: usize,
    pub guard: usize,
    pub boolean: usize,
}

impl Breakdown {
    pub fn total(&self) -> usize {
        self.base
            .saturating_add(self.nesting)
            .saturating_add(self.guard)
            .saturating_add(self.boolean)
    }
}

/// One contributing node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceEntry {
    /// Pre-order position of the node in the tree.
    pub index: usize,
    pub kind: &'static str,
    pub span: Span,
    pub increment: usize,
    /// Nesting depth the node was evaluated at.
    pub depth: usize,
    pub rule: Option<RuleKind>,
    pub reason: Reason,
    pub breakdown: Breakdown,
    /// Innermost enclosing function, as an index into `functions`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<usize>,
}

/// Per-function share of the total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionSummary {
    pub name: String,
    pub span: Span,
    pub complexity: usize,
    pub level: ComplexityLevel,
}

/// A subtree that could not be scored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub index: usize,
    pub span: Span,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplexityReport {
    pub total: usize,
    pub level: ComplexityLevel,
    pub max_depth: usize,
    pub trace: Vec<TraceEntry>,
    pub functions: Vec<FunctionSummary>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ComplexityReport {
    /// Whether some subtree was skipped.
    pub fn is_partial(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Entries that actually carry points.
    pub fn increments(&self) -> impl Iterator<Item = &TraceEntry> {
        self.trace.iter().filter(|e| e.increment > 0)
    }

    /// Fail on the first skipped subtree instead of returning a partial score.
    pub fn into_strict(self) -> Result<Self> {
        match self.diagnostics.first() {
            Some(d) => Err(AnalysisError::MalformedTree {
                span: d.span,
                reason: d.reason.clone(),
            }),
            None => Ok(self),
        }
    }
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
