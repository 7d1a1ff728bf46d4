//! Declarative scoring rules keyed by node kind and context.
//!
//! The walker never hardcodes a cost: every increment it emits comes from
//! a `RuleEntry` looked up here and priced with the table-wide
//! `NestingFormula`. Kinds with no entry cost nothing.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};
use crate::tree::{NodeKind, Pattern, SyntaxNode};

/// Deepest nesting the walker scores before treating a subtree as malformed.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Rule key: a node kind, refined by context where the cost depends on it
/// (match arms are priced by pattern shape and guard).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Function,
    Conditional,
    Loop,
    Catch,
    Ternary,
    Match,
    /// Unguarded arm matching a single value.
    MatchArm,
    /// Arm whose pattern lists several alternatives.
    OrPatternArm,
    /// Unguarded catch-all arm.
    WildcardArm,
    /// Arm selected by a guard rather than by an or-pattern.
    GuardedArm,
    /// Penalty for a guard attached to an arm or conditional.
    Guard,
    /// One unit per operator run in a boolean sequence.
    BooleanOp,
    Other,
}

impl RuleKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Conditional => "conditional",
            Self::Loop => "loop",
            Self::Catch => "catch",
            Self::Ternary => "ternary",
            Self::Match => "match",
            Self::MatchArm => "match_arm",
            Self::OrPatternArm => "or_pattern_arm",
            Self::WildcardArm => "wildcard_arm",
            Self::GuardedArm => "guarded_arm",
            Self::Guard => "guard",
            Self::BooleanOp => "boolean_op",
            Self::Other => "other",
        }
    }

    /// The rule that prices a node's own structure, if its kind has one.
    ///
    /// Boolean operators and guards are priced by the collapser and the
    /// owning construct respectively, so they resolve here too but the
    /// walker decides when to charge them.
    pub fn for_node(node: &SyntaxNode) -> Option<Self> {
        match &node.kind {
            NodeKind::Function { .. } => Some(Self::Function),
            NodeKind::Conditional { .. } => Some(Self::Conditional),
            NodeKind::Loop => Some(Self::Loop),
            NodeKind::Catch => Some(Self::Catch),
            NodeKind::Ternary => Some(Self::Ternary),
            NodeKind::Match { .. } => Some(Self::Match),
            NodeKind::MatchArm { pattern, guard } => Some(Self::for_arm(*pattern, guard.is_some())),
            NodeKind::BooleanOp { .. } => Some(Self::BooleanOp),
            NodeKind::Other { .. } => Some(Self::Other),
            NodeKind::Unrecognized => None,
        }
    }

    /// Classify an arm. Or-patterns keep their own rule when guarded; any
    /// other guarded arm is a `GuardedArm`.
    pub fn for_arm(pattern: Pattern, guarded: bool) -> Self {
        match (pattern, guarded) {
            (Pattern::Alternatives { .. }, _) => Self::OrPatternArm,
            (_, true) => Self::GuardedArm,
            (Pattern::Wildcard, false) => Self::WildcardArm,
            (Pattern::Single, false) => Self::MatchArm,
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scoring rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleEntry {
    pub kind: RuleKind,
    pub base_increment: usize,
    pub nesting_sensitive: bool,
    /// Function boundaries only: score the body from depth 0 instead of
    /// inheriting the enclosing depth.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub resets_depth: bool,
}

impl RuleEntry {
    pub const fn new(kind: RuleKind, base_increment: usize, nesting_sensitive: bool) -> Self {
        Self {
            kind,
            base_increment,
            nesting_sensitive,
            resets_depth: false,
        }
    }
}

/// How depth feeds into nesting-sensitive rules. Fixed for the whole table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NestingFormula {
    /// `units * base + depth`
    #[default]
    Additive,
    /// `units * base * (depth + 1)`. Scaling by `depth + 1` rather than
    /// `depth` keeps top-level constructs at their base cost instead of 0;
    /// the extra `base * depth` is the nesting share.
    Multiplicative,
}

/// A priced rule application, split so callers can report where the
/// points came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Charge {
    pub base: usize,
    pub nesting: usize,
}

impl Charge {
    pub fn total(self) -> usize {
        self.base.saturating_add(self.nesting)
    }
}

/// Immutable rule set shared by every walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    entries: Vec<RuleEntry>,
    formula: NestingFormula,
    max_depth: usize,
    alternatives_as_boolean: bool,
}

static DEFAULT_RULES: [RuleEntry; 12] = [
    RuleEntry {
        kind: RuleKind::Function,
        base_increment: 0,
        nesting_sensitive: false,
        resets_depth: true,
    },
    RuleEntry::new(RuleKind::Conditional, 1, true),
    RuleEntry::new(RuleKind::Loop, 1, true),
    RuleEntry::new(RuleKind::Catch, 1, true),
    RuleEntry::new(RuleKind::Ternary, 1, true),
    RuleEntry::new(RuleKind::Match, 0, false),
    RuleEntry::new(RuleKind::MatchArm, 0, false),
    RuleEntry::new(RuleKind::OrPatternArm, 1, false),
    RuleEntry::new(RuleKind::WildcardArm, 0, false),
    RuleEntry::new(RuleKind::GuardedArm, 1, false),
    RuleEntry::new(RuleKind::Guard, 1, false),
    RuleEntry::new(RuleKind::BooleanOp, 1, false),
];

impl Default for RuleTable {
    fn default() -> Self {
        Self {
            entries: DEFAULT_RULES.to_vec(),
            formula: NestingFormula::Additive,
            max_depth: DEFAULT_MAX_DEPTH,
            alternatives_as_boolean: false,
        }
    }
}

impl RuleTable {
    /// Build a table, rejecting duplicate kinds and a zero depth limit.
    pub fn new(entries: Vec<RuleEntry>, formula: NestingFormula, max_depth: usize) -> Result<Self> {
        for (i, entry) in entries.iter().enumerate() {
            if entries[..i].iter().any(|e| e.kind == entry.kind) {
                return Err(AnalysisError::Config(format!(
                    "duplicate rule for kind `{}`",
                    entry.kind
                )));
            }
        }
        if max_depth == 0 {
            return Err(AnalysisError::Config("max_depth must be at least 1".into()));
        }
        Ok(Self {
            entries,
            formula,
            max_depth,
            alternatives_as_boolean: false,
        })
    }

    /// Price or-pattern arms as an `or` chain through the boolean rule
    /// instead of the `or_pattern_arm` rule.
    pub fn with_alternatives_as_boolean(mut self, enabled: bool) -> Self {
        self.alternatives_as_boolean = enabled;
        self
    }

    pub fn lookup(&self, kind: RuleKind) -> Option<&RuleEntry> {
        self.entries.iter().find(|e| e.kind == kind)
    }

    pub fn entries(&self) -> &[RuleEntry] {
        &self.entries
    }

    pub fn formula(&self) -> NestingFormula {
        self.formula
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn alternatives_as_boolean(&self) -> bool {
        self.alternatives_as_boolean
    }

    /// Whether a function boundary opens its body at depth 0.
    pub fn function_resets_depth(&self) -> bool {
        self.lookup(RuleKind::Function).is_some_and(|e| e.resets_depth)
    }

    /// Price `units` applications of `kind` at `depth`.
    ///
    /// Returns `None` when the kind has no rule or nothing is charged.
    pub fn charge(&self, kind: RuleKind, units: usize, depth: usize) -> Option<Charge> {
        let entry = self.lookup(kind)?;
        if units == 0 {
            return None;
        }
        let base = units.saturating_mul(entry.base_increment);
        let nesting = if entry.nesting_sensitive {
            match self.formula {
                NestingFormula::Additive => depth,
                NestingFormula::Multiplicative => base.saturating_mul(depth),
            }
        } else {
            0
        };
        let charge = Charge { base, nesting };
        (charge.total() > 0).then_some(charge)
    }
}

#[cfg(test)]
#[path = "table_test.rs"]
mod tests;
