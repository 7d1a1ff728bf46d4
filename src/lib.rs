//! Structural complexity scoring over language-agnostic syntax trees.
//!
//! A front end hands over a [`SyntaxNode`] tree; [`walk`] prices it
//! against a [`RuleTable`] and returns a [`ComplexityReport`] with the
//! total and an ordered trace of every increment.

pub mod analyze;
pub mod error;
pub mod report_helpers;
pub mod rules;
pub mod tree;
pub mod walker;

pub use error::{AnalysisError, Result};
pub use rules::{NestingFormula, RuleEntry, RuleKind, RuleTable};
pub use tree::{BoolOp, NodeKind, Pattern, Span, SyntaxNode};
pub use walker::{ComplexityLevel, ComplexityReport, TraceEntry, walk};
