/// Structural complexity walker (cognitive-style, SonarSource 2017).
///
/// Penalizes nesting, pattern alternatives, guards and mixed boolean
/// sequences. Produces a total plus an ordered trace of every increment.
/// Levels: Simple, Moderate, Complex, VeryComplex, Extreme.
mod analyzer;
pub mod boolean;
mod nesting;
mod report;

pub use analyzer::walk;
pub use nesting::NestingTracker;
pub use report::{
    Breakdown, ComplexityLevel, ComplexityReport, Diagnostic, FunctionSummary, Reason, TraceEntry,
};
