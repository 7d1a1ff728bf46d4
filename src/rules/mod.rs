/// Scoring rules: which constructs cost what, and how depth feeds in.
///
/// The default table reproduces the usual cognitive-complexity pricing
/// for branches and loops, plus the match-arm pricing where or-patterns
/// and guards are what make an arm a decision point.
mod config;
mod table;

pub use config::RuleFile;
pub use table::{Charge, DEFAULT_MAX_DEPTH, NestingFormula, RuleEntry, RuleKind, RuleTable};
