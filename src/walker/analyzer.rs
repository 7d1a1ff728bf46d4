//! Structural complexity computation over a syntax tree.
//!
//! One pre-order pass, left to right, driven by an explicit work stack so
//! tree depth is bounded by memory rather than by the call stack.
//!
//! Each node's increment stacks up to three independent effects:
//! - its own rule (`base`), plus the depth surcharge when the rule is
//!   nesting-sensitive (`nesting`)
//! - a guard penalty when it carries a guard (`guard`)
//! - the collapsed cost of the guard's boolean sequence, or of the node's
//!   own sequence for a standalone boolean chain (`boolean`)
//!
//! Boolean operators that belong to a chain already priced by an ancestor
//! are visited (they keep their pre-order index) but never charged again.

use tracing::{debug, trace};

use super::boolean;
use super::nesting::NestingTracker;
use super::report::{
    Breakdown, ComplexityLevel, ComplexityReport, Diagnostic, FunctionSummary, Reason, TraceEntry,
};
use crate::error::Result;
use crate::rules::{Charge, RuleKind, RuleTable};
use crate::tree::{BoolOp, Edge, NodeKind, Pattern, Span, SyntaxNode};

/// Pending work for the traversal.
enum Task<'t> {
    Visit {
        node: &'t SyntaxNode,
        edge: Edge,
        parent: Option<Span>,
    },
    /// Closes the nesting frame opened by an earlier visit. Pushed before
    /// that node's subtrees, so it pops after all of them.
    Leave,
}

/// Score one tree against `rules`.
///
/// Malformed subtrees are skipped and reported in `diagnostics`; the
/// only error returned is `NestingImbalance`, which means the walk itself
/// went wrong.
pub fn walk(root: &SyntaxNode, rules: &RuleTable) -> Result<ComplexityReport> {
    Walker::new(rules).run(root)
}

struct Walker<'r, 't> {
    rules: &'r RuleTable,
    tracker: NestingTracker,
    stack: Vec<Task<'t>>,
    trace: Vec<TraceEntry>,
    functions: Vec<FunctionSummary>,
    diagnostics: Vec<Diagnostic>,
    visited: usize,
}

impl<'r, 't> Walker<'r, 't> {
    fn new(rules: &'r RuleTable) -> Self {
        Self {
            rules,
            tracker: NestingTracker::new(),
            stack: Vec::new(),
            trace: Vec::new(),
            functions: Vec::new(),
            diagnostics: Vec::new(),
            visited: 0,
        }
    }

    fn run(mut self, root: &'t SyntaxNode) -> Result<ComplexityReport> {
        self.stack.push(Task::Visit {
            node: root,
            edge: Edge::Child,
            parent: None,
        });

        while let Some(task) = self.stack.pop() {
            match task {
                Task::Visit { node, edge, parent } => self.visit(node, edge, parent),
                Task::Leave => self.tracker.leave()?,
            }
        }

        self.finish()
    }

    fn visit(&mut self, node: &'t SyntaxNode, edge: Edge, parent: Option<Span>) {
        let index = self.visited;
        self.visited += 1;

        if let Some(reason) = self.malformation(node, edge, parent) {
            self.skip(index, node, reason);
            return;
        }

        let depth = self.tracker.current_depth();
        let chained = matches!(edge, Edge::Guard | Edge::Operand)
            && matches!(node.kind, NodeKind::BooleanOp { .. });
        if !chained && let Some((rule, reason, breakdown)) = self.score(node, depth) {
            self.record(index, node, depth, rule, reason, breakdown);
        }

        if node.is_nesting() {
            if let NodeKind::Function { name } = &node.kind {
                let scope = self.functions.len();
                self.functions.push(FunctionSummary {
                    name: name.clone().unwrap_or_else(|| "<anonymous>".to_string()),
                    span: node.span,
                    complexity: 0,
                    level: ComplexityLevel::Simple,
                });
                self.tracker.enter_scope(scope, self.rules.function_resets_depth());
            } else {
                self.tracker.enter();
            }
            self.stack.push(Task::Leave);
        }

        for (edge, child) in node.subtrees().into_iter().rev() {
            self.stack.push(Task::Visit {
                node: child,
                edge,
                parent: Some(node.span),
            });
        }
    }

    /// Price a node. `None` when it contributes nothing.
    fn score(&self, node: &SyntaxNode, depth: usize) -> Option<(RuleKind, Reason, Breakdown)> {
        let (rule, mut breakdown) = match &node.kind {
            NodeKind::MatchArm { pattern, guard } => {
                let rule = RuleKind::for_arm(*pattern, guard.is_some());
                (rule, self.arm_base(rule, *pattern, depth))
            }
            NodeKind::BooleanOp { .. } => {
                let units = boolean::collapse(node);
                let boolean = self.charged(RuleKind::BooleanOp, units, depth);
                (
                    RuleKind::BooleanOp,
                    Breakdown {
                        boolean,
                        ..Breakdown::default()
                    },
                )
            }
            _ => {
                let rule = RuleKind::for_node(node)?;
                let charge = self.rules.charge(rule, 1, depth).unwrap_or_default();
                (
                    rule,
                    Breakdown {
                        base: charge.base,
                        nesting: charge.nesting,
                        ..Breakdown::default()
                    },
                )
            }
        };

        if let Some(guard) = node.guard() {
            breakdown.guard = self.charged(RuleKind::Guard, 1, depth);
            let units = boolean::collapse(guard);
            breakdown.boolean =
                breakdown.boolean.saturating_add(self.charged(RuleKind::BooleanOp, units, depth));
        }

        if breakdown.total() == 0 {
            return None;
        }

        let reason = if node.guard().is_some() {
            Reason::Guarded
        } else {
            match (&node.kind, rule) {
                (NodeKind::BooleanOp { .. }, _) => Reason::BooleanSequence,
                (_, RuleKind::OrPatternArm) if self.rules.alternatives_as_boolean() => {
                    Reason::AlternativesSequence
                }
                (NodeKind::MatchArm { .. }, _) => Reason::Arm,
                _ if breakdown.nesting > 0 => Reason::NestedStructure,
                _ => Reason::Structure,
            }
        };

        Some((rule, reason, breakdown))
    }

    /// Base cost of an arm before any guard surcharge.
    fn arm_base(&self, rule: RuleKind, pattern: Pattern, depth: usize) -> Breakdown {
        if let Pattern::Alternatives { count } = pattern
            && self.rules.alternatives_as_boolean()
        {
            let operators = vec![BoolOp::Or; count.saturating_sub(1)];
            let units = boolean::count_sequences(&operators);
            return Breakdown {
                boolean: self.charged(RuleKind::BooleanOp, units, depth),
                ..Breakdown::default()
            };
        }

        let charge = self.rules.charge(rule, 1, depth).unwrap_or_default();
        Breakdown {
            base: charge.base,
            nesting: charge.nesting,
            ..Breakdown::default()
        }
    }

    fn charged(&self, kind: RuleKind, units: usize, depth: usize) -> usize {
        self.rules.charge(kind, units, depth).map_or(0, Charge::total)
    }

    fn record(
        &mut self,
        index: usize,
        node: &SyntaxNode,
        depth: usize,
        rule: RuleKind,
        reason: Reason,
        breakdown: Breakdown,
    ) {
        let increment = breakdown.total();
        trace!(index, kind = node.label(), %rule, increment, depth, "increment");
        self.trace.push(TraceEntry {
            index,
            kind: node.label(),
            span: node.span,
            increment,
            depth,
            rule: Some(rule),
            reason,
            breakdown,
            scope: self.tracker.current_scope(),
        });
    }

    /// Why `node` cannot be scored, if it cannot.
    fn malformation(&self, node: &SyntaxNode, edge: Edge, parent: Option<Span>) -> Option<String> {
        if node.span.start > node.span.end {
            return Some(format!("inverted span {}..{}", node.span.start, node.span.end));
        }
        if let Some(parent) = parent
            && !parent.contains(&node.span)
        {
            return Some(format!("span {} lies outside its parent {parent}", node.span));
        }

        match (&node.kind, edge) {
            (NodeKind::MatchArm { .. }, e) if e != Edge::Arm => {
                return Some("match arm outside a match".to_string());
            }
            (NodeKind::MatchArm { .. }, _) => {}
            (_, Edge::Arm) => {
                return Some(format!("expected a match arm, found {}", node.label()));
            }
            _ => {}
        }

        match &node.kind {
            NodeKind::Match { arms } if arms.is_empty() => {
                return Some("match has no arms".to_string());
            }
            NodeKind::MatchArm {
                pattern: Pattern::Alternatives { count },
                ..
            } if *count < 2 => {
                return Some(format!("or-pattern with {count} alternative(s)"));
            }
            _ => {}
        }

        let opens_level = node.is_nesting() && !matches!(node.kind, NodeKind::Function { .. });
        let next = self.tracker.current_depth() + 1;
        if opens_level && next > self.rules.max_depth() {
            return Some(format!(
                "nesting depth {next} exceeds limit {}",
                self.rules.max_depth()
            ));
        }

        None
    }

    /// Record a malformed subtree. Nothing below it is visited.
    fn skip(&mut self, index: usize, node: &SyntaxNode, reason: String) {
        debug!(index, span = %node.span, %reason, "skipping malformed subtree");
        self.trace.push(TraceEntry {
            index,
            kind: node.label(),
            span: node.span,
            increment: 0,
            depth: self.tracker.current_depth(),
            rule: None,
            reason: Reason::Malformed,
            breakdown: Breakdown::default(),
            scope: self.tracker.current_scope(),
        });
        self.diagnostics.push(Diagnostic {
            index,
            span: node.span,
            reason,
        });
    }

    fn finish(self) -> Result<ComplexityReport> {
        let Walker {
            tracker,
            trace,
            mut functions,
            diagnostics,
            visited,
            ..
        } = self;

        let max_depth = tracker.finish()?;
        for entry in &trace {
            if let Some(scope) = entry.scope {
                let f = &mut functions[scope];
                f.complexity = f.complexity.saturating_add(entry.increment);
            }
        }
        for f in &mut functions {
            f.level = ComplexityLevel::from_complexity(f.complexity);
        }

        let total = trace.iter().fold(0usize, |acc, e| acc.saturating_add(e.increment));
        debug!(
            nodes = visited,
            total,
            max_depth,
            skipped = diagnostics.len(),
            "walk finished"
        );

        Ok(ComplexityReport {
            total,
            level: ComplexityLevel::from_complexity(total),
            max_depth,
            trace,
            functions,
            diagnostics,
        })
    }
}

#[cfg(test)]
#[path = "analyzer_test.rs"]
mod tests;
