//! Language-agnostic syntax nodes.
//!
//! A front-end lowers its concrete grammar into this closed set of kinds.
//! Only what scoring needs survives the lowering: structure, spans, arm
//! patterns, guards and boolean operators. Anything else becomes `Other`.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Span;

/// Short-circuiting operators that form boolean sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoolOp {
    And,
    Or,
    /// Null-coalescing `??`.
    Coalesce,
}

impl BoolOp {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::And => "&&",
            Self::Or => "||",
            Self::Coalesce => "??",
        }
    }
}

impl fmt::Display for BoolOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// What a match arm's pattern looks like, structurally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Pattern {
    /// One literal or binding, e.g. `400`.
    Single,
    /// An "or"-pattern listing `count` alternatives, e.g. `401 | 403 | 404`.
    Alternatives { count: usize },
    /// The catch-all arm (`_`, `default`, `else`).
    Wildcard,
}

/// The closed set of node kinds, with the payload each one needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    /// Function or method boundary.
    Function {
        #[serde(default)]
        name: Option<String>,
    },
    /// `if`-like branch. `guard` is an extra boolean condition attached to
    /// the branch; the plain condition lives in `children`.
    Conditional {
        #[serde(default)]
        guard: Option<Box<SyntaxNode>>,
    },
    Loop,
    /// Exception handler (`catch`, `except`, `rescue`). The body goes in
    /// `children`; `try` and `finally` blocks are plain `Other` nodes.
    Catch,
    /// Conditional expression (`c ? a : b`, `a if c else b`). Condition
    /// and both branches go in `children`.
    Ternary,
    /// Multi-branch match. Scrutinee and friends go in `children`.
    Match {
        #[serde(default)]
        arms: Vec<SyntaxNode>,
    },
    MatchArm {
        pattern: Pattern,
        #[serde(default)]
        guard: Option<Box<SyntaxNode>>,
    },
    BooleanOp {
        op: BoolOp,
        left: Box<SyntaxNode>,
        right: Box<SyntaxNode>,
    },
    /// Any construct without structural meaning of its own.
    Other {
        #[serde(default)]
        name: String,
    },
    /// A kind tag this engine does not know yet. Scored as zero and
    /// structurally transparent.
    #[serde(other)]
    Unrecognized,
}

/// How a subtree hangs off its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Child,
    Arm,
    Guard,
    Operand,
}

/// One construct of the parsed tree. Owns its subtrees exclusively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    #[serde(default)]
    pub span: Span,
    #[serde(default)]
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Self {
            kind,
            span,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<SyntaxNode>) -> Self {
        self.children = children;
        self
    }

    pub fn function(name: &str, span: Span, body: Vec<SyntaxNode>) -> Self {
        Self::new(
            NodeKind::Function {
                name: Some(name.to_string()),
            },
            span,
        )
        .with_children(body)
    }

    pub fn conditional(span: Span, guard: Option<SyntaxNode>, body: Vec<SyntaxNode>) -> Self {
        Self::new(
            NodeKind::Conditional {
                guard: guard.map(Box::new),
            },
            span,
        )
        .with_children(body)
    }

    pub fn looping(span: Span, body: Vec<SyntaxNode>) -> Self {
        Self::new(NodeKind::Loop, span).with_children(body)
    }

    pub fn match_on(span: Span, arms: Vec<SyntaxNode>) -> Self {
        Self::new(NodeKind::Match { arms }, span)
    }

    pub fn arm(span: Span, pattern: Pattern, guard: Option<SyntaxNode>) -> Self {
        Self::new(
            NodeKind::MatchArm {
                pattern,
                guard: guard.map(Box::new),
            },
            span,
        )
    }

    pub fn boolean(op: BoolOp, left: SyntaxNode, right: SyntaxNode, span: Span) -> Self {
        Self::new(
            NodeKind::BooleanOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        )
    }

    pub fn other(name: &str, span: Span) -> Self {
        Self::new(
            NodeKind::Other {
                name: name.to_string(),
            },
            span,
        )
    }

    /// Stable label for the node's kind, used in traces and reports.
    pub fn label(&self) -> &'static str {
        match &self.kind {
            NodeKind::Function { .. } => "function",
            NodeKind::Conditional { .. } => "conditional",
            NodeKind::Loop => "loop",
            NodeKind::Catch => "catch",
            NodeKind::Ternary => "ternary",
            NodeKind::Match { .. } => "match",
            NodeKind::MatchArm { .. } => "match_arm",
            NodeKind::BooleanOp { .. } => "boolean_op",
            NodeKind::Other { .. } => "other",
            NodeKind::Unrecognized => "unrecognized",
        }
    }

    /// Constructs whose bodies sit one level deeper (or, for functions,
    /// open a new scope).
    pub fn is_nesting(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Function { .. }
                | NodeKind::Conditional { .. }
                | NodeKind::Loop
                | NodeKind::Catch
                | NodeKind::Ternary
                | NodeKind::Match { .. }
        )
    }

    /// The guard expression attached to a conditional or arm.
    pub fn guard(&self) -> Option<&SyntaxNode> {
        match &self.kind {
            NodeKind::Conditional { guard } | NodeKind::MatchArm { guard, .. } => guard.as_deref(),
            _ => None,
        }
    }

    /// Direct subtrees in traversal order, tagged with how they attach.
    ///
    /// Guards come before bodies, a match's own children before its arms,
    /// boolean operands before any stray children.
    pub fn subtrees(&self) -> Vec<(Edge, &SyntaxNode)> {
        let mut out = Vec::with_capacity(self.children.len() + 2);
        match &self.kind {
            NodeKind::Conditional { guard } | NodeKind::MatchArm { guard, .. } => {
                if let Some(g) = guard.as_deref() {
                    out.push((Edge::Guard, g));
                }
                out.extend(self.children.iter().map(|c| (Edge::Child, c)));
            }
            NodeKind::Match { arms } => {
                out.extend(self.children.iter().map(|c| (Edge::Child, c)));
                out.extend(arms.iter().map(|a| (Edge::Arm, a)));
            }
            NodeKind::BooleanOp { left, right, .. } => {
                out.push((Edge::Operand, &**left));
                out.push((Edge::Operand, &**right));
                out.extend(self.children.iter().map(|c| (Edge::Child, c)));
            }
            _ => out.extend(self.children.iter().map(|c| (Edge::Child, c))),
        }
        out
    }

    /// Number of nodes in the tree, this one included.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            count += 1;
            pending.extend(node.subtrees().into_iter().map(|(_, n)| n));
        }
        count
    }

    /// Move every owned subtree out of this node, leaving it a leaf.
    fn detach_subtrees(&mut self) -> Vec<SyntaxNode> {
        let mut out = std::mem::take(&mut self.children);
        match std::mem::replace(&mut self.kind, NodeKind::Unrecognized) {
            NodeKind::Conditional { guard } | NodeKind::MatchArm { guard, .. } => {
                out.extend(guard.map(|g| *g));
            }
            NodeKind::Match { arms } => out.extend(arms),
            NodeKind::BooleanOp { left, right, .. } => {
                out.push(*left);
                out.push(*right);
            }
            _ => {}
        }
        out
    }
}

// Deep trees would otherwise drop recursively on the native stack.
impl Drop for SyntaxNode {
    fn drop(&mut self) {
        let mut pending = self.detach_subtrees();
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.detach_subtrees());
        }
    }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod tests;
