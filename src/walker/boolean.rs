//! Boolean-sequence collapsing.
//!
//! A chain of short-circuit operators costs one unit for its first
//! operator and one more each time the operator changes:
//! `a && b && c` = 1, `a && b || c` = 2, `a || b && c || d` = 3.

use crate::tree::{BoolOp, NodeKind, SyntaxNode};

/// Operators of a boolean subtree, left to right.
///
/// Iterative in-order walk; anything that is not a `BooleanOp` ends the
/// chain and is treated as an opaque operand. A root that is not boolean
/// yields no operators.
pub fn flatten(root: &SyntaxNode) -> Vec<BoolOp> {
    let mut operators = Vec::new();
    let mut pending: Vec<&SyntaxNode> = Vec::new();
    let mut current = root;

    loop {
        while let NodeKind::BooleanOp { left, .. } = &current.kind {
            pending.push(current);
            current = &**left;
        }

        let Some(parent) = pending.pop() else {
            break;
        };
        if let NodeKind::BooleanOp { op, right, .. } = &parent.kind {
            operators.push(*op);
            current = &**right;
        }
    }

    operators
}

/// Count operator runs in one linear pass.
pub fn count_sequences(operators: &[BoolOp]) -> usize {
    let mut count = 0;
    let mut last: Option<BoolOp> = None;

    for &op in operators {
        if last != Some(op) {
            count += 1;
            last = Some(op);
        }
    }

    count
}

/// Units charged for a boolean subtree.
pub fn collapse(root: &SyntaxNode) -> usize {
    count_sequences(&flatten(root))
}

#[cfg(test)]
#[path = "boolean_test.rs"]
mod tests;
