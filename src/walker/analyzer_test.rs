use super::*;
use crate::error::AnalysisError;
use crate::rules::{NestingFormula, RuleEntry};

fn sp(start: usize, end: usize) -> Span {
    Span::new(start, end)
}

fn leaf(name: &str, start: usize, end: usize) -> SyntaxNode {
    SyntaxNode::other(name, sp(start, end))
}

fn run(tree: &SyntaxNode) -> ComplexityReport {
    walk(tree, &RuleTable::default()).unwrap()
}

fn increments(report: &ComplexityReport) -> Vec<usize> {
    report.increments().map(|e| e.increment).collect()
}

fn assert_additive(report: &ComplexityReport) {
    let sum: usize = report.trace.iter().map(|e| e.increment).sum();
    assert_eq!(report.total, sum);
    for entry in &report.trace {
        assert_eq!(entry.breakdown.total(), entry.increment);
    }
}

/// `when (code) { 400 -> ..; 401, 403, 404 -> ..; 418 -> ..; else -> .. }`
/// with optional guards on the `400` and `418` arms.
fn status_match(guard_400: Option<SyntaxNode>, guard_418: Option<SyntaxNode>) -> SyntaxNode {
    let arms = vec![
        SyntaxNode::arm(sp(20, 40), Pattern::Single, guard_400),
        SyntaxNode::arm(sp(41, 70), Pattern::Alternatives { count: 3 }, None),
        SyntaxNode::arm(sp(71, 100), Pattern::Single, guard_418),
        SyntaxNode::arm(sp(101, 120), Pattern::Wildcard, None),
    ];
    let m = SyntaxNode::match_on(sp(10, 130), arms).with_children(vec![leaf("code", 15, 19)]);
    SyntaxNode::function("describe", sp(0, 140), vec![m])
}

// ── fixtures ───────────────────────────────────────────────────────────

#[test]
fn single_value_arms_cost_nothing() {
    let arms = vec![
        SyntaxNode::arm(sp(10, 20), Pattern::Single, None),
        SyntaxNode::arm(sp(21, 30), Pattern::Single, None),
        SyntaxNode::arm(sp(31, 40), Pattern::Single, None),
        SyntaxNode::arm(sp(41, 50), Pattern::Single, None),
        SyntaxNode::arm(sp(51, 60), Pattern::Wildcard, None),
    ];
    let tree = SyntaxNode::function("f", sp(0, 70), vec![SyntaxNode::match_on(sp(5, 65), arms)]);
    let report = run(&tree);
    assert_eq!(report.total, 0);
    assert!(report.trace.is_empty());
    assert_additive(&report);
}

#[test]
fn or_pattern_arm_costs_one_regardless_of_alternatives() {
    let report = run(&status_match(None, None));
    assert_eq!(report.total, 1);
    assert_eq!(increments(&report), vec![1]);
    let entry = report.increments().next().unwrap();
    assert_eq!(entry.rule, Some(RuleKind::OrPatternArm));
    assert_eq!(entry.reason, Reason::Arm);
    assert_eq!(entry.span, sp(41, 70));
    assert_additive(&report);
}

#[test]
fn guarded_arms_cost_two() {
    let report = run(&status_match(
        Some(leaf("isRetryable", 25, 35)),
        Some(leaf("isTeapot", 80, 90)),
    ));
    assert_eq!(report.total, 5);
    assert_eq!(increments(&report), vec![2, 1, 2]);

    let guarded = report.increments().next().unwrap();
    assert_eq!(guarded.rule, Some(RuleKind::GuardedArm));
    assert_eq!(guarded.reason, Reason::Guarded);
    assert_eq!(
        guarded.breakdown,
        Breakdown {
            base: 1,
            guard: 1,
            ..Breakdown::default()
        }
    );
    assert_additive(&report);
}

#[test]
fn function_summary_collects_its_increments() {
    let report = run(&status_match(Some(leaf("g", 25, 35)), None));
    assert_eq!(report.functions.len(), 1);
    assert_eq!(report.functions[0].name, "describe");
    assert_eq!(report.functions[0].complexity, 3);
    assert_eq!(report.level, ComplexityLevel::Simple);
}

// ── guards and boolean sequences ───────────────────────────────────────

fn chain(ops: &[BoolOp]) -> SyntaxNode {
    // left-associative: ((a op0 b) op1 c) ...
    let mut node = leaf("a", 30, 31);
    for (i, op) in ops.iter().enumerate() {
        let right = leaf("x", 32 + i, 33 + i);
        node = SyntaxNode::boolean(*op, node, right, sp(30, 33 + i));
    }
    node
}

fn guarded_arm_total(guard: SyntaxNode) -> usize {
    let arm = SyntaxNode::arm(sp(20, 60), Pattern::Single, Some(guard));
    let tree = SyntaxNode::match_on(sp(0, 100), vec![arm]);
    let report = run(&tree);
    assert_additive(&report);
    report.total
}

#[test]
fn mixed_guard_chain_adds_two() {
    // A and B or C
    assert_eq!(guarded_arm_total(chain(&[BoolOp::And, BoolOp::Or])), 2 + 2);
}

#[test]
fn uniform_guard_chain_adds_one() {
    // A and B and C
    assert_eq!(guarded_arm_total(chain(&[BoolOp::And, BoolOp::And])), 2 + 1);
}

#[test]
fn guard_chain_is_folded_into_the_arm_entry() {
    let arm = SyntaxNode::arm(sp(20, 60), Pattern::Single, Some(chain(&[BoolOp::And, BoolOp::Or])));
    let report = run(&SyntaxNode::match_on(sp(0, 100), vec![arm]));
    assert_eq!(increments(&report), vec![4]);
    assert_eq!(report.trace[0].breakdown.boolean, 2);
}

#[test]
fn standalone_chain_is_charged_once() {
    let assign = leaf("assign", 10, 50).with_children(vec![chain(&[BoolOp::And, BoolOp::Or])]);
    let report = run(&SyntaxNode::function("f", sp(0, 60), vec![assign]));
    assert_eq!(increments(&report), vec![2]);
    assert_eq!(report.trace[0].reason, Reason::BooleanSequence);
    assert_eq!(report.trace[0].kind, "boolean_op");
}

#[test]
fn chain_inside_an_operand_is_scored_separately() {
    // a && call(b || c)
    let inner = SyntaxNode::boolean(BoolOp::Or, leaf("b", 10, 11), leaf("c", 15, 16), sp(10, 16));
    let call = leaf("call", 5, 20).with_children(vec![inner]);
    let outer = SyntaxNode::boolean(BoolOp::And, leaf("a", 0, 1), call, sp(0, 20));
    let report = run(&outer);
    assert_eq!(increments(&report), vec![1, 1]);
    assert_eq!(report.total, 2);
}

#[test]
fn guarded_conditional_stacks_all_three_effects() {
    let inner = SyntaxNode::conditional(sp(25, 80), Some(chain(&[BoolOp::Or])), vec![]);
    let outer = SyntaxNode::conditional(sp(0, 100), None, vec![inner]);
    let report = run(&SyntaxNode::function("f", sp(0, 100), vec![outer]));
    // outer: 1; inner: base 1 + nesting 1 + guard 1 + boolean 1
    assert_eq!(increments(&report), vec![1, 4]);
    assert_eq!(
        report.trace[1].breakdown,
        Breakdown {
            base: 1,
            nesting: 1,
            guard: 1,
            boolean: 1
        }
    );
    assert_additive(&report);
}

// ── nesting ────────────────────────────────────────────────────────────

fn nested_conditionals(n: usize) -> SyntaxNode {
    let mut node = SyntaxNode::other("body", Span::default());
    for _ in 0..n {
        node = SyntaxNode::conditional(Span::default(), None, vec![node]);
    }
    node
}

#[test]
fn deeper_conditionals_cost_strictly_more() {
    let report = run(&nested_conditionals(6));
    let incs = increments(&report);
    assert_eq!(incs, vec![1, 2, 3, 4, 5, 6]);
    assert!(incs.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(report.max_depth, 6);
    assert_eq!(report.trace[3].reason, Reason::NestedStructure);
}

#[test]
fn very_deep_tree_does_not_overflow_the_stack() {
    let n = 10_000;
    let rules = RuleTable::new(
        RuleTable::default().entries().to_vec(),
        NestingFormula::Additive,
        n + 1,
    )
    .unwrap();
    let report = walk(&nested_conditionals(n), &rules).unwrap();
    assert_eq!(report.total, n + n * (n - 1) / 2);
    assert!(report.diagnostics.is_empty());
}

#[test]
fn depth_limit_skips_the_offending_subtree() {
    let rules = RuleTable::new(
        RuleTable::default().entries().to_vec(),
        NestingFormula::Additive,
        3,
    )
    .unwrap();
    let report = walk(&nested_conditionals(5), &rules).unwrap();
    assert_eq!(increments(&report), vec![1, 2, 3]);
    assert_eq!(report.diagnostics.len(), 1);
    assert!(report.diagnostics[0].reason.contains("exceeds limit 3"));
    assert_additive(&report);
}

#[test]
fn transparent_nodes_do_not_nest() {
    let cond = SyntaxNode::conditional(sp(20, 30), None, vec![]);
    let block = leaf("block", 10, 40).with_children(vec![cond]);
    let unknown = SyntaxNode::new(NodeKind::Unrecognized, sp(5, 45)).with_children(vec![block]);
    let report = run(&SyntaxNode::function("f", sp(0, 50), vec![unknown]));
    assert_eq!(increments(&report), vec![1]);
    assert_eq!(report.trace[0].depth, 0);
}

#[test]
fn function_reset_is_configurable() {
    let inner_fn = SyntaxNode::function(
        "inner",
        sp(10, 40),
        vec![SyntaxNode::conditional(sp(20, 30), None, vec![])],
    );
    let tree = SyntaxNode::conditional(sp(0, 50), None, vec![inner_fn]);

    let resetting = run(&tree);
    assert_eq!(increments(&resetting), vec![1, 1]);

    let mut entries = RuleTable::default().entries().to_vec();
    for e in &mut entries {
        if e.kind == RuleKind::Function {
            e.resets_depth = false;
        }
    }
    let rules = RuleTable::new(entries, NestingFormula::Additive, 64).unwrap();
    let inheriting = walk(&tree, &rules).unwrap();
    assert_eq!(increments(&inheriting), vec![1, 2]);
    assert_eq!(inheriting.functions[0].complexity, 2);
}

#[test]
fn multiplicative_formula() {
    let rules = RuleTable::new(
        vec![RuleEntry::new(RuleKind::Loop, 2, true)],
        NestingFormula::Multiplicative,
        16,
    )
    .unwrap();
    let tree = SyntaxNode::looping(
        Span::default(),
        vec![SyntaxNode::looping(
            Span::default(),
            vec![SyntaxNode::looping(Span::default(), vec![])],
        )],
    );
    let report = walk(&tree, &rules).unwrap();
    assert_eq!(increments(&report), vec![2, 4, 6]);
}

#[test]
fn oversized_rule_costs_saturate() {
    let rules = RuleTable::from_toml_str(
        r#"
        formula = "multiplicative"

        [[rule]]
        kind = "loop"
        base_increment = 9223372036854775807
        nesting_sensitive = true
        "#,
    )
    .unwrap();
    let tree = SyntaxNode::looping(
        Span::default(),
        vec![SyntaxNode::looping(
            Span::default(),
            vec![SyntaxNode::looping(Span::default(), vec![])],
        )],
    );
    let report = walk(&tree, &rules).unwrap();
    assert_eq!(report.trace.len(), 3);
    assert_eq!(report.trace[2].increment, usize::MAX);
    assert_eq!(report.total, usize::MAX);
    assert_eq!(report.level, ComplexityLevel::Extreme);
}

#[test]
fn nested_functions_are_summarized_separately() {
    let inner = SyntaxNode::function(
        "inner",
        sp(20, 40),
        vec![SyntaxNode::looping(sp(25, 35), vec![])],
    );
    let outer = SyntaxNode::function(
        "outer",
        sp(0, 60),
        vec![SyntaxNode::conditional(sp(5, 15), None, vec![]), inner],
    );
    let report = run(&outer);
    let totals: Vec<(&str, usize)> = report
        .functions
        .iter()
        .map(|f| (f.name.as_str(), f.complexity))
        .collect();
    assert_eq!(totals, vec![("outer", 1), ("inner", 1)]);
}

// ── alternatives priced as a chain ─────────────────────────────────────

#[test]
fn alternatives_can_be_priced_as_an_or_chain() {
    let mut entries = RuleTable::default().entries().to_vec();
    for e in &mut entries {
        if e.kind == RuleKind::BooleanOp {
            e.base_increment = 3;
        }
    }
    let rules = RuleTable::new(entries, NestingFormula::Additive, 64)
        .unwrap()
        .with_alternatives_as_boolean(true);
    let report = walk(&status_match(None, None), &rules).unwrap();
    assert_eq!(increments(&report), vec![3]);
    let entry = report.increments().next().unwrap();
    assert_eq!(entry.reason, Reason::AlternativesSequence);
    assert_eq!(entry.breakdown.boolean, 3);
}

// ── malformed input ────────────────────────────────────────────────────

#[test]
fn empty_match_is_malformed_not_zero() {
    let tree = SyntaxNode::function(
        "f",
        sp(0, 100),
        vec![
            SyntaxNode::match_on(sp(10, 20), vec![]),
            SyntaxNode::conditional(sp(30, 40), None, vec![]),
        ],
    );
    let report = run(&tree);
    assert!(report.is_partial());
    assert_eq!(report.diagnostics[0].span, sp(10, 20));
    assert_eq!(report.diagnostics[0].reason, "match has no arms");
    assert_eq!(report.trace[0].reason, Reason::Malformed);
    assert_eq!(report.trace[0].increment, 0);
    // the sibling is still scored
    assert_eq!(report.total, 1);
    assert_additive(&report);

    match report.into_strict() {
        Err(AnalysisError::MalformedTree { span, .. }) => assert_eq!(span, sp(10, 20)),
        other => panic!("expected MalformedTree, got {other:?}"),
    }
}

#[test]
fn malformed_subtree_is_skipped_entirely() {
    let bad = SyntaxNode::match_on(sp(10, 20), vec![]);
    let cond = SyntaxNode::conditional(sp(0, 30), None, vec![bad]);
    let report = run(&cond);
    assert_eq!(report.total, 1);
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.max_depth, 1);
}

#[test]
fn arm_outside_a_match_is_malformed() {
    let tree = leaf("block", 0, 50).with_children(vec![SyntaxNode::arm(
        sp(10, 20),
        Pattern::Single,
        None,
    )]);
    let report = run(&tree);
    assert_eq!(report.diagnostics[0].reason, "match arm outside a match");
}

#[test]
fn non_arm_in_arm_list_is_malformed() {
    let tree = SyntaxNode::match_on(sp(0, 50), vec![leaf("stray", 10, 20)]);
    let report = run(&tree);
    assert!(report.diagnostics[0].reason.contains("expected a match arm"));
}

#[test]
fn one_alternative_or_pattern_is_malformed() {
    let arm = SyntaxNode::arm(sp(10, 20), Pattern::Alternatives { count: 1 }, None);
    let report = run(&SyntaxNode::match_on(sp(0, 50), vec![arm]));
    assert_eq!(report.total, 0);
    assert!(report.is_partial());
}

#[test]
fn child_span_outside_parent_is_malformed() {
    let cond = SyntaxNode::conditional(sp(40, 80), None, vec![]);
    let report = run(&SyntaxNode::function("f", sp(0, 50), vec![cond]));
    assert!(report.diagnostics[0].reason.contains("outside its parent"));
    assert_eq!(report.total, 0);
}

#[test]
fn inverted_span_is_malformed() {
    let report = run(&SyntaxNode::looping(sp(9, 3), vec![]));
    assert!(report.diagnostics[0].reason.starts_with("inverted span"));
}

// ── whole-report properties ────────────────────────────────────────────

fn mixed_tree() -> SyntaxNode {
    // fn f { if (a && b) { for { if {} } } }
    let guard = SyntaxNode::boolean(BoolOp::And, leaf("a", 12, 13), leaf("b", 18, 20), sp(12, 20));
    let inner = SyntaxNode::conditional(sp(40, 70), None, vec![]);
    let lp = SyntaxNode::looping(sp(30, 80), vec![inner]);
    let cond = SyntaxNode::conditional(sp(10, 90), Some(guard), vec![lp]);
    SyntaxNode::function("f", sp(0, 100), vec![cond])
}

#[test]
fn trace_follows_pre_order() {
    let report = run(&mixed_tree());
    // 0 fn, 1 if, 2 &&, 3 a, 4 b, 5 for, 6 if
    let indices: Vec<usize> = report.trace.iter().map(|e| e.index).collect();
    assert_eq!(indices, vec![1, 5, 6]);
    assert_eq!(increments(&report), vec![3, 2, 3]);
    assert_eq!(report.total, 8);
    assert_eq!(report.max_depth, 3);
    assert_additive(&report);
}

#[test]
fn walking_twice_gives_identical_reports() {
    let tree = mixed_tree();
    let rules = RuleTable::default();
    let first = walk(&tree, &rules).unwrap();
    let second = walk(&tree, &rules).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn empty_leaf_scores_zero() {
    let report = run(&leaf("x", 0, 1));
    assert_eq!(report.total, 0);
    assert_eq!(report.max_depth, 0);
    assert!(report.trace.is_empty());
}

// ── exception handlers and conditional expressions ─────────────────────

#[test]
fn catch_and_ternary_nest_like_branches() {
    // fun f() { try { if (a) {} } catch (e) { x = e.retry ? 1 : 2 } }
    let try_block = leaf("try", 5, 40).with_children(vec![SyntaxNode::conditional(
        sp(10, 30),
        None,
        vec![],
    )]);
    let ternary = SyntaxNode::new(NodeKind::Ternary, sp(50, 60));
    let handler = SyntaxNode::new(NodeKind::Catch, sp(41, 90)).with_children(vec![ternary]);
    let tree = SyntaxNode::function("f", sp(0, 100), vec![try_block, handler]);

    let report = run(&tree);
    assert_eq!(increments(&report), vec![1, 1, 2]);
    assert_eq!(report.total, 4);
    let kinds: Vec<Option<RuleKind>> = report.increments().map(|e| e.rule).collect();
    assert_eq!(
        kinds,
        vec![Some(RuleKind::Conditional), Some(RuleKind::Catch), Some(RuleKind::Ternary)]
    );
    assert_eq!(report.trace[2].reason, Reason::NestedStructure);
    assert_eq!(report.max_depth, 2);
    assert_additive(&report);
}
