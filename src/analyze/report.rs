//! Report formatters for `cw analyze`.
//!
//! Three output modes: a per-file table with a totals row, a per-file
//! trace listing every increment with its breakdown, and JSON.

use super::FileComplexity;
use crate::error::Result;
use crate::report_helpers;
use crate::walker::ComplexityLevel;

/// Print a table of per-file totals.
///
/// Columns: File, Functions (boundaries seen), Total, Depth (peak
/// nesting), Skipped (malformed subtrees), Level (classification of total).
pub fn print_report(files: &[FileComplexity]) {
    if files.is_empty() {
        println!("No trees analyzed.");
        return;
    }

    let max_path_len = report_helpers::max_path_width(files.iter().map(|f| f.path.as_path()), 4);
    let header_width = max_path_len + 48;
    let separator = report_helpers::separator(header_width.max(72));

    println!("Structural Complexity");
    println!("{separator}");
    println!(
        " {:<width$}  {:>9} {:>7} {:>5} {:>7}  Level",
        "File",
        "Functions",
        "Total",
        "Depth",
        "Skipped",
        width = max_path_len
    );
    println!("{separator}");

    for f in files {
        let r = &f.report;
        println!(
            " {:<width$}  {:>9} {:>7} {:>5} {:>7}  {}",
            f.path.display(),
            r.functions.len(),
            r.total,
            r.max_depth,
            r.diagnostics.len(),
            r.level.as_str(),
            width = max_path_len
        );
    }

    println!("{separator}");

    let total = files.iter().fold(0usize, |acc, f| acc.saturating_add(f.report.total));
    let functions: usize = files.iter().map(|f| f.report.functions.len()).sum();
    let depth = files.iter().map(|f| f.report.max_depth).max().unwrap_or(0);
    let skipped: usize = files.iter().map(|f| f.report.diagnostics.len()).sum();
    let total_label = format!(" Total ({} files)", files.len());
    println!(
        "{:<width$}  {:>9} {:>7} {:>5} {:>7}  {}",
        total_label,
        functions,
        total,
        depth,
        skipped,
        ComplexityLevel::from_complexity(total).as_str(),
        width = max_path_len + 1,
    );
}

/// Print every increment per file, in traversal order, followed by the
/// per-function totals and any skipped subtrees.
pub fn print_trace(files: &[FileComplexity]) {
    if files.is_empty() {
        println!("No trees analyzed.");
        return;
    }

    let separator = report_helpers::separator(78);
    println!("Structural Complexity (trace)");
    println!("{separator}");

    for f in files {
        println!();
        println!("{}: {} ({})", f.path.display(), f.report.total, f.report.level.as_str());

        for e in &f.report.trace {
            let b = &e.breakdown;
            println!(
                "  #{:<5} {:>12}  {:<12} {:>+4}  depth {:<3} {}  [base {} nesting {} guard {} boolean {}]",
                e.index,
                e.span.to_string(),
                e.kind,
                e.increment,
                e.depth,
                e.reason,
                b.base,
                b.nesting,
                b.guard,
                b.boolean,
            );
        }

        for func in &f.report.functions {
            println!(
                "  fn {:<24} {:>5}  {}",
                func.name,
                func.complexity,
                func.level.as_str()
            );
        }

        for d in &f.report.diagnostics {
            println!("  skipped #{} at {}: {}", d.index, d.span, d.reason);
        }
    }

    println!("{separator}");
}

/// Serialize per-file reports as pretty-printed JSON to stdout.
pub fn print_json(files: &[FileComplexity]) -> Result<()> {
    report_helpers::print_json_stdout(&files)
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
