/// Batch analysis of front-end trees.
///
/// Each input file holds one JSON syntax tree. Files are walked
/// independently in parallel against one shared rule table, then sorted
/// and printed as a table, a per-increment trace, or JSON.
pub(crate) mod report;

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::rules::RuleTable;
use crate::tree;
use crate::walker::{ComplexityReport, walk};
use report::{print_json, print_report, print_trace};

/// Walk result for one tree file.
#[derive(Debug, Clone, Serialize)]
pub struct FileComplexity {
    pub path: PathBuf,
    #[serde(flatten)]
    pub report: ComplexityReport,
}

/// Output and failure policy for [`run`].
#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    pub json: bool,
    pub trace: bool,
    /// Totals above this count as failures.
    pub threshold: Option<usize>,
    /// Abort on the first malformed or unreadable tree instead of skipping it.
    pub strict: bool,
}

/// Load one tree file and walk it.
pub fn analyze_file(path: &Path, rules: &RuleTable) -> Result<FileComplexity> {
    let load = || -> Result<FileComplexity> {
        let root = tree::load(path)?;
        debug!(path = %path.display(), nodes = root.node_count(), "loaded tree");
        let report = walk(&root, rules)?;
        Ok(FileComplexity {
            path: path.to_path_buf(),
            report,
        })
    };
    load().map_err(|e| e.in_file(path))
}

/// Walk every file, keeping the ones that could be scored.
///
/// Unreadable or malformed inputs are logged and skipped unless `strict`;
/// a nesting imbalance always aborts.
pub fn collect(paths: &[PathBuf], rules: &RuleTable, strict: bool) -> Result<Vec<FileComplexity>> {
    let outcomes: Vec<Result<FileComplexity>> = paths
        .par_iter()
        .map(|p| analyze_file(p, rules))
        .collect();

    let mut files = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        match outcome {
            Ok(FileComplexity { path, report }) if strict => {
                let report = report.into_strict().map_err(|e| e.in_file(&path))?;
                files.push(FileComplexity { path, report });
            }
            Ok(f) => {
                if f.report.is_partial() {
                    warn!(
                        path = %f.path.display(),
                        skipped = f.report.diagnostics.len(),
                        "partially scored tree"
                    );
                }
                files.push(f);
            }
            Err(e) if !strict && e.is_recoverable() => warn!(error = %e, "skipping tree"),
            Err(e) => return Err(e),
        }
    }
    Ok(files)
}

/// Analyze tree files, print the results, and return how many files
/// exceed the threshold.
pub fn run(paths: &[PathBuf], rules: &RuleTable, opts: &AnalyzeOptions) -> Result<usize> {
    let mut files = collect(paths, rules, opts.strict)?;

    // Highest total first, path as tie-breaker for stable output
    files.sort_by(|a, b| {
        b.report
            .total
            .cmp(&a.report.total)
            .then_with(|| a.path.cmp(&b.path))
    });

    if opts.json {
        print_json(&files)?;
    } else if opts.trace {
        print_trace(&files);
    } else {
        print_report(&files);
    }

    let over = match opts.threshold {
        Some(limit) => files.iter().filter(|f| f.report.total > limit).count(),
        None => 0,
    };
    info!(files = files.len(), over, "analysis finished");
    Ok(over)
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
