use crate::error::{AnalysisError, Result};

/// One open nesting construct.
#[derive(Debug, Clone, Copy)]
struct Frame {
    depth: usize,
    scope: Option<usize>,
}

/// Structural depth for a single walk.
///
/// Each `enter`/`enter_scope` pushes a frame and each `leave` pops one, so
/// depth can never go below zero: popping with nothing open is reported
/// as a `NestingImbalance`. A tracker belongs to exactly one walk.
#[derive(Debug, Default)]
pub struct NestingTracker {
    frames: Vec<Frame>,
    peak: usize,
}

impl NestingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Descend into a nesting construct. Returns the new depth.
    pub fn enter(&mut self) -> usize {
        let depth = self.current_depth() + 1;
        let scope = self.current_scope();
        self.push(Frame { depth, scope });
        depth
    }

    /// Open a function scope. With `reset` its body is scored from depth 0,
    /// otherwise it inherits the enclosing depth.
    pub fn enter_scope(&mut self, scope: usize, reset: bool) {
        let depth = if reset { 0 } else { self.current_depth() };
        self.push(Frame {
            depth,
            scope: Some(scope),
        });
    }

    pub fn leave(&mut self) -> Result<()> {
        match self.frames.pop() {
            Some(_) => Ok(()),
            None => Err(AnalysisError::NestingImbalance {
                detail: "leave() without a matching enter()".into(),
            }),
        }
    }

    pub fn current_depth(&self) -> usize {
        self.frames.last().map_or(0, |f| f.depth)
    }

    /// Innermost open function scope.
    pub fn current_scope(&self) -> Option<usize> {
        self.frames.last().and_then(|f| f.scope)
    }

    /// Close the tracker, checking every enter was left. Returns the peak.
    pub fn finish(self) -> Result<usize> {
        if self.frames.is_empty() {
            Ok(self.peak)
        } else {
            Err(AnalysisError::NestingImbalance {
                detail: format!("{} construct(s) still open after the walk", self.frames.len()),
            })
        }
    }

    fn push(&mut self, frame: Frame) {
        self.peak = self.peak.max(frame.depth);
        self.frames.push(frame);
    }
}

#[cfg(test)]
#[path = "nesting_test.rs"]
mod tests;
