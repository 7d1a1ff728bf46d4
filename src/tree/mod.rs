/// Syntax tree model consumed by the walker.
///
/// Trees are built once per analysis by a language front-end (or
/// deserialized from its JSON output) and are read-only while walking.
mod node;
mod span;

pub use node::{BoolOp, Edge, NodeKind, Pattern, SyntaxNode};
pub use span::Span;

use std::path::Path;

use serde::Deserialize;

use crate::error::Result;

/// Parse a tree from the front-end's JSON interchange form.
///
/// Nesting is not capped by the parser: deep trees grow the stack on the
/// heap as needed and are left for the walker's depth limit to judge.
pub fn from_json(text: &str) -> Result<SyntaxNode> {
    let mut de = serde_json::Deserializer::from_str(text);
    de.disable_recursion_limit();
    let root = SyntaxNode::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(root)
}

/// Read and parse a JSON tree file.
pub fn load(path: &Path) -> Result<SyntaxNode> {
    let text = std::fs::read_to_string(path)?;
    from_json(&text)
}
