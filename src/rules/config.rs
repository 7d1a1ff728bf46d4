//! TOML form of a rule table.
//!
//! ```toml
//! formula = "additive"
//! max_depth = 256
//! alternatives_as_boolean = false
//!
//! [[rule]]
//! kind = "conditional"
//! base_increment = 1
//! nesting_sensitive = true
//! ```
//!
//! Rules keep the order they are listed in. Kinds that are not listed
//! score zero.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::table::{DEFAULT_MAX_DEPTH, NestingFormula, RuleEntry, RuleTable};
use crate::error::{AnalysisError, Result};

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

/// On-disk shape of a rule table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleFile {
    #[serde(default)]
    pub formula: NestingFormula,
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    #[serde(default)]
    pub alternatives_as_boolean: bool,
    #[serde(default, rename = "rule")]
    pub rules: Vec<RuleEntry>,
}

impl From<&RuleTable> for RuleFile {
    fn from(table: &RuleTable) -> Self {
        Self {
            formula: table.formula(),
            max_depth: table.max_depth(),
            alternatives_as_boolean: table.alternatives_as_boolean(),
            rules: table.entries().to_vec(),
        }
    }
}

impl TryFrom<RuleFile> for RuleTable {
    type Error = AnalysisError;

    fn try_from(file: RuleFile) -> Result<Self> {
        if file.rules.is_empty() {
            warn!("rule table has no rules; every tree will score 0");
        }
        Ok(RuleTable::new(file.rules, file.formula, file.max_depth)?
            .with_alternatives_as_boolean(file.alternatives_as_boolean))
    }
}

impl RuleTable {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: RuleFile = toml::from_str(text)?;
        file.try_into()
    }

    /// Load a rule table from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let table = Self::from_toml_str(&text)?;
        debug!(
            path = %path.display(),
            rules = table.entries().len(),
            "loaded rule table"
        );
        Ok(table)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(&RuleFile::from(self))
            .map_err(|e| AnalysisError::Config(format!("cannot serialize rule table: {e}")))
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
