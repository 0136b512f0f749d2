//! Seed file format for the reference brackets.
//!
//! ```toml
//! [[bracket]]
//! weight_range = "50-100"
//! t_range = "20-25"
//! weight_min = 50.0
//! weight_max = 100.0
//! t_min = 20.0
//! t_max = 25.0
//! coe_min = 1.2
//! coe_max = 1.8
//! fcr = 1.1
//! ```

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};

use crate::bracket::FeedBracket;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BracketSeed {
    #[serde(default, rename = "bracket")]
    pub brackets: Vec<FeedBracket>,
}

impl BracketSeed {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading seed file {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate every bracket. Duplicate keys are an error.
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let seed: BracketSeed = toml::from_str(content)?;
        let mut seen = HashSet::new();
        for bracket in &seed.brackets {
            bracket.validate()?;
            if !seen.insert(bracket.table_key()) {
                bail!("duplicate bracket {}", bracket.table_key());
            }
        }
        Ok(seed)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
