//! JSON configuration for the extract command.
//!
//! The document shape is `{"tables": [{"name", "columns"?, "ids"?}]}`.
//! Tables are extracted in declared order. The config is parsed once,
//! validated, and passed around immutably for the rest of the run.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Declarative description of one extraction target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSpec {
    /// Table to extract
    pub name: String,
    /// Explicit column allow-list; absent means all columns
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
    /// Primary-key allow-list; absent means all rows
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<i64>>,
}

/// Complete extraction configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Extraction targets in declared order
    pub tables: Vec<TableSpec>,
}

impl ExtractConfig {
    /// Load and validate configuration from a JSON file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: ExtractConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the document shape cannot express.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.tables.is_empty() {
            anyhow::bail!("Config lists no tables to extract");
        }
        for spec in &self.tables {
            if spec.name.is_empty() {
                anyhow::bail!("Config contains a table with an empty name");
            }
            if let Some(ref columns) = spec.columns {
                if columns.is_empty() {
                    anyhow::bail!(
                        "Table {}: columns, when present, must not be empty",
                        spec.name
                    );
                }
            }
        }
        Ok(())
    }
}
