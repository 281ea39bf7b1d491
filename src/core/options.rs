//! Reconciliation options
//!
//! The shape mirrors the editor module configuration, so a host's
//! `{ "table": { "tableInTableError": "…" } }` block deserializes as is.

use serde::{Deserialize, Serialize};

use crate::data::constants::{ANNOTATED_TABLE_IN_TABLE_ERROR, DEFAULT_MAX_REPAIR_DEPTH};
use crate::utils::error::{ConversionError, ConversionResult};

/// Table-specific options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableOptions {
    /// Text inserted before every table moved out of its parent cell
    /// Default: empty
    pub table_in_table_error: String,
}

/// Options for the whole reconciliation pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReconcileOptions {
    pub table: TableOptions,

    /// How many times a repaired table may be fed back through the
    /// converter before it is flattened to plain text
    /// Default: 4
    pub max_repair_depth: usize,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            table: TableOptions::default(),
            max_repair_depth: DEFAULT_MAX_REPAIR_DEPTH,
        }
    }
}

impl ReconcileOptions {
    /// Create new options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that label every extracted inner table
    pub fn annotated() -> Self {
        Self {
            table: TableOptions {
                table_in_table_error: ANNOTATED_TABLE_IN_TABLE_ERROR.to_string(),
            },
            ..Self::default()
        }
    }

    /// Never re-run the converter: nested tables are flattened to text
    pub fn strict() -> Self {
        Self {
            max_repair_depth: 0,
            ..Self::default()
        }
    }

    pub fn with_table_in_table_error(mut self, prefix: impl Into<String>) -> Self {
        self.table.table_in_table_error = prefix.into();
        self
    }

    /// Parse options from a JSON document
    pub fn from_json_str(input: &str) -> ConversionResult<Self> {
        serde_json::from_str(input).map_err(|e| ConversionError::config("json", e.to_string()))
    }

    /// Parse options from a TOML document
    #[cfg(feature = "data-loading")]
    pub fn from_toml_str(input: &str) -> ConversionResult<Self> {
        toml::from_str(input).map_err(|e| ConversionError::config("toml", e.to_string()))
    }

    /// Parse options from a YAML document
    #[cfg(feature = "data-loading")]
    pub fn from_yaml_str(input: &str) -> ConversionResult<Self> {
        serde_yaml::from_str(input).map_err(|e| ConversionError::config("yaml", e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = ReconcileOptions::default();
        assert_eq!(opts.table.table_in_table_error, "");
        assert_eq!(opts.max_repair_depth, 4);
    }

    #[test]
    fn test_host_config_shape() {
        let opts = ReconcileOptions::from_json_str(
            r#"{"table": {"tableInTableError": "moved"}, "operationMenu": {}}"#,
        )
        .unwrap();
        assert_eq!(opts.table.table_in_table_error, "moved");
        assert_eq!(opts.max_repair_depth, 4);
    }

    #[test]
    fn test_bad_json_is_config_error() {
        let err = ReconcileOptions::from_json_str(r#"{"maxRepairDepth": "deep"}"#).unwrap_err();
        assert!(err.to_string().contains("json"));
    }

    #[test]
    fn test_presets() {
        assert!(!ReconcileOptions::annotated()
            .table
            .table_in_table_error
            .is_empty());
        assert_eq!(ReconcileOptions::strict().max_repair_depth, 0);
    }

    #[cfg(feature = "data-loading")]
    #[test]
    fn test_toml_and_yaml() {
        let opts = ReconcileOptions::from_toml_str("maxRepairDepth = 2\n[table]\ntableInTableError = \"x\"\n")
            .unwrap();
        assert_eq!(opts.max_repair_depth, 2);
        assert_eq!(opts.table.table_in_table_error, "x");

        let opts = ReconcileOptions::from_yaml_str("table:\n  tableInTableError: y\n").unwrap();
        assert_eq!(opts.table.table_in_table_error, "y");
    }
}
