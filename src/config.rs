//! Configuration for query execution

use serde::{Deserialize, Serialize};

/// Configuration for query execution and result tables
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportingConfig {
    /// Reject parameters an operation does not declare, unless a request
    /// says otherwise
    pub strict_parameters: bool,

    /// Append one column per bound parameter to query result tables
    pub append_parameter_columns: bool,

    /// Operation name prefixes stripped to form result table names,
    /// first match wins
    pub table_name_prefixes: Vec<String>,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            strict_parameters: false,
            append_parameter_columns: true,
            table_name_prefixes: vec!["Query".to_string(), "Get".to_string()],
        }
    }
}

impl ReportingConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> ReportingConfigBuilder {
        ReportingConfigBuilder::default()
    }

    /// Parse a configuration from TOML; missing keys keep their defaults
    #[cfg(feature = "toml")]
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Table name for an operation: the first matching prefix is stripped
    /// unless nothing would remain
    pub fn table_name(&self, operation: &str) -> String {
        self.table_name_prefixes
            .iter()
            .filter(|prefix| !prefix.is_empty())
            .find_map(|prefix| operation.strip_prefix(prefix.as_str()))
            .filter(|name| !name.is_empty())
            .unwrap_or(operation)
            .to_string()
    }
}

/// Builder for ReportingConfig
#[derive(Debug, Default)]
pub struct ReportingConfigBuilder {
    config: ReportingConfig,
}

impl ReportingConfigBuilder {
    /// Set the default strictness of parameter binding
    pub fn strict_parameters(mut self, strict: bool) -> Self {
        self.config.strict_parameters = strict;
        self
    }

    /// Enable or disable parameter columns in result tables
    pub fn append_parameter_columns(mut self, append: bool) -> Self {
        self.config.append_parameter_columns = append;
        self
    }

    /// Replace the table name prefixes
    pub fn table_name_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.table_name_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Build the configuration
    pub fn build(self) -> ReportingConfig {
        self.config
    }
}
