//! Reports
//!
//! A report is a named composition of queries into a [`DataSet`]. Reports
//! are registered with a [`ReportService`] and built on request.

mod service;

pub use service::ReportService;

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::catalog::ParameterDescriptor;
use crate::error::ReportError;
use crate::executor::{QueryContext, QueryExecutor};
use crate::models::DataSet;

/// A buildable report
#[async_trait]
pub trait Report: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> Option<&str> {
        None
    }

    /// Cultures the report supports; empty means every culture
    fn supported_cultures(&self) -> &[String] {
        &[]
    }

    fn parameters(&self) -> &[ParameterDescriptor] {
        &[]
    }

    /// Build the report data
    async fn build(&self, executor: &QueryExecutor, request: &ReportRequest) -> Result<ReportResponse, ReportError>;

    fn info(&self) -> ReportInfo {
        ReportInfo {
            name: self.name().to_string(),
            description: self.description().map(str::to_string),
            supported_cultures: self.supported_cultures().to_vec(),
            parameters: self.parameters().to_vec(),
        }
    }

    fn is_matching_culture(&self, culture: Option<&str>) -> bool {
        let cultures = self.supported_cultures();
        cultures.is_empty() || cultures.iter().any(|supported| is_matching_culture(supported, culture))
    }
}

/// Serializable summary of a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportInfo {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub supported_cultures: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<ParameterDescriptor>,
}

/// Request to build a report
#[derive(Debug, Clone, Default)]
pub struct ReportRequest {
    pub report_name: String,
    pub culture: Option<String>,
    pub parameters: HashMap<String, String>,
    pub context: QueryContext,
}

impl ReportRequest {
    pub fn new(report_name: impl Into<String>) -> Self {
        Self {
            report_name: report_name.into(),
            ..Default::default()
        }
    }

    pub fn with_culture(mut self, culture: impl Into<String>) -> Self {
        self.culture = Some(culture.into());
        self
    }

    pub fn parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    pub fn with_context(mut self, context: QueryContext) -> Self {
        self.context = context;
        self
    }
}

/// Built report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub data_set: Option<DataSet>,
    pub culture: Option<String>,
    #[serde(default)]
    pub parameters: HashMap<String, String>,
}

impl ReportResponse {
    /// Response echoing the culture and parameters of a request
    pub fn new(data_set: DataSet, request: &ReportRequest) -> Self {
        Self {
            data_set: Some(data_set),
            culture: request.culture.clone(),
            parameters: request.parameters.clone(),
        }
    }
}

/// Culture `test` matches `supported` when either is blank, both are equal
/// ignoring case, or `test` extends `supported` (`de-CH` matches `de`)
pub fn is_matching_culture(supported: &str, test: Option<&str>) -> bool {
    let supported = supported.trim();
    let test = test.map(str::trim).unwrap_or_default();
    if supported.is_empty() || test.is_empty() {
        return true;
    }
    if supported.eq_ignore_ascii_case(test) {
        return true;
    }
    test.len() > supported.len()
        && test
            .get(..supported.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(supported))
}
