//! Report registry

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use super::{Report, ReportInfo, ReportRequest, ReportResponse};
use crate::error::ReportError;
use crate::executor::QueryExecutor;

/// Registry of reports, built against one [`QueryExecutor`]
pub struct ReportService {
    executor: Arc<QueryExecutor>,
    reports: RwLock<Vec<Arc<dyn Report>>>,
}

impl ReportService {
    pub fn new(executor: Arc<QueryExecutor>) -> Self {
        Self {
            executor,
            reports: RwLock::new(Vec::new()),
        }
    }

    pub fn executor(&self) -> &QueryExecutor {
        &self.executor
    }

    /// Register a report; names are unique ignoring case
    pub fn add(&self, report: Arc<dyn Report>) -> Result<(), ReportError> {
        let mut reports = self.reports.write();
        if reports.iter().any(|r| r.name().eq_ignore_ascii_case(report.name())) {
            return Err(ReportError::DuplicateReport(report.name().to_string()));
        }
        info!(report = %report.name(), "Registered report");
        reports.push(report);
        Ok(())
    }

    /// Remove a report by name, returning it
    pub fn remove(&self, name: &str) -> Result<Arc<dyn Report>, ReportError> {
        let mut reports = self.reports.write();
        let index = reports
            .iter()
            .position(|r| r.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| ReportError::UnknownReport(name.to_string()))?;
        let report = reports.remove(index);
        info!(report = %report.name(), "Removed report");
        Ok(report)
    }

    /// Report by name, ignoring case
    pub fn get(&self, name: &str) -> Option<Arc<dyn Report>> {
        self.reports
            .read()
            .iter()
            .find(|r| r.name().eq_ignore_ascii_case(name))
            .cloned()
    }

    /// Reports supporting a culture; every report when none is given
    pub fn reports(&self, culture: Option<&str>) -> Vec<Arc<dyn Report>> {
        self.reports
            .read()
            .iter()
            .filter(|r| r.is_matching_culture(culture))
            .cloned()
            .collect()
    }

    pub fn report_infos(&self, culture: Option<&str>) -> Vec<ReportInfo> {
        self.reports(culture).iter().map(|r| r.info()).collect()
    }

    pub fn len(&self) -> usize {
        self.reports.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.read().is_empty()
    }

    /// Build the requested report
    pub async fn build_report(&self, request: &ReportRequest) -> Result<ReportResponse, ReportError> {
        let report = self
            .get(&request.report_name)
            .ok_or_else(|| ReportError::UnknownReport(request.report_name.clone()))?;

        debug!(report = %report.name(), culture = ?request.culture, "Building report");
        report.build(&self.executor, request).await
    }
}

impl std::fmt::Debug for ReportService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<String> = self.reports.read().iter().map(|r| r.name().to_string()).collect();
        f.debug_struct("ReportService")
            .field("executor", &self.executor)
            .field("reports", &names)
            .finish()
    }
}
