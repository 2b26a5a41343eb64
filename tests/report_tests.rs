//! Report service tests

mod common;

use std::sync::Arc;

use async_trait::async_trait;

use api_reporting_sdk::catalog::ParameterDescriptor;
use api_reporting_sdk::error::ReportError;
use api_reporting_sdk::executor::{QueryExecutor, QueryRequest};
use api_reporting_sdk::models::{DataRelation, DataSet, DataTable};
use api_reporting_sdk::report::{Report, ReportRequest, ReportResponse, ReportService};
use api_reporting_sdk::value::ValueType;

/// Tenants with their employees
struct StaffReport {
    cultures: Vec<String>,
    parameters: Vec<ParameterDescriptor>,
}

impl StaffReport {
    fn new() -> Self {
        Self {
            cultures: vec!["de".to_string(), "en-US".to_string()],
            parameters: vec![ParameterDescriptor::required("tenantId", ValueType::String)],
        }
    }
}

#[async_trait]
impl Report for StaffReport {
    fn name(&self) -> &str {
        "Staff"
    }

    fn description(&self) -> Option<&str> {
        Some("Tenants and their employees")
    }

    fn supported_cultures(&self) -> &[String] {
        &self.cultures
    }

    fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    async fn build(&self, executor: &QueryExecutor, request: &ReportRequest) -> Result<ReportResponse, ReportError> {
        let tenants = executor
            .query(&QueryRequest::new("QueryTenants").primary_key("Id"), &request.context)
            .await?;
        let employees = executor
            .query(
                &QueryRequest::new("GetEmployees").with_parameters(request.parameters.clone()),
                &request.context,
            )
            .await?;

        let mut data_set = DataSet::new(self.name());
        for table in [tenants, employees].into_iter().flatten() {
            data_set.tables.push(DataTable::from_relational(&table)?);
        }
        data_set
            .relations
            .push(DataRelation::new("TenantEmployees", "Tenants", "Id", "Employees", "TenantId"));
        Ok(ReportResponse::new(data_set, request))
    }
}

/// Report without culture restrictions
struct SummaryReport;

#[async_trait]
impl Report for SummaryReport {
    fn name(&self) -> &str {
        "Summary"
    }

    async fn build(&self, _executor: &QueryExecutor, request: &ReportRequest) -> Result<ReportResponse, ReportError> {
        Ok(ReportResponse::new(DataSet::new("Summary"), request))
    }
}

fn service() -> ReportService {
    let service = ReportService::new(Arc::new(common::executor()));
    service.add(Arc::new(StaffReport::new())).unwrap();
    service.add(Arc::new(SummaryReport)).unwrap();
    service
}

mod registry_tests {
    use super::*;

    #[test]
    fn test_duplicate_names_are_rejected() {
        let service = service();
        let err = service.add(Arc::new(SummaryReport)).unwrap_err();
        assert!(matches!(err, ReportError::DuplicateReport(ref name) if name == "Summary"));
        assert_eq!(service.len(), 2);
    }

    #[test]
    fn test_remove() {
        let service = service();
        let removed = service.remove("summary").unwrap();
        assert_eq!(removed.name(), "Summary");
        assert!(service.get("Summary").is_none());
        assert!(matches!(service.remove("Summary"), Err(ReportError::UnknownReport(_))));
    }

    #[test]
    fn test_reports_by_culture() {
        let service = service();
        let names = |culture: Option<&str>| -> Vec<String> {
            service.reports(culture).iter().map(|r| r.name().to_string()).collect()
        };

        assert_eq!(names(Some("de-CH")), vec!["Staff", "Summary"]);
        assert_eq!(names(Some("EN-us")), vec!["Staff", "Summary"]);
        assert_eq!(names(Some("en")), vec!["Summary"]);
        assert_eq!(names(Some("fr")), vec!["Summary"]);
        assert_eq!(names(None), vec!["Staff", "Summary"]);
    }

    #[test]
    fn test_report_infos() {
        let service = service();
        let infos = service.report_infos(Some("de"));
        let json = serde_json::to_value(&infos[0]).unwrap();

        assert_eq!(json["name"], "Staff");
        assert_eq!(json["description"], "Tenants and their employees");
        assert_eq!(json["supportedCultures"], serde_json::json!(["de", "en-US"]));
        assert_eq!(json["parameters"][0]["name"], "tenantId");
        assert!(infos[1].description.is_none());
    }
}

mod build_tests {
    use super::*;

    #[tokio::test]
    async fn test_build_report() {
        let service = service();
        let request = ReportRequest::new("staff").with_culture("de").parameter("tenantId", "T1");

        let response = service.build_report(&request).await.unwrap();
        assert_eq!(response.culture.as_deref(), Some("de"));

        let data_set = response.data_set.unwrap();
        assert_eq!(data_set.tables.len(), 2);
        assert!(data_set.has_data());

        let employees = data_set.table("Employees").unwrap();
        let tenant_column = employees.column_index("TenantId").unwrap();
        assert!(employees.rows.iter().all(|row| row.cell(tenant_column) == Some("T1")));

        // the composed data set converts with its relation intact
        let relational = data_set.to_relational().unwrap();
        assert_eq!(relational.relations[0].child_columns, vec!["TenantId"]);
    }

    #[tokio::test]
    async fn test_build_failures() {
        let service = service();

        let err = service.build_report(&ReportRequest::new("Missing")).await.unwrap_err();
        assert!(matches!(err, ReportError::UnknownReport(_)));

        // query failures surface unchanged
        let err = service.build_report(&ReportRequest::new("Staff")).await.unwrap_err();
        assert!(matches!(err, ReportError::MissingParameter { .. }));
    }
}
