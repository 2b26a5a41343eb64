//! Shared fixtures: an employee directory exposed as queries

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::anyhow;
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use api_reporting_sdk::catalog::{HandlerType, OperationCatalog, OperationSpec, ParameterDescriptor};
use api_reporting_sdk::executor::{
    QueryContext, QueryExecutor, QueryResult, ResultAdapter, StaticActivator, StatusPayload,
};
use api_reporting_sdk::value::{Value, ValueType};
use api_reporting_sdk::{Enumeration, enumeration, impl_record};

enumeration! {
    #[derive(Serialize)]
    pub enum Gender {
        Female = 0,
        Male = 1,
        Diverse = 2,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Address {
    pub city: String,
    pub zip: Option<String>,
}

impl_record!(Address {
    "City" => city,
    "Zip" => zip,
});

#[derive(Debug, Clone, Serialize)]
pub struct Employee {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub salary: Option<Decimal>,
    pub hired: DateTime<Utc>,
    pub address: Option<Address>,
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl_record!(Employee {
    "Id" => id,
    "FirstName" => first_name,
    "LastName" => last_name,
    "Gender" => gender,
    "Salary" => salary,
    "Hired" => hired,
    "Address" => address,
    "Attributes" => attributes,
});

#[derive(Debug, Clone, Serialize)]
pub struct Tenant {
    pub id: String,
    pub name: String,
}

impl_record!(Tenant {
    "Id" => id,
    "Name" => name,
});

pub fn employees() -> Vec<Employee> {
    let mut attributes = BTreeMap::new();
    attributes.insert("team".to_string(), serde_json::json!("Compilers"));

    vec![
        Employee {
            id: 1,
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            gender: Gender::Female,
            salary: Some(Decimal::new(850_000, 2)),
            hired: Utc.with_ymd_and_hms(2020, 1, 15, 9, 30, 0).unwrap(),
            address: Some(Address {
                city: "London".into(),
                zip: None,
            }),
            attributes,
        },
        Employee {
            id: 2,
            first_name: "Alan".into(),
            last_name: "Turing".into(),
            gender: Gender::Male,
            salary: None,
            hired: Utc.with_ymd_and_hms(2021, 6, 1, 0, 0, 0).unwrap(),
            address: None,
            attributes: BTreeMap::new(),
        },
        Employee {
            id: 3,
            first_name: "Grace".into(),
            last_name: "Hopper \"Amazing\"".into(),
            gender: Gender::Female,
            salary: Some(Decimal::new(910_050, 2)),
            hired: Utc.with_ymd_and_hms(2019, 11, 3, 17, 5, 12).unwrap(),
            address: Some(Address {
                city: "Arlington".into(),
                zip: Some("22201".into()),
            }),
            attributes: BTreeMap::new(),
        },
    ]
}

pub fn tenants() -> Vec<Tenant> {
    vec![
        Tenant {
            id: "T1".into(),
            name: "Acme".into(),
        },
        Tenant {
            id: "T2".into(),
            name: "Globex".into(),
        },
    ]
}

/// Handler serving the employee directory
pub struct EmployeesController {
    pub employees: Vec<Employee>,
}

/// Handler serving tenants asynchronously
pub struct TenantsController {
    pub tenants: Vec<Tenant>,
}

/// Host wrapper around a result, like a web framework action result
pub struct ActionResult(pub QueryResult);

impl ResultAdapter for ActionResult {
    fn convert(self: Box<Self>) -> QueryResult {
        self.0
    }
}

fn employee_operations() -> HandlerType {
    HandlerType::new("EmployeesController")
        .module("directory")
        .route("api/[controller]")
        .operation(
            OperationSpec::new("GetEmployees")
                .parameter(ParameterDescriptor::required("tenantId", ValueType::String))
                .parameter(ParameterDescriptor::optional("limit", ValueType::Int32, Value::Int32(100)))
                .parameter(ParameterDescriptor::required("gender", ValueType::Enum(Gender::descriptor())).nullable())
                .handle(|controller: &EmployeesController, arguments| {
                    let limit = arguments.value_or_default::<i32>("limit").unwrap_or(100);
                    let gender = arguments.enumeration::<Gender>("gender");
                    let employees = controller
                        .employees
                        .iter()
                        .filter(|e| gender.is_none_or(|gender| e.gender == gender))
                        .take(usize::try_from(limit).unwrap_or_default())
                        .cloned();
                    Ok(QueryResult::items(employees))
                }),
        )
        .operation(
            OperationSpec::new("GetEmployee")
                .route("{id}")
                .parameter(ParameterDescriptor::required("id", ValueType::Int32))
                .handle(|controller: &EmployeesController, arguments| {
                    let id = arguments.value::<i32>("id");
                    let result = match controller.employees.iter().find(|e| Some(e.id) == id) {
                        Some(employee) => QueryResult::ok(StatusPayload::Item(Box::new(employee.clone()))),
                        None => QueryResult::status(404, StatusPayload::Text(format!("Employee {:?} not found", id))),
                    };
                    Ok(QueryResult::adapted(ActionResult(result)))
                }),
        )
        .operation(
            OperationSpec::new("QueryFailing")
                .handle(|_: &EmployeesController, _| Err(anyhow!("database unavailable"))),
        )
        .operation(
            OperationSpec::new("GetBroken")
                .handle(|_: &EmployeesController, _| Ok(QueryResult::status(500, StatusPayload::Text("crash".into())))),
        )
        .operation(OperationSpec::new("GetNothing").handle(|_: &EmployeesController, _| Ok(QueryResult::Empty)))
        .operation(
            OperationSpec::new("DeleteEmployee")
                .ignore()
                .handle(|_: &EmployeesController, _| Ok(QueryResult::Empty)),
        )
}

fn tenant_operations() -> HandlerType {
    HandlerType::new("TenantsController")
        .module("directory")
        .route("api/[controller]")
        .operation(
            OperationSpec::new("QueryTenants")
                .parameter(ParameterDescriptor::optional("filter", ValueType::Json(None), Value::Null).nullable())
                .handle_async(|controller: Arc<TenantsController>, _arguments| async move {
                    tokio::task::yield_now().await;
                    Ok(QueryResult::items(controller.tenants.clone()))
                }),
        )
}

/// Catalog of both handlers
pub fn catalog() -> OperationCatalog {
    OperationCatalog::builder()
        .handler(employee_operations())
        .handler(tenant_operations())
        .build()
        .expect("fixture catalog builds")
}

pub fn activator() -> StaticActivator {
    StaticActivator::new()
        .register("EmployeesController", |_: &QueryContext| EmployeesController {
            employees: employees(),
        })
        .register("TenantsController", |_: &QueryContext| TenantsController { tenants: tenants() })
}

pub fn executor() -> QueryExecutor {
    QueryExecutor::new(Arc::new(catalog()), Arc::new(activator()))
}
