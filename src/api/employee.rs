use actix_web::{HttpResponse, web};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::error::StoreError;
use crate::model::employee::{Employee, NewEmployee};
use crate::store::{self, AttendanceStore, EmployeeStore};

#[derive(Serialize, ToSchema)]
pub struct EmployeeListResponse {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = 1)]
    pub count: usize,
    pub data: Vec<Employee>,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeResponse {
    #[schema(example = true)]
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "Employee created successfully")]
    pub message: Option<String>,
    pub data: Employee,
}

/// List Employees
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "All employees, newest first", body = EmployeeListResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn list_employees(
    employees: web::Data<EmployeeStore>,
) -> Result<HttpResponse, StoreError> {
    let data = employees.list_all().await?;

    Ok(HttpResponse::Ok().json(EmployeeListResponse {
        success: true,
        count: data.len(),
        data,
    }))
}

/// Get Employee by ID
#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    params(
        ("id", Path, description = "Internal employee ID")
    ),
    responses(
        (status = 200, description = "Employee found", body = EmployeeResponse),
        (status = 400, description = "Invalid employee ID format", body = Object, example = json!({
            "success": false,
            "message": "Invalid employee ID format"
        })),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "success": false,
            "message": "Employee not found"
        }))
    ),
    tag = "Employee"
)]
pub async fn get_employee(
    employees: web::Data<EmployeeStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, StoreError> {
    let employee = employees.get(&path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(EmployeeResponse {
        success: true,
        message: None,
        data: employee,
    }))
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = NewEmployee,
    responses(
        (status = 201, description = "Employee created successfully", body = EmployeeResponse),
        (status = 400, description = "Validation failed", body = Object, example = json!({
            "success": false,
            "message": "Engineer is not a valid department"
        })),
        (status = 409, description = "Employee ID or email already exists", body = Object, example = json!({
            "success": false,
            "message": "Employee with ID \"EMP-001\" already exists"
        }))
    ),
    tag = "Employee"
)]
pub async fn create_employee(
    employees: web::Data<EmployeeStore>,
    payload: web::Json<NewEmployee>,
) -> Result<HttpResponse, StoreError> {
    let employee = employees.create(payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(EmployeeResponse {
        success: true,
        message: Some("Employee created successfully".to_string()),
        data: employee,
    }))
}

/// Delete Employee
///
/// Removes the employee's attendance records first, then the employee.
#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    params(
        ("id", Path, description = "Internal employee ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = Object, example = json!({
            "success": true,
            "message": "Employee and associated attendance records deleted successfully",
            "data": {}
        })),
        (status = 400, description = "Invalid employee ID format"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee"
)]
pub async fn delete_employee(
    employees: web::Data<EmployeeStore>,
    attendance: web::Data<AttendanceStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, StoreError> {
    store::delete_employee_cascade(&employees, &attendance, &path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Employee and associated attendance records deleted successfully",
        "data": {}
    })))
}
