use crate::api::attendance::{AttendanceListResponse, AttendanceResponse, DashboardResponse};
use crate::api::employee::{EmployeeListResponse, EmployeeResponse};
use crate::model::attendance::{
    AttendanceStatus, AttendanceSummary, AttendanceView, EmployeeBrief, EmployeeInfo,
    EmployeeSummary, MarkAttendance, TodayStats,
};
use crate::model::dashboard::{Dashboard, DepartmentCount};
use crate::model::employee::{Department, Employee, NewEmployee};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRMS Lite API",
        version = "1.0.0",
        description = r#"
## HRMS Lite

A lightweight **Human Resource Management** backend.

### 🔹 Key Features
- **Employee Management**
  - Create, list, view and delete employees
  - Business employee IDs and emails are unique
- **Attendance Management**
  - Mark an employee Present or Absent for a day; re-marking overwrites
  - Filter by date or date range, per employee or across everyone
- **Dashboard**
  - Headcount, today's attendance and department distribution

### 📦 Response Format
Every response carries a `success` flag; errors add a `message`.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::create_employee,
        crate::api::employee::delete_employee,

        crate::api::attendance::list_attendance,
        crate::api::attendance::mark_attendance,
        crate::api::attendance::employee_attendance,
        crate::api::attendance::attendance_summary,
        crate::api::attendance::get_dashboard
    ),
    components(
        schemas(
            Department,
            Employee,
            NewEmployee,
            EmployeeResponse,
            EmployeeListResponse,
            AttendanceStatus,
            EmployeeInfo,
            AttendanceView,
            MarkAttendance,
            AttendanceResponse,
            AttendanceListResponse,
            EmployeeBrief,
            AttendanceSummary,
            EmployeeSummary,
            TodayStats,
            DepartmentCount,
            Dashboard,
            DashboardResponse
        )
    ),
    tags(
        (name = "Employee", description = "Employee management APIs"),
        (name = "Attendance", description = "Attendance management APIs"),
    )
)]
pub struct ApiDoc;

/// Paths in [`ApiDoc`] are written against this prefix.
const DOC_PREFIX: &str = "/api";

/// The OpenAPI document with paths moved under the configured prefix.
pub fn openapi(api_prefix: &str) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    if api_prefix != DOC_PREFIX {
        doc.paths.paths = std::mem::take(&mut doc.paths.paths)
            .into_iter()
            .map(|(path, item)| match path.strip_prefix(DOC_PREFIX) {
                Some(rest) => (format!("{api_prefix}{rest}"), item),
                None => (path, item),
            })
            .collect();
    }
    doc
}
