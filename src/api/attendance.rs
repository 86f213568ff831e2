use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::error::StoreError;
use crate::model::attendance::{AttendanceView, DateRange, MarkAttendance, MarkOutcome};
use crate::model::dashboard::Dashboard;
use crate::store::{AttendanceStore, EmployeeStore, dashboard};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AttendanceQuery {
    /// Single day; takes precedence over the range bounds.
    #[param(value_type = Option<String>, format = "date", example = "2024-01-15")]
    pub date: Option<NaiveDate>,
    #[param(value_type = Option<String>, format = "date", example = "2024-01-01")]
    pub start_date: Option<NaiveDate>,
    #[param(value_type = Option<String>, format = "date", example = "2024-01-31")]
    pub end_date: Option<NaiveDate>,
}

impl AttendanceQuery {
    fn range(&self) -> DateRange {
        match self.date {
            Some(day) => DateRange::day(day),
            None => DateRange::new(self.start_date, self.end_date),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct AttendanceListResponse {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = 1)]
    pub count: usize,
    pub data: Vec<AttendanceView>,
}

#[derive(Serialize, ToSchema)]
pub struct AttendanceResponse {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = "Attendance marked successfully")]
    pub message: String,
    pub data: AttendanceView,
}

#[derive(Serialize, ToSchema)]
pub struct DashboardResponse {
    #[schema(example = true)]
    pub success: bool,
    pub data: Dashboard,
}

fn list_response(data: Vec<AttendanceView>) -> HttpResponse {
    HttpResponse::Ok().json(AttendanceListResponse {
        success: true,
        count: data.len(),
        data,
    })
}

/// List Attendance
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Attendance records, newest date first", body = AttendanceListResponse),
        (status = 400, description = "Malformed date")
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    attendance: web::Data<AttendanceStore>,
    query: web::Query<AttendanceQuery>,
) -> Result<HttpResponse, StoreError> {
    let data = attendance.list_all(query.range()).await?;
    Ok(list_response(data))
}

/// Mark Attendance
///
/// Creates the record for (employee, date) or overwrites the status of the
/// existing one.
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = MarkAttendance,
    responses(
        (status = 201, description = "Attendance marked", body = AttendanceResponse),
        (status = 200, description = "Existing attendance updated", body = AttendanceResponse),
        (status = 400, description = "Invalid employee ID or status", body = Object, example = json!({
            "success": false,
            "message": "Status must be either \"Present\" or \"Absent\""
        })),
        (status = 404, description = "Employee not found")
    ),
    tag = "Attendance"
)]
pub async fn mark_attendance(
    attendance: web::Data<AttendanceStore>,
    payload: web::Json<MarkAttendance>,
) -> Result<HttpResponse, StoreError> {
    let marked = attendance.mark(payload.into_inner()).await?;

    let (mut builder, message) = match marked.outcome {
        MarkOutcome::Created => (HttpResponse::Created(), "Attendance marked successfully"),
        MarkOutcome::Updated => (HttpResponse::Ok(), "Attendance updated successfully"),
    };

    Ok(builder.json(AttendanceResponse {
        success: true,
        message: message.to_string(),
        data: marked.record,
    }))
}

/// Attendance for one employee
#[utoipa::path(
    get,
    path = "/api/attendance/employee/{employee_id}",
    params(
        ("employee_id", Path, description = "Internal employee ID"),
        DateRange
    ),
    responses(
        (status = 200, description = "Employee attendance records", body = AttendanceListResponse),
        (status = 400, description = "Invalid employee ID format"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Attendance"
)]
pub async fn employee_attendance(
    attendance: web::Data<AttendanceStore>,
    path: web::Path<String>,
    range: web::Query<DateRange>,
) -> Result<HttpResponse, StoreError> {
    let data = attendance
        .list_for_employee(&path.into_inner(), range.into_inner())
        .await?;
    Ok(list_response(data))
}

/// Attendance summary for one employee
#[utoipa::path(
    get,
    path = "/api/attendance/summary/{employee_id}",
    params(
        ("employee_id", Path, description = "Internal employee ID")
    ),
    responses(
        (status = 200, description = "Present/absent totals", body = Object, example = json!({
            "success": true,
            "data": {
                "employee": {
                    "id": "0b6f4c1e-3c1a-4d8e-9a57-1f0f2b7c9d11",
                    "employee_id": "EMP-001",
                    "full_name": "John Doe"
                },
                "summary": { "total_days": 20, "present_days": 18, "absent_days": 2 }
            }
        })),
        (status = 400, description = "Invalid employee ID format"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Attendance"
)]
pub async fn attendance_summary(
    attendance: web::Data<AttendanceStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, StoreError> {
    let summary = attendance.employee_summary(&path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": summary
    })))
}

/// Dashboard
#[utoipa::path(
    get,
    path = "/api/attendance/dashboard",
    responses(
        (status = 200, description = "Headcount, today's attendance and departments", body = DashboardResponse)
    ),
    tag = "Attendance"
)]
pub async fn get_dashboard(
    employees: web::Data<EmployeeStore>,
    attendance: web::Data<AttendanceStore>,
) -> Result<HttpResponse, StoreError> {
    let data = dashboard::summary(&employees, &attendance).await?;

    Ok(HttpResponse::Ok().json(DashboardResponse {
        success: true,
        data,
    }))
}
