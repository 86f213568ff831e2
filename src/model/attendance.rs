use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::{IntoParams, ToSchema};

use crate::error::StoreError;
use crate::model::RecordId;
use crate::model::employee::{Department, Employee};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, AsRefStr, ToSchema,
)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl AttendanceStatus {
    pub fn parse(raw: &str) -> Result<Self, StoreError> {
        AttendanceStatus::from_str(raw).map_err(|_| {
            StoreError::InvalidArgument(
                r#"Status must be either "Present" or "Absent""#.to_string(),
            )
        })
    }
}

/// One stored attendance row. At most one exists per (employee, date).
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceRecord {
    pub id: RecordId,
    pub employee_id: RecordId,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Employee fields embedded in attendance responses.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct EmployeeInfo {
    #[schema(value_type = String, format = "uuid")]
    pub id: RecordId,
    pub employee_id: String,
    pub full_name: String,
    pub email: String,
    pub department: Department,
}

impl From<&Employee> for EmployeeInfo {
    fn from(e: &Employee) -> Self {
        EmployeeInfo {
            id: e.id,
            employee_id: e.employee_id.clone(),
            full_name: e.full_name.clone(),
            email: e.email.clone(),
            department: e.department,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AttendanceView {
    #[schema(value_type = String, format = "uuid")]
    pub id: RecordId,

    /// Absent when the owning employee no longer exists.
    pub employee: Option<EmployeeInfo>,

    #[schema(value_type = String, format = "date", example = "2024-01-01")]
    pub date: NaiveDate,

    pub status: AttendanceStatus,

    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,

    #[schema(value_type = String, format = "date-time")]
    pub updated_at: DateTime<Utc>,
}

impl AttendanceView {
    pub fn new(record: AttendanceRecord, employee: Option<EmployeeInfo>) -> Self {
        AttendanceView {
            id: record.id,
            employee,
            date: record.date,
            status: record.status,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct MarkAttendance {
    #[schema(example = "0b6f4c1e-3c1a-4d8e-9a57-1f0f2b7c9d11")]
    pub employee_id: String,

    #[schema(value_type = String, format = "date", example = "2024-01-01")]
    pub date: NaiveDate,

    #[schema(example = "Present")]
    pub status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum MarkOutcome {
    Created,
    Updated,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marked {
    pub record: AttendanceView,
    pub outcome: MarkOutcome,
}

/// Inclusive calendar-date bounds; a missing side is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DateRange {
    #[param(value_type = Option<String>, format = "date", example = "2024-01-01")]
    pub start_date: Option<NaiveDate>,
    #[param(value_type = Option<String>, format = "date", example = "2024-01-31")]
    pub end_date: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start_date: Option<NaiveDate>, end_date: Option<NaiveDate>) -> Self {
        DateRange { start_date, end_date }
    }

    pub fn day(date: NaiveDate) -> Self {
        DateRange::new(Some(date), Some(date))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date.is_none_or(|start| date >= start)
            && self.end_date.is_none_or(|end| date <= end)
    }
}

/// Selection used by the attendance repository for listing and counting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttendanceFilter {
    pub employee_id: Option<RecordId>,
    pub range: DateRange,
}

impl AttendanceFilter {
    pub fn matches(&self, record: &AttendanceRecord) -> bool {
        self.employee_id.is_none_or(|id| record.employee_id == id) && self.range.contains(record.date)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub present: i64,
    pub absent: i64,
}

impl StatusCounts {
    pub fn add(&mut self, status: AttendanceStatus, count: i64) {
        match status {
            AttendanceStatus::Present => self.present += count,
            AttendanceStatus::Absent => self.absent += count,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct AttendanceSummary {
    pub total_days: i64,
    pub present_days: i64,
    pub absent_days: i64,
}

impl From<StatusCounts> for AttendanceSummary {
    fn from(c: StatusCounts) -> Self {
        AttendanceSummary {
            total_days: c.present + c.absent,
            present_days: c.present,
            absent_days: c.absent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct EmployeeBrief {
    #[schema(value_type = String, format = "uuid")]
    pub id: RecordId,
    pub employee_id: String,
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct EmployeeSummary {
    pub employee: EmployeeBrief,
    pub summary: AttendanceSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct TodayStats {
    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,
    pub present: i64,
    pub absent: i64,
    /// Employees without a record today; negative only when data is inconsistent.
    pub not_marked: i64,
}
