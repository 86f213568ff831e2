//! Persistence seam between the stores and a concrete database.

pub mod memory;
pub mod mysql;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::error::StoreResult;
use crate::model::RecordId;
use crate::model::attendance::{AttendanceFilter, AttendanceRecord, AttendanceStatus, StatusCounts};
use crate::model::dashboard::DepartmentCount;
use crate::model::employee::Employee;

pub use memory::MemoryRepository;
pub use mysql::MySqlRepository;

#[async_trait]
pub trait EmployeeRepo: Send + Sync {
    /// All employees, newest `created_at` first.
    async fn list(&self) -> StoreResult<Vec<Employee>>;

    async fn find_by_id(&self, id: RecordId) -> StoreResult<Option<Employee>>;

    async fn find_by_ids(&self, ids: &[RecordId]) -> StoreResult<Vec<Employee>>;

    /// Lookup by the normalized business ID.
    async fn find_by_employee_id(&self, employee_id: &str) -> StoreResult<Option<Employee>>;

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Employee>>;

    /// Fails with `Conflict` if the business ID or email is already taken.
    async fn insert(&self, employee: &Employee) -> StoreResult<()>;

    async fn delete(&self, id: RecordId) -> StoreResult<bool>;

    async fn count(&self) -> StoreResult<i64>;

    /// Employees per department, largest group first, ties by name.
    async fn count_by_department(&self) -> StoreResult<Vec<DepartmentCount>>;
}

#[async_trait]
pub trait AttendanceRepo: Send + Sync {
    /// Matching records, newest date first, then newest `created_at`.
    async fn list(&self, filter: &AttendanceFilter) -> StoreResult<Vec<AttendanceRecord>>;

    async fn find_for_day(
        &self,
        employee_id: RecordId,
        date: NaiveDate,
    ) -> StoreResult<Option<AttendanceRecord>>;

    /// Fails with `Conflict` if a record already exists for the same (employee, date).
    async fn insert(&self, record: &AttendanceRecord) -> StoreResult<()>;

    async fn update_status(
        &self,
        id: RecordId,
        status: AttendanceStatus,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<bool>;

    async fn count_by_status(&self, filter: &AttendanceFilter) -> StoreResult<StatusCounts>;

    async fn delete_for_employee(&self, employee_id: RecordId) -> StoreResult<u64>;
}
