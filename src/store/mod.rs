//! Employee and attendance operations on top of a repository backend.

pub mod attendance;
pub mod dashboard;
pub mod employee;

use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use tracing::info;

use crate::error::{StoreError, StoreResult};
use crate::repo::{AttendanceRepo, EmployeeRepo};

pub use attendance::AttendanceStore;
pub use employee::EmployeeStore;

/// Current time at the precision the database keeps (microseconds).
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Builds both stores over one backend that serves both collections.
pub fn stores<R>(repo: Arc<R>) -> (EmployeeStore, AttendanceStore)
where
    R: EmployeeRepo + AttendanceRepo + 'static,
{
    let employees: Arc<dyn EmployeeRepo> = repo.clone();
    let attendance: Arc<dyn AttendanceRepo> = repo;
    (
        EmployeeStore::new(employees.clone()),
        AttendanceStore::new(attendance, employees),
    )
}

/// Deletes an employee together with its attendance records.
///
/// Attendance goes first, then the employee. The two steps are not atomic:
/// a failure in between leaves the employee in place with no attendance.
/// Returns how many attendance records were removed.
pub async fn delete_employee_cascade(
    employees: &EmployeeStore,
    attendance: &AttendanceStore,
    id: &str,
) -> StoreResult<u64> {
    let employee = employees.get(id).await?;

    let removed = attendance.delete_for_employee(id).await?;

    if !employees.delete(id).await? {
        // removed by a concurrent request between the two steps
        return Err(StoreError::employee_not_found());
    }

    info!(
        id = %employee.id,
        employee_id = %employee.employee_id,
        attendance_removed = removed,
        "Employee deleted"
    );
    Ok(removed)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::model::employee::{Employee, NewEmployee};
    use crate::repo::MemoryRepository;

    pub fn memory_stores() -> (EmployeeStore, AttendanceStore) {
        stores(Arc::new(MemoryRepository::new()))
    }

    pub fn new_employee(employee_id: &str, email: &str, department: &str) -> NewEmployee {
        NewEmployee {
            employee_id: employee_id.to_string(),
            full_name: format!("Employee {}", employee_id),
            email: email.to_string(),
            department: department.to_string(),
        }
    }

    pub async fn hire(
        store: &EmployeeStore,
        employee_id: &str,
        email: &str,
        department: &str,
    ) -> Employee {
        store
            .create(new_employee(employee_id, email, department))
            .await
            .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::model::attendance::{DateRange, MarkAttendance};
    use chrono::NaiveDate;

    #[actix_web::test]
    async fn cascade_removes_attendance_then_employee() {
        let (employees, attendance) = memory_stores();
        let doomed = hire(&employees, "E1", "a@x.com", "Engineering").await;
        let kept = hire(&employees, "E2", "b@x.com", "Finance").await;

        for (who, day) in [(&doomed, 1), (&doomed, 2), (&kept, 1)] {
            attendance
                .mark(MarkAttendance {
                    employee_id: who.id.to_string(),
                    date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
                    status: "Present".into(),
                })
                .await
                .unwrap();
        }

        let removed = delete_employee_cascade(&employees, &attendance, &doomed.id.to_string())
            .await
            .unwrap();
        assert_eq!(removed, 2);

        assert!(matches!(
            employees.get(&doomed.id.to_string()).await,
            Err(StoreError::NotFound(_))
        ));
        let left = attendance.list_all(DateRange::default()).await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].employee.as_ref().unwrap().id, kept.id);
    }

    #[actix_web::test]
    async fn cascade_reports_missing_and_malformed_ids() {
        let (employees, attendance) = memory_stores();

        let missing = crate::model::RecordId::new().to_string();
        assert!(matches!(
            delete_employee_cascade(&employees, &attendance, &missing).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            delete_employee_cascade(&employees, &attendance, "nope").await,
            Err(StoreError::InvalidArgument(_))
        ));
    }
}
