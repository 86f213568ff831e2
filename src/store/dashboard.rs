use crate::error::StoreResult;
use crate::model::dashboard::Dashboard;
use crate::store::{AttendanceStore, EmployeeStore};

/// Read-only summary combining headcount, today's attendance and the
/// department distribution. The three reads run concurrently.
pub async fn summary(
    employees: &EmployeeStore,
    attendance: &AttendanceStore,
) -> StoreResult<Dashboard> {
    let (total_employees, today_stats, department_stats) = futures::try_join!(
        employees.count(),
        attendance.today_stats(),
        employees.department_stats(),
    )?;

    Ok(Dashboard {
        total_employees,
        today_stats,
        department_stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attendance::MarkAttendance;
    use crate::model::employee::Department;
    use crate::store::testing::{hire, memory_stores};
    use chrono::Local;

    #[actix_web::test]
    async fn composes_counts_today_and_departments() {
        let (employees, attendance) = memory_stores();
        let e1 = hire(&employees, "E1", "a@x.com", "Engineering").await;
        hire(&employees, "E2", "b@x.com", "Engineering").await;
        hire(&employees, "E3", "c@x.com", "Finance").await;

        let today = Local::now().date_naive();
        attendance
            .mark(MarkAttendance {
                employee_id: e1.id.to_string(),
                date: today,
                status: "Absent".into(),
            })
            .await
            .unwrap();

        let dashboard = summary(&employees, &attendance).await.unwrap();

        assert_eq!(dashboard.total_employees, 3);
        let departments: Vec<_> = dashboard
            .department_stats
            .iter()
            .map(|d| (d.department, d.count))
            .collect();
        assert_eq!(
            departments,
            vec![(Department::Engineering, 2), (Department::Finance, 1)]
        );

        let t = dashboard.today_stats;
        assert_eq!(t.present + t.absent + t.not_marked, 3);
        if t.date == today {
            assert_eq!(t.absent, 1);
        }
    }

    #[actix_web::test]
    async fn empty_system_has_an_all_zero_dashboard() {
        let (employees, attendance) = memory_stores();
        let dashboard = summary(&employees, &attendance).await.unwrap();

        assert_eq!(dashboard.total_employees, 0);
        assert!(dashboard.department_stats.is_empty());
        assert_eq!(dashboard.today_stats.not_marked, 0);
    }
}
