use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, Utc};
use tracing::{debug, info, instrument, warn};

use crate::error::{StoreError, StoreResult};
use crate::model::RecordId;
use crate::model::attendance::{
    AttendanceFilter, AttendanceRecord, AttendanceStatus, AttendanceSummary, AttendanceView,
    DateRange, EmployeeBrief, EmployeeInfo, EmployeeSummary, MarkAttendance, MarkOutcome, Marked,
    TodayStats,
};
use crate::model::employee::Employee;
use crate::repo::{AttendanceRepo, EmployeeRepo};
use crate::store::now;

#[derive(Clone)]
pub struct AttendanceStore {
    repo: Arc<dyn AttendanceRepo>,
    employees: Arc<dyn EmployeeRepo>,
}

impl AttendanceStore {
    pub fn new(repo: Arc<dyn AttendanceRepo>, employees: Arc<dyn EmployeeRepo>) -> Self {
        Self { repo, employees }
    }

    /// All records in `range`, newest date first.
    pub async fn list_all(&self, range: DateRange) -> StoreResult<Vec<AttendanceView>> {
        let records = self
            .repo
            .list(&AttendanceFilter {
                employee_id: None,
                range,
            })
            .await?;
        self.with_employees(records).await
    }

    pub async fn list_for_employee(
        &self,
        employee_id: &str,
        range: DateRange,
    ) -> StoreResult<Vec<AttendanceView>> {
        let employee = self.existing_employee(employee_id).await?;

        let records = self
            .repo
            .list(&AttendanceFilter {
                employee_id: Some(employee.id),
                range,
            })
            .await?;

        let info = EmployeeInfo::from(&employee);
        Ok(records
            .into_iter()
            .map(|r| AttendanceView::new(r, Some(info.clone())))
            .collect())
    }

    /// Records `status` for the employee on `date`, overwriting any earlier
    /// mark for that day.
    #[instrument(skip(self, input), fields(employee_id = %input.employee_id, date = %input.date))]
    pub async fn mark(&self, input: MarkAttendance) -> StoreResult<Marked> {
        let status = AttendanceStatus::parse(&input.status)?;
        let employee = self.existing_employee(&input.employee_id).await?;
        let stamp = now();

        let (record, outcome) = match self.repo.find_for_day(employee.id, input.date).await? {
            Some(existing) => (
                self.overwrite(existing, status, stamp).await?,
                MarkOutcome::Updated,
            ),
            None => {
                let record = AttendanceRecord {
                    id: RecordId::new(),
                    employee_id: employee.id,
                    date: input.date,
                    status,
                    created_at: stamp,
                    updated_at: stamp,
                };
                match self.repo.insert(&record).await {
                    Ok(()) => (record, MarkOutcome::Created),
                    Err(StoreError::Conflict(_)) => {
                        // a concurrent mark inserted first; last write wins
                        debug!("Lost insert race, updating the winning record");
                        let existing = self
                            .repo
                            .find_for_day(employee.id, input.date)
                            .await?
                            .ok_or_else(|| {
                                StoreError::Conflict(
                                    "Attendance changed concurrently, try again".to_string(),
                                )
                            })?;
                        (
                            self.overwrite(existing, status, stamp).await?,
                            MarkOutcome::Updated,
                        )
                    }
                    Err(e) => return Err(e),
                }
            }
        };

        info!(record_id = %record.id, %status, ?outcome, "Attendance marked");
        Ok(Marked {
            record: AttendanceView::new(record, Some(EmployeeInfo::from(&employee))),
            outcome,
        })
    }

    pub async fn employee_summary(&self, employee_id: &str) -> StoreResult<EmployeeSummary> {
        let employee = self.existing_employee(employee_id).await?;

        let counts = self
            .repo
            .count_by_status(&AttendanceFilter {
                employee_id: Some(employee.id),
                range: DateRange::default(),
            })
            .await?;

        Ok(EmployeeSummary {
            employee: EmployeeBrief {
                id: employee.id,
                employee_id: employee.employee_id,
                full_name: employee.full_name,
            },
            summary: AttendanceSummary::from(counts),
        })
    }

    /// Attendance counts for the current local calendar day.
    pub async fn today_stats(&self) -> StoreResult<TodayStats> {
        self.stats_on(Local::now().date_naive()).await
    }

    pub async fn stats_on(&self, date: NaiveDate) -> StoreResult<TodayStats> {
        let filter = AttendanceFilter {
            employee_id: None,
            range: DateRange::day(date),
        };
        let (counts, total) =
            futures::try_join!(self.repo.count_by_status(&filter), self.employees.count())?;

        let not_marked = total - counts.present - counts.absent;
        if not_marked < 0 {
            warn!(
                %date,
                total,
                present = counts.present,
                absent = counts.absent,
                "More attendance records than employees"
            );
        }

        Ok(TodayStats {
            date,
            present: counts.present,
            absent: counts.absent,
            not_marked,
        })
    }

    /// Removes every record of the employee and returns how many went.
    pub async fn delete_for_employee(&self, employee_id: &str) -> StoreResult<u64> {
        let id = RecordId::parse_employee(employee_id)?;
        let removed = self.repo.delete_for_employee(id).await?;
        debug!(employee = %id, removed, "Attendance records deleted");
        Ok(removed)
    }

    async fn existing_employee(&self, employee_id: &str) -> StoreResult<Employee> {
        let id = RecordId::parse_employee(employee_id)?;
        self.employees
            .find_by_id(id)
            .await?
            .ok_or_else(StoreError::employee_not_found)
    }

    async fn overwrite(
        &self,
        mut record: AttendanceRecord,
        status: AttendanceStatus,
        stamp: DateTime<Utc>,
    ) -> StoreResult<AttendanceRecord> {
        if !self.repo.update_status(record.id, status, stamp).await? {
            return Err(StoreError::NotFound(
                "Attendance record not found".to_string(),
            ));
        }
        record.status = status;
        record.updated_at = stamp;
        Ok(record)
    }

    /// Embeds the owning employee into each record with one batched lookup.
    async fn with_employees(
        &self,
        records: Vec<AttendanceRecord>,
    ) -> StoreResult<Vec<AttendanceView>> {
        let mut ids: Vec<RecordId> = records.iter().map(|r| r.employee_id).collect();
        ids.sort();
        ids.dedup();

        let owners: HashMap<RecordId, EmployeeInfo> = self
            .employees
            .find_by_ids(&ids)
            .await?
            .iter()
            .map(|e| (e.id, EmployeeInfo::from(e)))
            .collect();

        Ok(records
            .into_iter()
            .map(|r| {
                let owner = owners.get(&r.employee_id).cloned();
                AttendanceView::new(r, owner)
            })
            .collect())
    }
}
