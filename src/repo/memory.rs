use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{StoreError, StoreResult};
use crate::model::RecordId;
use crate::model::attendance::{AttendanceFilter, AttendanceRecord, AttendanceStatus, StatusCounts};
use crate::model::dashboard::DepartmentCount;
use crate::model::employee::{Department, Employee};
use crate::repo::{AttendanceRepo, EmployeeRepo};

/// Process-local backend holding both collections.
///
/// Enforces the same unique keys as the MySQL schema. Rows carry an insertion
/// sequence so that ordering stays deterministic when timestamps collide.
#[derive(Default)]
pub struct MemoryRepository {
    state: RwLock<State>,
}

#[derive(Default)]
struct State {
    seq: u64,
    employees: HashMap<RecordId, (u64, Employee)>,
    attendance: HashMap<RecordId, (u64, AttendanceRecord)>,
}

impl State {
    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl EmployeeRepo for MemoryRepository {
    async fn list(&self) -> StoreResult<Vec<Employee>> {
        let state = self.read();
        let mut rows: Vec<_> = state.employees.values().collect();
        rows.sort_by_key(|(seq, e)| Reverse((e.created_at, *seq)));
        Ok(rows.into_iter().map(|(_, e)| e.clone()).collect())
    }

    async fn find_by_id(&self, id: RecordId) -> StoreResult<Option<Employee>> {
        Ok(self.read().employees.get(&id).map(|(_, e)| e.clone()))
    }

    async fn find_by_ids(&self, ids: &[RecordId]) -> StoreResult<Vec<Employee>> {
        let state = self.read();
        Ok(ids
            .iter()
            .filter_map(|id| state.employees.get(id).map(|(_, e)| e.clone()))
            .collect())
    }

    async fn find_by_employee_id(&self, employee_id: &str) -> StoreResult<Option<Employee>> {
        Ok(self
            .read()
            .employees
            .values()
            .find(|(_, e)| e.employee_id == employee_id)
            .map(|(_, e)| e.clone()))
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Employee>> {
        Ok(self
            .read()
            .employees
            .values()
            .find(|(_, e)| e.email == email)
            .map(|(_, e)| e.clone()))
    }

    async fn insert(&self, employee: &Employee) -> StoreResult<()> {
        let mut state = self.write();

        for (_, existing) in state.employees.values() {
            if existing.employee_id == employee.employee_id {
                return Err(StoreError::Conflict(
                    "An employee with this employee_id already exists".to_string(),
                ));
            }
            if existing.email == employee.email {
                return Err(StoreError::Conflict(
                    "An employee with this email already exists".to_string(),
                ));
            }
        }

        let seq = state.next_seq();
        state.employees.insert(employee.id, (seq, employee.clone()));
        Ok(())
    }

    async fn delete(&self, id: RecordId) -> StoreResult<bool> {
        Ok(self.write().employees.remove(&id).is_some())
    }

    async fn count(&self) -> StoreResult<i64> {
        Ok(self.read().employees.len() as i64)
    }

    async fn count_by_department(&self) -> StoreResult<Vec<DepartmentCount>> {
        let state = self.read();

        // keyed by display name so ties order the same way as the SQL backend
        let mut groups: BTreeMap<String, (Department, i64)> = BTreeMap::new();
        for (_, e) in state.employees.values() {
            groups
                .entry(e.department.to_string())
                .or_insert((e.department, 0))
                .1 += 1;
        }

        let mut stats: Vec<_> = groups
            .into_values()
            .map(|(department, count)| DepartmentCount { department, count })
            .collect();
        // stable sort keeps the name order among equal counts
        stats.sort_by_key(|s| Reverse(s.count));
        Ok(stats)
    }
}

#[async_trait]
impl AttendanceRepo for MemoryRepository {
    async fn list(&self, filter: &AttendanceFilter) -> StoreResult<Vec<AttendanceRecord>> {
        let state = self.read();
        let mut rows: Vec<_> = state
            .attendance
            .values()
            .filter(|(_, r)| filter.matches(r))
            .collect();
        rows.sort_by_key(|(seq, r)| Reverse((r.date, r.created_at, *seq)));
        Ok(rows.into_iter().map(|(_, r)| r.clone()).collect())
    }

    async fn find_for_day(
        &self,
        employee_id: RecordId,
        date: NaiveDate,
    ) -> StoreResult<Option<AttendanceRecord>> {
        Ok(self
            .read()
            .attendance
            .values()
            .find(|(_, r)| r.employee_id == employee_id && r.date == date)
            .map(|(_, r)| r.clone()))
    }

    async fn insert(&self, record: &AttendanceRecord) -> StoreResult<()> {
        let mut state = self.write();

        let taken = state
            .attendance
            .values()
            .any(|(_, r)| r.employee_id == record.employee_id && r.date == record.date);
        if taken {
            return Err(StoreError::Conflict(
                "Attendance already recorded for this date".to_string(),
            ));
        }

        let seq = state.next_seq();
        state.attendance.insert(record.id, (seq, record.clone()));
        Ok(())
    }

    async fn update_status(
        &self,
        id: RecordId,
        status: AttendanceStatus,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let mut state = self.write();
        match state.attendance.get_mut(&id) {
            Some((_, record)) => {
                record.status = status;
                record.updated_at = updated_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count_by_status(&self, filter: &AttendanceFilter) -> StoreResult<StatusCounts> {
        let state = self.read();
        let mut counts = StatusCounts::default();
        for (_, r) in state.attendance.values().filter(|(_, r)| filter.matches(r)) {
            counts.add(r.status, 1);
        }
        Ok(counts)
    }

    async fn delete_for_employee(&self, employee_id: RecordId) -> StoreResult<u64> {
        let mut state = self.write();
        let before = state.attendance.len();
        state.attendance.retain(|_, (_, r)| r.employee_id != employee_id);
        Ok((before - state.attendance.len()) as u64)
    }
}
