use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, MySql, MySqlPool, QueryBuilder};

use crate::error::{StoreError, StoreResult};
use crate::model::RecordId;
use crate::model::attendance::{AttendanceFilter, AttendanceRecord, AttendanceStatus, StatusCounts};
use crate::model::dashboard::DepartmentCount;
use crate::model::employee::{Department, Employee};
use crate::repo::{AttendanceRepo, EmployeeRepo};

const EMPLOYEE_COLUMNS: &str =
    "id, employee_id, full_name, email, department, created_at, updated_at";

const ATTENDANCE_COLUMNS: &str = "id, employee_id, `date`, status, created_at, updated_at";

pub struct MySqlRepository {
    pool: MySqlPool,
}

impl MySqlRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct EmployeeRow {
    id: String,
    employee_id: String,
    full_name: String,
    email: String,
    department: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<EmployeeRow> for Employee {
    type Error = sqlx::Error;

    fn try_from(row: EmployeeRow) -> Result<Self, Self::Error> {
        Ok(Employee {
            id: RecordId::from_str(&row.id).map_err(decode_err)?,
            employee_id: row.employee_id,
            full_name: row.full_name,
            email: row.email,
            department: Department::from_str(&row.department).map_err(decode_err)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct AttendanceRow {
    id: String,
    employee_id: String,
    date: NaiveDate,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AttendanceRow> for AttendanceRecord {
    type Error = sqlx::Error;

    fn try_from(row: AttendanceRow) -> Result<Self, Self::Error> {
        Ok(AttendanceRecord {
            id: RecordId::from_str(&row.id).map_err(decode_err)?,
            employee_id: RecordId::from_str(&row.employee_id).map_err(decode_err)?,
            date: row.date,
            status: AttendanceStatus::from_str(&row.status).map_err(decode_err)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn decode_err<E>(e: E) -> sqlx::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    sqlx::Error::Decode(Box::new(e))
}

const DUPLICATE_KEY: &str = "23000";

fn is_duplicate_key(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db_err) => is_duplicate_code(db_err.code().as_deref()),
        _ => false,
    }
}

fn is_duplicate_code(code: Option<&str>) -> bool {
    code == Some(DUPLICATE_KEY)
}

/// Names the column from MySQL's "Duplicate entry ... for key ..." message.
fn employee_conflict(db_message: &str, employee: &Employee) -> StoreError {
    if db_message.contains("uq_employees_email") {
        StoreError::Conflict(format!(
            r#"Employee with email "{}" already exists"#,
            employee.email
        ))
    } else {
        StoreError::Conflict(format!(
            r#"Employee with ID "{}" already exists"#,
            employee.employee_id
        ))
    }
}

fn decode_rows<R, T>(rows: Vec<R>) -> StoreResult<Vec<T>>
where
    T: TryFrom<R, Error = sqlx::Error>,
{
    rows.into_iter()
        .map(|r| T::try_from(r).map_err(StoreError::from))
        .collect()
}

/// Appends `WHERE ...` for the filter; bounds are inclusive.
fn push_filter(qb: &mut QueryBuilder<'_, MySql>, filter: &AttendanceFilter) {
    let mut prefix = " WHERE ";

    if let Some(employee_id) = filter.employee_id {
        qb.push(prefix).push("employee_id = ").push_bind(employee_id.to_string());
        prefix = " AND ";
    }
    if let Some(start) = filter.range.start_date {
        qb.push(prefix).push("`date` >= ").push_bind(start);
        prefix = " AND ";
    }
    if let Some(end) = filter.range.end_date {
        qb.push(prefix).push("`date` <= ").push_bind(end);
    }
}

#[async_trait]
impl EmployeeRepo for MySqlRepository {
    async fn list(&self) -> StoreResult<Vec<Employee>> {
        let sql = format!(
            "SELECT {} FROM employees ORDER BY created_at DESC, id DESC",
            EMPLOYEE_COLUMNS
        );
        let rows = sqlx::query_as::<_, EmployeeRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        decode_rows(rows)
    }

    async fn find_by_id(&self, id: RecordId) -> StoreResult<Option<Employee>> {
        let sql = format!("SELECT {} FROM employees WHERE id = ?", EMPLOYEE_COLUMNS);
        let row = sqlx::query_as::<_, EmployeeRow>(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Employee::try_from).transpose()?)
    }

    async fn find_by_ids(&self, ids: &[RecordId]) -> StoreResult<Vec<Employee>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb = QueryBuilder::<MySql>::new(format!(
            "SELECT {} FROM employees WHERE id IN (",
            EMPLOYEE_COLUMNS
        ));
        let mut separated = qb.separated(", ");
        for id in ids {
            separated.push_bind(id.to_string());
        }
        separated.push_unseparated(")");

        let rows = qb
            .build_query_as::<EmployeeRow>()
            .fetch_all(&self.pool)
            .await?;
        decode_rows(rows)
    }

    async fn find_by_employee_id(&self, employee_id: &str) -> StoreResult<Option<Employee>> {
        let sql = format!(
            "SELECT {} FROM employees WHERE employee_id = ?",
            EMPLOYEE_COLUMNS
        );
        let row = sqlx::query_as::<_, EmployeeRow>(&sql)
            .bind(employee_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Employee::try_from).transpose()?)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Employee>> {
        let sql = format!("SELECT {} FROM employees WHERE email = ?", EMPLOYEE_COLUMNS);
        let row = sqlx::query_as::<_, EmployeeRow>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Employee::try_from).transpose()?)
    }

    async fn insert(&self, employee: &Employee) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO employees
            (id, employee_id, full_name, email, department, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(employee.id.to_string())
        .bind(&employee.employee_id)
        .bind(&employee.full_name)
        .bind(&employee.email)
        .bind(employee.department.as_ref())
        .bind(employee.created_at)
        .bind(employee.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if is_duplicate_code(db_err.code().as_deref()) => {
                Err(employee_conflict(db_err.message(), employee))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, id: RecordId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM employees WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> StoreResult<i64> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    async fn count_by_department(&self) -> StoreResult<Vec<DepartmentCount>> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT department, COUNT(*) AS count
            FROM employees
            GROUP BY department
            ORDER BY count DESC, department ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(department, count)| -> StoreResult<DepartmentCount> {
                let department = Department::from_str(&department).map_err(decode_err)?;
                Ok(DepartmentCount { department, count })
            })
            .collect()
    }
}

#[async_trait]
impl AttendanceRepo for MySqlRepository {
    async fn list(&self, filter: &AttendanceFilter) -> StoreResult<Vec<AttendanceRecord>> {
        let mut qb = QueryBuilder::<MySql>::new(format!(
            "SELECT {} FROM attendance",
            ATTENDANCE_COLUMNS
        ));
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY `date` DESC, created_at DESC");

        let rows = qb
            .build_query_as::<AttendanceRow>()
            .fetch_all(&self.pool)
            .await?;
        decode_rows(rows)
    }

    async fn find_for_day(
        &self,
        employee_id: RecordId,
        date: NaiveDate,
    ) -> StoreResult<Option<AttendanceRecord>> {
        let sql = format!(
            "SELECT {} FROM attendance WHERE employee_id = ? AND `date` = ?",
            ATTENDANCE_COLUMNS
        );
        let row = sqlx::query_as::<_, AttendanceRow>(&sql)
            .bind(employee_id.to_string())
            .bind(date)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(AttendanceRecord::try_from).transpose()?)
    }

    async fn insert(&self, record: &AttendanceRecord) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO attendance
            (id, employee_id, `date`, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.id.to_string())
        .bind(record.employee_id.to_string())
        .bind(record.date)
        .bind(record.status.as_ref())
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_key(&e) => Err(StoreError::Conflict(
                "Attendance already recorded for this date".to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn update_status(
        &self,
        id: RecordId,
        status: AttendanceStatus,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let result = sqlx::query("UPDATE attendance SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_ref())
            .bind(updated_at)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_by_status(&self, filter: &AttendanceFilter) -> StoreResult<StatusCounts> {
        let mut qb = QueryBuilder::<MySql>::new("SELECT status, COUNT(*) AS count FROM attendance");
        push_filter(&mut qb, filter);
        qb.push(" GROUP BY status");

        let rows = qb
            .build_query_as::<(String, i64)>()
            .fetch_all(&self.pool)
            .await?;

        let mut counts = StatusCounts::default();
        for (status, count) in rows {
            let status = AttendanceStatus::from_str(&status).map_err(decode_err)?;
            counts.add(status, count);
        }
        Ok(counts)
    }

    async fn delete_for_employee(&self, employee_id: RecordId) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM attendance WHERE employee_id = ?")
            .bind(employee_id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
