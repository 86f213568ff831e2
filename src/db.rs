use sqlx::MySqlPool;
use tracing::info;

/// Table definitions, applied in order. The unique keys carry the
/// business-ID, email and one-record-per-day invariants; their text columns
/// compare bytes, since values are normalized before they get here.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS employees (
        id CHAR(36) NOT NULL PRIMARY KEY,
        employee_id VARCHAR(20) COLLATE utf8mb4_bin NOT NULL,
        full_name VARCHAR(100) NOT NULL,
        email VARCHAR(254) COLLATE utf8mb4_bin NOT NULL,
        department VARCHAR(32) NOT NULL,
        created_at DATETIME(6) NOT NULL,
        updated_at DATETIME(6) NOT NULL,
        UNIQUE KEY uq_employees_employee_id (employee_id),
        UNIQUE KEY uq_employees_email (email),
        KEY idx_employees_department (department),
        KEY idx_employees_created_at (created_at)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS attendance (
        id CHAR(36) NOT NULL PRIMARY KEY,
        employee_id CHAR(36) COLLATE utf8mb4_bin NOT NULL,
        `date` DATE NOT NULL,
        status VARCHAR(16) NOT NULL,
        created_at DATETIME(6) NOT NULL,
        updated_at DATETIME(6) NOT NULL,
        UNIQUE KEY uq_attendance_employee_date (employee_id, `date`),
        KEY idx_attendance_date (`date`)
    )
    "#,
];

pub async fn init_db(database_url: &str) -> Result<MySqlPool, sqlx::Error> {
    let pool = MySqlPool::connect(database_url).await?;
    ensure_schema(&pool).await?;
    Ok(pool)
}

/// Creates missing tables; existing ones are left untouched.
pub async fn ensure_schema(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    info!(tables = SCHEMA.len(), "Database schema ready");
    Ok(())
}
