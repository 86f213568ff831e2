use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::error::{StoreError, StoreResult};
use crate::model::RecordId;
use crate::model::dashboard::DepartmentCount;
use crate::model::employee::{Employee, NewEmployee};
use crate::repo::EmployeeRepo;
use crate::store::now;

#[derive(Clone)]
pub struct EmployeeStore {
    repo: Arc<dyn EmployeeRepo>,
}

impl EmployeeStore {
    pub fn new(repo: Arc<dyn EmployeeRepo>) -> Self {
        Self { repo }
    }

    /// Newest employees first.
    pub async fn list_all(&self) -> StoreResult<Vec<Employee>> {
        self.repo.list().await
    }

    pub async fn get(&self, id: &str) -> StoreResult<Employee> {
        let id = RecordId::parse_employee(id)?;
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(StoreError::employee_not_found)
    }

    /// Normalizes and validates `data`, rejects a taken business ID or email,
    /// then stores the employee with fresh timestamps.
    #[instrument(skip(self, data), fields(employee_id = %data.employee_id))]
    pub async fn create(&self, data: NewEmployee) -> StoreResult<Employee> {
        let draft = data.prepare()?;

        if self.repo.find_by_employee_id(&draft.employee_id).await?.is_some() {
            debug!("Duplicate employee ID rejected");
            return Err(StoreError::Conflict(format!(
                r#"Employee with ID "{}" already exists"#,
                draft.employee_id
            )));
        }

        if self.repo.find_by_email(&draft.email).await?.is_some() {
            debug!("Duplicate email rejected");
            return Err(StoreError::Conflict(format!(
                r#"Employee with email "{}" already exists"#,
                draft.email
            )));
        }

        let employee = draft.into_employee(now());
        self.repo.insert(&employee).await?;

        info!(id = %employee.id, department = %employee.department, "Employee created");
        Ok(employee)
    }

    /// Returns whether a record was removed. Does not touch attendance; see
    /// [`crate::store::delete_employee_cascade`].
    pub async fn delete(&self, id: &str) -> StoreResult<bool> {
        let id = RecordId::parse_employee(id)?;
        self.repo.delete(id).await
    }

    pub async fn department_stats(&self) -> StoreResult<Vec<DepartmentCount>> {
        self.repo.count_by_department().await
    }

    pub async fn count(&self) -> StoreResult<i64> {
        self.repo.count().await
    }
}
