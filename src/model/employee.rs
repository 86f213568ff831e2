use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::StoreError;
use crate::model::RecordId;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    AsRefStr,
    EnumIter,
    ToSchema,
)]
pub enum Department {
    Engineering,
    #[serde(rename = "Human Resources")]
    #[strum(serialize = "Human Resources")]
    HumanResources,
    Finance,
    Marketing,
    Sales,
    Operations,
    #[serde(rename = "IT")]
    #[strum(serialize = "IT")]
    It,
    Legal,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "id": "0b6f4c1e-3c1a-4d8e-9a57-1f0f2b7c9d11",
        "employee_id": "EMP-001",
        "full_name": "John Doe",
        "email": "john.doe@company.com",
        "department": "Engineering",
        "created_at": "2024-01-01T09:00:00Z",
        "updated_at": "2024-01-01T09:00:00Z"
    })
)]
pub struct Employee {
    #[schema(value_type = String, format = "uuid")]
    pub id: RecordId,

    #[schema(example = "EMP-001")]
    pub employee_id: String,

    #[schema(example = "John Doe")]
    pub full_name: String,

    #[schema(example = "john.doe@company.com")]
    pub email: String,

    pub department: Department,

    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,

    #[schema(value_type = String, format = "date-time")]
    pub updated_at: DateTime<Utc>,
}

/// Create-employee payload as received from a client.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct NewEmployee {
    #[validate(length(min = 1, max = 20, message = "Employee ID must be 1 to 20 characters"))]
    #[schema(example = "EMP-001")]
    pub employee_id: String,

    #[validate(length(min = 2, max = 100, message = "Name must be 2 to 100 characters"))]
    #[schema(example = "John Doe")]
    pub full_name: String,

    #[validate(
        email(message = "Please provide a valid email address"),
        length(max = 254, message = "Email must be at most 254 characters")
    )]
    #[schema(example = "john.doe@company.com", format = "email")]
    pub email: String,

    #[schema(example = "Engineering")]
    pub department: String,
}

/// A create payload after normalization and validation.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeDraft {
    pub employee_id: String,
    pub full_name: String,
    pub email: String,
    pub department: Department,
}

impl NewEmployee {
    /// Trims and case-normalizes the free-text fields, then validates the
    /// result. The department must already be spelled exactly.
    pub fn prepare(self) -> Result<EmployeeDraft, StoreError> {
        let normalized = NewEmployee {
            employee_id: self.employee_id.trim().to_uppercase(),
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            department: self.department,
        };

        normalized
            .validate()
            .map_err(|e| StoreError::InvalidArgument(format!("Validation failed: {}", e)))?;

        let department = Department::from_str(&normalized.department).map_err(|_| {
            StoreError::InvalidArgument(format!(
                "{} is not a valid department",
                normalized.department
            ))
        })?;

        Ok(EmployeeDraft {
            employee_id: normalized.employee_id,
            full_name: normalized.full_name,
            email: normalized.email,
            department,
        })
    }
}

impl EmployeeDraft {
    pub fn into_employee(self, now: DateTime<Utc>) -> Employee {
        Employee {
            id: RecordId::new(),
            employee_id: self.employee_id,
            full_name: self.full_name,
            email: self.email,
            department: self.department,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use strum::IntoEnumIterator;

    fn payload(employee_id: &str, full_name: &str, email: &str, department: &str) -> NewEmployee {
        NewEmployee {
            employee_id: employee_id.into(),
            full_name: full_name.into(),
            email: email.into(),
            department: department.into(),
        }
    }

    /// Syntactically valid, but longer than the `employees.email` column.
    fn long_email() -> String {
        let label = "b".repeat(60);
        format!("{}@{label}.{label}.{label}.{label}.com", "a".repeat(64))
    }

    #[test]
    fn long_email_is_syntactically_valid() {
        let email = long_email();
        assert!(email.len() > 254);
        assert!(validator::ValidateEmail::validate_email(&email));
    }

    #[test]
    fn prepare_normalizes_case_and_whitespace() {
        let draft = payload("  emp-7 ", "  Ada Lovelace ", " Ada@Example.COM ", "Engineering")
            .prepare()
            .unwrap();

        assert_eq!(draft.employee_id, "EMP-7");
        assert_eq!(draft.full_name, "Ada Lovelace");
        assert_eq!(draft.email, "ada@example.com");
        assert_eq!(draft.department, Department::Engineering);
    }

    #[rstest]
    #[case::empty_id("   ", "Ada Lovelace", "ada@example.com", "Engineering")]
    #[case::long_id("ABCDEFGHIJKLMNOPQRSTU", "Ada Lovelace", "ada@example.com", "Engineering")]
    #[case::short_name("E1", " A ", "ada@example.com", "Engineering")]
    #[case::bad_email("E1", "Ada Lovelace", "ada.example.com", "Engineering")]
    #[case::unknown_department("E1", "Ada Lovelace", "ada@example.com", "Research")]
    #[case::department_casing("E1", "Ada Lovelace", "ada@example.com", "engineering")]
    #[case::padded_department("E1", "Ada Lovelace", "ada@example.com", " Engineering")]
    #[case::long_email("E1", "Ada Lovelace", &long_email(), "Engineering")]
    fn prepare_rejects_invalid_fields(
        #[case] employee_id: &str,
        #[case] full_name: &str,
        #[case] email: &str,
        #[case] department: &str,
    ) {
        let err = payload(employee_id, full_name, email, department)
            .prepare()
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidArgument(_)));
    }

    #[test]
    fn department_names_match_their_wire_form() {
        for department in Department::iter() {
            let wire = serde_json::to_value(department).unwrap();
            assert_eq!(wire, serde_json::Value::String(department.to_string()));
            assert_eq!(Department::from_str(department.as_ref()).unwrap(), department);
        }
        assert_eq!(Department::HumanResources.to_string(), "Human Resources");
        assert_eq!(Department::It.to_string(), "IT");
    }
}
