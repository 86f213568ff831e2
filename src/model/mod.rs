pub mod attendance;
pub mod dashboard;
pub mod employee;

use std::str::FromStr;

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;

/// Store-assigned identifier of an employee or attendance record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, From,
)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    pub fn new() -> Self {
        RecordId(Uuid::new_v4())
    }

    /// Parses a client-supplied employee identifier.
    pub fn parse_employee(raw: &str) -> Result<Self, StoreError> {
        raw.parse()
            .map_err(|_| StoreError::invalid_employee_id())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for RecordId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(RecordId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_display() {
        let id = RecordId::new();
        let parsed: RecordId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn malformed_ids_are_invalid_arguments() {
        for raw in ["", "42", "not-a-uuid", "507f1f77bcf86cd799439011"] {
            let err = RecordId::parse_employee(raw).unwrap_err();
            assert!(matches!(err, StoreError::InvalidArgument(_)), "{raw}");
        }
    }
}
