//! Assignments: the binding of a program template to one client.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::identity::UserId;
use crate::domain::program::DurationWeeks;

/// Status of an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Active,
}

impl AssignmentStatus {
    /// Database representation of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
        }
    }
}

/// A program assigned to a client from a start date.
///
/// A client may hold several assignments concurrently; assigning the same
/// program twice produces two independent schedules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: Uuid,
    pub client_id: UserId,
    pub program_id: Uuid,
    pub start_date: NaiveDate,
    pub status: AssignmentStatus,
    pub created_at: DateTime<Utc>,
}

/// An assignment joined with the program fields progress views need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentWithProgram {
    pub assignment: Assignment,
    pub program_name: String,
    pub duration_weeks: DurationWeeks,
}
