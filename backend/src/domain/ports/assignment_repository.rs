//! Port for assignment persistence and schedule generation writes.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::assignment::{Assignment, AssignmentWithProgram};
use crate::domain::identity::UserId;

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by assignment repository adapters.
    pub enum AssignmentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "assignment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "assignment repository query failed: {message}",
    }
}

/// An assignment to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAssignment {
    pub client_id: UserId,
    pub program_id: Uuid,
    pub start_date: NaiveDate,
}

/// One workout log row to generate alongside a new assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWorkoutLog {
    pub workout_slot_id: Uuid,
    pub scheduled_date: NaiveDate,
}

/// Port for assignment storage.
///
/// `create_with_logs` must write the assignment and every generated workout
/// log in a single transaction: a dangling assignment with no schedule must
/// be structurally impossible.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    /// Persist an assignment and its generated schedule atomically.
    async fn create_with_logs(
        &self,
        assignment: NewAssignment,
        logs: Vec<NewWorkoutLog>,
    ) -> Result<Assignment, AssignmentRepositoryError>;

    /// All of a client's assignments, newest start date first.
    async fn list_for_client(
        &self,
        client_id: &UserId,
    ) -> Result<Vec<AssignmentWithProgram>, AssignmentRepositoryError>;

    /// The client's most recently started active assignment.
    async fn newest_active_for_client(
        &self,
        client_id: &UserId,
    ) -> Result<Option<AssignmentWithProgram>, AssignmentRepositoryError>;

    /// The most recently started active assignment per client, at most one
    /// entry for each id in `client_ids`.
    async fn newest_active_for_clients(
        &self,
        client_ids: &[UserId],
    ) -> Result<Vec<AssignmentWithProgram>, AssignmentRepositoryError>;
}
