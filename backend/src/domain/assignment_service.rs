//! Assignment service: binds a program to a client and generates the
//! client's dated schedule in the same write.

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::assignment::{Assignment, AssignmentWithProgram};
use crate::domain::identity::UserId;
use crate::domain::ports::{
    AssignmentRepository, AssignmentRepositoryError, CoachingRepository,
    CoachingRepositoryError, NewAssignment, NewWorkoutLog, ProgramRepository,
    ProgramRepositoryError,
};
use crate::domain::schedule::expand_schedule;

fn map_assignment_error(error: AssignmentRepositoryError) -> Error {
    match error {
        AssignmentRepositoryError::Connection { message } => {
            Error::dependency_failure(format!("assignment repository unavailable: {message}"))
        }
        AssignmentRepositoryError::Query { message } => {
            Error::dependency_failure(format!("assignment repository error: {message}"))
        }
    }
}

fn map_program_error(error: ProgramRepositoryError) -> Error {
    match error {
        ProgramRepositoryError::Connection { message } => {
            Error::dependency_failure(format!("program repository unavailable: {message}"))
        }
        ProgramRepositoryError::Query { message } => {
            Error::dependency_failure(format!("program repository error: {message}"))
        }
    }
}

fn map_coaching_error(error: CoachingRepositoryError) -> Error {
    match error {
        CoachingRepositoryError::Connection { message } => {
            Error::dependency_failure(format!("coaching repository unavailable: {message}"))
        }
        CoachingRepositoryError::Query { message } => {
            Error::dependency_failure(format!("coaching repository error: {message}"))
        }
    }
}

/// Assignment service over the program, coaching, and assignment ports.
#[derive(Clone)]
pub struct AssignmentService<P, C, A> {
    programs: Arc<P>,
    coaching: Arc<C>,
    assignments: Arc<A>,
}

impl<P, C, A> AssignmentService<P, C, A> {
    /// Create a new assignment service.
    pub fn new(programs: Arc<P>, coaching: Arc<C>, assignments: Arc<A>) -> Self {
        Self {
            programs,
            coaching,
            assignments,
        }
    }
}

impl<P, C, A> AssignmentService<P, C, A>
where
    P: ProgramRepository,
    C: CoachingRepository,
    A: AssignmentRepository,
{
    /// Assign a program to a client starting on `start_date`.
    ///
    /// The coach must own the program and hold a roster link to the client.
    /// The assignment and one workout log per slot (dated by the schedule
    /// expansion) are written atomically. Calling this twice for the same
    /// program creates a second, independent schedule.
    pub async fn assign_program(
        &self,
        coach: &UserId,
        client: &UserId,
        program_id: Uuid,
        start_date: NaiveDate,
    ) -> Result<Assignment, Error> {
        self.programs
            .find_owned(program_id, coach)
            .await
            .map_err(map_program_error)?
            .ok_or_else(|| Error::forbidden("program is not owned by this coach"))?;

        let linked = self
            .coaching
            .link_exists(coach, client)
            .await
            .map_err(map_coaching_error)?;
        if !linked {
            return Err(Error::forbidden("client is not on this coach's roster"));
        }

        let slots = self
            .programs
            .slots_for_program(program_id)
            .await
            .map_err(map_program_error)?;
        let logs = expand_schedule(&slots, start_date)
            .into_iter()
            .map(|scheduled| NewWorkoutLog {
                workout_slot_id: scheduled.slot_id,
                scheduled_date: scheduled.date,
            })
            .collect();

        self.assignments
            .create_with_logs(
                NewAssignment {
                    client_id: client.clone(),
                    program_id,
                    start_date,
                },
                logs,
            )
            .await
            .map_err(map_assignment_error)
    }

    /// All of a client's assignments with program names, newest first.
    pub async fn assignments_for_client(
        &self,
        client: &UserId,
    ) -> Result<Vec<AssignmentWithProgram>, Error> {
        self.assignments
            .list_for_client(client)
            .await
            .map_err(map_assignment_error)
    }
}

#[cfg(test)]
#[path = "assignment_service_tests.rs"]
mod tests;
