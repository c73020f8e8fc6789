//! Workout logging service.
//!
//! Serves the log-workout view, stores per-set records with full-replace
//! semantics, stamps completions, and answers the client-facing schedule
//! reads. Access to a log is granted to the log's client and to any coach
//! linked to that client.

use std::sync::Arc;

use chrono::NaiveDate;
use mockable::Clock;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::identity::UserId;
use crate::domain::ports::{
    CoachingRepository, CoachingRepositoryError, UserRepository, UserRepositoryError,
    WorkoutLogRepository, WorkoutLogRepositoryError,
};
use crate::domain::progress::next_scheduled;
use crate::domain::workout_log::{
    ExerciseLogSection, SetLog, WorkoutLogDetail, WorkoutLogSummary, dense_set_grid,
};

fn map_log_error(error: WorkoutLogRepositoryError) -> Error {
    match error {
        WorkoutLogRepositoryError::Connection { message } => {
            Error::dependency_failure(format!("workout log repository unavailable: {message}"))
        }
        WorkoutLogRepositoryError::Query { message } => {
            Error::dependency_failure(format!("workout log repository error: {message}"))
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

fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::dependency_failure(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::dependency_failure(format!("user repository error: {message}"))
        }
    }
}

/// Workout logging service over the log, coaching, and user ports.
#[derive(Clone)]
pub struct WorkoutLogService<L, C, U> {
    logs: Arc<L>,
    coaching: Arc<C>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<L, C, U> WorkoutLogService<L, C, U> {
    /// Create a new workout log service.
    pub fn new(logs: Arc<L>, coaching: Arc<C>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            logs,
            coaching,
            users,
            clock,
        }
    }

    fn today(&self) -> NaiveDate {
        self.clock.utc().date_naive()
    }
}

impl<L, C, U> WorkoutLogService<L, C, U>
where
    L: WorkoutLogRepository,
    C: CoachingRepository,
    U: UserRepository,
{
    /// The full log-workout view: header names plus one dense set grid per
    /// prescribed exercise. Returns `Ok(None)` when the log is absent or the
    /// requester may not see it.
    pub async fn get_workout_log(
        &self,
        workout_log_id: Uuid,
        requester: &UserId,
    ) -> Result<Option<WorkoutLogDetail>, Error> {
        let Some(header) = self
            .logs
            .find_header(workout_log_id)
            .await
            .map_err(map_log_error)?
        else {
            return Ok(None);
        };
        if !self.can_access(requester, &header.log.client_id).await? {
            return Ok(None);
        }

        let prescriptions = self
            .logs
            .prescriptions_for_slot(header.log.workout_slot_id)
            .await
            .map_err(map_log_error)?;
        let saved = self
            .logs
            .set_logs(workout_log_id)
            .await
            .map_err(map_log_error)?;
        let client_name = self
            .users
            .find_summary(&header.log.client_id)
            .await
            .map_err(map_user_error)?
            .map_or_else(|| header.log.client_id.to_string(), |user| user.name);

        let exercises = prescriptions
            .into_iter()
            .map(|prescription| ExerciseLogSection {
                prescribed_exercise_id: prescription.id,
                exercise_name: prescription.exercise_name,
                sets: prescription.sets,
                reps: prescription.reps,
                notes: prescription.notes,
                set_logs: dense_set_grid(prescription.id, prescription.sets, &saved),
            })
            .collect();

        Ok(Some(WorkoutLogDetail {
            id: header.log.id,
            client_id: header.log.client_id,
            assignment_id: header.log.assignment_id,
            program_id: header.program_id,
            workout_slot_id: header.log.workout_slot_id,
            scheduled_date: header.log.scheduled_date,
            completed_at: header.log.completed_at,
            notes: header.log.notes,
            workout_name: header.workout_name,
            program_name: header.program_name,
            client_name,
            exercises,
        }))
    }

    /// Replace every stored set row of the log with `entries`, verbatim.
    /// Entries are not bounded against the prescription.
    pub async fn save_set_logs(
        &self,
        workout_log_id: Uuid,
        requester: &UserId,
        entries: Vec<SetLog>,
    ) -> Result<(), Error> {
        self.require_access(workout_log_id, requester).await?;
        self.logs
            .replace_set_logs(workout_log_id, entries)
            .await
            .map_err(map_log_error)
    }

    /// Stamp the log completed at the clock's now. Re-completing bumps the
    /// timestamp; there is no way back to scheduled. `Some(notes)` replaces
    /// the log's notes, `None` keeps whatever is stored.
    pub async fn complete_workout(
        &self,
        workout_log_id: Uuid,
        requester: &UserId,
        notes: Option<String>,
    ) -> Result<(), Error> {
        self.require_access(workout_log_id, requester).await?;
        self.logs
            .mark_completed(workout_log_id, self.clock.utc(), notes.map(Some))
            .await
            .map_err(map_log_error)
    }

    /// The client's workouts scheduled for today (calendar-date equality).
    pub async fn todays_workouts(
        &self,
        client: &UserId,
    ) -> Result<Vec<WorkoutLogSummary>, Error> {
        let today = self.today();
        let summaries = self
            .logs
            .summaries_for_client(client)
            .await
            .map_err(map_log_error)?;
        Ok(summaries
            .into_iter()
            .filter(|summary| summary.scheduled_date == today)
            .collect())
    }

    /// The client's next scheduled workout on or after today.
    pub async fn next_workout(
        &self,
        client: &UserId,
    ) -> Result<Option<WorkoutLogSummary>, Error> {
        let today = self.today();
        let summaries = self
            .logs
            .summaries_for_client(client)
            .await
            .map_err(map_log_error)?;
        Ok(next_scheduled(summaries, today))
    }

    /// Completed workouts, most recently completed first, capped at `limit`.
    pub async fn workout_history(
        &self,
        client: &UserId,
        limit: usize,
    ) -> Result<Vec<WorkoutLogSummary>, Error> {
        let mut completed: Vec<WorkoutLogSummary> = self
            .logs
            .summaries_for_client(client)
            .await
            .map_err(map_log_error)?
            .into_iter()
            .filter(|summary| summary.completed_at.is_some())
            .collect();
        completed.sort_by_key(|summary| std::cmp::Reverse(summary.completed_at));
        completed.truncate(limit);
        Ok(completed)
    }

    /// Completed workouts that carry session notes, newest first.
    pub async fn recent_activity_with_notes(
        &self,
        client: &UserId,
        limit: usize,
    ) -> Result<Vec<WorkoutLogSummary>, Error> {
        let mut noted: Vec<WorkoutLogSummary> = self
            .logs
            .summaries_for_client(client)
            .await
            .map_err(map_log_error)?
            .into_iter()
            .filter(|summary| summary.completed_at.is_some() && summary.notes.is_some())
            .collect();
        noted.sort_by_key(|summary| std::cmp::Reverse(summary.completed_at));
        noted.truncate(limit);
        Ok(noted)
    }

    async fn can_access(&self, requester: &UserId, client: &UserId) -> Result<bool, Error> {
        if requester == client {
            return Ok(true);
        }
        self.coaching
            .link_exists(requester, client)
            .await
            .map_err(map_coaching_error)
    }

    /// Mutation-path guard: `NotFound` for a missing log, `Forbidden` for an
    /// unrelated requester.
    async fn require_access(&self, workout_log_id: Uuid, requester: &UserId) -> Result<(), Error> {
        let header = self
            .logs
            .find_header(workout_log_id)
            .await
            .map_err(map_log_error)?
            .ok_or_else(|| Error::not_found(format!("workout log {workout_log_id} not found")))?;
        if self.can_access(requester, &header.log.client_id).await? {
            Ok(())
        } else {
            Err(Error::forbidden("workout log belongs to another client"))
        }
    }
}

#[cfg(test)]
#[path = "workout_log_service_tests.rs"]
mod tests;
