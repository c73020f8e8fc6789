//! Port for workout log and set log persistence.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::identity::UserId;
use crate::domain::workout_log::{
    ClientWorkoutLogSummary, SetLog, WorkoutLog, WorkoutLogSummary,
};

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by workout log repository adapters.
    pub enum WorkoutLogRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "workout log repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "workout log repository query failed: {message}",
    }
}

/// A workout log joined with the names its detail view needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkoutLogHeader {
    pub log: WorkoutLog,
    pub workout_name: String,
    pub program_id: Uuid,
    pub program_name: String,
}

/// The prescription fields the logging grid needs, ordered by sort_order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrescriptionForLogging {
    pub id: Uuid,
    pub exercise_name: String,
    pub sets: u32,
    pub reps: String,
    pub notes: Option<String>,
}

/// Port for workout log storage.
///
/// `replace_set_logs` must delete and re-insert inside one transaction so a
/// reader never observes a half-replaced grid.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkoutLogRepository: Send + Sync {
    /// A log joined with its slot and program names.
    async fn find_header(
        &self,
        workout_log_id: Uuid,
    ) -> Result<Option<WorkoutLogHeader>, WorkoutLogRepositoryError>;

    /// Prescriptions of the log's slot, ordered by sort_order, with
    /// exercise names joined in.
    async fn prescriptions_for_slot(
        &self,
        workout_slot_id: Uuid,
    ) -> Result<Vec<PrescriptionForLogging>, WorkoutLogRepositoryError>;

    /// All saved set logs for a workout log.
    async fn set_logs(
        &self,
        workout_log_id: Uuid,
    ) -> Result<Vec<SetLog>, WorkoutLogRepositoryError>;

    /// Atomically replace every set log of a workout log with `entries`.
    async fn replace_set_logs(
        &self,
        workout_log_id: Uuid,
        entries: Vec<SetLog>,
    ) -> Result<(), WorkoutLogRepositoryError>;

    /// Stamp a log completed. `notes: Some(inner)` overwrites the log's
    /// notes (with `None` clearing them); an outer `None` leaves them alone.
    async fn mark_completed(
        &self,
        workout_log_id: Uuid,
        completed_at: DateTime<Utc>,
        notes: Option<Option<String>>,
    ) -> Result<(), WorkoutLogRepositoryError>;

    /// Every summary for a client, scheduled date ascending.
    async fn summaries_for_client(
        &self,
        client_id: &UserId,
    ) -> Result<Vec<WorkoutLogSummary>, WorkoutLogRepositoryError>;

    /// Summaries scheduled on exactly `date` across the given clients.
    async fn summaries_on_date(
        &self,
        client_ids: &[UserId],
        date: NaiveDate,
    ) -> Result<Vec<ClientWorkoutLogSummary>, WorkoutLogRepositoryError>;

    /// Completed summaries across the given clients, newest completion
    /// first, capped at `limit`.
    async fn completed_summaries(
        &self,
        client_ids: &[UserId],
        limit: u32,
    ) -> Result<Vec<ClientWorkoutLogSummary>, WorkoutLogRepositoryError>;

    /// Number of completions at or after `since` across the given clients.
    async fn completed_count_since(
        &self,
        client_ids: &[UserId],
        since: DateTime<Utc>,
    ) -> Result<u64, WorkoutLogRepositoryError>;

    /// Most recent completion instant per client, omitting clients who have
    /// never completed a workout.
    async fn latest_completions(
        &self,
        client_ids: &[UserId],
    ) -> Result<Vec<(UserId, DateTime<Utc>)>, WorkoutLogRepositoryError>;
}
