//! PostgreSQL-backed `WorkoutLogRepository` implementation using Diesel ORM.
//!
//! Set log saves are full replacements executed inside one transaction, so a
//! concurrent reader sees either the previous grid or the new one.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::identity::UserId;
use crate::domain::ports::{
    PrescriptionForLogging, WorkoutLogHeader, WorkoutLogRepository, WorkoutLogRepositoryError,
};
use crate::domain::workout_log::{
    ClientWorkoutLogSummary, SetLog, WorkoutLog, WorkoutLogSummary,
};

use super::diesel_error_mapping;
use super::models::{NewSetLogRow, SetLogRow, WorkoutLogCompletionChangeset, WorkoutLogRow};
use super::pool::{DbPool, PoolError};
use super::schema::{exercises, prescribed_exercises, program_workouts, programs, set_logs, users, workout_logs};

/// Diesel-backed implementation of the workout log repository port.
#[derive(Clone)]
pub struct DieselWorkoutLogRepository {
    pool: DbPool,
}

impl DieselWorkoutLogRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> WorkoutLogRepositoryError {
    diesel_error_mapping::map_pool_error(error, WorkoutLogRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> WorkoutLogRepositoryError {
    diesel_error_mapping::map_diesel_error(
        error,
        WorkoutLogRepositoryError::query,
        WorkoutLogRepositoryError::connection,
    )
}

fn stored_count(value: i32, what: &str) -> Result<u32, WorkoutLogRepositoryError> {
    u32::try_from(value)
        .map_err(|_| WorkoutLogRepositoryError::query(format!("stored {what} out of range")))
}

fn db_set_number(value: u32) -> Result<i32, WorkoutLogRepositoryError> {
    i32::try_from(value)
        .map_err(|_| WorkoutLogRepositoryError::query("set number out of range"))
}

fn row_to_log(row: WorkoutLogRow) -> Result<WorkoutLog, WorkoutLogRepositoryError> {
    let client_id = UserId::new(row.client_id)
        .map_err(|err| WorkoutLogRepositoryError::query(err.to_string()))?;
    Ok(WorkoutLog {
        id: row.id,
        client_id,
        assignment_id: row.assignment_id,
        workout_slot_id: row.program_workout_id,
        scheduled_date: row.scheduled_date,
        completed_at: row.completed_at,
        notes: row.notes,
    })
}

fn row_to_set_log(row: SetLogRow) -> Result<SetLog, WorkoutLogRepositoryError> {
    Ok(SetLog {
        prescribed_exercise_id: row.prescribed_exercise_id,
        set_number: stored_count(row.set_number, "set number")?,
        reps_completed: row.reps_completed,
        weight_kg: row.weight_kg,
        rpe: row.rpe,
        notes: row.notes,
    })
}

fn joined_to_summary(
    row: WorkoutLogRow,
    workout_name: String,
    program_name: String,
) -> WorkoutLogSummary {
    WorkoutLogSummary {
        id: row.id,
        workout_name,
        program_name,
        scheduled_date: row.scheduled_date,
        completed_at: row.completed_at,
        notes: row.notes,
    }
}

fn joined_to_client_summary(
    row: WorkoutLogRow,
    workout_name: String,
    program_name: String,
    client_name: String,
) -> Result<ClientWorkoutLogSummary, WorkoutLogRepositoryError> {
    let client_id = UserId::new(row.client_id.clone())
        .map_err(|err| WorkoutLogRepositoryError::query(err.to_string()))?;
    Ok(ClientWorkoutLogSummary {
        client_id,
        client_name,
        summary: joined_to_summary(row, workout_name, program_name),
    })
}

#[async_trait]
impl WorkoutLogRepository for DieselWorkoutLogRepository {
    async fn find_header(
        &self,
        workout_log_id: Uuid,
    ) -> Result<Option<WorkoutLogHeader>, WorkoutLogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<(WorkoutLogRow, String, Uuid, String)> = workout_logs::table
            .inner_join(program_workouts::table.inner_join(programs::table))
            .filter(workout_logs::id.eq(workout_log_id))
            .select((
                WorkoutLogRow::as_select(),
                program_workouts::name,
                programs::id,
                programs::name,
            ))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|(row, workout_name, program_id, program_name)| {
            Ok(WorkoutLogHeader {
                log: row_to_log(row)?,
                workout_name,
                program_id,
                program_name,
            })
        })
        .transpose()
    }

    async fn prescriptions_for_slot(
        &self,
        workout_slot_id: Uuid,
    ) -> Result<Vec<PrescriptionForLogging>, WorkoutLogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(Uuid, String, i32, String, Option<String>)> = prescribed_exercises::table
            .inner_join(exercises::table)
            .filter(prescribed_exercises::program_workout_id.eq(workout_slot_id))
            .order(prescribed_exercises::sort_order.asc())
            .select((
                prescribed_exercises::id,
                exercises::name,
                prescribed_exercises::sets,
                prescribed_exercises::reps,
                prescribed_exercises::notes,
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|(id, exercise_name, sets, reps, notes)| {
                Ok(PrescriptionForLogging {
                    id,
                    exercise_name,
                    sets: stored_count(sets, "set count")?,
                    reps,
                    notes,
                })
            })
            .collect()
    }

    async fn set_logs(
        &self,
        workout_log_id: Uuid,
    ) -> Result<Vec<SetLog>, WorkoutLogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<SetLogRow> = set_logs::table
            .filter(set_logs::workout_log_id.eq(workout_log_id))
            .order((
                set_logs::prescribed_exercise_id.asc(),
                set_logs::set_number.asc(),
            ))
            .select(SetLogRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_set_log).collect()
    }

    async fn replace_set_logs(
        &self,
        workout_log_id: Uuid,
        entries: Vec<SetLog>,
    ) -> Result<(), WorkoutLogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<NewSetLogRow<'_>> = entries
            .iter()
            .map(|entry| {
                Ok(NewSetLogRow {
                    workout_log_id,
                    prescribed_exercise_id: entry.prescribed_exercise_id,
                    set_number: db_set_number(entry.set_number)?,
                    reps_completed: entry.reps_completed,
                    weight_kg: entry.weight_kg,
                    rpe: entry.rpe,
                    notes: entry.notes.as_deref(),
                })
            })
            .collect::<Result<_, WorkoutLogRepositoryError>>()?;

        conn.transaction(|conn| {
            async move {
                diesel::delete(
                    set_logs::table.filter(set_logs::workout_log_id.eq(workout_log_id)),
                )
                .execute(conn)
                .await?;

                diesel::insert_into(set_logs::table)
                    .values(&rows)
                    .execute(conn)
                    .await?;

                Ok::<_, diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn mark_completed(
        &self,
        workout_log_id: Uuid,
        completed_at: DateTime<Utc>,
        notes: Option<Option<String>>,
    ) -> Result<(), WorkoutLogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changeset = WorkoutLogCompletionChangeset {
            completed_at,
            notes: notes.as_ref().map(|inner| inner.as_deref()),
        };

        diesel::update(workout_logs::table.find(workout_log_id))
            .set(&changeset)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn summaries_for_client(
        &self,
        client_id: &UserId,
    ) -> Result<Vec<WorkoutLogSummary>, WorkoutLogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(WorkoutLogRow, String, String)> = workout_logs::table
            .inner_join(program_workouts::table.inner_join(programs::table))
            .filter(workout_logs::client_id.eq(client_id.as_str()))
            .order(workout_logs::scheduled_date.asc())
            .select((
                WorkoutLogRow::as_select(),
                program_workouts::name,
                programs::name,
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .map(|(row, workout_name, program_name)| {
                joined_to_summary(row, workout_name, program_name)
            })
            .collect())
    }

    async fn summaries_on_date(
        &self,
        client_ids: &[UserId],
        date: NaiveDate,
    ) -> Result<Vec<ClientWorkoutLogSummary>, WorkoutLogRepositoryError> {
        if client_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let id_strings: Vec<&str> = client_ids.iter().map(UserId::as_str).collect();
        let rows: Vec<(WorkoutLogRow, String, String, String)> = workout_logs::table
            .inner_join(program_workouts::table.inner_join(programs::table))
            .inner_join(users::table)
            .filter(workout_logs::client_id.eq_any(&id_strings))
            .filter(workout_logs::scheduled_date.eq(date))
            .order(users::name.asc())
            .select((
                WorkoutLogRow::as_select(),
                program_workouts::name,
                programs::name,
                users::name,
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|(row, workout_name, program_name, client_name)| {
                joined_to_client_summary(row, workout_name, program_name, client_name)
            })
            .collect()
    }

    async fn completed_summaries(
        &self,
        client_ids: &[UserId],
        limit: u32,
    ) -> Result<Vec<ClientWorkoutLogSummary>, WorkoutLogRepositoryError> {
        if client_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let id_strings: Vec<&str> = client_ids.iter().map(UserId::as_str).collect();
        let rows: Vec<(WorkoutLogRow, String, String, String)> = workout_logs::table
            .inner_join(program_workouts::table.inner_join(programs::table))
            .inner_join(users::table)
            .filter(workout_logs::client_id.eq_any(&id_strings))
            .filter(workout_logs::completed_at.is_not_null())
            .order(workout_logs::completed_at.desc())
            .limit(i64::from(limit))
            .select((
                WorkoutLogRow::as_select(),
                program_workouts::name,
                programs::name,
                users::name,
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|(row, workout_name, program_name, client_name)| {
                joined_to_client_summary(row, workout_name, program_name, client_name)
            })
            .collect()
    }

    async fn completed_count_since(
        &self,
        client_ids: &[UserId],
        since: DateTime<Utc>,
    ) -> Result<u64, WorkoutLogRepositoryError> {
        if client_ids.is_empty() {
            return Ok(0);
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let id_strings: Vec<&str> = client_ids.iter().map(UserId::as_str).collect();
        let count: i64 = workout_logs::table
            .filter(workout_logs::client_id.eq_any(&id_strings))
            .filter(workout_logs::completed_at.ge(since))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn latest_completions(
        &self,
        client_ids: &[UserId],
    ) -> Result<Vec<(UserId, DateTime<Utc>)>, WorkoutLogRepositoryError> {
        if client_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let id_strings: Vec<&str> = client_ids.iter().map(UserId::as_str).collect();
        let rows: Vec<(String, Option<DateTime<Utc>>)> = workout_logs::table
            .filter(workout_logs::client_id.eq_any(&id_strings))
            .filter(workout_logs::completed_at.is_not_null())
            .order(workout_logs::completed_at.desc())
            .select((workout_logs::client_id, workout_logs::completed_at))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        // Rows arrive newest first; keep the first instant seen per client.
        let mut latest: Vec<(UserId, DateTime<Utc>)> = Vec::new();
        for (id, completed_at) in rows {
            let Some(completed_at) = completed_at else {
                continue;
            };
            let client_id = UserId::new(id)
                .map_err(|err| WorkoutLogRepositoryError::query(err.to_string()))?;
            if !latest.iter().any(|(kept, _)| *kept == client_id) {
                latest.push((client_id, completed_at));
            }
        }
        Ok(latest)
    }
}
