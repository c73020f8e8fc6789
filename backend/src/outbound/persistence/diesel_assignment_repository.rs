//! PostgreSQL-backed `AssignmentRepository` implementation using Diesel ORM.
//!
//! `create_with_logs` writes the assignment and its generated schedule in one
//! transaction, keeping a dangling assignment without workout logs
//! structurally impossible.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::assignment::{Assignment, AssignmentStatus, AssignmentWithProgram};
use crate::domain::identity::UserId;
use crate::domain::ports::{
    AssignmentRepository, AssignmentRepositoryError, NewAssignment, NewWorkoutLog,
};
use crate::domain::program::DurationWeeks;

use super::diesel_error_mapping;
use super::models::{ClientAssignmentRow, NewClientAssignmentRow, NewWorkoutLogRow};
use super::pool::{DbPool, PoolError};
use super::schema::{client_assignments, programs, workout_logs};

/// Diesel-backed implementation of the assignment repository port.
#[derive(Clone)]
pub struct DieselAssignmentRepository {
    pool: DbPool,
}

impl DieselAssignmentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AssignmentRepositoryError {
    diesel_error_mapping::map_pool_error(error, AssignmentRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> AssignmentRepositoryError {
    diesel_error_mapping::map_diesel_error(
        error,
        AssignmentRepositoryError::query,
        AssignmentRepositoryError::connection,
    )
}

fn parse_status(status: &str) -> Result<AssignmentStatus, AssignmentRepositoryError> {
    match status {
        "active" => Ok(AssignmentStatus::Active),
        other => Err(AssignmentRepositoryError::query(format!(
            "unknown assignment status: {other}"
        ))),
    }
}

fn row_to_assignment(row: ClientAssignmentRow) -> Result<Assignment, AssignmentRepositoryError> {
    let client_id = UserId::new(row.client_id)
        .map_err(|err| AssignmentRepositoryError::query(err.to_string()))?;
    let status = parse_status(&row.status)?;

    Ok(Assignment {
        id: row.id,
        client_id,
        program_id: row.program_id,
        start_date: row.start_date,
        status,
        created_at: row.created_at,
    })
}

fn joined_to_with_program(
    row: ClientAssignmentRow,
    program_name: String,
    duration_weeks: i32,
) -> Result<AssignmentWithProgram, AssignmentRepositoryError> {
    let weeks = u32::try_from(duration_weeks)
        .ok()
        .and_then(|weeks| DurationWeeks::new(weeks).ok())
        .ok_or_else(|| {
            AssignmentRepositoryError::query("stored program duration out of range")
        })?;

    Ok(AssignmentWithProgram {
        assignment: row_to_assignment(row)?,
        program_name,
        duration_weeks: weeks,
    })
}

#[async_trait]
impl AssignmentRepository for DieselAssignmentRepository {
    async fn create_with_logs(
        &self,
        assignment: NewAssignment,
        logs: Vec<NewWorkoutLog>,
    ) -> Result<Assignment, AssignmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let assignment_id = Uuid::new_v4();

        let new_row = NewClientAssignmentRow {
            id: assignment_id,
            client_id: assignment.client_id.as_str(),
            program_id: assignment.program_id,
            start_date: assignment.start_date,
            status: AssignmentStatus::Active.as_str(),
        };
        let log_rows: Vec<NewWorkoutLogRow<'_>> = logs
            .iter()
            .map(|log| NewWorkoutLogRow {
                id: Uuid::new_v4(),
                client_id: assignment.client_id.as_str(),
                assignment_id,
                program_workout_id: log.workout_slot_id,
                scheduled_date: log.scheduled_date,
            })
            .collect();

        let inserted: ClientAssignmentRow = conn
            .transaction(|conn| {
                async move {
                    let inserted: ClientAssignmentRow =
                        diesel::insert_into(client_assignments::table)
                            .values(&new_row)
                            .returning(ClientAssignmentRow::as_returning())
                            .get_result(conn)
                            .await?;

                    diesel::insert_into(workout_logs::table)
                        .values(&log_rows)
                        .execute(conn)
                        .await?;

                    Ok::<_, diesel::result::Error>(inserted)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        row_to_assignment(inserted)
    }

    async fn list_for_client(
        &self,
        client_id: &UserId,
    ) -> Result<Vec<AssignmentWithProgram>, AssignmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(ClientAssignmentRow, String, i32)> = client_assignments::table
            .inner_join(programs::table)
            .filter(client_assignments::client_id.eq(client_id.as_str()))
            .order(client_assignments::start_date.desc())
            .select((
                ClientAssignmentRow::as_select(),
                programs::name,
                programs::duration_weeks,
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|(row, name, weeks)| joined_to_with_program(row, name, weeks))
            .collect()
    }

    async fn newest_active_for_client(
        &self,
        client_id: &UserId,
    ) -> Result<Option<AssignmentWithProgram>, AssignmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<(ClientAssignmentRow, String, i32)> = client_assignments::table
            .inner_join(programs::table)
            .filter(client_assignments::client_id.eq(client_id.as_str()))
            .filter(client_assignments::status.eq(AssignmentStatus::Active.as_str()))
            .order(client_assignments::start_date.desc())
            .select((
                ClientAssignmentRow::as_select(),
                programs::name,
                programs::duration_weeks,
            ))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|(row, name, weeks)| joined_to_with_program(row, name, weeks))
            .transpose()
    }

    async fn newest_active_for_clients(
        &self,
        client_ids: &[UserId],
    ) -> Result<Vec<AssignmentWithProgram>, AssignmentRepositoryError> {
        if client_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let id_strings: Vec<&str> = client_ids.iter().map(UserId::as_str).collect();
        let rows: Vec<(ClientAssignmentRow, String, i32)> = client_assignments::table
            .inner_join(programs::table)
            .filter(client_assignments::client_id.eq_any(&id_strings))
            .filter(client_assignments::status.eq(AssignmentStatus::Active.as_str()))
            .order(client_assignments::start_date.desc())
            .select((
                ClientAssignmentRow::as_select(),
                programs::name,
                programs::duration_weeks,
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        // Rows arrive newest first; keep the first row seen per client.
        let mut newest: Vec<AssignmentWithProgram> = Vec::new();
        for (row, name, weeks) in rows {
            let with_program = joined_to_with_program(row, name, weeks)?;
            if !newest
                .iter()
                .any(|kept| kept.assignment.client_id == with_program.assignment.client_id)
            {
                newest.push(with_program);
            }
        }
        Ok(newest)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use rstest::rstest;

    use super::*;

    fn row(status: &str) -> ClientAssignmentRow {
        ClientAssignmentRow {
            id: Uuid::new_v4(),
            client_id: "user_client_1".to_owned(),
            program_id: Uuid::new_v4(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
            status: status.to_owned(),
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn active_row_converts_to_an_assignment() {
        let assignment = row_to_assignment(row("active")).expect("row converts");
        assert_eq!(assignment.status, AssignmentStatus::Active);
        assert_eq!(assignment.client_id.as_str(), "user_client_1");
    }

    #[rstest]
    fn unknown_status_maps_to_a_query_error() {
        let error = row_to_assignment(row("paused")).expect_err("unknown status rejected");
        assert!(matches!(error, AssignmentRepositoryError::Query { .. }));
    }

    #[rstest]
    fn joined_row_carries_the_program_fields() {
        let with_program =
            joined_to_with_program(row("active"), "Strength Block".to_owned(), 8)
                .expect("row converts");
        assert_eq!(with_program.program_name, "Strength Block");
        assert_eq!(with_program.duration_weeks.get(), 8);
    }
}
