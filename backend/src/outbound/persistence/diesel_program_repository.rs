//! PostgreSQL-backed `ProgramRepository` implementation using Diesel ORM.
//!
//! Multi-row mutations (`create_with_slots`, `delete_cascade`) run inside a
//! single transaction, so a program is never visible with a partial grid and
//! a delete never leaves orphaned schedule rows behind.

use std::str::FromStr;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::exercise::ExerciseCategory;
use crate::domain::identity::UserId;
use crate::domain::ports::{
    NewPrescribedExercise, NewProgram, ProgramRepository, ProgramRepositoryError, ProgramUpdate,
    SlotUpdate,
};
use crate::domain::program::{
    DaysPerWeek, DurationWeeks, PrescribedExercise, PrescribedExerciseDetail, ProgramTemplate,
    SlotSeed, WorkoutSlot,
};

use super::diesel_error_mapping;
use super::models::{
    NewPrescribedExerciseRow, NewProgramRow, NewProgramWorkoutRow, PrescribedExerciseRow,
    ProgramChangeset, ProgramRow, ProgramWorkoutChangeset, ProgramWorkoutRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{
    client_assignments, exercises, prescribed_exercises, program_workouts, programs, set_logs,
    workout_logs,
};

/// Diesel-backed implementation of the program repository port.
#[derive(Clone)]
pub struct DieselProgramRepository {
    pool: DbPool,
}

impl DieselProgramRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ProgramRepositoryError {
    diesel_error_mapping::map_pool_error(error, ProgramRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ProgramRepositoryError {
    diesel_error_mapping::map_diesel_error(
        error,
        ProgramRepositoryError::query,
        ProgramRepositoryError::connection,
    )
}

fn dimension(value: i32, what: &str) -> Result<u32, ProgramRepositoryError> {
    u32::try_from(value)
        .map_err(|_| ProgramRepositoryError::query(format!("negative {what} in stored program")))
}

fn db_int(value: u32, what: &str) -> Result<i32, ProgramRepositoryError> {
    i32::try_from(value)
        .map_err(|_| ProgramRepositoryError::query(format!("{what} exceeds the storable range")))
}

fn row_to_template(row: ProgramRow) -> Result<ProgramTemplate, ProgramRepositoryError> {
    let owner =
        UserId::new(row.coach_id).map_err(|err| ProgramRepositoryError::query(err.to_string()))?;
    let duration_weeks = DurationWeeks::new(dimension(row.duration_weeks, "duration")?)
        .map_err(|err| ProgramRepositoryError::query(err.to_string()))?;
    let days_per_week = DaysPerWeek::new(dimension(row.days_per_week, "day count")?)
        .map_err(|err| ProgramRepositoryError::query(err.to_string()))?;

    Ok(ProgramTemplate {
        id: row.id,
        owner,
        name: row.name,
        description: row.description,
        duration_weeks,
        days_per_week,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn row_to_slot(row: ProgramWorkoutRow) -> Result<WorkoutSlot, ProgramRepositoryError> {
    Ok(WorkoutSlot {
        id: row.id,
        program_id: row.program_id,
        week_number: dimension(row.week_number, "week number")?,
        day_number: dimension(row.day_number, "day number")?,
        name: row.name,
        notes: row.notes,
    })
}

fn row_to_prescribed(
    row: PrescribedExerciseRow,
) -> Result<PrescribedExercise, ProgramRepositoryError> {
    Ok(PrescribedExercise {
        id: row.id,
        workout_slot_id: row.program_workout_id,
        exercise_id: row.exercise_id,
        sort_order: row.sort_order,
        sets: dimension(row.sets, "set count")?,
        reps: row.reps,
        intensity_value: row.intensity_value,
        intensity_type: row.intensity_type,
        rest_seconds: row.rest_seconds,
        notes: row.notes,
    })
}

#[async_trait]
impl ProgramRepository for DieselProgramRepository {
    async fn create_with_slots(
        &self,
        program: NewProgram,
        slots: Vec<SlotSeed>,
    ) -> Result<ProgramTemplate, ProgramRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let program_id = Uuid::new_v4();

        let new_row = NewProgramRow {
            id: program_id,
            coach_id: program.owner.as_str(),
            name: &program.name,
            description: program.description.as_deref(),
            duration_weeks: db_int(program.duration_weeks.get(), "duration")?,
            days_per_week: db_int(program.days_per_week.get(), "day count")?,
        };
        let slot_rows: Vec<NewProgramWorkoutRow<'_>> = slots
            .iter()
            .map(|seed| {
                Ok(NewProgramWorkoutRow {
                    id: Uuid::new_v4(),
                    program_id,
                    week_number: db_int(seed.week_number, "week number")?,
                    day_number: db_int(seed.day_number, "day number")?,
                    name: &seed.name,
                })
            })
            .collect::<Result<_, ProgramRepositoryError>>()?;

        let inserted: ProgramRow = conn
            .transaction(|conn| {
                async move {
                    let inserted: ProgramRow = diesel::insert_into(programs::table)
                        .values(&new_row)
                        .returning(ProgramRow::as_returning())
                        .get_result(conn)
                        .await?;

                    diesel::insert_into(program_workouts::table)
                        .values(&slot_rows)
                        .execute(conn)
                        .await?;

                    Ok::<_, diesel::result::Error>(inserted)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        row_to_template(inserted)
    }

    async fn list_for_coach(
        &self,
        coach_id: &UserId,
    ) -> Result<Vec<ProgramTemplate>, ProgramRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ProgramRow> = programs::table
            .filter(programs::coach_id.eq(coach_id.as_str()))
            .order(programs::updated_at.desc())
            .select(ProgramRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_template).collect()
    }

    async fn find_owned(
        &self,
        program_id: Uuid,
        coach_id: &UserId,
    ) -> Result<Option<ProgramTemplate>, ProgramRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ProgramRow> = programs::table
            .find(program_id)
            .filter(programs::coach_id.eq(coach_id.as_str()))
            .select(ProgramRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_template).transpose()
    }

    async fn count_for_coach(&self, coach_id: &UserId) -> Result<u64, ProgramRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let count: i64 = programs::table
            .filter(programs::coach_id.eq(coach_id.as_str()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn slots_for_program(
        &self,
        program_id: Uuid,
    ) -> Result<Vec<WorkoutSlot>, ProgramRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ProgramWorkoutRow> = program_workouts::table
            .filter(program_workouts::program_id.eq(program_id))
            .order((
                program_workouts::week_number.asc(),
                program_workouts::day_number.asc(),
            ))
            .select(ProgramWorkoutRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_slot).collect()
    }

    async fn prescribed_for_slots(
        &self,
        slot_ids: &[Uuid],
    ) -> Result<Vec<PrescribedExerciseDetail>, ProgramRepositoryError> {
        if slot_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(PrescribedExerciseRow, String, String)> = prescribed_exercises::table
            .inner_join(exercises::table)
            .filter(prescribed_exercises::program_workout_id.eq_any(slot_ids))
            .order(prescribed_exercises::sort_order.asc())
            .select((
                PrescribedExerciseRow::as_select(),
                exercises::name,
                exercises::category,
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|(row, exercise_name, category)| {
                let exercise_category = ExerciseCategory::from_str(&category)
                    .map_err(|err| ProgramRepositoryError::query(err.to_string()))?;
                Ok(PrescribedExerciseDetail {
                    prescription: row_to_prescribed(row)?,
                    exercise_name,
                    exercise_category,
                })
            })
            .collect()
    }

    async fn update_program(
        &self,
        program_id: Uuid,
        coach_id: &UserId,
        update: ProgramUpdate,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, ProgramRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changes = ProgramChangeset {
            name: update.name.as_deref(),
            description: update.description.as_ref().map(Option::as_deref),
            updated_at,
        };
        let affected = diesel::update(
            programs::table
                .find(program_id)
                .filter(programs::coach_id.eq(coach_id.as_str())),
        )
        .set(&changes)
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(affected > 0)
    }

    async fn delete_cascade(&self, program_id: Uuid) -> Result<(), ProgramRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                let slot_ids: Vec<Uuid> = program_workouts::table
                    .filter(program_workouts::program_id.eq(program_id))
                    .select(program_workouts::id)
                    .load(conn)
                    .await?;
                let assignment_ids: Vec<Uuid> = client_assignments::table
                    .filter(client_assignments::program_id.eq(program_id))
                    .select(client_assignments::id)
                    .load(conn)
                    .await?;
                let log_ids: Vec<Uuid> = workout_logs::table
                    .filter(workout_logs::assignment_id.eq_any(&assignment_ids))
                    .select(workout_logs::id)
                    .load(conn)
                    .await?;

                diesel::delete(
                    set_logs::table.filter(set_logs::workout_log_id.eq_any(&log_ids)),
                )
                .execute(conn)
                .await?;
                diesel::delete(
                    workout_logs::table.filter(workout_logs::assignment_id.eq_any(&assignment_ids)),
                )
                .execute(conn)
                .await?;
                diesel::delete(
                    prescribed_exercises::table
                        .filter(prescribed_exercises::program_workout_id.eq_any(&slot_ids)),
                )
                .execute(conn)
                .await?;
                diesel::delete(
                    client_assignments::table
                        .filter(client_assignments::program_id.eq(program_id)),
                )
                .execute(conn)
                .await?;
                diesel::delete(
                    program_workouts::table.filter(program_workouts::program_id.eq(program_id)),
                )
                .execute(conn)
                .await?;
                diesel::delete(programs::table.find(program_id))
                    .execute(conn)
                    .await?;

                Ok::<_, diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn slot_program(&self, slot_id: Uuid) -> Result<Option<Uuid>, ProgramRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        program_workouts::table
            .find(slot_id)
            .select(program_workouts::program_id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)
    }

    async fn update_slot(
        &self,
        slot_id: Uuid,
        update: SlotUpdate,
    ) -> Result<(), ProgramRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changes = ProgramWorkoutChangeset {
            name: update.name.as_deref(),
            notes: update.notes.as_ref().map(Option::as_deref),
        };
        diesel::update(program_workouts::table.find(slot_id))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn prescribed_slot(
        &self,
        prescribed_id: Uuid,
    ) -> Result<Option<Uuid>, ProgramRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        prescribed_exercises::table
            .find(prescribed_id)
            .select(prescribed_exercises::program_workout_id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)
    }

    async fn max_sort_order(
        &self,
        slot_id: Uuid,
    ) -> Result<Option<i32>, ProgramRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        prescribed_exercises::table
            .filter(prescribed_exercises::program_workout_id.eq(slot_id))
            .select(diesel::dsl::max(prescribed_exercises::sort_order))
            .first(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn insert_prescribed(
        &self,
        prescription: NewPrescribedExercise,
    ) -> Result<PrescribedExercise, ProgramRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewPrescribedExerciseRow {
            id: Uuid::new_v4(),
            program_workout_id: prescription.workout_slot_id,
            exercise_id: prescription.exercise_id,
            sort_order: prescription.sort_order,
            sets: db_int(prescription.sets, "set count")?,
            reps: &prescription.reps,
            intensity_value: prescription.intensity_value,
            intensity_type: prescription.intensity_type.as_deref(),
            rest_seconds: prescription.rest_seconds,
            notes: prescription.notes.as_deref(),
        };
        let inserted: PrescribedExerciseRow = diesel::insert_into(prescribed_exercises::table)
            .values(&row)
            .returning(PrescribedExerciseRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_prescribed(inserted)
    }

    async fn delete_prescribed(
        &self,
        prescribed_id: Uuid,
    ) -> Result<(), ProgramRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(prescribed_exercises::table.find(prescribed_id))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }
}
