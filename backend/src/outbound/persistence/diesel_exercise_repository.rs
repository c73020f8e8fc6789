//! PostgreSQL-backed `ExerciseRepository` implementation using Diesel ORM.

use std::str::FromStr;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::exercise::{ExerciseCategory, ExerciseDefinition};
use crate::domain::identity::UserId;
use crate::domain::ports::{ExerciseRepository, ExerciseRepositoryError, NewExercise};

use super::diesel_error_mapping;
use super::models::{ExerciseRow, NewExerciseRow};
use super::pool::{DbPool, PoolError};
use super::schema::exercises;

/// Diesel-backed implementation of the exercise repository port.
#[derive(Clone)]
pub struct DieselExerciseRepository {
    pool: DbPool,
}

impl DieselExerciseRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ExerciseRepositoryError {
    diesel_error_mapping::map_pool_error(error, ExerciseRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ExerciseRepositoryError {
    diesel_error_mapping::map_diesel_error(
        error,
        ExerciseRepositoryError::query,
        ExerciseRepositoryError::connection,
    )
}

fn row_to_definition(row: ExerciseRow) -> Result<ExerciseDefinition, ExerciseRepositoryError> {
    let owner = row
        .coach_id
        .map(UserId::new)
        .transpose()
        .map_err(|err| ExerciseRepositoryError::query(err.to_string()))?;
    let category = ExerciseCategory::from_str(&row.category)
        .map_err(|err| ExerciseRepositoryError::query(err.to_string()))?;

    Ok(ExerciseDefinition {
        id: row.id,
        owner,
        name: row.name,
        category,
        created_at: row.created_at,
    })
}

#[async_trait]
impl ExerciseRepository for DieselExerciseRepository {
    async fn list_visible(
        &self,
        coach_id: &UserId,
    ) -> Result<Vec<ExerciseDefinition>, ExerciseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ExerciseRow> = exercises::table
            .filter(
                exercises::coach_id
                    .is_null()
                    .or(exercises::coach_id.eq(coach_id.as_str())),
            )
            .order(exercises::name.asc())
            .select(ExerciseRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_definition).collect()
    }

    async fn insert(
        &self,
        new: NewExercise,
    ) -> Result<ExerciseDefinition, ExerciseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewExerciseRow {
            id: Uuid::new_v4(),
            coach_id: new.owner.as_ref().map(UserId::as_str),
            name: &new.name,
            category: new.category.as_str(),
        };

        let inserted: ExerciseRow = diesel::insert_into(exercises::table)
            .values(&row)
            .returning(ExerciseRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_definition(inserted)
    }
}

#[cfg(test)]
mod tests {
    //! Conversion and mapping coverage; live queries are exercised against a
    //! real database elsewhere.

    use chrono::Utc;
    use rstest::rstest;

    use super::*;

    fn row(coach_id: Option<&str>, category: &str) -> ExerciseRow {
        ExerciseRow {
            id: Uuid::new_v4(),
            coach_id: coach_id.map(str::to_owned),
            name: "Back Squat".to_owned(),
            category: category.to_owned(),
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn global_row_converts_with_no_owner() {
        let definition = row_to_definition(row(None, "squat")).expect("row converts");
        assert_eq!(definition.owner, None);
        assert_eq!(definition.category, ExerciseCategory::Squat);
    }

    #[rstest]
    fn owned_row_converts_with_its_owner() {
        let definition =
            row_to_definition(row(Some("user_coach_1"), "hinge")).expect("row converts");
        assert_eq!(
            definition.owner,
            Some(UserId::new("user_coach_1").expect("valid id"))
        );
        assert_eq!(definition.category, ExerciseCategory::Hinge);
    }

    #[rstest]
    fn unknown_category_maps_to_a_query_error() {
        let error = row_to_definition(row(None, "plyometric")).expect_err("unknown category");
        assert!(matches!(error, ExerciseRepositoryError::Query { .. }));
    }
}
