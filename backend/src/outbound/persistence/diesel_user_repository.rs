//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! User rows are written by the identity sync of the embedding application;
//! this adapter only reads profiles and owns the unit preference column.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::identity::{UnitPreference, UserId, UserSummary};
use crate::domain::ports::{UserRepository, UserRepositoryError};

use super::diesel_error_mapping;
use super::models::UserRow;
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    diesel_error_mapping::map_pool_error(error, UserRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    diesel_error_mapping::map_diesel_error(
        error,
        UserRepositoryError::query,
        UserRepositoryError::connection,
    )
}

fn row_to_summary(row: UserRow) -> Result<UserSummary, UserRepositoryError> {
    let id = UserId::new(row.id).map_err(|err| UserRepositoryError::query(err.to_string()))?;
    Ok(UserSummary {
        id,
        name: row.name,
        email: row.email,
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn names_for(
        &self,
        ids: &[UserId],
    ) -> Result<Vec<(UserId, String)>, UserRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let id_strings: Vec<&str> = ids.iter().map(UserId::as_str).collect();
        let rows: Vec<(String, String)> = users::table
            .filter(users::id.eq_any(&id_strings))
            .select((users::id, users::name))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|(id, name)| {
                UserId::new(id)
                    .map(|id| (id, name))
                    .map_err(|err| UserRepositoryError::query(err.to_string()))
            })
            .collect()
    }

    async fn find_summary(
        &self,
        id: &UserId,
    ) -> Result<Option<UserSummary>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .find(id.as_str())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_summary).transpose()
    }

    async fn unit_preference(
        &self,
        id: &UserId,
    ) -> Result<Option<UnitPreference>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let stored: Option<String> = users::table
            .find(id.as_str())
            .select(users::unit_preference)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(stored.map(|value| UnitPreference::from_stored(&value)))
    }

    async fn set_unit_preference(
        &self,
        id: &UserId,
        unit: UnitPreference,
    ) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::update(users::table.find(id.as_str()))
            .set(users::unit_preference.eq(unit.as_str()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn user_row_converts_to_a_summary() {
        let summary = row_to_summary(UserRow {
            id: "user_client_1".to_owned(),
            name: "Avery".to_owned(),
            email: "avery@example.com".to_owned(),
            unit_preference: "kg".to_owned(),
            created_at: Utc::now(),
        })
        .expect("row converts");

        assert_eq!(summary.id.as_str(), "user_client_1");
        assert_eq!(summary.name, "Avery");
    }

    #[rstest]
    fn blank_principal_id_maps_to_a_query_error() {
        let error = row_to_summary(UserRow {
            id: "  ".to_owned(),
            name: "Avery".to_owned(),
            email: "avery@example.com".to_owned(),
            unit_preference: "kg".to_owned(),
            created_at: Utc::now(),
        })
        .expect_err("blank id rejected");

        assert!(matches!(error, UserRepositoryError::Query { .. }));
    }
}
