//! Exercise catalog service.
//!
//! Lists the exercise definitions visible to a coach (global plus their own)
//! and creates coach-owned definitions.

use std::str::FromStr;
use std::sync::Arc;

use crate::domain::Error;
use crate::domain::exercise::{ExerciseCategory, ExerciseDefinition};
use crate::domain::identity::UserId;
use crate::domain::ports::{ExerciseRepository, ExerciseRepositoryError, NewExercise};

fn map_repository_error(error: ExerciseRepositoryError) -> Error {
    match error {
        ExerciseRepositoryError::Connection { message } => {
            Error::dependency_failure(format!("exercise repository unavailable: {message}"))
        }
        ExerciseRepositoryError::Query { message } => {
            Error::dependency_failure(format!("exercise repository error: {message}"))
        }
    }
}

/// Catalog service over the exercise repository port.
#[derive(Clone)]
pub struct CatalogService<E> {
    exercises: Arc<E>,
}

impl<E> CatalogService<E> {
    /// Create a new catalog service.
    pub fn new(exercises: Arc<E>) -> Self {
        Self { exercises }
    }
}

impl<E> CatalogService<E>
where
    E: ExerciseRepository,
{
    /// Definitions visible to `coach`: global rows plus the coach's own,
    /// name ascending.
    pub async fn list_visible_exercises(
        &self,
        coach: &UserId,
    ) -> Result<Vec<ExerciseDefinition>, Error> {
        self.exercises
            .list_visible(coach)
            .await
            .map_err(map_repository_error)
    }

    /// Create a coach-owned definition. The name is trimmed; an empty name
    /// or unknown category is rejected before any write.
    pub async fn create_exercise(
        &self,
        coach: &UserId,
        name: &str,
        category: &str,
    ) -> Result<ExerciseDefinition, Error> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::invalid_request("exercise name is required"));
        }
        let category = ExerciseCategory::from_str(category)
            .map_err(|err| Error::invalid_request(err.to_string()))?;

        self.exercises
            .insert(NewExercise {
                owner: Some(coach.clone()),
                name: name.to_owned(),
                category,
            })
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "catalog_service_tests.rs"]
mod tests;
