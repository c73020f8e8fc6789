//! Port for exercise catalog persistence.

use async_trait::async_trait;

use crate::domain::exercise::{ExerciseCategory, ExerciseDefinition};
use crate::domain::identity::UserId;

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by exercise repository adapters.
    pub enum ExerciseRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "exercise repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "exercise repository query failed: {message}",
    }
}

/// A catalog entry to be persisted for a coach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExercise {
    pub owner: Option<UserId>,
    pub name: String,
    pub category: ExerciseCategory,
}

/// Port for reading and writing the exercise catalog.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExerciseRepository: Send + Sync {
    /// Exercises visible to a coach: global entries plus their own,
    /// ordered by name ascending.
    async fn list_visible(
        &self,
        coach_id: &UserId,
    ) -> Result<Vec<ExerciseDefinition>, ExerciseRepositoryError>;

    /// Persist a coach-owned exercise.
    async fn insert(
        &self,
        exercise: NewExercise,
    ) -> Result<ExerciseDefinition, ExerciseRepositoryError>;
}
