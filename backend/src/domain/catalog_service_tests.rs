//! Tests for the exercise catalog service.

use std::sync::Arc;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::MockExerciseRepository;
use chrono::Utc;
use uuid::Uuid;

fn coach() -> UserId {
    UserId::new("user_coach_1").expect("valid id")
}

fn definition(name: &str, owner: Option<UserId>) -> ExerciseDefinition {
    ExerciseDefinition {
        id: Uuid::new_v4(),
        owner,
        name: name.to_owned(),
        category: ExerciseCategory::Squat,
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn list_visible_exercises_returns_repository_rows() {
    let mut repo = MockExerciseRepository::new();
    let rows = vec![
        definition("Back Squat", None),
        definition("Box Squat", Some(coach())),
    ];
    let returned = rows.clone();
    repo.expect_list_visible()
        .times(1)
        .return_once(move |_| Ok(returned));

    let service = CatalogService::new(Arc::new(repo));
    let listed = service
        .list_visible_exercises(&coach())
        .await
        .expect("list succeeds");

    assert_eq!(listed, rows);
}

#[tokio::test]
async fn create_exercise_trims_name_and_persists_with_owner() {
    let mut repo = MockExerciseRepository::new();
    repo.expect_insert()
        .withf(|new: &NewExercise| {
            new.name == "Front Squat"
                && new.category == ExerciseCategory::Squat
                && new.owner == Some(UserId::new("user_coach_1").expect("valid id"))
        })
        .times(1)
        .return_once(|new| {
            Ok(ExerciseDefinition {
                id: Uuid::new_v4(),
                owner: new.owner,
                name: new.name,
                category: new.category,
                created_at: Utc::now(),
            })
        });

    let service = CatalogService::new(Arc::new(repo));
    let created = service
        .create_exercise(&coach(), "  Front Squat  ", "squat")
        .await
        .expect("create succeeds");

    assert_eq!(created.name, "Front Squat");
}

#[tokio::test]
async fn create_exercise_rejects_blank_name_without_writing() {
    let mut repo = MockExerciseRepository::new();
    repo.expect_insert().times(0);

    let service = CatalogService::new(Arc::new(repo));
    let error = service
        .create_exercise(&coach(), "   ", "squat")
        .await
        .expect_err("blank name rejected");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn create_exercise_rejects_unknown_category() {
    let mut repo = MockExerciseRepository::new();
    repo.expect_insert().times(0);

    let service = CatalogService::new(Arc::new(repo));
    let error = service
        .create_exercise(&coach(), "Sled Drag", "plyometric")
        .await
        .expect_err("unknown category rejected");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn list_maps_connection_error_to_dependency_failure() {
    let mut repo = MockExerciseRepository::new();
    repo.expect_list_visible()
        .times(1)
        .return_once(|_| Err(ExerciseRepositoryError::connection("pool unavailable")));

    let service = CatalogService::new(Arc::new(repo));
    let error = service
        .list_visible_exercises(&coach())
        .await
        .expect_err("dependency failure");

    assert_eq!(error.code(), ErrorCode::DependencyFailure);
}
