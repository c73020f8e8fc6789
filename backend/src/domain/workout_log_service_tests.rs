//! Tests for the workout logging service.

use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::identity::UserSummary;
use crate::domain::ports::{
    MockCoachingRepository, MockUserRepository, MockWorkoutLogRepository, PrescriptionForLogging,
    WorkoutLogHeader,
};
use crate::domain::workout_log::WorkoutLog;
use crate::test_support::MutableClock;

fn client() -> UserId {
    UserId::new("user_client_1").expect("valid id")
}

fn coach() -> UserId {
    UserId::new("user_coach_1").expect("valid id")
}

fn stranger() -> UserId {
    UserId::new("user_stranger").expect("valid id")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn header(log_id: Uuid, slot_id: Uuid) -> WorkoutLogHeader {
    WorkoutLogHeader {
        log: WorkoutLog {
            id: log_id,
            client_id: client(),
            assignment_id: Uuid::new_v4(),
            workout_slot_id: slot_id,
            scheduled_date: date(2024, 3, 4),
            completed_at: None,
            notes: None,
        },
        workout_name: "Week 1 Day 1".to_owned(),
        program_id: Uuid::new_v4(),
        program_name: "Strength Block".to_owned(),
    }
}

fn summary(
    scheduled: NaiveDate,
    completed: Option<chrono::DateTime<Utc>>,
    notes: Option<&str>,
) -> WorkoutLogSummary {
    WorkoutLogSummary {
        id: Uuid::new_v4(),
        workout_name: "Week 1 Day 1".to_owned(),
        program_name: "Strength Block".to_owned(),
        scheduled_date: scheduled,
        completed_at: completed,
        notes: notes.map(str::to_owned),
    }
}

fn service(
    logs: MockWorkoutLogRepository,
    coaching: MockCoachingRepository,
    users: MockUserRepository,
) -> WorkoutLogService<MockWorkoutLogRepository, MockCoachingRepository, MockUserRepository> {
    let now = Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).single().expect("valid instant");
    WorkoutLogService::new(
        Arc::new(logs),
        Arc::new(coaching),
        Arc::new(users),
        Arc::new(MutableClock::new(now)),
    )
}

#[tokio::test]
async fn get_workout_log_builds_a_dense_grid_per_prescription() {
    let log_id = Uuid::new_v4();
    let slot_id = Uuid::new_v4();
    let squat = Uuid::new_v4();
    let press = Uuid::new_v4();

    let mut logs = MockWorkoutLogRepository::new();
    let found = header(log_id, slot_id);
    logs.expect_find_header()
        .times(1)
        .return_once(move |_| Ok(Some(found)));
    logs.expect_prescriptions_for_slot()
        .times(1)
        .return_once(move |_| {
            Ok(vec![
                PrescriptionForLogging {
                    id: squat,
                    exercise_name: "Back Squat".to_owned(),
                    sets: 3,
                    reps: "5".to_owned(),
                    notes: None,
                },
                PrescriptionForLogging {
                    id: press,
                    exercise_name: "Overhead Press".to_owned(),
                    sets: 2,
                    reps: "8".to_owned(),
                    notes: Some("strict".to_owned()),
                },
            ])
        });
    logs.expect_set_logs().times(1).return_once(move |_| {
        Ok(vec![SetLog {
            prescribed_exercise_id: squat,
            set_number: 2,
            reps_completed: Some(5),
            weight_kg: Some(120.0),
            rpe: Some(8.5),
            notes: None,
        }])
    });

    let mut users = MockUserRepository::new();
    users.expect_find_summary().times(1).return_once(|id| {
        Ok(Some(UserSummary {
            id: id.clone(),
            name: "Avery".to_owned(),
            email: "avery@example.com".to_owned(),
        }))
    });

    let detail = service(logs, MockCoachingRepository::new(), users)
        .get_workout_log(log_id, &client())
        .await
        .expect("read succeeds")
        .expect("log visible to its client");

    assert_eq!(detail.client_name, "Avery");
    assert_eq!(detail.exercises.len(), 2);
    assert_eq!(detail.exercises[0].set_logs.len(), 3);
    assert!(detail.exercises[0].set_logs[0].is_empty());
    assert_eq!(detail.exercises[0].set_logs[1].weight_kg, Some(120.0));
    assert_eq!(detail.exercises[1].set_logs.len(), 2);
    assert!(detail.exercises[1].set_logs.iter().all(|e| e.is_empty()));
}

#[tokio::test]
async fn get_workout_log_is_visible_to_a_linked_coach() {
    let log_id = Uuid::new_v4();

    let mut logs = MockWorkoutLogRepository::new();
    let found = header(log_id, Uuid::new_v4());
    logs.expect_find_header()
        .times(1)
        .return_once(move |_| Ok(Some(found)));
    logs.expect_prescriptions_for_slot()
        .times(1)
        .return_once(|_| Ok(Vec::new()));
    logs.expect_set_logs().times(1).return_once(|_| Ok(Vec::new()));

    let mut coaching = MockCoachingRepository::new();
    coaching
        .expect_link_exists()
        .withf(|requester, owner| {
            requester.as_str() == "user_coach_1" && owner.as_str() == "user_client_1"
        })
        .times(1)
        .return_once(|_, _| Ok(true));

    let mut users = MockUserRepository::new();
    users.expect_find_summary().times(1).return_once(|_| Ok(None));

    let detail = service(logs, coaching, users)
        .get_workout_log(log_id, &coach())
        .await
        .expect("read succeeds")
        .expect("log visible to the coach");

    // No user row: the detail degrades to the raw principal id.
    assert_eq!(detail.client_name, "user_client_1");
}

#[tokio::test]
async fn get_workout_log_hides_the_log_from_strangers() {
    let log_id = Uuid::new_v4();

    let mut logs = MockWorkoutLogRepository::new();
    let found = header(log_id, Uuid::new_v4());
    logs.expect_find_header()
        .times(1)
        .return_once(move |_| Ok(Some(found)));
    logs.expect_prescriptions_for_slot().times(0);

    let mut coaching = MockCoachingRepository::new();
    coaching.expect_link_exists().times(1).return_once(|_, _| Ok(false));

    let detail = service(logs, coaching, MockUserRepository::new())
        .get_workout_log(log_id, &stranger())
        .await
        .expect("read degrades");

    assert!(detail.is_none());
}

#[tokio::test]
async fn save_set_logs_replaces_rows_verbatim() {
    let log_id = Uuid::new_v4();
    let prescribed = Uuid::new_v4();

    let mut logs = MockWorkoutLogRepository::new();
    let found = header(log_id, Uuid::new_v4());
    logs.expect_find_header()
        .times(1)
        .return_once(move |_| Ok(Some(found)));
    logs.expect_replace_set_logs()
        .withf(move |id, entries: &Vec<SetLog>| {
            *id == log_id && entries.len() == 1 && entries[0].set_number == 7
        })
        .times(1)
        .return_once(|_, _| Ok(()));

    // set_number 7 exceeds any plausible prescription and is stored anyway.
    service(logs, MockCoachingRepository::new(), MockUserRepository::new())
        .save_set_logs(
            log_id,
            &client(),
            vec![SetLog {
                prescribed_exercise_id: prescribed,
                set_number: 7,
                reps_completed: Some(3),
                weight_kg: Some(140.0),
                rpe: None,
                notes: None,
            }],
        )
        .await
        .expect("save succeeds");
}

#[tokio::test]
async fn save_set_logs_forbids_strangers() {
    let log_id = Uuid::new_v4();

    let mut logs = MockWorkoutLogRepository::new();
    let found = header(log_id, Uuid::new_v4());
    logs.expect_find_header()
        .times(1)
        .return_once(move |_| Ok(Some(found)));
    logs.expect_replace_set_logs().times(0);

    let mut coaching = MockCoachingRepository::new();
    coaching.expect_link_exists().times(1).return_once(|_, _| Ok(false));

    let error = service(logs, coaching, MockUserRepository::new())
        .save_set_logs(log_id, &stranger(), Vec::new())
        .await
        .expect_err("stranger rejected");

    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn save_set_logs_maps_missing_log_to_not_found() {
    let mut logs = MockWorkoutLogRepository::new();
    logs.expect_find_header().times(1).return_once(|_| Ok(None));
    logs.expect_replace_set_logs().times(0);

    let error = service(logs, MockCoachingRepository::new(), MockUserRepository::new())
        .save_set_logs(Uuid::new_v4(), &client(), Vec::new())
        .await
        .expect_err("missing log fails");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn complete_workout_stamps_the_clock_and_keeps_notes_when_none() {
    let log_id = Uuid::new_v4();
    let expected_now = Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).single().expect("valid instant");

    let mut logs = MockWorkoutLogRepository::new();
    let found = header(log_id, Uuid::new_v4());
    logs.expect_find_header()
        .times(1)
        .return_once(move |_| Ok(Some(found)));
    logs.expect_mark_completed()
        .withf(move |_, at, notes| *at == expected_now && notes.is_none())
        .times(1)
        .return_once(|_, _, _| Ok(()));

    service(logs, MockCoachingRepository::new(), MockUserRepository::new())
        .complete_workout(log_id, &client(), None)
        .await
        .expect("completion succeeds");
}

#[tokio::test]
async fn completing_again_bumps_the_timestamp() {
    let log_id = Uuid::new_v4();
    let slot_id = Uuid::new_v4();
    let first = Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).single().expect("valid instant");
    let second = Utc.with_ymd_and_hms(2024, 3, 4, 10, 0, 0).single().expect("valid instant");

    let mut logs = MockWorkoutLogRepository::new();
    logs.expect_find_header()
        .times(2)
        .returning(move |_| Ok(Some(header(log_id, slot_id))));
    logs.expect_mark_completed()
        .withf(move |id, at, _| *id == log_id && *at == first)
        .times(1)
        .return_once(|_, _, _| Ok(()));
    logs.expect_mark_completed()
        .withf(move |id, at, _| *id == log_id && *at == second)
        .times(1)
        .return_once(|_, _, _| Ok(()));

    let clock = Arc::new(MutableClock::new(first));
    let service = WorkoutLogService::new(
        Arc::new(logs),
        Arc::new(MockCoachingRepository::new()),
        Arc::new(MockUserRepository::new()),
        Arc::clone(&clock) as Arc<dyn mockable::Clock>,
    );

    service
        .complete_workout(log_id, &client(), None)
        .await
        .expect("first completion succeeds");

    clock.advance_seconds(3600);

    service
        .complete_workout(log_id, &client(), None)
        .await
        .expect("re-completion succeeds");
}

#[tokio::test]
async fn complete_workout_overwrites_notes_when_provided() {
    let log_id = Uuid::new_v4();

    let mut logs = MockWorkoutLogRepository::new();
    let found = header(log_id, Uuid::new_v4());
    logs.expect_find_header()
        .times(1)
        .return_once(move |_| Ok(Some(found)));
    logs.expect_mark_completed()
        .withf(|_, _, notes| notes == &Some(Some("solid session".to_owned())))
        .times(1)
        .return_once(|_, _, _| Ok(()));

    service(logs, MockCoachingRepository::new(), MockUserRepository::new())
        .complete_workout(log_id, &client(), Some("solid session".to_owned()))
        .await
        .expect("completion succeeds");
}

#[tokio::test]
async fn todays_workouts_filters_by_calendar_date() {
    let mut logs = MockWorkoutLogRepository::new();
    logs.expect_summaries_for_client().times(1).return_once(|_| {
        Ok(vec![
            summary(date(2024, 3, 3), None, None),
            summary(date(2024, 3, 4), None, None),
            summary(date(2024, 3, 5), None, None),
        ])
    });

    let todays = service(logs, MockCoachingRepository::new(), MockUserRepository::new())
        .todays_workouts(&client())
        .await
        .expect("read succeeds");

    assert_eq!(todays.len(), 1);
    assert_eq!(todays[0].scheduled_date, date(2024, 3, 4));
}

#[tokio::test]
async fn next_workout_returns_the_soonest_upcoming() {
    let mut logs = MockWorkoutLogRepository::new();
    logs.expect_summaries_for_client().times(1).return_once(|_| {
        Ok(vec![
            summary(date(2024, 3, 1), None, None),
            summary(date(2024, 3, 8), None, None),
            summary(date(2024, 3, 6), None, None),
        ])
    });

    let next = service(logs, MockCoachingRepository::new(), MockUserRepository::new())
        .next_workout(&client())
        .await
        .expect("read succeeds")
        .expect("an upcoming workout");

    assert_eq!(next.scheduled_date, date(2024, 3, 6));
}

#[tokio::test]
async fn workout_history_lists_completions_newest_first() {
    let early = Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).single().expect("ts");
    let late = Utc.with_ymd_and_hms(2024, 3, 3, 18, 0, 0).single().expect("ts");

    let mut logs = MockWorkoutLogRepository::new();
    logs.expect_summaries_for_client().times(1).return_once(move |_| {
        Ok(vec![
            summary(date(2024, 3, 1), Some(early), None),
            summary(date(2024, 3, 2), None, None),
            summary(date(2024, 3, 3), Some(late), None),
        ])
    });

    let history = service(logs, MockCoachingRepository::new(), MockUserRepository::new())
        .workout_history(&client(), 10)
        .await
        .expect("read succeeds");

    assert_eq!(history.len(), 2);
    assert_eq!(history[0].completed_at, Some(late));
    assert_eq!(history[1].completed_at, Some(early));
}

#[tokio::test]
async fn recent_activity_keeps_only_noted_completions() {
    let at = Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).single().expect("ts");

    let mut logs = MockWorkoutLogRepository::new();
    logs.expect_summaries_for_client().times(1).return_once(move |_| {
        Ok(vec![
            summary(date(2024, 3, 1), Some(at), Some("new PR")),
            summary(date(2024, 3, 2), Some(at), None),
            summary(date(2024, 3, 3), None, Some("planned notes")),
        ])
    });

    let noted = service(logs, MockCoachingRepository::new(), MockUserRepository::new())
        .recent_activity_with_notes(&client(), 10)
        .await
        .expect("read succeeds");

    assert_eq!(noted.len(), 1);
    assert_eq!(noted[0].notes.as_deref(), Some("new PR"));
}
