//! Tests for the assignment service.

use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::assignment::AssignmentStatus;
use crate::domain::ports::{
    MockAssignmentRepository, MockCoachingRepository, MockProgramRepository,
};
use crate::domain::program::{DaysPerWeek, DurationWeeks, ProgramTemplate, WorkoutSlot, slot_grid};

fn coach() -> UserId {
    UserId::new("user_coach_1").expect("valid id")
}

fn client() -> UserId {
    UserId::new("user_client_1").expect("valid id")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn template(id: Uuid, weeks: u32, days: u32) -> ProgramTemplate {
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).single().expect("valid instant");
    ProgramTemplate {
        id,
        owner: coach(),
        name: "Strength Block".to_owned(),
        description: None,
        duration_weeks: DurationWeeks::new(weeks).expect("valid weeks"),
        days_per_week: DaysPerWeek::new(days).expect("valid days"),
        created_at: now,
        updated_at: now,
    }
}

fn slots(program_id: Uuid, weeks: u32, days: u32) -> Vec<WorkoutSlot> {
    slot_grid(
        DurationWeeks::new(weeks).expect("valid weeks"),
        DaysPerWeek::new(days).expect("valid days"),
    )
    .into_iter()
    .map(|seed| WorkoutSlot {
        id: Uuid::new_v4(),
        program_id,
        week_number: seed.week_number,
        day_number: seed.day_number,
        name: seed.name,
        notes: None,
    })
    .collect()
}

fn assignment(program_id: Uuid, start: NaiveDate) -> Assignment {
    Assignment {
        id: Uuid::new_v4(),
        client_id: client(),
        program_id,
        start_date: start,
        status: AssignmentStatus::Active,
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).single().expect("valid instant"),
    }
}

#[tokio::test]
async fn assign_program_generates_one_dated_log_per_slot() {
    let program_id = Uuid::new_v4();
    let start = date(2024, 1, 1);
    let grid = slots(program_id, 4, 3);

    let mut programs = MockProgramRepository::new();
    let found = template(program_id, 4, 3);
    programs
        .expect_find_owned()
        .times(1)
        .return_once(move |_, _| Ok(Some(found)));
    let returned = grid.clone();
    programs
        .expect_slots_for_program()
        .times(1)
        .return_once(move |_| Ok(returned));

    let mut coaching = MockCoachingRepository::new();
    coaching.expect_link_exists().times(1).return_once(|_, _| Ok(true));

    let mut assignments = MockAssignmentRepository::new();
    assignments
        .expect_create_with_logs()
        .withf(move |new: &NewAssignment, logs: &Vec<NewWorkoutLog>| {
            new.start_date == date(2024, 1, 1)
                && logs.len() == 12
                && logs[0].scheduled_date == date(2024, 1, 1)
                && logs[3].scheduled_date == date(2024, 1, 8)
                && logs[11].scheduled_date == date(2024, 1, 24)
        })
        .times(1)
        .return_once(move |new, _| Ok(assignment(new.program_id, new.start_date)));

    let service = AssignmentService::new(
        Arc::new(programs),
        Arc::new(coaching),
        Arc::new(assignments),
    );
    let created = service
        .assign_program(&coach(), &client(), program_id, start)
        .await
        .expect("assignment succeeds");

    assert_eq!(created.start_date, start);
}

#[tokio::test]
async fn assign_program_forbids_unowned_program() {
    let mut programs = MockProgramRepository::new();
    programs.expect_find_owned().times(1).return_once(|_, _| Ok(None));
    programs.expect_slots_for_program().times(0);

    let mut coaching = MockCoachingRepository::new();
    coaching.expect_link_exists().times(0);

    let mut assignments = MockAssignmentRepository::new();
    assignments.expect_create_with_logs().times(0);

    let service = AssignmentService::new(
        Arc::new(programs),
        Arc::new(coaching),
        Arc::new(assignments),
    );
    let error = service
        .assign_program(&coach(), &client(), Uuid::new_v4(), date(2024, 1, 1))
        .await
        .expect_err("unowned program rejected");

    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn assign_program_forbids_unlinked_client() {
    let program_id = Uuid::new_v4();

    let mut programs = MockProgramRepository::new();
    let found = template(program_id, 4, 3);
    programs
        .expect_find_owned()
        .times(1)
        .return_once(move |_, _| Ok(Some(found)));
    programs.expect_slots_for_program().times(0);

    let mut coaching = MockCoachingRepository::new();
    coaching.expect_link_exists().times(1).return_once(|_, _| Ok(false));

    let mut assignments = MockAssignmentRepository::new();
    assignments.expect_create_with_logs().times(0);

    let service = AssignmentService::new(
        Arc::new(programs),
        Arc::new(coaching),
        Arc::new(assignments),
    );
    let error = service
        .assign_program(&coach(), &client(), program_id, date(2024, 1, 1))
        .await
        .expect_err("unlinked client rejected");

    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn assigning_twice_writes_two_independent_schedules() {
    let program_id = Uuid::new_v4();
    let grid = slots(program_id, 1, 2);

    let mut programs = MockProgramRepository::new();
    let a = template(program_id, 1, 2);
    let b = a.clone();
    let mut finds = vec![a, b];
    programs
        .expect_find_owned()
        .times(2)
        .returning(move |_, _| Ok(finds.pop()));
    let returned = grid.clone();
    programs
        .expect_slots_for_program()
        .times(2)
        .returning(move |_| Ok(returned.clone()));

    let mut coaching = MockCoachingRepository::new();
    coaching.expect_link_exists().times(2).returning(|_, _| Ok(true));

    let mut assignments = MockAssignmentRepository::new();
    assignments
        .expect_create_with_logs()
        .withf(|_, logs: &Vec<NewWorkoutLog>| logs.len() == 2)
        .times(2)
        .returning(|new, _| Ok(assignment(new.program_id, new.start_date)));

    let service = AssignmentService::new(
        Arc::new(programs),
        Arc::new(coaching),
        Arc::new(assignments),
    );
    for _ in 0..2 {
        service
            .assign_program(&coach(), &client(), program_id, date(2024, 2, 5))
            .await
            .expect("each assignment succeeds");
    }
}
