//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and are
//! never exposed to the domain. Conversions into domain types live next to
//! the repository that reads them.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{
    client_assignments, coach_clients, coach_invitations, exercises, prescribed_exercises,
    program_workouts, programs, set_logs, users, workout_logs,
};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub unit_preference: String,
    #[expect(dead_code, reason = "schema field not surfaced by any read")]
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the exercises table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = exercises)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ExerciseRow {
    pub id: Uuid,
    pub coach_id: Option<String>,
    pub name: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating exercise definitions.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = exercises)]
pub(crate) struct NewExerciseRow<'a> {
    pub id: Uuid,
    pub coach_id: Option<&'a str>,
    pub name: &'a str,
    pub category: &'a str,
}

/// Row struct for reading from the programs table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = programs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProgramRow {
    pub id: Uuid,
    pub coach_id: String,
    pub name: String,
    pub description: Option<String>,
    pub duration_weeks: i32,
    pub days_per_week: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating programs.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = programs)]
pub(crate) struct NewProgramRow<'a> {
    pub id: Uuid,
    pub coach_id: &'a str,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub duration_weeks: i32,
    pub days_per_week: i32,
}

/// Row struct for reading from the program_workouts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = program_workouts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProgramWorkoutRow {
    pub id: Uuid,
    pub program_id: Uuid,
    pub week_number: i32,
    pub day_number: i32,
    pub name: String,
    pub notes: Option<String>,
}

/// Insertable struct for creating workout slots.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = program_workouts)]
pub(crate) struct NewProgramWorkoutRow<'a> {
    pub id: Uuid,
    pub program_id: Uuid,
    pub week_number: i32,
    pub day_number: i32,
    pub name: &'a str,
}

/// Changeset for program metadata updates.
///
/// `description` uses the double-`Option` idiom: the outer `None` leaves the
/// column untouched, `Some(None)` clears it.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = programs)]
pub(crate) struct ProgramChangeset<'a> {
    pub name: Option<&'a str>,
    pub description: Option<Option<&'a str>>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset for workout slot updates, with the same double-`Option` idiom
/// for `notes`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = program_workouts)]
pub(crate) struct ProgramWorkoutChangeset<'a> {
    pub name: Option<&'a str>,
    pub notes: Option<Option<&'a str>>,
}

/// Row struct for reading from the prescribed_exercises table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = prescribed_exercises)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PrescribedExerciseRow {
    pub id: Uuid,
    pub program_workout_id: Uuid,
    pub exercise_id: Uuid,
    pub sort_order: i32,
    pub sets: i32,
    pub reps: String,
    pub intensity_value: Option<f64>,
    pub intensity_type: Option<String>,
    pub rest_seconds: Option<i32>,
    pub notes: Option<String>,
}

/// Insertable struct for creating prescriptions.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = prescribed_exercises)]
pub(crate) struct NewPrescribedExerciseRow<'a> {
    pub id: Uuid,
    pub program_workout_id: Uuid,
    pub exercise_id: Uuid,
    pub sort_order: i32,
    pub sets: i32,
    pub reps: &'a str,
    pub intensity_value: Option<f64>,
    pub intensity_type: Option<&'a str>,
    pub rest_seconds: Option<i32>,
    pub notes: Option<&'a str>,
}

/// Row struct for reading from the client_assignments table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = client_assignments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ClientAssignmentRow {
    pub id: Uuid,
    pub client_id: String,
    pub program_id: Uuid,
    pub start_date: NaiveDate,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating assignments.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = client_assignments)]
pub(crate) struct NewClientAssignmentRow<'a> {
    pub id: Uuid,
    pub client_id: &'a str,
    pub program_id: Uuid,
    pub start_date: NaiveDate,
    pub status: &'a str,
}

/// Row struct for reading from the workout_logs table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = workout_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct WorkoutLogRow {
    pub id: Uuid,
    pub client_id: String,
    pub assignment_id: Uuid,
    pub program_workout_id: Uuid,
    pub scheduled_date: NaiveDate,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// Insertable struct for generating schedule rows alongside an assignment.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = workout_logs)]
pub(crate) struct NewWorkoutLogRow<'a> {
    pub id: Uuid,
    pub client_id: &'a str,
    pub assignment_id: Uuid,
    pub program_workout_id: Uuid,
    pub scheduled_date: NaiveDate,
}

/// Changeset stamping a workout log completed.
///
/// `notes` uses the double-`Option` idiom: the outer `None` leaves the
/// column untouched, `Some(None)` clears it.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = workout_logs)]
pub(crate) struct WorkoutLogCompletionChangeset<'a> {
    pub completed_at: DateTime<Utc>,
    pub notes: Option<Option<&'a str>>,
}

/// Row struct for reading from the set_logs table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = set_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SetLogRow {
    #[expect(dead_code, reason = "key column; the domain type scopes by log already")]
    pub workout_log_id: Uuid,
    pub prescribed_exercise_id: Uuid,
    pub set_number: i32,
    pub reps_completed: Option<i32>,
    pub weight_kg: Option<f64>,
    pub rpe: Option<f64>,
    pub notes: Option<String>,
}

/// Insertable struct for the full-replace set log write.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = set_logs)]
pub(crate) struct NewSetLogRow<'a> {
    pub workout_log_id: Uuid,
    pub prescribed_exercise_id: Uuid,
    pub set_number: i32,
    pub reps_completed: Option<i32>,
    pub weight_kg: Option<f64>,
    pub rpe: Option<f64>,
    pub notes: Option<&'a str>,
}

/// Row struct for reading from the coach_clients table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = coach_clients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CoachClientRow {
    pub coach_id: String,
    pub client_id: String,
    pub status: String,
    pub joined_at: DateTime<Utc>,
}

/// Insertable struct for creating roster links.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = coach_clients)]
pub(crate) struct NewCoachClientRow<'a> {
    pub coach_id: &'a str,
    pub client_id: &'a str,
    pub status: &'a str,
    pub joined_at: DateTime<Utc>,
}

/// Row struct for reading from the coach_invitations table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = coach_invitations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CoachInvitationRow {
    pub id: Uuid,
    pub coach_id: String,
    pub email: String,
    pub token: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating invitations.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = coach_invitations)]
pub(crate) struct NewCoachInvitationRow<'a> {
    pub id: Uuid,
    pub coach_id: &'a str,
    pub email: &'a str,
    pub token: &'a str,
}
