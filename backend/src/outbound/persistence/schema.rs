//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly; Diesel uses
//! them for compile-time query validation. Principal ids (`users.id` and the
//! coach/client columns referencing it) are opaque text supplied by the
//! embedding application's identity provider; entity ids are UUID v4.

diesel::table! {
    /// Principals synced from the embedding application.
    users (id) {
        /// Opaque external principal id.
        id -> Text,
        name -> Text,
        email -> Text,
        /// Display unit for loads: `kg` or `lb`.
        unit_preference -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Exercise catalog: global rows (`coach_id` null) plus coach-owned rows.
    exercises (id) {
        id -> Uuid,
        coach_id -> Nullable<Text>,
        name -> Text,
        /// One of the nine movement categories.
        category -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Coach-authored program templates.
    programs (id) {
        id -> Uuid,
        coach_id -> Text,
        name -> Text,
        description -> Nullable<Text>,
        duration_weeks -> Int4,
        days_per_week -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// One slot per (week, day) cell of a program's grid.
    program_workouts (id) {
        id -> Uuid,
        program_id -> Uuid,
        week_number -> Int4,
        day_number -> Int4,
        name -> Text,
        notes -> Nullable<Text>,
    }
}

diesel::table! {
    /// Exercise prescriptions within a workout slot.
    prescribed_exercises (id) {
        id -> Uuid,
        program_workout_id -> Uuid,
        exercise_id -> Uuid,
        sort_order -> Int4,
        sets -> Int4,
        /// Free-text rep target, e.g. `10` or `8-12`.
        reps -> Text,
        intensity_value -> Nullable<Float8>,
        intensity_type -> Nullable<Text>,
        rest_seconds -> Nullable<Int4>,
        notes -> Nullable<Text>,
    }
}

diesel::table! {
    /// A program bound to one client from a start date.
    client_assignments (id) {
        id -> Uuid,
        client_id -> Text,
        program_id -> Uuid,
        start_date -> Date,
        status -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One dated occurrence of a workout slot for a client.
    workout_logs (id) {
        id -> Uuid,
        client_id -> Text,
        assignment_id -> Uuid,
        program_workout_id -> Uuid,
        scheduled_date -> Date,
        completed_at -> Nullable<Timestamptz>,
        notes -> Nullable<Text>,
    }
}

diesel::table! {
    /// Per-set performance records, keyed within their workout log.
    set_logs (workout_log_id, prescribed_exercise_id, set_number) {
        workout_log_id -> Uuid,
        prescribed_exercise_id -> Uuid,
        set_number -> Int4,
        reps_completed -> Nullable<Int4>,
        weight_kg -> Nullable<Float8>,
        rpe -> Nullable<Float8>,
        notes -> Nullable<Text>,
    }
}

diesel::table! {
    /// Roster membership of a client with a coach.
    coach_clients (coach_id, client_id) {
        coach_id -> Text,
        client_id -> Text,
        status -> Text,
        joined_at -> Timestamptz,
    }
}

diesel::table! {
    /// Pending single-use invitations to join a coach's roster.
    coach_invitations (id) {
        id -> Uuid,
        coach_id -> Text,
        /// Stored trimmed and lowercased.
        email -> Text,
        /// 48 lowercase hex characters, unique.
        token -> Text,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(program_workouts -> programs (program_id));
diesel::joinable!(prescribed_exercises -> program_workouts (program_workout_id));
diesel::joinable!(prescribed_exercises -> exercises (exercise_id));
diesel::joinable!(client_assignments -> programs (program_id));
diesel::joinable!(workout_logs -> client_assignments (assignment_id));
diesel::joinable!(workout_logs -> program_workouts (program_workout_id));
diesel::joinable!(workout_logs -> users (client_id));
diesel::joinable!(set_logs -> workout_logs (workout_log_id));
diesel::joinable!(set_logs -> prescribed_exercises (prescribed_exercise_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    exercises,
    programs,
    program_workouts,
    prescribed_exercises,
    client_assignments,
    workout_logs,
    set_logs,
    coach_clients,
    coach_invitations,
);
