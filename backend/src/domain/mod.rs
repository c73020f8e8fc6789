//! Domain types, ports, and services for the coaching core.
//!
//! Purpose: Define strongly typed domain entities, the repository ports the
//! services depend on, and the services that carry the coaching rules. Keep
//! types immutable and document invariants and serialisation contracts
//! (serde) in each type's Rustdoc.
//!
//! Layout:
//! - Leaf modules (`program`, `schedule`, `progress`, `workout_log`, ...)
//!   hold pure types and functions with no I/O.
//! - `ports` holds the async traits outbound adapters implement.
//! - `*_service` modules orchestrate ports into the operations callers use.

pub mod assignment;
pub mod assignment_service;
pub mod catalog_service;
pub mod coaching;
pub mod dashboard_service;
pub mod error;
pub mod exercise;
pub mod identity;
pub mod ports;
pub mod program;
pub mod program_service;
pub mod progress;
pub mod roster_service;
pub mod schedule;
pub mod workout_log;
pub mod workout_log_service;

pub use self::assignment::{Assignment, AssignmentStatus, AssignmentWithProgram};
pub use self::coaching::{CoachClientLink, Invitation, InviteToken, LinkStatus};
pub use self::error::{Error, ErrorCode};
pub use self::exercise::{ExerciseCategory, ExerciseDefinition};
pub use self::identity::{Role, UnitPreference, UserId, UserSummary};
pub use self::program::{
    DaysPerWeek, DurationWeeks, PrescribedExercise, PrescribedExerciseDetail, ProgramTemplate,
    ProgramWithWorkouts, WorkoutSlot,
};
pub use self::workout_log::{SetLog, WorkoutLog, WorkoutLogDetail, WorkoutLogSummary};

/// Convenient domain result alias.
pub type DomainResult<T> = Result<T, Error>;
