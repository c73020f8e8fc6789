//! Repository and collaborator ports implemented by outbound adapters.

mod assignment_repository;
mod coaching_repository;
mod email_sender;
mod exercise_repository;
pub(crate) mod macros;
mod program_repository;
mod user_repository;
mod workout_log_repository;

pub use assignment_repository::{
    AssignmentRepository, AssignmentRepositoryError, NewAssignment, NewWorkoutLog,
};
pub use coaching_repository::{CoachingRepository, CoachingRepositoryError, NewInvitation};
pub use email_sender::{InviteEmailError, InviteEmailSender};
pub use exercise_repository::{ExerciseRepository, ExerciseRepositoryError, NewExercise};
pub use program_repository::{
    NewPrescribedExercise, NewProgram, ProgramRepository, ProgramRepositoryError, ProgramUpdate,
    SlotUpdate,
};
pub use user_repository::{UserRepository, UserRepositoryError};
pub use workout_log_repository::{
    PrescriptionForLogging, WorkoutLogHeader, WorkoutLogRepository, WorkoutLogRepositoryError,
};

#[cfg(test)]
pub use assignment_repository::MockAssignmentRepository;
#[cfg(test)]
pub use coaching_repository::MockCoachingRepository;
#[cfg(test)]
pub use email_sender::MockInviteEmailSender;
#[cfg(test)]
pub use exercise_repository::MockExerciseRepository;
#[cfg(test)]
pub use program_repository::MockProgramRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
#[cfg(test)]
pub use workout_log_repository::MockWorkoutLogRepository;
