//! Port for program template persistence: the program row, its slot grid,
//! and the prescriptions hanging off each slot.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::identity::UserId;
use crate::domain::program::{
    DaysPerWeek, DurationWeeks, PrescribedExercise, PrescribedExerciseDetail, ProgramTemplate,
    SlotSeed, WorkoutSlot,
};

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by program repository adapters.
    pub enum ProgramRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "program repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "program repository query failed: {message}",
    }
}

/// A program to be persisted together with its slot grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProgram {
    pub owner: UserId,
    pub name: String,
    pub description: Option<String>,
    pub duration_weeks: DurationWeeks,
    pub days_per_week: DaysPerWeek,
}

/// Partial update of program metadata. `description: Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramUpdate {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
}

/// Partial update of a workout slot. `notes: Some(None)` clears them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotUpdate {
    pub name: Option<String>,
    pub notes: Option<Option<String>>,
}

/// A prescription to be appended to a slot.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPrescribedExercise {
    pub workout_slot_id: Uuid,
    pub exercise_id: Uuid,
    pub sort_order: i32,
    pub sets: u32,
    pub reps: String,
    pub intensity_value: Option<f64>,
    pub intensity_type: Option<String>,
    pub rest_seconds: Option<i32>,
    pub notes: Option<String>,
}

/// Port for program template storage.
///
/// Multi-row mutations (`create_with_slots`, `delete_cascade`) must execute
/// inside a single transaction: callers rely on no partial grid or partial
/// cascade ever being visible.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProgramRepository: Send + Sync {
    /// Persist a program and its full slot grid atomically.
    async fn create_with_slots(
        &self,
        program: NewProgram,
        slots: Vec<SlotSeed>,
    ) -> Result<ProgramTemplate, ProgramRepositoryError>;

    /// Programs owned by a coach, most recently updated first.
    async fn list_for_coach(
        &self,
        coach_id: &UserId,
    ) -> Result<Vec<ProgramTemplate>, ProgramRepositoryError>;

    /// Find a program only when the coach owns it.
    async fn find_owned(
        &self,
        program_id: Uuid,
        coach_id: &UserId,
    ) -> Result<Option<ProgramTemplate>, ProgramRepositoryError>;

    /// Number of programs a coach owns.
    async fn count_for_coach(&self, coach_id: &UserId) -> Result<u64, ProgramRepositoryError>;

    /// Slots of a program ordered by (week_number, day_number).
    async fn slots_for_program(
        &self,
        program_id: Uuid,
    ) -> Result<Vec<WorkoutSlot>, ProgramRepositoryError>;

    /// Prescriptions across the given slots, ordered by sort_order, joined
    /// with their catalog exercise.
    async fn prescribed_for_slots(
        &self,
        slot_ids: &[Uuid],
    ) -> Result<Vec<PrescribedExerciseDetail>, ProgramRepositoryError>;

    /// Owner-scoped metadata update; returns false when no row matched.
    async fn update_program(
        &self,
        program_id: Uuid,
        coach_id: &UserId,
        update: ProgramUpdate,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, ProgramRepositoryError>;

    /// Delete a program and everything beneath it (prescriptions, slots,
    /// assignments, and the assignments' workout and set logs) atomically.
    async fn delete_cascade(&self, program_id: Uuid) -> Result<(), ProgramRepositoryError>;

    /// The program a slot belongs to, if the slot exists.
    async fn slot_program(&self, slot_id: Uuid) -> Result<Option<Uuid>, ProgramRepositoryError>;

    /// Update a slot's name/notes.
    async fn update_slot(
        &self,
        slot_id: Uuid,
        update: SlotUpdate,
    ) -> Result<(), ProgramRepositoryError>;

    /// The slot a prescription belongs to, if the prescription exists.
    async fn prescribed_slot(
        &self,
        prescribed_id: Uuid,
    ) -> Result<Option<Uuid>, ProgramRepositoryError>;

    /// Highest sort_order currently used within a slot.
    async fn max_sort_order(&self, slot_id: Uuid)
    -> Result<Option<i32>, ProgramRepositoryError>;

    /// Append a prescription to a slot.
    async fn insert_prescribed(
        &self,
        prescription: NewPrescribedExercise,
    ) -> Result<PrescribedExercise, ProgramRepositoryError>;

    /// Remove a prescription.
    async fn delete_prescribed(&self, prescribed_id: Uuid)
    -> Result<(), ProgramRepositoryError>;
}
