//! Program authoring service.
//!
//! Creates program templates with their full slot grid, serves coach-scoped
//! reads, and edits slots and prescriptions behind ownership checks. Every
//! mutation walks the ownership chain from the touched row up to the coach
//! before writing.

use std::sync::Arc;

use mockable::Clock;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::identity::UserId;
use crate::domain::ports::{
    NewPrescribedExercise, NewProgram, ProgramRepository, ProgramRepositoryError, ProgramUpdate,
    SlotUpdate,
};
use crate::domain::program::{
    DaysPerWeek, DurationWeeks, PrescribedExercise, ProgramTemplate, ProgramWithWorkouts,
    slot_grid,
};

fn map_repository_error(error: ProgramRepositoryError) -> Error {
    match error {
        ProgramRepositoryError::Connection { message } => {
            Error::dependency_failure(format!("program repository unavailable: {message}"))
        }
        ProgramRepositoryError::Query { message } => {
            Error::dependency_failure(format!("program repository error: {message}"))
        }
    }
}

/// A prescription submitted by a coach, before sort_order is assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct PrescriptionDraft {
    pub exercise_id: Uuid,
    pub sets: u32,
    pub reps: String,
    pub intensity_value: Option<f64>,
    pub intensity_type: Option<String>,
    pub rest_seconds: Option<i32>,
    pub notes: Option<String>,
}

/// Program authoring service over the program repository port.
#[derive(Clone)]
pub struct ProgramService<P> {
    programs: Arc<P>,
    clock: Arc<dyn Clock>,
}

impl<P> ProgramService<P> {
    /// Create a new program service.
    pub fn new(programs: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self { programs, clock }
    }
}

impl<P> ProgramService<P>
where
    P: ProgramRepository,
{
    /// Create a program and synthesize its full `duration × days` slot grid
    /// in one write. Both dimensions and the name are validated first.
    pub async fn create_program(
        &self,
        coach: &UserId,
        name: &str,
        description: Option<String>,
        duration_weeks: u32,
        days_per_week: u32,
    ) -> Result<ProgramTemplate, Error> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::invalid_request("program name is required"));
        }
        let duration = DurationWeeks::new(duration_weeks)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let days = DaysPerWeek::new(days_per_week)
            .map_err(|err| Error::invalid_request(err.to_string()))?;

        let slots = slot_grid(duration, days);
        self.programs
            .create_with_slots(
                NewProgram {
                    owner: coach.clone(),
                    name: name.to_owned(),
                    description,
                    duration_weeks: duration,
                    days_per_week: days,
                },
                slots,
            )
            .await
            .map_err(map_repository_error)
    }

    /// Programs owned by the coach, most recently updated first.
    pub async fn get_programs_for_coach(
        &self,
        coach: &UserId,
    ) -> Result<Vec<ProgramTemplate>, Error> {
        self.programs
            .list_for_coach(coach)
            .await
            .map_err(map_repository_error)
    }

    /// A program with its ordered slots and prescriptions. Returns
    /// `Ok(None)` when the program is absent or owned by someone else.
    pub async fn get_program_with_workouts(
        &self,
        coach: &UserId,
        program_id: Uuid,
    ) -> Result<Option<ProgramWithWorkouts>, Error> {
        let Some(program) = self
            .programs
            .find_owned(program_id, coach)
            .await
            .map_err(map_repository_error)?
        else {
            return Ok(None);
        };

        let workouts = self
            .programs
            .slots_for_program(program_id)
            .await
            .map_err(map_repository_error)?;
        let slot_ids: Vec<Uuid> = workouts.iter().map(|slot| slot.id).collect();
        let prescribed = self
            .programs
            .prescribed_for_slots(&slot_ids)
            .await
            .map_err(map_repository_error)?;

        Ok(Some(ProgramWithWorkouts {
            program,
            workouts,
            prescribed,
        }))
    }

    /// Update program metadata. The write is owner-scoped, so a program
    /// that is absent or not owned surfaces as `NotFound`.
    pub async fn update_program(
        &self,
        coach: &UserId,
        program_id: Uuid,
        update: ProgramUpdate,
    ) -> Result<(), Error> {
        if let Some(name) = &update.name
            && name.trim().is_empty()
        {
            return Err(Error::invalid_request("program name is required"));
        }

        let matched = self
            .programs
            .update_program(program_id, coach, update, self.clock.utc())
            .await
            .map_err(map_repository_error)?;
        if matched {
            Ok(())
        } else {
            Err(Error::not_found(format!("program {program_id} not found")))
        }
    }

    /// Delete a program and everything beneath it, including workout and
    /// set logs created from its assignments.
    pub async fn delete_program(&self, coach: &UserId, program_id: Uuid) -> Result<(), Error> {
        self.programs
            .find_owned(program_id, coach)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("program {program_id} not found")))?;

        self.programs
            .delete_cascade(program_id)
            .await
            .map_err(map_repository_error)
    }

    /// Rename a slot or edit its notes, after walking slot → program →
    /// coach.
    pub async fn update_workout_slot(
        &self,
        coach: &UserId,
        slot_id: Uuid,
        update: SlotUpdate,
    ) -> Result<(), Error> {
        if let Some(name) = &update.name
            && name.trim().is_empty()
        {
            return Err(Error::invalid_request("workout name is required"));
        }

        self.require_slot_ownership(coach, slot_id).await?;
        self.programs
            .update_slot(slot_id, update)
            .await
            .map_err(map_repository_error)
    }

    /// Append a prescription to a slot, assigning the next sort_order.
    pub async fn add_prescribed_exercise(
        &self,
        coach: &UserId,
        slot_id: Uuid,
        draft: PrescriptionDraft,
    ) -> Result<PrescribedExercise, Error> {
        if draft.sets == 0 {
            return Err(Error::invalid_request("sets must be at least 1"));
        }
        let reps = draft.reps.trim();
        if reps.is_empty() {
            return Err(Error::invalid_request("reps target is required"));
        }

        self.require_slot_ownership(coach, slot_id).await?;

        let sort_order = self
            .programs
            .max_sort_order(slot_id)
            .await
            .map_err(map_repository_error)?
            .map_or(0, |max| max + 1);

        self.programs
            .insert_prescribed(NewPrescribedExercise {
                workout_slot_id: slot_id,
                exercise_id: draft.exercise_id,
                sort_order,
                sets: draft.sets,
                reps: reps.to_owned(),
                intensity_value: draft.intensity_value,
                intensity_type: draft.intensity_type,
                rest_seconds: draft.rest_seconds,
                notes: draft.notes,
            })
            .await
            .map_err(map_repository_error)
    }

    /// Remove a prescription, after walking prescription → slot → program →
    /// coach.
    pub async fn remove_prescribed_exercise(
        &self,
        coach: &UserId,
        prescribed_id: Uuid,
    ) -> Result<(), Error> {
        let slot_id = self
            .programs
            .prescribed_slot(prescribed_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| {
                Error::not_found(format!("prescribed exercise {prescribed_id} not found"))
            })?;

        self.require_slot_ownership(coach, slot_id).await?;
        self.programs
            .delete_prescribed(prescribed_id)
            .await
            .map_err(map_repository_error)
    }

    /// `NotFound` when the slot does not exist, `Forbidden` when its program
    /// is not owned by `coach`.
    async fn require_slot_ownership(&self, coach: &UserId, slot_id: Uuid) -> Result<(), Error> {
        let program_id = self
            .programs
            .slot_program(slot_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("workout slot {slot_id} not found")))?;

        self.programs
            .find_owned(program_id, coach)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::forbidden("workout slot belongs to another coach's program"))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "program_service_tests.rs"]
mod tests;
