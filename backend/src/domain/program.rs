//! Program templates: the coach-authored weeks × days blueprint.
//!
//! A program owns a fixed grid of workout slots, one per (week, day) pair.
//! The grid is synthesized in full when the program is created, so every
//! persisted program always carries `duration_weeks × days_per_week` slots.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::exercise::ExerciseCategory;
use crate::domain::identity::UserId;

/// Inclusive bounds for program duration in weeks.
pub const DURATION_WEEKS_MIN: u8 = 1;
/// Inclusive upper bound for program duration in weeks.
pub const DURATION_WEEKS_MAX: u8 = 52;
/// Inclusive upper bound for training days per week.
pub const DAYS_PER_WEEK_MAX: u8 = 7;

/// Validation errors for the program grid dimensions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProgramValidationError {
    #[error("duration must be {DURATION_WEEKS_MIN}-{DURATION_WEEKS_MAX} weeks, got {got}")]
    DurationOutOfRange { got: u32 },
    #[error("days per week must be 1-{DAYS_PER_WEEK_MAX}, got {got}")]
    DaysOutOfRange { got: u32 },
    #[error("program name must not be empty")]
    EmptyName,
}

/// Program length in weeks, validated to 1..=52.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct DurationWeeks(u8);

impl DurationWeeks {
    /// Validate and construct a duration.
    pub fn new(weeks: u32) -> Result<Self, ProgramValidationError> {
        if !(u32::from(DURATION_WEEKS_MIN)..=u32::from(DURATION_WEEKS_MAX)).contains(&weeks) {
            return Err(ProgramValidationError::DurationOutOfRange { got: weeks });
        }
        #[allow(clippy::cast_possible_truncation, reason = "bounded to 52 above")]
        Ok(Self(weeks as u8))
    }

    /// The validated week count.
    pub fn get(self) -> u32 {
        u32::from(self.0)
    }
}

impl fmt::Display for DurationWeeks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for DurationWeeks {
    type Error = ProgramValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DurationWeeks> for u32 {
    fn from(value: DurationWeeks) -> Self {
        value.get()
    }
}

/// Training days per week, validated to 1..=7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct DaysPerWeek(u8);

impl DaysPerWeek {
    /// Validate and construct a day count.
    pub fn new(days: u32) -> Result<Self, ProgramValidationError> {
        if !(1..=u32::from(DAYS_PER_WEEK_MAX)).contains(&days) {
            return Err(ProgramValidationError::DaysOutOfRange { got: days });
        }
        #[allow(clippy::cast_possible_truncation, reason = "bounded to 7 above")]
        Ok(Self(days as u8))
    }

    /// The validated day count.
    pub fn get(self) -> u32 {
        u32::from(self.0)
    }
}

impl fmt::Display for DaysPerWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for DaysPerWeek {
    type Error = ProgramValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DaysPerWeek> for u32 {
    fn from(value: DaysPerWeek) -> Self {
        value.get()
    }
}

/// A coach-authored training program blueprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramTemplate {
    pub id: Uuid,
    pub owner: UserId,
    pub name: String,
    pub description: Option<String>,
    pub duration_weeks: DurationWeeks,
    pub days_per_week: DaysPerWeek,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One (week, day) cell of a program's grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutSlot {
    pub id: Uuid,
    pub program_id: Uuid,
    pub week_number: u32,
    pub day_number: u32,
    pub name: String,
    pub notes: Option<String>,
}

/// A (week, day) grid position with its default slot name, produced when a
/// program is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotSeed {
    pub week_number: u32,
    pub day_number: u32,
    pub name: String,
}

/// Synthesize the full slot grid for a new program: week outer loop, day
/// inner loop, defaulted names of the form `Week {w} Day {d}`.
pub fn slot_grid(duration_weeks: DurationWeeks, days_per_week: DaysPerWeek) -> Vec<SlotSeed> {
    let mut seeds = Vec::with_capacity((duration_weeks.get() * days_per_week.get()) as usize);
    for week in 1..=duration_weeks.get() {
        for day in 1..=days_per_week.get() {
            seeds.push(SlotSeed {
                week_number: week,
                day_number: day,
                name: format!("Week {week} Day {day}"),
            });
        }
    }
    seeds
}

/// An exercise prescription within a workout slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrescribedExercise {
    pub id: Uuid,
    pub workout_slot_id: Uuid,
    pub exercise_id: Uuid,
    pub sort_order: i32,
    pub sets: u32,
    /// Free-text rep target, e.g. `"10"` or `"8-12"`.
    pub reps: String,
    pub intensity_value: Option<f64>,
    pub intensity_type: Option<String>,
    pub rest_seconds: Option<i32>,
    pub notes: Option<String>,
}

/// A prescription joined with its catalog exercise, for program detail views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrescribedExerciseDetail {
    pub prescription: PrescribedExercise,
    pub exercise_name: String,
    pub exercise_category: ExerciseCategory,
}

/// A program together with its ordered slots and their prescriptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramWithWorkouts {
    pub program: ProgramTemplate,
    /// Slots ordered by (week_number, day_number).
    pub workouts: Vec<WorkoutSlot>,
    /// Prescriptions across all slots, ordered by sort_order within a slot.
    pub prescribed: Vec<PrescribedExerciseDetail>,
}
