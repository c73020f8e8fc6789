//! Workout logs: dated schedule instances and their per-set records.
//!
//! A workout log is one concrete occurrence of a workout slot for a client.
//! Its lifecycle is Scheduled (`completed_at` unset) → Completed, one way.
//! Set logs hang off it with full-replace save semantics; display always
//! materialises a dense `1..=sets` grid regardless of what was saved.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::identity::UserId;
use crate::domain::progress::Scheduled;

/// One dated occurrence of a workout slot for a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutLog {
    pub id: Uuid,
    pub client_id: UserId,
    pub assignment_id: Uuid,
    pub workout_slot_id: Uuid,
    pub scheduled_date: NaiveDate,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl Scheduled for WorkoutLog {
    fn scheduled_date(&self) -> NaiveDate {
        self.scheduled_date
    }
}

/// A single performed-set record against a prescribed exercise.
///
/// All performance fields are nullable: the store accepts whatever the
/// caller submits and does not bound `set_number` against the prescription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetLog {
    pub prescribed_exercise_id: Uuid,
    pub set_number: u32,
    pub reps_completed: Option<i32>,
    pub weight_kg: Option<f64>,
    /// Rate of Perceived Exertion on the 1-10 scale.
    pub rpe: Option<f64>,
    pub notes: Option<String>,
}

/// One row of the dense set grid shown for an exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetLogEntry {
    pub set_number: u32,
    pub reps_completed: Option<i32>,
    pub weight_kg: Option<f64>,
    pub rpe: Option<f64>,
    pub notes: Option<String>,
}

impl SetLogEntry {
    /// An unfilled placeholder row for the given set number.
    pub fn empty(set_number: u32) -> Self {
        Self {
            set_number,
            reps_completed: None,
            weight_kg: None,
            rpe: None,
            notes: None,
        }
    }

    /// Whether every performance field is unset.
    pub fn is_empty(&self) -> bool {
        self.reps_completed.is_none()
            && self.weight_kg.is_none()
            && self.rpe.is_none()
            && self.notes.is_none()
    }
}

impl From<&SetLog> for SetLogEntry {
    fn from(log: &SetLog) -> Self {
        Self {
            set_number: log.set_number,
            reps_completed: log.reps_completed,
            weight_kg: log.weight_kg,
            rpe: log.rpe,
            notes: log.notes.clone(),
        }
    }
}

/// Materialise the dense `1..=prescribed_sets` grid for one exercise.
///
/// Saved rows are matched by prescription and set number, so `saved` may
/// hold the whole log's rows unfiltered; gaps are synthesized as empty
/// placeholders so the grid is always complete. Rows saved outside the
/// prescribed range are not surfaced here (they remain stored verbatim).
pub fn dense_set_grid(
    prescribed_exercise_id: Uuid,
    prescribed_sets: u32,
    saved: &[SetLog],
) -> Vec<SetLogEntry> {
    (1..=prescribed_sets)
        .map(|set_number| {
            saved
                .iter()
                .find(|log| {
                    log.prescribed_exercise_id == prescribed_exercise_id
                        && log.set_number == set_number
                })
                .map_or_else(|| SetLogEntry::empty(set_number), SetLogEntry::from)
        })
        .collect()
}

/// The logging grid for one prescribed exercise within a workout log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseLogSection {
    pub prescribed_exercise_id: Uuid,
    pub exercise_name: String,
    pub sets: u32,
    pub reps: String,
    pub notes: Option<String>,
    pub set_logs: Vec<SetLogEntry>,
}

/// A workout log joined with everything the log-workout view needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutLogDetail {
    pub id: Uuid,
    pub client_id: UserId,
    pub assignment_id: Uuid,
    pub program_id: Uuid,
    pub workout_slot_id: Uuid,
    pub scheduled_date: NaiveDate,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub workout_name: String,
    pub program_name: String,
    pub client_name: String,
    /// Sections ordered by the prescription's sort order.
    pub exercises: Vec<ExerciseLogSection>,
}

/// A workout log reduced to what list views show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutLogSummary {
    pub id: Uuid,
    pub workout_name: String,
    pub program_name: String,
    pub scheduled_date: NaiveDate,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl Scheduled for WorkoutLogSummary {
    fn scheduled_date(&self) -> NaiveDate {
        self.scheduled_date
    }
}

/// A summary carrying the client it belongs to, for coach-side views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientWorkoutLogSummary {
    pub client_id: UserId,
    pub client_name: String,
    pub summary: WorkoutLogSummary,
}

impl Scheduled for ClientWorkoutLogSummary {
    fn scheduled_date(&self) -> NaiveDate {
        self.summary.scheduled_date
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    fn saved(prescribed: Uuid, set_number: u32, reps: i32, weight: f64) -> SetLog {
        SetLog {
            prescribed_exercise_id: prescribed,
            set_number,
            reps_completed: Some(reps),
            weight_kg: Some(weight),
            rpe: Some(8.0),
            notes: None,
        }
    }

    #[rstest]
    fn dense_grid_merges_saved_rows_with_placeholders() {
        let prescribed = Uuid::new_v4();
        let logs = vec![saved(prescribed, 2, 8, 100.0)];

        let grid = dense_set_grid(prescribed, 3, &logs);

        assert_eq!(grid.len(), 3);
        assert!(grid[0].is_empty());
        assert_eq!(grid[1].reps_completed, Some(8));
        assert_eq!(grid[1].weight_kg, Some(100.0));
        assert!(grid[2].is_empty());
        let numbers: Vec<u32> = grid.iter().map(|e| e.set_number).collect();
        assert_eq!(numbers, [1, 2, 3]);
    }

    #[rstest]
    fn dense_grid_is_all_placeholders_when_nothing_was_saved() {
        let grid = dense_set_grid(Uuid::new_v4(), 4, &[]);
        assert_eq!(grid.len(), 4);
        assert!(grid.iter().all(SetLogEntry::is_empty));
    }

    #[rstest]
    fn dense_grid_ignores_rows_beyond_the_prescription() {
        let prescribed = Uuid::new_v4();
        let logs = vec![saved(prescribed, 1, 5, 60.0), saved(prescribed, 9, 5, 60.0)];

        let grid = dense_set_grid(prescribed, 2, &logs);

        assert_eq!(grid.len(), 2);
        assert_eq!(grid[0].reps_completed, Some(5));
        assert!(grid[1].is_empty());
    }

    #[rstest]
    fn dense_grid_ignores_rows_of_other_prescriptions() {
        let squat = Uuid::new_v4();
        let press = Uuid::new_v4();
        let logs = vec![saved(squat, 1, 5, 100.0), saved(press, 1, 8, 40.0)];

        let grid = dense_set_grid(squat, 2, &logs);

        assert_eq!(grid[0].reps_completed, Some(5));
        assert_eq!(grid[0].weight_kg, Some(100.0));
        assert!(grid[1].is_empty());
    }

    #[rstest]
    fn entry_with_only_notes_is_not_empty() {
        let entry = SetLogEntry {
            notes: Some("felt heavy".to_owned()),
            ..SetLogEntry::empty(1)
        };
        assert!(!entry.is_empty());
    }
}
