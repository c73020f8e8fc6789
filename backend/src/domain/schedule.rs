//! Deterministic program-to-schedule expansion.
//!
//! Given a program's slot grid and a client start date, every slot maps to
//! exactly one calendar date:
//!
//! ```text
//! scheduled = start + (week - 1) * 7 days + (day - 1) days
//! ```
//!
//! Dates are calendar dates (`NaiveDate`), never instants: binding them to a
//! timezone is what produces the off-by-one-day bugs this module exists to
//! avoid. Week 1 day 1 always lands exactly on the start date.

use chrono::{Days, NaiveDate};

use crate::domain::program::WorkoutSlot;

/// The date a (week, day) slot lands on for a schedule starting at `start`.
///
/// Saturates at the calendar boundary, which is unreachable for validated
/// grids (at most 52 weeks).
pub fn scheduled_date(start: NaiveDate, week_number: u32, day_number: u32) -> NaiveDate {
    let offset_days = u64::from(week_number.saturating_sub(1)) * 7
        + u64::from(day_number.saturating_sub(1));
    start
        .checked_add_days(Days::new(offset_days))
        .unwrap_or(NaiveDate::MAX)
}

/// A slot paired with the concrete date it lands on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledSlot {
    pub slot_id: uuid::Uuid,
    pub week_number: u32,
    pub day_number: u32,
    pub date: NaiveDate,
}

/// Expand every slot of a program into its dated occurrence, preserving the
/// (week, day) order of the input.
pub fn expand_schedule(slots: &[WorkoutSlot], start: NaiveDate) -> Vec<ScheduledSlot> {
    slots
        .iter()
        .map(|slot| ScheduledSlot {
            slot_id: slot.id,
            week_number: slot.week_number,
            day_number: slot.day_number,
            date: scheduled_date(start, slot.week_number, slot.day_number),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;
    use uuid::Uuid;

    use super::*;
    use crate::domain::program::{DaysPerWeek, DurationWeeks, slot_grid};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn slots_for(weeks: u32, days: u32) -> Vec<WorkoutSlot> {
        let program_id = Uuid::new_v4();
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

    #[rstest]
    fn week_one_day_one_lands_on_the_start_date() {
        let start = date(2024, 1, 1);
        assert_eq!(scheduled_date(start, 1, 1), start);
    }

    #[rstest]
    #[case(1, 2, date(2024, 1, 2))]
    #[case(2, 1, date(2024, 1, 8))]
    #[case(3, 3, date(2024, 1, 17))]
    #[case(52, 7, date(2024, 12, 29))]
    fn slots_offset_linearly_from_the_start(
        #[case] week: u32,
        #[case] day: u32,
        #[case] expected: NaiveDate,
    ) {
        assert_eq!(scheduled_date(date(2024, 1, 1), week, day), expected);
    }

    #[rstest]
    fn expansion_spans_month_boundaries_without_drift() {
        // Start late in February of a leap year.
        let start = date(2024, 2, 26);
        assert_eq!(scheduled_date(start, 1, 4), date(2024, 2, 29));
        assert_eq!(scheduled_date(start, 2, 1), date(2024, 3, 4));
    }

    #[rstest]
    fn four_by_three_program_produces_the_documented_calendar() {
        let slots = slots_for(4, 3);
        let expanded = expand_schedule(&slots, date(2024, 1, 1));

        assert_eq!(expanded.len(), 12);
        let dates: Vec<NaiveDate> = expanded.iter().map(|s| s.date).collect();
        let expected: Vec<NaiveDate> = [
            (1, 1),
            (1, 2),
            (1, 3),
            (1, 8),
            (1, 9),
            (1, 10),
            (1, 15),
            (1, 16),
            (1, 17),
            (1, 22),
            (1, 23),
            (1, 24),
        ]
        .iter()
        .map(|&(m, d)| date(2024, m, d))
        .collect();
        assert_eq!(dates, expected);
    }

    #[rstest]
    fn expansion_preserves_slot_order_and_ids() {
        let slots = slots_for(2, 2);
        let expanded = expand_schedule(&slots, date(2024, 6, 3));

        for (slot, scheduled) in slots.iter().zip(&expanded) {
            assert_eq!(scheduled.slot_id, slot.id);
            assert_eq!(
                (scheduled.week_number, scheduled.day_number),
                (slot.week_number, slot.day_number)
            );
        }
    }
}
