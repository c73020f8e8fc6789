//! Progress calculations over stored schedule dates.
//!
//! Everything here is a pure function of its inputs: "today" is always passed
//! in explicitly (derived from an injected clock at the service layer), never
//! read from a global. Comparisons are calendar-date comparisons, so a
//! workout scheduled for today is today's workout in every timezone the
//! embedder runs in.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};

use crate::domain::program::DurationWeeks;

/// Anything that occupies a calendar date on a schedule.
pub trait Scheduled {
    /// The calendar date the item is scheduled for.
    fn scheduled_date(&self) -> NaiveDate;
}

/// The week a client is in, clamped to the program window.
///
/// Day zero (today == start) is week 1; a `today` before the start also
/// reports week 1, and a `today` past the end reports the final week. The
/// result is monotonically non-decreasing as `today` advances.
pub fn current_week(start: NaiveDate, duration: DurationWeeks, today: NaiveDate) -> u32 {
    let elapsed_days = (today - start).num_days();
    let week_index = elapsed_days.div_euclid(7) + 1;
    u32::try_from(week_index.clamp(1, i64::from(duration.get()))).unwrap_or(1)
}

/// A schedule split relative to a reference date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulePartition<T> {
    /// Items scheduled on or after the reference date, soonest first.
    pub upcoming: Vec<T>,
    /// Items scheduled before the reference date, most recent first.
    pub past: Vec<T>,
}

/// Partition schedule items around `today`.
///
/// Items dated exactly `today` are upcoming (and sort first there); every
/// input item lands in exactly one half. Ties keep insertion order.
pub fn partition_by_date<T: Scheduled>(items: Vec<T>, today: NaiveDate) -> SchedulePartition<T> {
    let (mut upcoming, mut past): (Vec<T>, Vec<T>) = items
        .into_iter()
        .partition(|item| item.scheduled_date() >= today);

    upcoming.sort_by_key(Scheduled::scheduled_date);
    past.sort_by_key(|item| std::cmp::Reverse(item.scheduled_date()));

    SchedulePartition { upcoming, past }
}

/// The first item scheduled on or after `today`, soonest first, ties broken
/// by insertion order.
pub fn next_scheduled<T: Scheduled>(items: Vec<T>, today: NaiveDate) -> Option<T> {
    partition_by_date(items, today).upcoming.into_iter().next()
}

/// The most recent completion instant across a client's workout logs.
pub fn last_activity<I>(completions: I) -> Option<DateTime<Utc>>
where
    I: IntoIterator<Item = Option<DateTime<Utc>>>,
{
    completions.into_iter().flatten().max()
}

/// Hours within which activity counts as recent on coach dashboards.
pub const RECENT_ACTIVITY_HOURS: i64 = 48;

/// Coarse activity freshness for a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityRecency {
    /// Completed a workout within the last 48 hours.
    Recent,
    /// Has completed workouts, but none recently.
    Stale,
    /// Never completed a workout.
    Never,
}

impl ActivityRecency {
    /// Classify the most recent completion relative to `now`.
    pub fn classify(last_completed: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        match last_completed {
            None => Self::Never,
            Some(at) if now - at < TimeDelta::hours(RECENT_ACTIVITY_HOURS) => Self::Recent,
            Some(_) => Self::Stale,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use chrono::TimeZone;
    use rstest::rstest;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn weeks(n: u32) -> DurationWeeks {
        DurationWeeks::new(n).expect("valid duration")
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Entry {
        label: &'static str,
        date: NaiveDate,
    }

    impl Scheduled for Entry {
        fn scheduled_date(&self) -> NaiveDate {
            self.date
        }
    }

    #[rstest]
    #[case(date(2024, 1, 1), 1)] // day zero
    #[case(date(2024, 1, 7), 1)]
    #[case(date(2024, 1, 8), 2)]
    #[case(date(2024, 1, 15), 3)] // floor(14 / 7) + 1
    #[case(date(2023, 12, 25), 1)] // before the start clamps up
    #[case(date(2025, 6, 1), 4)] // far past the end clamps down
    fn current_week_clamps_to_the_program_window(
        #[case] today: NaiveDate,
        #[case] expected: u32,
    ) {
        assert_eq!(current_week(date(2024, 1, 1), weeks(4), today), expected);
    }

    #[rstest]
    fn current_week_never_decreases_as_today_advances() {
        let start = date(2024, 1, 1);
        let duration = weeks(6);

        let mut previous = 0;
        for offset in -10..80 {
            let today = start + TimeDelta::days(offset);
            let week = current_week(start, duration, today);
            assert!(week >= previous, "week regressed at offset {offset}");
            assert!((1..=6).contains(&week));
            previous = week;
        }
    }

    #[rstest]
    fn partition_splits_yesterday_today_tomorrow() {
        let today = date(2024, 3, 10);
        let items = vec![
            Entry {
                label: "tomorrow",
                date: date(2024, 3, 11),
            },
            Entry {
                label: "yesterday",
                date: date(2024, 3, 9),
            },
            Entry {
                label: "today",
                date: today,
            },
        ];

        let partition = partition_by_date(items, today);

        let upcoming: Vec<&str> = partition.upcoming.iter().map(|e| e.label).collect();
        let past: Vec<&str> = partition.past.iter().map(|e| e.label).collect();
        assert_eq!(upcoming, ["today", "tomorrow"]);
        assert_eq!(past, ["yesterday"]);
    }

    #[rstest]
    fn partition_orders_past_most_recent_first() {
        let today = date(2024, 3, 10);
        let items = vec![
            Entry {
                label: "old",
                date: date(2024, 3, 1),
            },
            Entry {
                label: "older",
                date: date(2024, 2, 1),
            },
            Entry {
                label: "newest",
                date: date(2024, 3, 9),
            },
        ];

        let partition = partition_by_date(items, today);
        let past: Vec<&str> = partition.past.iter().map(|e| e.label).collect();
        assert_eq!(past, ["newest", "old", "older"]);
        assert!(partition.upcoming.is_empty());
    }

    #[rstest]
    fn next_scheduled_breaks_date_ties_by_insertion_order() {
        let today = date(2024, 3, 10);
        let items = vec![
            Entry {
                label: "first-inserted",
                date: today,
            },
            Entry {
                label: "second-inserted",
                date: today,
            },
        ];

        let next = next_scheduled(items, today).expect("an upcoming entry");
        assert_eq!(next.label, "first-inserted");
    }

    #[rstest]
    fn last_activity_picks_the_latest_completion() {
        let early = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).single().expect("ts");
        let late = Utc.with_ymd_and_hms(2024, 3, 5, 19, 30, 0).single().expect("ts");

        assert_eq!(last_activity([Some(early), None, Some(late)]), Some(late));
        assert_eq!(last_activity([None, None]), None);
    }

    #[rstest]
    fn recency_uses_a_48_hour_window() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).single().expect("ts");

        assert_eq!(
            ActivityRecency::classify(Some(now - TimeDelta::hours(47)), now),
            ActivityRecency::Recent
        );
        assert_eq!(
            ActivityRecency::classify(Some(now - TimeDelta::hours(49)), now),
            ActivityRecency::Stale
        );
        assert_eq!(ActivityRecency::classify(None, now), ActivityRecency::Never);
    }
}
