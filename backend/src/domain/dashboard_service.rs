//! Dashboard reads for the coach home screen and the client overview.
//!
//! Everything here is a projection over other modules' data: roster links,
//! newest active assignments, and workout log summaries, combined with the
//! pure progress calculations. Per-client batches go through dedicated port
//! methods so a roster of N clients never costs N queries.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use mockable::Clock;

use crate::domain::Error;
use crate::domain::identity::UserId;
use crate::domain::ports::{
    AssignmentRepository, AssignmentRepositoryError, CoachingRepository,
    CoachingRepositoryError, ProgramRepository, ProgramRepositoryError, UserRepository,
    UserRepositoryError, WorkoutLogRepository, WorkoutLogRepositoryError,
};
use crate::domain::progress::{SchedulePartition, current_week, partition_by_date};
use crate::domain::workout_log::{ClientWorkoutLogSummary, WorkoutLogSummary};

fn map_coaching_error(error: CoachingRepositoryError) -> Error {
    match error {
        CoachingRepositoryError::Connection { message } => {
            Error::dependency_failure(format!("coaching repository unavailable: {message}"))
        }
        CoachingRepositoryError::Query { message } => {
            Error::dependency_failure(format!("coaching repository error: {message}"))
        }
    }
}

fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::dependency_failure(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::dependency_failure(format!("user repository error: {message}"))
        }
    }
}

fn map_assignment_error(error: AssignmentRepositoryError) -> Error {
    match error {
        AssignmentRepositoryError::Connection { message } => {
            Error::dependency_failure(format!("assignment repository unavailable: {message}"))
        }
        AssignmentRepositoryError::Query { message } => {
            Error::dependency_failure(format!("assignment repository error: {message}"))
        }
    }
}

fn map_program_error(error: ProgramRepositoryError) -> Error {
    match error {
        ProgramRepositoryError::Connection { message } => {
            Error::dependency_failure(format!("program repository unavailable: {message}"))
        }
        ProgramRepositoryError::Query { message } => {
            Error::dependency_failure(format!("program repository error: {message}"))
        }
    }
}

fn map_log_error(error: WorkoutLogRepositoryError) -> Error {
    match error {
        WorkoutLogRepositoryError::Connection { message } => {
            Error::dependency_failure(format!("workout log repository unavailable: {message}"))
        }
        WorkoutLogRepositoryError::Query { message } => {
            Error::dependency_failure(format!("workout log repository error: {message}"))
        }
    }
}

/// Progress line for one client on the coach dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientProgress {
    pub client_id: UserId,
    pub name: String,
    /// Name of the newest active assignment's program, if any.
    pub program_name: Option<String>,
    /// Week the client is in; 0 when they hold no active assignment.
    pub current_week: u32,
    /// Program length in weeks; 0 when they hold no active assignment.
    pub total_weeks: u32,
    pub last_activity: Option<DateTime<Utc>>,
}

/// Headline numbers for the coach dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoachDashboardStats {
    pub client_count: u64,
    pub program_count: u64,
    /// Workouts completed since the start of the current week (Sunday).
    pub completions_this_week: u64,
    /// Everything scheduled for today across the roster.
    pub todays_schedule: Vec<ClientWorkoutLogSummary>,
}

/// Where a client stands in their current program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramProgress {
    pub program_name: String,
    pub current_week: u32,
    pub total_weeks: u32,
}

/// Start of the current week, anchored to Sunday 00:00 UTC.
fn week_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let today = now.date_naive();
    let start = today
        .checked_sub_days(Days::new(u64::from(today.weekday().num_days_from_sunday())))
        .unwrap_or(today);
    start
        .and_hms_opt(0, 0, 0)
        .unwrap_or_default()
        .and_utc()
}

/// Dashboard service over the coaching, user, assignment, program, and
/// workout log ports.
#[derive(Clone)]
pub struct DashboardService<C, U, A, P, L> {
    coaching: Arc<C>,
    users: Arc<U>,
    assignments: Arc<A>,
    programs: Arc<P>,
    logs: Arc<L>,
    clock: Arc<dyn Clock>,
}

impl<C, U, A, P, L> DashboardService<C, U, A, P, L> {
    /// Create a new dashboard service.
    pub fn new(
        coaching: Arc<C>,
        users: Arc<U>,
        assignments: Arc<A>,
        programs: Arc<P>,
        logs: Arc<L>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            coaching,
            users,
            assignments,
            programs,
            logs,
            clock,
        }
    }

    fn today(&self) -> NaiveDate {
        self.clock.utc().date_naive()
    }
}

impl<C, U, A, P, L> DashboardService<C, U, A, P, L>
where
    C: CoachingRepository,
    U: UserRepository,
    A: AssignmentRepository,
    P: ProgramRepository,
    L: WorkoutLogRepository,
{
    /// Per-client progress lines for the coach dashboard, in roster order,
    /// capped at `limit`. Clients without a user row are skipped; clients
    /// without an active assignment report week 0 of 0.
    pub async fn clients_with_progress(
        &self,
        coach: &UserId,
        limit: usize,
    ) -> Result<Vec<ClientProgress>, Error> {
        let links = self
            .coaching
            .active_links_for_coach(coach)
            .await
            .map_err(map_coaching_error)?;
        let ids: Vec<UserId> = links.iter().map(|link| link.client_id.clone()).collect();

        let names = self.users.names_for(&ids).await.map_err(map_user_error)?;
        let assignments = self
            .assignments
            .newest_active_for_clients(&ids)
            .await
            .map_err(map_assignment_error)?;
        let completions = self
            .logs
            .latest_completions(&ids)
            .await
            .map_err(map_log_error)?;
        let today = self.today();

        let mut lines = Vec::with_capacity(links.len().min(limit));
        for link in links {
            let Some((_, name)) = names.iter().find(|(id, _)| *id == link.client_id) else {
                continue;
            };
            let assignment = assignments
                .iter()
                .find(|a| a.assignment.client_id == link.client_id);
            let (program_name, week, total) = match assignment {
                Some(with_program) => (
                    Some(with_program.program_name.clone()),
                    current_week(
                        with_program.assignment.start_date,
                        with_program.duration_weeks,
                        today,
                    ),
                    with_program.duration_weeks.get(),
                ),
                None => (None, 0, 0),
            };
            let last_activity = completions
                .iter()
                .find(|(id, _)| *id == link.client_id)
                .map(|(_, at)| *at);

            lines.push(ClientProgress {
                client_id: link.client_id,
                name: name.clone(),
                program_name,
                current_week: week,
                total_weeks: total,
                last_activity,
            });
            if lines.len() == limit {
                break;
            }
        }
        Ok(lines)
    }

    /// Headline numbers plus today's schedule across the roster.
    pub async fn coach_dashboard_stats(
        &self,
        coach: &UserId,
    ) -> Result<CoachDashboardStats, Error> {
        let links = self
            .coaching
            .active_links_for_coach(coach)
            .await
            .map_err(map_coaching_error)?;
        let ids: Vec<UserId> = links.iter().map(|link| link.client_id.clone()).collect();

        let program_count = self
            .programs
            .count_for_coach(coach)
            .await
            .map_err(map_program_error)?;
        let since = week_start(self.clock.utc());
        let completions_this_week = self
            .logs
            .completed_count_since(&ids, since)
            .await
            .map_err(map_log_error)?;
        let todays_schedule = self
            .logs
            .summaries_on_date(&ids, self.today())
            .await
            .map_err(map_log_error)?;

        Ok(CoachDashboardStats {
            client_count: ids.len() as u64,
            program_count,
            completions_this_week,
            todays_schedule,
        })
    }

    /// Completed workouts across the roster, newest completion first.
    pub async fn recent_activity(
        &self,
        coach: &UserId,
        limit: u32,
    ) -> Result<Vec<ClientWorkoutLogSummary>, Error> {
        let links = self
            .coaching
            .active_links_for_coach(coach)
            .await
            .map_err(map_coaching_error)?;
        let ids: Vec<UserId> = links.iter().map(|link| link.client_id.clone()).collect();

        self.logs
            .completed_summaries(&ids, limit)
            .await
            .map_err(map_log_error)
    }

    /// The client's standing in their newest active program, if any.
    pub async fn client_program_summary(
        &self,
        client: &UserId,
    ) -> Result<Option<ProgramProgress>, Error> {
        let Some(with_program) = self
            .assignments
            .newest_active_for_client(client)
            .await
            .map_err(map_assignment_error)?
        else {
            return Ok(None);
        };
        Ok(Some(ProgramProgress {
            current_week: current_week(
                with_program.assignment.start_date,
                with_program.duration_weeks,
                self.today(),
            ),
            total_weeks: with_program.duration_weeks.get(),
            program_name: with_program.program_name,
        }))
    }

    /// A linked client's schedule, split for the coach detail view: upcoming
    /// soonest-first, then past most-recent-first. `Ok(None)` without a
    /// roster link.
    pub async fn schedule_for_client(
        &self,
        coach: &UserId,
        client: &UserId,
    ) -> Result<Option<SchedulePartition<WorkoutLogSummary>>, Error> {
        let linked = self
            .coaching
            .link_exists(coach, client)
            .await
            .map_err(map_coaching_error)?;
        if !linked {
            return Ok(None);
        }

        let summaries = self
            .logs
            .summaries_for_client(client)
            .await
            .map_err(map_log_error)?;
        Ok(Some(partition_by_date(summaries, self.today())))
    }
}

#[cfg(test)]
#[path = "dashboard_service_tests.rs"]
mod tests;
