//! Roster service: invitations, coach-client links, and user settings.
//!
//! Invitations are single use. Creating one persists the token before any
//! email is attempted, so a failed send still yields a link the coach can
//! copy by hand.

use std::sync::Arc;

use mockable::Clock;
use tracing::warn;

use crate::domain::Error;
use crate::domain::assignment::AssignmentWithProgram;
use crate::domain::coaching::{CoachClientLink, Invitation, InviteToken, normalize_invite_email};
use crate::domain::identity::{Role, UnitPreference, UserId, UserSummary};
use crate::domain::ports::{
    AssignmentRepository, AssignmentRepositoryError, CoachingRepository,
    CoachingRepositoryError, InviteEmailSender, NewInvitation, UserRepository,
    UserRepositoryError,
};

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

/// Outcome of creating an invitation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedInvitation {
    pub invitation: Invitation,
    /// False when the email adapter is unconfigured or the send failed; the
    /// token is valid either way.
    pub email_sent: bool,
}

/// One row of a coach's roster view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterMember {
    pub client_id: UserId,
    pub name: String,
    pub joined_at: chrono::DateTime<chrono::Utc>,
}

/// A linked client with their assignment history, for the coach detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientDetail {
    pub client: UserSummary,
    pub joined_at: chrono::DateTime<chrono::Utc>,
    /// Newest start date first.
    pub assignments: Vec<AssignmentWithProgram>,
}

/// Roster service over the coaching, user, assignment, and email ports.
#[derive(Clone)]
pub struct RosterService<C, U, A, E> {
    coaching: Arc<C>,
    users: Arc<U>,
    assignments: Arc<A>,
    email: Arc<E>,
    clock: Arc<dyn Clock>,
    /// Base URL the invite link is built from, e.g. `https://app.example.com`.
    invite_link_base: String,
}

impl<C, U, A, E> RosterService<C, U, A, E> {
    /// Create a new roster service.
    pub fn new(
        coaching: Arc<C>,
        users: Arc<U>,
        assignments: Arc<A>,
        email: Arc<E>,
        clock: Arc<dyn Clock>,
        invite_link_base: impl Into<String>,
    ) -> Self {
        Self {
            coaching,
            users,
            assignments,
            email,
            clock,
            invite_link_base: invite_link_base.into(),
        }
    }

    fn invite_link(&self, token: &InviteToken) -> String {
        format!(
            "{}/invite/{}",
            self.invite_link_base.trim_end_matches('/'),
            token.as_str()
        )
    }
}

impl<C, U, A, E> RosterService<C, U, A, E>
where
    C: CoachingRepository,
    U: UserRepository,
    A: AssignmentRepository,
    E: InviteEmailSender,
{
    /// Create an invitation and attempt to email its link. The invitation is
    /// persisted before the send, and a failed send is reported rather than
    /// retried.
    pub async fn create_invitation(
        &self,
        coach: &UserId,
        email: &str,
    ) -> Result<CreatedInvitation, Error> {
        let email = normalize_invite_email(email)
            .ok_or_else(|| Error::invalid_request("invite email is required"))?;

        let invitation = self
            .coaching
            .insert_invitation(NewInvitation {
                coach_id: coach.clone(),
                email: email.clone(),
                token: InviteToken::generate(),
            })
            .await
            .map_err(map_coaching_error)?;

        let link = self.invite_link(&invitation.token);
        let email_sent = match self.email.send_invite(&email, &link).await {
            Ok(sent) => sent,
            Err(error) => {
                warn!(%error, "invite email delivery failed; surfacing the link instead");
                false
            }
        };

        Ok(CreatedInvitation {
            invitation,
            email_sent,
        })
    }

    /// Look up a pending invitation, for the public invite landing page.
    pub async fn invitation_by_token(
        &self,
        token: &InviteToken,
    ) -> Result<Option<Invitation>, Error> {
        self.coaching
            .invitation_by_token(token)
            .await
            .map_err(map_coaching_error)
    }

    /// Accept an invitation as the newly signed-up client. The link is
    /// created and the invitation deleted in one step, so a second accept of
    /// the same token reports `NotFound`.
    pub async fn accept_invitation(
        &self,
        token: &InviteToken,
        new_client: &UserId,
    ) -> Result<CoachClientLink, Error> {
        self.coaching
            .consume_invitation(token, new_client, self.clock.utc())
            .await
            .map_err(map_coaching_error)?
            .ok_or_else(|| Error::not_found("invitation not found or already accepted"))
    }

    /// The coach's active roster with display names. Links whose client has
    /// no user row are skipped.
    pub async fn clients_for_coach(&self, coach: &UserId) -> Result<Vec<RosterMember>, Error> {
        let links = self
            .coaching
            .active_links_for_coach(coach)
            .await
            .map_err(map_coaching_error)?;
        let ids: Vec<UserId> = links.iter().map(|link| link.client_id.clone()).collect();
        let names = self.users.names_for(&ids).await.map_err(map_user_error)?;

        Ok(links
            .into_iter()
            .filter_map(|link| {
                names
                    .iter()
                    .find(|(id, _)| *id == link.client_id)
                    .map(|(_, name)| RosterMember {
                        client_id: link.client_id,
                        name: name.clone(),
                        joined_at: link.joined_at,
                    })
            })
            .collect())
    }

    /// One linked client with their assignments. Returns `Ok(None)` when the
    /// client is not on this coach's roster or has no user row.
    pub async fn client_with_assignments(
        &self,
        coach: &UserId,
        client: &UserId,
    ) -> Result<Option<ClientDetail>, Error> {
        let Some(link) = self
            .coaching
            .find_link(coach, client)
            .await
            .map_err(map_coaching_error)?
        else {
            return Ok(None);
        };
        let Some(summary) = self
            .users
            .find_summary(client)
            .await
            .map_err(map_user_error)?
        else {
            return Ok(None);
        };
        let assignments = self
            .assignments
            .list_for_client(client)
            .await
            .map_err(map_assignment_error)?;

        Ok(Some(ClientDetail {
            client: summary,
            joined_at: link.joined_at,
            assignments,
        }))
    }

    /// The client's current coach, from their most recent active link.
    pub async fn coach_for_client(
        &self,
        client: &UserId,
    ) -> Result<Option<UserSummary>, Error> {
        let Some(coach_id) = self
            .coaching
            .newest_active_coach(client)
            .await
            .map_err(map_coaching_error)?
        else {
            return Ok(None);
        };
        self.users
            .find_summary(&coach_id)
            .await
            .map_err(map_user_error)
    }

    /// A principal is a client iff some roster lists them as one; everyone
    /// else acts as a coach. The role is computed, never stored.
    pub async fn current_role(&self, user: &UserId) -> Result<Role, Error> {
        let is_client = self
            .coaching
            .is_client(user)
            .await
            .map_err(map_coaching_error)?;
        Ok(if is_client { Role::Client } else { Role::Coach })
    }

    /// The user's display unit, defaulting to kilograms.
    pub async fn unit_preference(&self, user: &UserId) -> Result<UnitPreference, Error> {
        Ok(self
            .users
            .unit_preference(user)
            .await
            .map_err(map_user_error)?
            .unwrap_or_default())
    }

    /// Persist the user's display unit.
    pub async fn set_unit_preference(
        &self,
        user: &UserId,
        unit: UnitPreference,
    ) -> Result<(), Error> {
        self.users
            .set_unit_preference(user, unit)
            .await
            .map_err(map_user_error)
    }
}

#[cfg(test)]
#[path = "roster_service_tests.rs"]
mod tests;
