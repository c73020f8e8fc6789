//! Port for coach-client links and invitations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::coaching::{CoachClientLink, Invitation, InviteToken};
use crate::domain::identity::UserId;

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by coaching repository adapters.
    pub enum CoachingRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "coaching repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "coaching repository query failed: {message}",
    }
}

/// An invitation to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvitation {
    pub coach_id: UserId,
    pub email: String,
    pub token: InviteToken,
}

/// Port for roster and invitation storage.
///
/// `consume_invitation` must delete the invitation row and insert the link
/// in one transaction, deleting first, so concurrent accepts of the same
/// token cannot both succeed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CoachingRepository: Send + Sync {
    /// Whether any link joins this coach and client.
    async fn link_exists(
        &self,
        coach_id: &UserId,
        client_id: &UserId,
    ) -> Result<bool, CoachingRepositoryError>;

    /// The link row for a coach-client pair.
    async fn find_link(
        &self,
        coach_id: &UserId,
        client_id: &UserId,
    ) -> Result<Option<CoachClientLink>, CoachingRepositoryError>;

    /// Active links of a coach's roster.
    async fn active_links_for_coach(
        &self,
        coach_id: &UserId,
    ) -> Result<Vec<CoachClientLink>, CoachingRepositoryError>;

    /// The coach of the client's most recent active link.
    async fn newest_active_coach(
        &self,
        client_id: &UserId,
    ) -> Result<Option<UserId>, CoachingRepositoryError>;

    /// Whether the principal appears as a client in any link.
    async fn is_client(&self, user_id: &UserId) -> Result<bool, CoachingRepositoryError>;

    /// Persist a pending invitation.
    async fn insert_invitation(
        &self,
        invitation: NewInvitation,
    ) -> Result<Invitation, CoachingRepositoryError>;

    /// Look up a pending invitation by token.
    async fn invitation_by_token(
        &self,
        token: &InviteToken,
    ) -> Result<Option<Invitation>, CoachingRepositoryError>;

    /// Atomically accept an invitation: create the coach-client link and
    /// delete the invitation. Returns `None` when the token is unknown
    /// (already consumed or never issued).
    async fn consume_invitation(
        &self,
        token: &InviteToken,
        client_id: &UserId,
        joined_at: DateTime<Utc>,
    ) -> Result<Option<CoachClientLink>, CoachingRepositoryError>;
}
