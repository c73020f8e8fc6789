//! PostgreSQL-backed `CoachingRepository` implementation using Diesel ORM.
//!
//! Invitation acceptance consumes the token with a locking delete before the
//! link insert, inside one transaction. Of two concurrent accepts, one
//! deletes the row and links; the other waits on the row lock, deletes
//! nothing, and reports the token unknown.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::coaching::{CoachClientLink, Invitation, InviteToken, LinkStatus};
use crate::domain::identity::UserId;
use crate::domain::ports::{CoachingRepository, CoachingRepositoryError, NewInvitation};

use super::diesel_error_mapping;
use super::models::{
    CoachClientRow, CoachInvitationRow, NewCoachClientRow, NewCoachInvitationRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{coach_clients, coach_invitations};

/// Diesel-backed implementation of the coaching repository port.
#[derive(Clone)]
pub struct DieselCoachingRepository {
    pool: DbPool,
}

impl DieselCoachingRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CoachingRepositoryError {
    diesel_error_mapping::map_pool_error(error, CoachingRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CoachingRepositoryError {
    diesel_error_mapping::map_diesel_error(
        error,
        CoachingRepositoryError::query,
        CoachingRepositoryError::connection,
    )
}

fn parse_user_id(raw: String) -> Result<UserId, CoachingRepositoryError> {
    UserId::new(raw).map_err(|err| CoachingRepositoryError::query(err.to_string()))
}

fn parse_status(status: &str) -> Result<LinkStatus, CoachingRepositoryError> {
    match status {
        "active" => Ok(LinkStatus::Active),
        other => Err(CoachingRepositoryError::query(format!(
            "unknown link status: {other}"
        ))),
    }
}

fn row_to_link(row: CoachClientRow) -> Result<CoachClientLink, CoachingRepositoryError> {
    Ok(CoachClientLink {
        coach_id: parse_user_id(row.coach_id)?,
        client_id: parse_user_id(row.client_id)?,
        status: parse_status(&row.status)?,
        joined_at: row.joined_at,
    })
}

fn link_from_invitation<'a>(
    invitation: &'a CoachInvitationRow,
    client: &'a str,
    joined_at: DateTime<Utc>,
) -> NewCoachClientRow<'a> {
    NewCoachClientRow {
        coach_id: &invitation.coach_id,
        client_id: client,
        status: LinkStatus::Active.as_str(),
        joined_at,
    }
}

fn row_to_invitation(row: CoachInvitationRow) -> Result<Invitation, CoachingRepositoryError> {
    Ok(Invitation {
        id: row.id,
        coach_id: parse_user_id(row.coach_id)?,
        email: row.email,
        token: InviteToken::from_raw(row.token),
        created_at: row.created_at,
    })
}

#[async_trait]
impl CoachingRepository for DieselCoachingRepository {
    async fn link_exists(
        &self,
        coach_id: &UserId,
        client_id: &UserId,
    ) -> Result<bool, CoachingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let count: i64 = coach_clients::table
            .filter(coach_clients::coach_id.eq(coach_id.as_str()))
            .filter(coach_clients::client_id.eq(client_id.as_str()))
            .select(count_star())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(count > 0)
    }

    async fn find_link(
        &self,
        coach_id: &UserId,
        client_id: &UserId,
    ) -> Result<Option<CoachClientLink>, CoachingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<CoachClientRow> = coach_clients::table
            .find((coach_id.as_str(), client_id.as_str()))
            .select(CoachClientRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_link).transpose()
    }

    async fn active_links_for_coach(
        &self,
        coach_id: &UserId,
    ) -> Result<Vec<CoachClientLink>, CoachingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<CoachClientRow> = coach_clients::table
            .filter(coach_clients::coach_id.eq(coach_id.as_str()))
            .filter(coach_clients::status.eq(LinkStatus::Active.as_str()))
            .order(coach_clients::joined_at.asc())
            .select(CoachClientRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_link).collect()
    }

    async fn newest_active_coach(
        &self,
        client_id: &UserId,
    ) -> Result<Option<UserId>, CoachingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let coach: Option<String> = coach_clients::table
            .filter(coach_clients::client_id.eq(client_id.as_str()))
            .filter(coach_clients::status.eq(LinkStatus::Active.as_str()))
            .order(coach_clients::joined_at.desc())
            .select(coach_clients::coach_id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        coach.map(parse_user_id).transpose()
    }

    async fn is_client(&self, user_id: &UserId) -> Result<bool, CoachingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let count: i64 = coach_clients::table
            .filter(coach_clients::client_id.eq(user_id.as_str()))
            .select(count_star())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(count > 0)
    }

    async fn insert_invitation(
        &self,
        invitation: NewInvitation,
    ) -> Result<Invitation, CoachingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewCoachInvitationRow {
            id: Uuid::new_v4(),
            coach_id: invitation.coach_id.as_str(),
            email: &invitation.email,
            token: invitation.token.as_str(),
        };

        let inserted: CoachInvitationRow = diesel::insert_into(coach_invitations::table)
            .values(&row)
            .returning(CoachInvitationRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_invitation(inserted)
    }

    async fn invitation_by_token(
        &self,
        token: &InviteToken,
    ) -> Result<Option<Invitation>, CoachingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<CoachInvitationRow> = coach_invitations::table
            .filter(coach_invitations::token.eq(token.as_str()))
            .select(CoachInvitationRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_invitation).transpose()
    }

    async fn consume_invitation(
        &self,
        token: &InviteToken,
        client_id: &UserId,
        joined_at: DateTime<Utc>,
    ) -> Result<Option<CoachClientLink>, CoachingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let token_text = token.as_str();
        let client = client_id.as_str();

        // The delete runs first and returns the consumed row: a concurrent
        // accept of the same token blocks on the row lock, then deletes zero
        // rows and observes `None`.
        let row: Option<CoachClientRow> = conn
            .transaction(|conn| {
                async move {
                    let invitation: Option<CoachInvitationRow> = diesel::delete(
                        coach_invitations::table
                            .filter(coach_invitations::token.eq(token_text)),
                    )
                    .returning(CoachInvitationRow::as_returning())
                    .get_result(conn)
                    .await
                    .optional()?;

                    let Some(invitation) = invitation else {
                        return Ok(None);
                    };

                    let link: CoachClientRow = diesel::insert_into(coach_clients::table)
                        .values(&link_from_invitation(&invitation, client, joined_at))
                        .returning(CoachClientRow::as_returning())
                        .get_result(conn)
                        .await?;

                    Ok::<_, diesel::result::Error>(Some(link))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        row.map(row_to_link).transpose()
    }
}
