//! Coach-client relationships and one-time invitations.

use chrono::{DateTime, Utc};
use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::identity::UserId;

/// Number of random bytes in an invite token (192 bits of entropy).
const INVITE_TOKEN_BYTES: usize = 24;

/// Status of a coach-client link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkStatus {
    Active,
}

impl LinkStatus {
    /// Database representation of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
        }
    }
}

/// Membership of a client in a coach's roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoachClientLink {
    pub coach_id: UserId,
    pub client_id: UserId,
    pub status: LinkStatus,
    pub joined_at: DateTime<Utc>,
}

/// Opaque single-use invite token, 48 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InviteToken(String);

impl InviteToken {
    /// Generate a fresh token from OS entropy.
    pub fn generate() -> Self {
        let mut bytes = [0u8; INVITE_TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Wrap a token received from a link, without validating its shape:
    /// lookup decides whether it refers to a live invitation.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the token text for link building and storage.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// A pending invitation from a coach to an email address.
///
/// Tokens have no expiry; an invitation lives until it is accepted (which
/// deletes it) or manually purged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invitation {
    pub id: Uuid,
    pub coach_id: UserId,
    pub email: String,
    pub token: InviteToken,
    pub created_at: DateTime<Utc>,
}

/// Normalise an invite email for storage: trimmed and lowercased.
///
/// Returns `None` when nothing remains after trimming.
pub fn normalize_invite_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_lowercase();
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}
