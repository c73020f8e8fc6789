//! Port for reading principal profiles and per-user settings.
//!
//! User rows are written by the external identity sync; the core only reads
//! names/emails and owns the single `unit_preference` setting.

use async_trait::async_trait;

use crate::domain::identity::{UnitPreference, UserId, UserSummary};

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "user repository query failed: {message}",
    }
}

/// Port for user profile reads and settings writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Display names for the given principals; absent ids are omitted.
    async fn names_for(
        &self,
        ids: &[UserId],
    ) -> Result<Vec<(UserId, String)>, UserRepositoryError>;

    /// Profile summary for one principal.
    async fn find_summary(
        &self,
        id: &UserId,
    ) -> Result<Option<UserSummary>, UserRepositoryError>;

    /// Stored unit preference, if the user row exists.
    async fn unit_preference(
        &self,
        id: &UserId,
    ) -> Result<Option<UnitPreference>, UserRepositoryError>;

    /// Persist the user's unit preference.
    async fn set_unit_preference(
        &self,
        id: &UserId,
        unit: UnitPreference,
    ) -> Result<(), UserRepositoryError>;
}
