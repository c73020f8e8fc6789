//! Port for invite email delivery.

use async_trait::async_trait;

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by invite email adapters.
    pub enum InviteEmailError {
        /// The provider rejected or failed to accept the message.
        Delivery { message: String } =>
            "invite email delivery failed: {message}",
    }
}

/// Port for sending the one-time invite link.
///
/// Delivery is fire and forget: callers surface a failed send as
/// `email_sent: false` so the link can be copied manually, and never retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InviteEmailSender: Send + Sync {
    /// Hand the invite to the provider. `Ok(false)` means the sender is not
    /// configured and the message was deliberately skipped.
    async fn send_invite(&self, to: &str, invite_link: &str)
    -> Result<bool, InviteEmailError>;
}
