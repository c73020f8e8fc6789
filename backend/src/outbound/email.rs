//! Resend-backed invite email delivery.
//!
//! The sender is optional: without an API key it reports every message as
//! skipped and the invite link is surfaced to the coach instead.

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::domain::ports::{InviteEmailError, InviteEmailSender};

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";
const DEFAULT_FROM: &str = "CoachUp <onboarding@resend.dev>";
const INVITE_SUBJECT: &str = "You're invited to join CoachUp";

/// Invite email sender backed by the Resend HTTP API.
#[derive(Clone)]
pub struct ResendInviteEmailSender {
    client: reqwest::Client,
    api_key: Option<String>,
    from_address: String,
}

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: String,
}

fn invite_email_html(invite_link: &str) -> String {
    format!(
        "<p>Your coach has invited you to join <strong>CoachUp</strong>, \
         a strength coaching platform.</p>\
         <p>Click the link below to sign up or log in and accept the invite. \
         This link is one-time use.</p>\
         <p><a href=\"{invite_link}\">Accept invite</a></p>\
         <p>If the link does not work, copy and paste it into your browser:</p>\
         <p>{invite_link}</p>"
    )
}

impl ResendInviteEmailSender {
    /// Create a sender. `api_key: None` disables delivery; a missing
    /// `from_address` falls back to the Resend onboarding sender.
    pub fn new(api_key: Option<String>, from_address: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            from_address: from_address.unwrap_or_else(|| DEFAULT_FROM.to_owned()),
        }
    }

    /// Whether an API key is configured.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl InviteEmailSender for ResendInviteEmailSender {
    async fn send_invite(
        &self,
        to: &str,
        invite_link: &str,
    ) -> Result<bool, InviteEmailError> {
        let Some(api_key) = self.api_key.as_deref() else {
            debug!("invite email skipped: no Resend API key configured");
            return Ok(false);
        };

        let request = SendEmailRequest {
            from: &self.from_address,
            to: [to],
            subject: INVITE_SUBJECT,
            html: invite_email_html(invite_link),
        };

        let response = self
            .client
            .post(RESEND_ENDPOINT)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| InviteEmailError::delivery(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InviteEmailError::delivery(format!(
                "provider returned {status}: {body}"
            )));
        }

        debug!(%to, "invite email accepted by provider");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn unconfigured_sender_skips_without_erroring() {
        let sender = ResendInviteEmailSender::new(None, None);

        let sent = sender
            .send_invite("client@example.com", "https://coachup.test/invite/abc")
            .await
            .expect("skip is not an error");

        assert!(!sent);
        assert!(!sender.is_configured());
    }

    #[rstest]
    fn missing_from_address_falls_back_to_the_onboarding_sender() {
        let sender = ResendInviteEmailSender::new(Some("re_key".to_owned()), None);
        assert_eq!(sender.from_address, DEFAULT_FROM);
        assert!(sender.is_configured());
    }

    #[rstest]
    fn invite_html_embeds_the_link_twice() {
        let html = invite_email_html("https://coachup.test/invite/abc123");
        assert_eq!(html.matches("https://coachup.test/invite/abc123").count(), 2);
        assert!(html.contains("one-time use"));
    }
}
