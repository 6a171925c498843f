//! Outbound transactional mail through the Resend HTTP API.
//!
//! Delivery sits behind the [`NotificationSender`] trait and every call
//! goes through [`send_or_log`], so a provider outage can never turn an
//! already committed booking or status change into a reported failure.

use async_trait::async_trait;
use serde_json::json;
use std::env;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("mail request failed")]
    Http(#[from] reqwest::Error),
    #[error("mail provider rejected the message: {status}")]
    Rejected { status: u16 },
}

#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), SendError>;
}

pub struct ResendMailer {
    client: reqwest::Client,
    api_key: String,
    from: String,
}

impl ResendMailer {
    pub fn from_env() -> Self {
        let api_key = env::var("RESEND_API_KEY").unwrap_or_default();
        let from = env::var("RESEND_FROM_EMAIL")
            .unwrap_or_else(|_| "Zlatarna Popović <onboarding@resend.dev>".to_string());
        if api_key.trim().is_empty() {
            log::warn!("RESEND_API_KEY not set. Outbound mail is disabled.");
        }
        ResendMailer {
            client: reqwest::Client::new(),
            api_key,
            from,
        }
    }

    fn enabled(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

#[async_trait]
impl NotificationSender for ResendMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), SendError> {
        if !self.enabled() {
            return Ok(());
        }

        let response = self
            .client
            .post("https://api.resend.com/emails")
            .bearer_auth(&self.api_key)
            .json(&json!({
                "from": self.from,
                "to": message.to,
                "subject": message.subject,
                "html": message.html,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SendError::Rejected {
                status: response.status().as_u16(),
            });
        }
        Ok(())
    }
}

/// Fault boundary for fire-and-forget notifications: failures are logged
/// and swallowed.
pub async fn send_or_log(sender: &dyn NotificationSender, message: EmailMessage) {
    if let Err(err) = sender.send(&message).await {
        log::warn!("Mail send to {} failed: {err}", message.to);
    }
}
