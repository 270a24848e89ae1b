use async_trait::async_trait;
use common::error::{AppError, Res};
use serde_json::json;

/// Outgoing-mail capability. The worker only depends on this trait; tests
/// substitute a recording implementation.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &[String], subject: &str, body: &str) -> Res<()>;
}

/// Mailer that hands messages to an HTTP relay (MailHog-style JSON API).
pub struct HttpMailer {
    client: reqwest::Client,
    relay_url: String,
    from: String,
}

impl HttpMailer {
    pub fn new(relay_url: &str, from: &str) -> Self {
        HttpMailer {
            client: reqwest::Client::new(),
            relay_url: relay_url.to_string(),
            from: from.to_string(),
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, to: &[String], subject: &str, body: &str) -> Res<()> {
        let response = self
            .client
            .post(&self.relay_url)
            .json(&json!({
                "from": self.from,
                "to": to,
                "subject": subject,
                "body": body,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Internal(format!(
                "Mail relay responded with {}",
                response.status()
            )));
        }
        Ok(())
    }
}
