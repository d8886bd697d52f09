use async_trait::async_trait;
use serde_json::json;
use thiserror::Error;

use super::EmailJob;
use crate::config::MailConfig;

const VERIFY_SUBJECT: &str = "Verify your account";

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail provider is not configured: {0}")]
    NotConfigured(&'static str),

    #[error("mail request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("mail provider rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Delivers verification emails
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_verification(&self, job: &EmailJob) -> Result<(), MailError>;
}

/// Resend HTTP API client
pub struct ResendMailer {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    from: String,
}

impl ResendMailer {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            from: from.into(),
        }
    }

    pub fn from_config(config: &MailConfig) -> Result<Self, MailError> {
        let api_key = config
            .resend_api_key
            .as_deref()
            .ok_or(MailError::NotConfigured("RESEND_API_KEY"))?;
        Ok(Self::new(&config.resend_base_url, api_key, &config.from_address))
    }
}

fn verification_html(verify_url: &str) -> String {
    format!(
        "<p>Click <a href=\"{url}\">here</a> to verify your email address.</p>\
         <p>If the link does not work, copy this URL into your browser: {url}</p>",
        url = verify_url
    )
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send_verification(&self, job: &EmailJob) -> Result<(), MailError> {
        let body = json!({
            "from": self.from,
            "to": [job.email],
            "subject": VERIFY_SUBJECT,
            "html": verification_html(&job.verify_url),
        });

        let res = self
            .client
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(MailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(email = %job.email, "Verification email sent");
        Ok(())
    }
}
