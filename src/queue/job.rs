use serde::{Deserialize, Serialize};

use crate::auth::{CodecError, TokenCodec};

/// Queue payload: `{"email": ..., "verifyUrl": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailJob {
    pub email: String,
    pub verify_url: String,
}

impl EmailJob {
    /// Verification job for a freshly registered address. The link carries a
    /// signed email token rather than the session claims.
    pub fn verification(
        codec: &TokenCodec,
        verify_url_base: &str,
        email: &str,
        ttl: chrono::Duration,
    ) -> Result<Self, CodecError> {
        let token = codec.issue_email_verification(email, ttl)?;
        Ok(Self {
            email: email.to_string(),
            verify_url: format!("{}?token={}", verify_url_base, token),
        })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
