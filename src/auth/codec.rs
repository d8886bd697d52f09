//! Signing and verification of session tokens (HS256 JWTs).

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::Identity;
use crate::types::Role;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("signing secret is not configured")]
    MissingSecret,

    #[error("failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("token lifetime is out of range")]
    LifetimeOutOfRange,
}

/// Why a presented token was refused. Callers never see the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error("token could not be decoded")]
    Malformed,

    #[error("token signature does not match")]
    SignatureInvalid,

    #[error("token has expired")]
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("subject identifier is missing or empty")]
    MissingSubject,

    #[error("role is missing or not recognized")]
    UnknownRole,
}

/// Claims written into a session token at signin
#[derive(Debug, Serialize)]
struct SessionClaims<'a> {
    #[serde(rename = "userId")]
    user_id: &'a str,
    role: Role,
    iat: i64,
    exp: i64,
}

/// Claims written into an email-verification link token
#[derive(Debug, Serialize, Deserialize)]
pub struct EmailClaims {
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Decoded token body before shape validation.
///
/// Fields are kept loosely typed so a structurally wrong payload (numeric
/// `userId`, lowercase role, missing fields) is reported as a payload
/// problem rather than a decoding failure.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPayload {
    #[serde(rename = "userId", default)]
    pub user_id: Value,
    #[serde(default)]
    pub role: Value,
    #[serde(default)]
    pub iat: Option<i64>,
    pub exp: i64,
}

impl TokenPayload {
    /// Validate the payload shape and produce the caller identity
    pub fn into_identity(self) -> Result<Identity, PayloadError> {
        let subject = match self.user_id {
            Value::String(s) if !s.is_empty() => s,
            _ => return Err(PayloadError::MissingSubject),
        };

        let role = self
            .role
            .as_str()
            .and_then(|r| r.parse::<Role>().ok())
            .ok_or(PayloadError::UnknownRole)?;

        Ok(Identity {
            subject,
            role,
            issued_at: self.iat,
            expires_at: self.exp,
        })
    }
}

/// Process-wide token signer/verifier, built once from configuration
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec").finish_non_exhaustive()
    }
}

impl TokenCodec {
    pub fn new(secret: &str) -> Result<Self, CodecError> {
        if secret.is_empty() {
            return Err(CodecError::MissingSecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    pub fn from_config(config: &crate::config::SecurityConfig) -> Result<Self, CodecError> {
        let secret = config.jwt_secret.as_deref().ok_or(CodecError::MissingSecret)?;
        Self::new(secret)
    }

    /// Sign a session token for `subject` valid for `ttl` from now
    pub fn issue(&self, subject: &str, role: Role, ttl: Duration) -> Result<String, CodecError> {
        let (iat, exp) = window(ttl)?;
        let claims = SessionClaims {
            user_id: subject,
            role,
            iat,
            exp,
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    /// Sign the short-lived token embedded in verification email links
    pub fn issue_email_verification(&self, email: &str, ttl: Duration) -> Result<String, CodecError> {
        let (iat, exp) = window(ttl)?;
        let claims = EmailClaims {
            email: email.to_string(),
            iat,
            exp,
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    pub fn verify(&self, token: &str) -> Result<TokenPayload, VerifyError> {
        decode::<TokenPayload>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => VerifyError::SignatureInvalid,
                ErrorKind::ExpiredSignature => VerifyError::Expired,
                _ => VerifyError::Malformed,
            })
    }

    pub fn verify_email_token(&self, token: &str) -> Result<EmailClaims, VerifyError> {
        decode::<EmailClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => VerifyError::SignatureInvalid,
                ErrorKind::ExpiredSignature => VerifyError::Expired,
                _ => VerifyError::Malformed,
            })
    }
}

/// `(iat, exp)` for a token issued now
fn window(ttl: Duration) -> Result<(i64, i64), CodecError> {
    let now = Utc::now();
    let expires = now
        .checked_add_signed(ttl)
        .ok_or(CodecError::LifetimeOutOfRange)?;
    Ok((now.timestamp(), expires.timestamp()))
}
