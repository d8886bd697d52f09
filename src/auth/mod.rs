pub mod codec;
pub mod password;

use uuid::Uuid;

use crate::error::ApiError;
use crate::types::Role;

pub use codec::{CodecError, PayloadError, TokenCodec, TokenPayload, VerifyError};

/// Caller identity established by the authentication middleware.
///
/// Inserted into request extensions once the token has been verified and its
/// payload validated; handlers take it as an extractor argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
    pub role: Role,
    pub issued_at: Option<i64>,
    pub expires_at: i64,
}

impl Identity {
    /// Subject as a user id. Subjects are opaque to the middleware, but every
    /// token this service issues carries a user UUID.
    pub fn user_id(&self) -> Result<Uuid, ApiError> {
        Uuid::parse_str(&self.subject).map_err(|_| ApiError::unauthorized("Not authenticated"))
    }
}
