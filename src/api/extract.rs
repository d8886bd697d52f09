use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;

const INVALID_INPUT: &str = "Invalid input";

/// JSON body that has passed its `validator` rules.
///
/// Both undecodable bodies and rule violations become
/// `400 {"message": "Invalid input", "errors": ...}`.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            tracing::debug!("rejected request body: {}", rejection.body_text());
            ApiError::validation_error(INVALID_INPUT, json!({ "body": rejection.body_text() }))
        })?;

        value.validate().map_err(|errors| {
            let details = serde_json::to_value(&errors).unwrap_or(Value::Null);
            ApiError::validation_error(INVALID_INPUT, details)
        })?;

        Ok(ValidatedJson(value))
    }
}

/// Untyped JSON body, for endpoints that inspect value types themselves
#[derive(Debug, Clone)]
pub struct RawJson(pub Value);

#[async_trait]
impl<S> FromRequest<S> for RawJson
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state).await.map_err(|rejection| {
            ApiError::validation_error(INVALID_INPUT, json!({ "body": rejection.body_text() }))
        })?;
        Ok(RawJson(value))
    }
}

/// Path ids that are not UUIDs cannot name a row
pub fn parse_id(raw: &str, not_found: &'static str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found(not_found))
}
