use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use validator::{Validate, ValidateEmail, ValidationError};

use crate::api::ValidatedJson;
use crate::app::AppState;
use crate::auth::Identity;
use crate::error::ApiResult;
use crate::services::{ProfileUpdate, UserService};

#[derive(Debug, Default, Deserialize, Validate)]
pub struct ProfileRequest {
    pub name: Option<String>,
    #[validate(custom(function = "blank_or_email"))]
    pub email: Option<String>,
    /// Hosted image URL
    pub image: Option<String>,
}

/// Blank leaves the email unchanged; anything else must be an address
fn blank_or_email(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || value.validate_email() {
        return Ok(());
    }
    let mut err = ValidationError::new("email");
    err.message = Some("Invalid email".into());
    Err(err)
}

/// PUT /api/auth/profile
pub async fn update_profile(
    State(state): State<AppState>,
    identity: Identity,
    ValidatedJson(body): ValidatedJson<ProfileRequest>,
) -> ApiResult<Json<Value>> {
    let user = UserService::new(state.store.clone())
        .update_profile(
            identity.user_id()?,
            ProfileUpdate {
                name: body.name,
                email: body.email,
                image: body.image,
            },
        )
        .await?;

    Ok(Json(json!({
        "message": "Profile updated successfully",
        "user": {
            "id": user.id,
            "name": user.name,
            "email": user.email,
            "image": user.image,
            "role": user.role,
        },
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: Option<&str>) -> ProfileRequest {
        ProfileRequest {
            email: email.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn email_must_be_an_address_when_given() {
        assert!(request(Some("not-an-email")).validate().is_err());
        assert!(request(Some("ada@example.com")).validate().is_ok());
        assert!(request(Some("  ")).validate().is_ok());
        assert!(request(None).validate().is_ok());
    }
}
