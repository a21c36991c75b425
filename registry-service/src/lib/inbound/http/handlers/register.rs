use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::Password;
use crate::domain::identity::models::PersonName;
use crate::domain::identity::models::RegisterIdentityCommand;
use crate::domain::identity::models::Role;
use crate::identity::errors::IdentityError;
use crate::inbound::http::middleware::CurrentIdentity;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    CurrentIdentity(admin): CurrentIdentity,
    Json(body): Json<RegisterRequest>,
) -> Result<ApiSuccess<IdentityResponseData>, ApiError> {
    let identity = state
        .identity_service
        .register(body.try_into_command()?)
        .await?;

    tracing::info!(
        registered_by = %admin.id(),
        identity_id = %identity.id,
        "Registration completed"
    );

    Ok(ApiSuccess::new(StatusCode::CREATED, (&identity).into()))
}

/// HTTP request body for registering an identity (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    name: String,
    surname: String,
    #[serde(alias = "email_address")]
    email: String,
    password: String,
    role: String,
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterIdentityCommand, IdentityError> {
        Ok(RegisterIdentityCommand {
            name: PersonName::new(self.name)?,
            surname: PersonName::new(self.surname)?,
            email: EmailAddress::new(self.email)?,
            password: Password::new(self.password)?,
            role: self.role.parse::<Role>()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityResponseData {
    pub id: i64,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub role: Option<Role>,
}

impl From<&Identity> for IdentityResponseData {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id.0,
            name: identity.name.as_str().to_string(),
            surname: identity.surname.as_str().to_string(),
            email: identity.email.as_str().to_string(),
            role: identity.role,
        }
    }
}
