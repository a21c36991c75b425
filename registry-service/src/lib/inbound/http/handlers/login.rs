use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::session::models::Credentials;
use crate::domain::session::models::IdentityProps;
use crate::domain::session::models::Session;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<(CookieJar, ApiSuccess<SessionResponseData>), ApiError> {
    let credentials = Credentials::from(body);
    let session = state.session_service.login(&credentials).await?;
    let jar = state
        .refresh_cookie
        .write(jar, &session.tokens.refresh_token)?;

    Ok((jar, ApiSuccess::new(StatusCode::OK, session.into())))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    #[serde(alias = "email_address")]
    email: String,
    password: String,
}

impl From<LoginRequest> for Credentials {
    fn from(body: LoginRequest) -> Self {
        Credentials {
            email: body.email,
            password: body.password,
        }
    }
}

/// Body of login and refresh responses. The refresh token travels in the
/// cookie only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponseData {
    pub access_token: String,
    pub user: IdentityProps,
}

impl From<Session> for SessionResponseData {
    fn from(session: Session) -> Self {
        Self {
            access_token: session.tokens.access_token,
            user: session.user,
        }
    }
}
