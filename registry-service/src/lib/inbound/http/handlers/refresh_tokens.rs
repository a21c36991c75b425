use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use super::login::SessionResponseData;
use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;
use crate::session::errors::SessionError;

/// Rotate the token pair. The cookie is preferred over the body.
pub async fn refresh_tokens(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Option<Json<RefreshTokensRequest>>,
) -> Result<(CookieJar, ApiSuccess<SessionResponseData>), ApiError> {
    let presented = state
        .refresh_cookie
        .read(&jar)
        .or_else(|| body.and_then(|Json(body)| body.old_refresh_token))
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            tracing::debug!("Refresh requested without a token");
            SessionError::TokenRefreshFailed
        })?;

    let session = state.session_service.refresh(&presented).await?;
    let jar = state
        .refresh_cookie
        .write(jar, &session.tokens.refresh_token)?;

    Ok((jar, ApiSuccess::new(StatusCode::OK, session.into())))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RefreshTokensRequest {
    #[serde(rename = "oldRefreshToken", default)]
    old_refresh_token: Option<String>,
}
