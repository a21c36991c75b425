use std::sync::Arc;

use auth::Authenticator;
use auth::JwtError;
use auth::TokenKind;
use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::cookie::CookieJar;
use axum_extra::extract::cookie::SameSite;
use thiserror::Error;
use time::OffsetDateTime;

use crate::domain::session::models::IdentityClaims;

#[derive(Debug, Error)]
pub enum CookieError {
    #[error("Cannot read refresh token expiry: {0}")]
    Token(#[from] JwtError),

    #[error("Refresh token expiry out of range: {0}")]
    Expiry(#[from] time::error::ComponentRange),
}

/// Writes, clears and reads the refresh-token cookie.
///
/// The cookie is http-only, same-site lax, scoped to `/`, secure only in
/// production, and expires together with the token it carries.
pub struct RefreshCookie {
    name: String,
    secure: bool,
    authenticator: Arc<Authenticator>,
}

impl RefreshCookie {
    pub fn new(name: impl Into<String>, secure: bool, authenticator: Arc<Authenticator>) -> Self {
        Self {
            name: name.into(),
            secure,
            authenticator,
        }
    }

    /// Add the cookie for a freshly issued refresh token.
    ///
    /// `exp` is read without verification; the token was signed by this process.
    pub fn write(&self, jar: CookieJar, refresh_token: &str) -> Result<CookieJar, CookieError> {
        let claims = self
            .authenticator
            .inspect_token::<IdentityClaims>(TokenKind::Refresh, refresh_token)?;
        let expires = OffsetDateTime::from_unix_timestamp(claims.exp)?;

        Ok(jar.add(self.build(refresh_token.to_string(), expires)))
    }

    /// Overwrite the cookie with an empty value that has already expired.
    pub fn clear(&self, jar: CookieJar) -> CookieJar {
        let mut cookie = self.build(String::new(), OffsetDateTime::UNIX_EPOCH);
        cookie.set_max_age(time::Duration::ZERO);

        jar.add(cookie)
    }

    /// Current refresh token, `None` when absent or emptied by logout.
    pub fn read(&self, jar: &CookieJar) -> Option<String> {
        jar.get(&self.name)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
    }

    fn build(&self, value: String, expires: OffsetDateTime) -> Cookie<'static> {
        Cookie::build((self.name.clone(), value))
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .path("/")
            .expires(expires)
            .build()
    }
}
