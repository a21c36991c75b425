use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// Registered time claims wrapped around a service-defined payload.
///
/// The payload is flattened into the token body, so a payload with `sub` and
/// `props` fields produces `{"iat": .., "exp": .., "sub": .., "props": {..}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims<T> {
    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Service claims (flattened into token)
    #[serde(flatten)]
    pub payload: T,
}

impl<T> Claims<T> {
    /// Wrap a payload issued at `issued_at` and valid for `ttl`.
    ///
    /// # Errors
    /// * `EncodingFailed` - `issued_at + ttl` is not a representable timestamp
    pub fn new(payload: T, issued_at: DateTime<Utc>, ttl: Duration) -> Result<Self, JwtError> {
        let expires_at = issued_at.checked_add_signed(ttl).ok_or_else(|| {
            JwtError::EncodingFailed(format!(
                "expiry out of range: {}s after {}",
                ttl.num_seconds(),
                issued_at
            ))
        })?;

        Ok(Self {
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            payload,
        })
    }

    pub fn into_payload(self) -> T {
        self.payload
    }
}
