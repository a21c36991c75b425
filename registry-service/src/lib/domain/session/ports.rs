use async_trait::async_trait;
use auth::TokenPair;

use crate::domain::session::errors::SessionError;
use crate::domain::session::models::Credentials;
use crate::domain::session::models::IdentityClaims;
use crate::domain::session::models::Session;

/// Port for session lifecycle operations.
#[async_trait]
pub trait SessionServicePort: Send + Sync + 'static {
    /// Check credentials and open a session.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email, malformed email, wrong password or
    ///   corrupt stored hash; the caller cannot tell which
    /// * `Internal` - Identity store or token signing failed
    async fn login(&self, credentials: &Credentials) -> Result<Session, SessionError>;

    /// Exchange a refresh token for a brand-new pair built from the current
    /// stored identity.
    ///
    /// The presented token stays valid until its own expiry.
    ///
    /// # Errors
    /// * `TokenRefreshFailed` - Token expired, invalid, or its identity is gone
    /// * `Internal` - Identity store or token signing failed
    async fn refresh(&self, refresh_token: &str) -> Result<Session, SessionError>;

    /// Sign an access/refresh pair from one claims snapshot. No store access.
    fn generate_tokens(&self, claims: &IdentityClaims) -> Result<TokenPair, SessionError>;
}
