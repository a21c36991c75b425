use chrono::Duration;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Token class. Each class is signed with its own secret and lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Authentication coordinator combining password verification and two-class
/// token issuance.
///
/// Access tokens are short-lived and presented on every request; refresh tokens
/// are long-lived and only exchanged for a new pair.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    access: JwtHandler,
    refresh: JwtHandler,
}

/// Freshly issued access/refresh pair built from one claims snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `access_secret` / `access_ttl` - Signing secret and lifetime of access tokens
    /// * `refresh_secret` / `refresh_ttl` - Signing secret and lifetime of refresh tokens
    ///
    /// # Errors
    /// * `Configuration` - Empty secret, non-positive ttl, both classes sharing one
    ///   secret, or a refresh lifetime not longer than the access lifetime
    pub fn new(
        access_secret: &[u8],
        access_ttl: Duration,
        refresh_secret: &[u8],
        refresh_ttl: Duration,
    ) -> Result<Self, JwtError> {
        if access_secret == refresh_secret {
            return Err(JwtError::Configuration(
                "access and refresh tokens must use different secrets".to_string(),
            ));
        }

        if refresh_ttl <= access_ttl {
            return Err(JwtError::Configuration(format!(
                "refresh lifetime ({}s) must exceed access lifetime ({}s)",
                refresh_ttl.num_seconds(),
                access_ttl.num_seconds()
            )));
        }

        Ok(Self {
            password_hasher: PasswordHasher::new(),
            access: JwtHandler::new(access_secret, access_ttl)?,
            refresh: JwtHandler::new(refresh_secret, refresh_ttl)?,
        })
    }

    /// Hash a password for storage.
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and issue a token pair.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash is corrupt
    /// * `JwtError` - Token generation failed
    pub fn authenticate<T: Serialize>(
        &self,
        password: &str,
        stored_hash: &str,
        payload: &T,
    ) -> Result<TokenPair, AuthenticationError> {
        let is_valid = self.password_hasher.verify(password, stored_hash)?;

        if !is_valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.issue_tokens(payload)?)
    }

    /// Spend one password verification on an account that does not exist.
    pub fn verify_dummy(&self, password: &str) {
        self.password_hasher.verify_dummy(password);
    }

    /// Issue an access/refresh pair without password verification.
    ///
    /// Used on refresh, once the old refresh token and the identity behind it
    /// have been re-validated.
    pub fn issue_tokens<T: Serialize>(&self, payload: &T) -> Result<TokenPair, JwtError> {
        Ok(TokenPair {
            access_token: self.access.sign(payload)?,
            refresh_token: self.refresh.sign(payload)?,
        })
    }

    /// Validate a token of the given class and decode its claims.
    ///
    /// # Errors
    /// * `TokenExpired` - Token is past its `exp`
    /// * `InvalidToken` - Token is malformed or was not signed with this class's secret
    pub fn validate_token<T: DeserializeOwned>(
        &self,
        kind: TokenKind,
        token: &str,
    ) -> Result<Claims<T>, JwtError> {
        self.handler(kind).verify(token)
    }

    /// Read claims without verification. Never use for authorization.
    pub fn inspect_token<T: DeserializeOwned>(
        &self,
        kind: TokenKind,
        token: &str,
    ) -> Result<Claims<T>, JwtError> {
        self.handler(kind).decode_unverified(token)
    }

    pub fn handler(&self, kind: TokenKind) -> &JwtHandler {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }
}
