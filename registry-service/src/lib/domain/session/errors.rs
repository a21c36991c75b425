use thiserror::Error;

/// Externally visible session failures.
///
/// Causes (unknown email, wrong password, bad signature, expired token, deleted
/// identity) are logged where they happen and collapsed into these variants.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token refresh failed")]
    TokenRefreshFailed,

    #[error("Internal error: {0}")]
    Internal(String),
}
