use thiserror::Error;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum AccessError {
    /// Missing, invalid or expired access token, or an identity without a role
    /// on a role-restricted route.
    #[error("Unauthorized")]
    Unauthorized,

    /// Authenticated, but the identity's role is not accepted by the route.
    #[error("Forbidden resource")]
    Forbidden,
}
