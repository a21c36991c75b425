use std::fmt;

use auth::TokenPair;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::identity::models::Identity;
use crate::domain::identity::models::Role;

/// Identity snapshot embedded in every token.
///
/// Captured at issuance and not re-read from the store while an access token
/// is in use; refresh rebuilds it from the current stored identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityProps {
    pub id: i64,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub role: Option<Role>,
}

/// Token payload: subject id plus the identity snapshot.
///
/// Invariant: `props.id == sub`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub sub: i64,
    pub props: IdentityProps,
}

impl IdentityClaims {
    pub fn is_consistent(&self) -> bool {
        self.props.id == self.sub
    }
}

impl From<&Identity> for IdentityClaims {
    fn from(identity: &Identity) -> Self {
        Self {
            sub: identity.id.0,
            props: IdentityProps {
                id: identity.id.0,
                name: identity.name.as_str().to_string(),
                surname: identity.surname.as_str().to_string(),
                email: identity.email.as_str().to_string(),
                role: identity.role,
            },
        }
    }
}

/// Login input as received; validation happens inside the session service so
/// that every rejection looks the same.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Outcome of a successful login or refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub tokens: TokenPair,
    pub user: IdentityProps,
}
