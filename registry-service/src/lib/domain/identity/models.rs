use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::identity::errors::EmailError;
use crate::identity::errors::NameError;
use crate::identity::errors::PasswordPolicyError;
use crate::identity::errors::RoleError;

/// Registered identity as held by the identity store.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: IdentityId,
    pub name: PersonName,
    pub surname: PersonName,
    pub email: EmailAddress,
    pub password_hash: String,
    pub role: Option<Role>,
}

/// Identity primary key. Durable, assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityId(pub i64);

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Role assignable to an identity.
///
/// Closed set. The "any authenticated identity" wildcard is not a role and
/// lives in route declarations only (see `access::models::RequiredRole`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Director,
    Secretary,
    HeadOfDirection,
}

impl Role {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Director => "DIRECTOR",
            Role::Secretary => "SECRETARY",
            Role::HeadOfDirection => "HEAD_OF_DIRECTION",
        }
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "DIRECTOR" => Ok(Role::Director),
            "SECRETARY" => Ok(Role::Secretary),
            "HEAD_OF_DIRECTION" => Ok(Role::HeadOfDirection),
            "ALL" => Err(RoleError::WildcardNotAssignable),
            other => Err(RoleError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Given name or surname.
///
/// Ensures the value is 3-60 characters once surrounding whitespace is removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName(String);

impl PersonName {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 60;

    /// Create a new valid name.
    ///
    /// # Errors
    /// * `TooShort` - Fewer than 3 characters
    /// * `TooLong` - More than 60 characters
    pub fn new(name: String) -> Result<Self, NameError> {
        let name = name.trim().to_string();
        let length = name.chars().count();

        if length < Self::MIN_LENGTH {
            Err(NameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(NameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password accepted for registration, 8-64 characters.
///
/// Debug output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    const MIN_LENGTH: usize = 8;
    const MAX_LENGTH: usize = 64;

    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        let length = password.chars().count();
        if length < Self::MIN_LENGTH || length > Self::MAX_LENGTH {
            return Err(PasswordPolicyError::Length {
                min: Self::MIN_LENGTH,
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }
        Ok(Self(password))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Command to register a new identity with domain types
#[derive(Debug)]
pub struct RegisterIdentityCommand {
    pub name: PersonName,
    pub surname: PersonName,
    pub email: EmailAddress,
    pub password: Password,
    pub role: Role,
}

/// Identity ready for insertion; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub name: PersonName,
    pub surname: PersonName,
    pub email: EmailAddress,
    pub password_hash: String,
    pub role: Role,
}

impl NewIdentity {
    pub fn with_id(self, id: IdentityId) -> Identity {
        Identity {
            id,
            name: self.name,
            surname: self.surname,
            email: self.email,
            password_hash: self.password_hash,
            role: Some(self.role),
        }
    }
}
