//! Authentication utilities library
//!
//! Provides the credential and token primitives of the registry backend:
//! - Password hashing (Argon2id)
//! - JWT signing and verification, one handler per token class
//! - Two-class (access/refresh) token issuance
//!
//! Services define their own claims payload and identity ports and adapt these
//! implementations.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! assert!(!hasher.verify("not_my_password", &hash).unwrap());
//! ```
//!
//! ## Token Pairs
//! ```
//! use auth::{Authenticator, Claims, TokenKind};
//! use chrono::Duration;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Subject {
//!     sub: i64,
//! }
//!
//! let authenticator = Authenticator::new(
//!     b"access_secret_key_at_least_32_bytes!",
//!     Duration::minutes(15),
//!     b"refresh_secret_key_at_least_32_bytes",
//!     Duration::days(7),
//! )
//! .unwrap();
//!
//! let hash = authenticator.hash_password("password123").unwrap();
//! let pair = authenticator
//!     .authenticate("password123", &hash, &Subject { sub: 1 })
//!     .unwrap();
//!
//! let claims: Claims<Subject> = authenticator
//!     .validate_token(TokenKind::Access, &pair.access_token)
//!     .unwrap();
//! assert_eq!(claims.payload.sub, 1);
//!
//! // Refresh tokens are signed with a different secret.
//! assert!(authenticator
//!     .validate_token::<Subject>(TokenKind::Access, &pair.refresh_token)
//!     .is_err());
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use authenticator::TokenKind;
pub use authenticator::TokenPair;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
