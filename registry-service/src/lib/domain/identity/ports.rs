use async_trait::async_trait;

use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::NewIdentity;
use crate::domain::identity::models::RegisterIdentityCommand;
use crate::identity::errors::IdentityError;

/// Port for identity management operations exposed to the transport layer.
#[async_trait]
pub trait IdentityServicePort: Send + Sync + 'static {
    /// Register a new identity.
    ///
    /// # Arguments
    /// * `command` - Validated command with names, email, password and role
    ///
    /// # Returns
    /// Created identity (with store-assigned id)
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `Password` - Password hashing failed
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, command: RegisterIdentityCommand) -> Result<Identity, IdentityError>;
}

/// Identity lookup collaborator.
///
/// The session core only reads through this port; `create` serves registration.
#[async_trait]
pub trait IdentityRepository: Send + Sync + 'static {
    /// Retrieve identity by email address.
    ///
    /// # Returns
    /// Optional identity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Identity>, IdentityError>;

    /// Retrieve identity by primary key.
    ///
    /// # Returns
    /// Optional identity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: IdentityId) -> Result<Option<Identity>, IdentityError>;

    /// Persist a new identity.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, identity: NewIdentity) -> Result<Identity, IdentityError>;
}
