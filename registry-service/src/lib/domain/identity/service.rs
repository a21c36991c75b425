use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::identity::models::Identity;
use crate::domain::identity::models::NewIdentity;
use crate::domain::identity::models::RegisterIdentityCommand;
use crate::identity::errors::IdentityError;
use crate::identity::ports::IdentityRepository;
use crate::identity::ports::IdentityServicePort;

/// Domain service implementation for identity registration.
pub struct IdentityService<IR>
where
    IR: IdentityRepository,
{
    repository: Arc<IR>,
    password_hasher: auth::PasswordHasher,
}

impl<IR> IdentityService<IR>
where
    IR: IdentityRepository,
{
    pub fn new(repository: Arc<IR>) -> Self {
        Self {
            repository,
            password_hasher: auth::PasswordHasher::new(),
        }
    }
}

#[async_trait]
impl<IR> IdentityServicePort for IdentityService<IR>
where
    IR: IdentityRepository,
{
    async fn register(&self, command: RegisterIdentityCommand) -> Result<Identity, IdentityError> {
        let password_hash = self.password_hasher.hash(command.password.expose())?;

        let identity = self
            .repository
            .create(NewIdentity {
                name: command.name,
                surname: command.surname,
                email: command.email,
                password_hash,
                role: command.role,
            })
            .await?;

        tracing::info!(
            identity_id = %identity.id,
            role = ?identity.role,
            "Identity registered"
        );

        Ok(identity)
    }
}
