use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::TokenKind;
use auth::TokenPair;

use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::IdentityId;
use crate::domain::session::errors::SessionError;
use crate::domain::session::models::Credentials;
use crate::domain::session::models::IdentityClaims;
use crate::domain::session::models::Session;
use crate::domain::session::ports::SessionServicePort;
use crate::identity::errors::IdentityError;
use crate::identity::ports::IdentityRepository;

/// Session service: login, token pair generation and refresh rotation.
///
/// Stateless per call. Identity store reads are the only suspension points.
pub struct SessionService<IR>
where
    IR: IdentityRepository,
{
    repository: Arc<IR>,
    authenticator: Arc<Authenticator>,
}

impl<IR> SessionService<IR>
where
    IR: IdentityRepository,
{
    /// Create a new session service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Identity lookup implementation
    /// * `authenticator` - Password verification and access/refresh token signing
    pub fn new(repository: Arc<IR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }
}

fn store_failure(error: IdentityError) -> SessionError {
    tracing::error!(error = %error, "Identity lookup failed");
    SessionError::Internal("identity lookup failed".to_string())
}

#[async_trait]
impl<IR> SessionServicePort for SessionService<IR>
where
    IR: IdentityRepository,
{
    async fn login(&self, credentials: &Credentials) -> Result<Session, SessionError> {
        let Ok(email) = EmailAddress::new(credentials.email.clone()) else {
            self.authenticator.verify_dummy(&credentials.password);
            tracing::info!(reason = "malformed_email", "Login rejected");
            return Err(SessionError::InvalidCredentials);
        };

        let identity = self
            .repository
            .find_by_email(&email)
            .await
            .map_err(store_failure)?
            .ok_or_else(|| {
                self.authenticator.verify_dummy(&credentials.password);
                tracing::info!(reason = "unknown_email", "Login rejected");
                SessionError::InvalidCredentials
            })?;

        let claims = IdentityClaims::from(&identity);

        let tokens = self
            .authenticator
            .authenticate(&credentials.password, &identity.password_hash, &claims)
            .map_err(|e| match e {
                AuthenticationError::InvalidCredentials => {
                    tracing::info!(
                        identity_id = %identity.id,
                        reason = "wrong_password",
                        "Login rejected"
                    );
                    SessionError::InvalidCredentials
                }
                AuthenticationError::PasswordError(err) => {
                    tracing::warn!(
                        identity_id = %identity.id,
                        error = %err,
                        "Stored credential is unusable, rejecting login"
                    );
                    SessionError::InvalidCredentials
                }
                AuthenticationError::JwtError(err) => {
                    tracing::error!(error = %err, "Token generation failed");
                    SessionError::Internal("token generation failed".to_string())
                }
            })?;

        tracing::info!(identity_id = %identity.id, "Session opened");

        Ok(Session {
            tokens,
            user: claims.props,
        })
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Session, SessionError> {
        let presented: IdentityClaims = self
            .authenticator
            .validate_token(TokenKind::Refresh, refresh_token)
            .map_err(|e| {
                tracing::warn!(error = %e, "Refresh token rejected");
                SessionError::TokenRefreshFailed
            })?
            .into_payload();

        if !presented.is_consistent() {
            tracing::warn!(
                sub = presented.sub,
                props_id = presented.props.id,
                "Refresh token subject mismatch"
            );
            return Err(SessionError::TokenRefreshFailed);
        }

        let identity = self
            .repository
            .find_by_id(IdentityId(presented.sub))
            .await
            .map_err(store_failure)?
            .ok_or_else(|| {
                tracing::warn!(sub = presented.sub, "Refresh for identity that no longer exists");
                SessionError::TokenRefreshFailed
            })?;

        let claims = IdentityClaims::from(&identity);
        let tokens = self.generate_tokens(&claims)?;

        tracing::info!(identity_id = %identity.id, "Session refreshed");

        Ok(Session {
            tokens,
            user: claims.props,
        })
    }

    fn generate_tokens(&self, claims: &IdentityClaims) -> Result<TokenPair, SessionError> {
        self.authenticator.issue_tokens(claims).map_err(|e| {
            tracing::error!(error = %e, "Token generation failed");
            SessionError::Internal("token generation failed".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use auth::Claims;
    use chrono::Duration;
    use chrono::Utc;
    use mockall::mock;

    use super::*;
    use crate::domain::identity::models::Identity;
    use crate::domain::identity::models::NewIdentity;
    use crate::domain::identity::models::PersonName;
    use crate::domain::identity::models::Role;

    mock! {
        pub TestIdentityRepository {}

        #[async_trait]
        impl IdentityRepository for TestIdentityRepository {
            async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Identity>, IdentityError>;
            async fn find_by_id(&self, id: IdentityId) -> Result<Option<Identity>, IdentityError>;
            async fn create(&self, identity: NewIdentity) -> Result<Identity, IdentityError>;
        }
    }

    fn authenticator() -> Arc<Authenticator> {
        Arc::new(
            Authenticator::new(
                b"test_access_secret_at_least_32_bytes!",
                Duration::minutes(15),
                b"test_refresh_secret_at_least_32_bytes",
                Duration::days(7),
            )
            .expect("valid authenticator"),
        )
    }

    fn identity(role: Option<Role>) -> Identity {
        Identity {
            id: IdentityId(1),
            name: PersonName::new("Ana".to_string()).unwrap(),
            surname: PersonName::new("Popescu".to_string()).unwrap(),
            email: EmailAddress::new("a@x.com".to_string()).unwrap(),
            password_hash: auth::PasswordHasher::new().hash("Secret123!").unwrap(),
            role,
        }
    }

    fn credentials(email: &str, password: &str) -> Credentials {
        Credentials {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_success() {
        let mut repository = MockTestIdentityRepository::new();
        let stored = identity(Some(Role::Secretary));

        repository
            .expect_find_by_email()
            .withf(|email| email.as_str() == "a@x.com")
            .times(1)
            .returning(move |_| Ok(Some(stored.clone())));

        let authenticator = authenticator();
        let service = SessionService::new(Arc::new(repository), authenticator.clone());

        let session = service
            .login(&credentials("a@x.com", "Secret123!"))
            .await
            .expect("login should succeed");

        assert_eq!(session.user.id, 1);
        assert_eq!(session.user.role, Some(Role::Secretary));

        let access: Claims<IdentityClaims> = authenticator
            .validate_token(TokenKind::Access, &session.tokens.access_token)
            .unwrap();
        let refresh: Claims<IdentityClaims> = authenticator
            .validate_token(TokenKind::Refresh, &session.tokens.refresh_token)
            .unwrap();
        assert_eq!(access.payload, refresh.payload);
        assert_eq!(access.payload.props, session.user);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let mut repository = MockTestIdentityRepository::new();
        let stored = identity(Some(Role::Secretary));

        repository
            .expect_find_by_email()
            .returning(move |email| {
                if email.as_str() == "a@x.com" {
                    Ok(Some(stored.clone()))
                } else {
                    Ok(None)
                }
            });

        let service = SessionService::new(Arc::new(repository), authenticator());

        let wrong_password = service
            .login(&credentials("a@x.com", "Wrong123!"))
            .await
            .unwrap_err();
        let unknown_email = service
            .login(&credentials("nobody@x.com", "Secret123!"))
            .await
            .unwrap_err();
        let malformed_email = service
            .login(&credentials("not-an-email", "Secret123!"))
            .await
            .unwrap_err();

        assert_eq!(wrong_password, SessionError::InvalidCredentials);
        assert_eq!(unknown_email, wrong_password);
        assert_eq!(malformed_email, wrong_password);
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_login_with_corrupt_stored_hash() {
        let mut repository = MockTestIdentityRepository::new();
        let mut stored = identity(Some(Role::Admin));
        stored.password_hash = "corrupt".to_string();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(stored.clone())));

        let service = SessionService::new(Arc::new(repository), authenticator());

        let result = service.login(&credentials("a@x.com", "Secret123!")).await;
        assert_eq!(result.unwrap_err(), SessionError::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_login_store_failure_is_internal() {
        let mut repository = MockTestIdentityRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Err(IdentityError::DatabaseError("connection refused".to_string())));

        let service = SessionService::new(Arc::new(repository), authenticator());

        let result = service.login(&credentials("a@x.com", "Secret123!")).await;
        assert!(matches!(result, Err(SessionError::Internal(_))));
    }

    #[tokio::test]
    async fn test_refresh_reflects_current_role() {
        let mut repository = MockTestIdentityRepository::new();
        let promoted = identity(Some(Role::Director));

        repository
            .expect_find_by_id()
            .withf(|id| *id == IdentityId(1))
            .times(1)
            .returning(move |_| Ok(Some(promoted.clone())));

        let authenticator = authenticator();
        let service = SessionService::new(Arc::new(repository), authenticator.clone());

        let original = service
            .generate_tokens(&IdentityClaims::from(&identity(Some(Role::Secretary))))
            .unwrap();

        let session = service.refresh(&original.refresh_token).await.unwrap();

        assert_eq!(session.user.role, Some(Role::Director));
        assert_ne!(session.tokens.refresh_token, "");
        let access: Claims<IdentityClaims> = authenticator
            .validate_token(TokenKind::Access, &session.tokens.access_token)
            .unwrap();
        assert_eq!(access.payload.props.role, Some(Role::Director));
    }

    #[tokio::test]
    async fn test_refresh_for_deleted_identity() {
        let mut repository = MockTestIdentityRepository::new();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let service = SessionService::new(Arc::new(repository), authenticator());
        let tokens = service
            .generate_tokens(&IdentityClaims::from(&identity(Some(Role::Admin))))
            .unwrap();

        let result = service.refresh(&tokens.refresh_token).await;
        assert_eq!(result.unwrap_err(), SessionError::TokenRefreshFailed);
    }

    #[tokio::test]
    async fn test_refresh_with_expired_token() {
        let mut repository = MockTestIdentityRepository::new();
        repository.expect_find_by_id().times(0);

        let authenticator = authenticator();
        let service = SessionService::new(Arc::new(repository), authenticator.clone());

        let expired = authenticator
            .handler(TokenKind::Refresh)
            .sign_at(
                &IdentityClaims::from(&identity(Some(Role::Admin))),
                Utc::now() - Duration::days(8),
            )
            .unwrap();

        let result = service.refresh(&expired).await;
        assert_eq!(result.unwrap_err(), SessionError::TokenRefreshFailed);
    }

    #[tokio::test]
    async fn test_refresh_rejects_access_token_and_garbage() {
        let mut repository = MockTestIdentityRepository::new();
        repository.expect_find_by_id().times(0);

        let service = SessionService::new(Arc::new(repository), authenticator());
        let tokens = service
            .generate_tokens(&IdentityClaims::from(&identity(Some(Role::Admin))))
            .unwrap();

        for presented in [tokens.access_token.as_str(), "", "not.a.token"] {
            let result = service.refresh(presented).await;
            assert_eq!(result.unwrap_err(), SessionError::TokenRefreshFailed);
        }
    }

    #[tokio::test]
    async fn test_refresh_rejects_subject_mismatch() {
        let mut repository = MockTestIdentityRepository::new();
        repository.expect_find_by_id().times(0);

        let service = SessionService::new(Arc::new(repository), authenticator());
        let mut claims = IdentityClaims::from(&identity(Some(Role::Admin)));
        claims.props.id = 99;
        let tokens = service.generate_tokens(&claims).unwrap();

        let result = service.refresh(&tokens.refresh_token).await;
        assert_eq!(result.unwrap_err(), SessionError::TokenRefreshFailed);
    }
}
