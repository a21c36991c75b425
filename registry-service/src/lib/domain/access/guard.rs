use std::sync::Arc;

use auth::Authenticator;
use auth::TokenKind;

use crate::domain::access::errors::AccessError;
use crate::domain::access::models::RequiredRole;
use crate::domain::access::models::RouteAccess;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::Role;
use crate::domain::session::models::IdentityClaims;

/// Identity resolved from a verified access token.
///
/// Only the guard chain can build one, so holding it proves authentication
/// already ran for the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    claims: IdentityClaims,
}

impl AuthenticatedIdentity {
    pub fn claims(&self) -> &IdentityClaims {
        &self.claims
    }

    pub fn id(&self) -> IdentityId {
        IdentityId(self.claims.sub)
    }

    pub fn role(&self) -> Option<Role> {
        self.claims.props.role
    }
}

/// Outcome of a successful guard evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Public route, no identity was resolved.
    Public,
    Authenticated(AuthenticatedIdentity),
}

/// Authentication guard followed by role guard, evaluated as one pipeline.
#[derive(Clone)]
pub struct GuardChain {
    authenticator: Arc<Authenticator>,
}

impl GuardChain {
    pub fn new(authenticator: Arc<Authenticator>) -> Self {
        Self { authenticator }
    }

    /// Decide whether a request carrying `bearer` may reach a route declared
    /// with `access`.
    ///
    /// # Errors
    /// * `Unauthorized` - Token missing, invalid or expired, or the identity has
    ///   no role on a role-restricted route
    /// * `Forbidden` - The identity's role is not accepted by the route
    pub fn evaluate(
        &self,
        access: &RouteAccess,
        bearer: Option<&str>,
    ) -> Result<Admission, AccessError> {
        if access.is_public() {
            return Ok(Admission::Public);
        }

        let identity = self.authenticate(bearer)?;
        authorize(access, &identity)?;

        Ok(Admission::Authenticated(identity))
    }

    fn authenticate(&self, bearer: Option<&str>) -> Result<AuthenticatedIdentity, AccessError> {
        let token = bearer.ok_or_else(|| {
            tracing::debug!("Missing bearer token");
            AccessError::Unauthorized
        })?;

        let claims: IdentityClaims = self
            .authenticator
            .validate_token(TokenKind::Access, token)
            .map_err(|e| {
                tracing::warn!(error = %e, "Access token rejected");
                AccessError::Unauthorized
            })?
            .into_payload();

        if !claims.is_consistent() {
            tracing::warn!(sub = claims.sub, "Access token subject mismatch");
            return Err(AccessError::Unauthorized);
        }

        Ok(AuthenticatedIdentity { claims })
    }
}

fn authorize(access: &RouteAccess, identity: &AuthenticatedIdentity) -> Result<(), AccessError> {
    let required = access.required_roles();

    if required.is_empty() || required.contains(&RequiredRole::All) {
        return Ok(());
    }

    match identity.role() {
        Some(role) if required.contains(&RequiredRole::Role(role)) => Ok(()),
        Some(role) => {
            tracing::info!(identity_id = %identity.id(), role = %role, "Role not accepted by route");
            Err(AccessError::Forbidden)
        }
        None => {
            tracing::info!(identity_id = %identity.id(), "Identity has no role");
            Err(AccessError::Unauthorized)
        }
    }
}
