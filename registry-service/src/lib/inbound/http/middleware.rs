use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::middleware;
use axum::middleware::Next;
use axum::response::Response;
use axum::routing::MethodRouter;

use super::handlers::ApiError;
use crate::access::errors::AccessError;
use crate::access::guard::Admission;
use crate::access::guard::AuthenticatedIdentity;
use crate::access::guard::GuardChain;
use crate::access::models::RouteAccess;

/// Guard chain bound to one route's access declaration.
#[derive(Clone)]
struct RouteGuard {
    chain: GuardChain,
    access: Arc<RouteAccess>,
}

/// Attach the guard chain to a route together with its access declaration.
///
/// This is the only way routes get guarded, so authentication always runs
/// before the role check.
pub fn guarded<S>(route: MethodRouter<S>, chain: &GuardChain, access: RouteAccess) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    let guard = RouteGuard {
        chain: chain.clone(),
        access: Arc::new(access),
    };

    route.route_layer(middleware::from_fn_with_state(guard, enforce))
}

async fn enforce(
    State(guard): State<RouteGuard>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let bearer = bearer_token(req.headers());

    match guard.chain.evaluate(&guard.access, bearer)? {
        Admission::Public => {}
        Admission::Authenticated(identity) => {
            req.extensions_mut().insert(identity);
        }
    }

    Ok(next.run(req).await)
}

/// Extract the token from `Authorization: Bearer <token>`.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Identity resolved by the guard chain for the current request.
///
/// Rejects with 401 on routes that were not guarded or are public.
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub AuthenticatedIdentity);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedIdentity>()
            .cloned()
            .map(CurrentIdentity)
            .ok_or_else(|| ApiError::from(AccessError::Unauthorized))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&headers("bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers("abc.def.ghi")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
