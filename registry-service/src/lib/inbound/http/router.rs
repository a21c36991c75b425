use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::cookies::RefreshCookie;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::me::me;
use super::handlers::refresh_tokens::refresh_tokens;
use super::handlers::register::register;
use super::middleware::guarded;
use crate::access::guard::GuardChain;
use crate::access::models::RouteAccess;
use crate::domain::identity::models::Role;
use crate::domain::identity::ports::IdentityServicePort;
use crate::domain::session::ports::SessionServicePort;

#[derive(Clone)]
pub struct AppState {
    pub session_service: Arc<dyn SessionServicePort>,
    pub identity_service: Arc<dyn IdentityServicePort>,
    pub refresh_cookie: Arc<RefreshCookie>,
}

pub fn create_router(
    session_service: Arc<dyn SessionServicePort>,
    identity_service: Arc<dyn IdentityServicePort>,
    authenticator: Arc<Authenticator>,
    refresh_cookie: Arc<RefreshCookie>,
) -> Router {
    let state = AppState {
        session_service,
        identity_service,
        refresh_cookie,
    };
    let chain = GuardChain::new(authenticator);

    let auth_routes = Router::new()
        .route(
            "/api/auth/login",
            guarded(post(login), &chain, RouteAccess::public()),
        )
        .route(
            "/api/auth/refresh-tokens",
            guarded(post(refresh_tokens), &chain, RouteAccess::public()),
        )
        .route(
            "/api/auth/logout",
            guarded(post(logout), &chain, RouteAccess::public()),
        )
        .route(
            "/api/auth/me",
            guarded(get(me), &chain, RouteAccess::any_role()),
        )
        .route(
            "/api/auth/register",
            guarded(post(register), &chain, RouteAccess::roles([Role::Admin])),
        );

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(auth_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
