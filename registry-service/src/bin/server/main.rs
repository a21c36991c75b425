use std::sync::Arc;
use std::time::Duration;

use registry_service::config::Config;
use registry_service::domain::identity::service::IdentityService;
use registry_service::domain::session::service::SessionService;
use registry_service::inbound::http::cookies::RefreshCookie;
use registry_service::inbound::http::router::create_router;
use registry_service::outbound::repositories::identity::PostgresIdentityRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "registry_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "registry-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        environment = %config.environment,
        access_ttl = %config.tokens.access_ttl,
        refresh_ttl = %config.tokens.refresh_ttl,
        cookie = %config.cookie.name,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_seconds))
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let authenticator = Arc::new(config.tokens.authenticator()?);
    let identity_repository = Arc::new(PostgresIdentityRepository::new(pg_pool));

    let session_service = Arc::new(SessionService::new(
        Arc::clone(&identity_repository),
        Arc::clone(&authenticator),
    ));
    let identity_service = Arc::new(IdentityService::new(identity_repository));
    let refresh_cookie = Arc::new(RefreshCookie::new(
        config.cookie.name.clone(),
        config.is_production(),
        Arc::clone(&authenticator),
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(
        session_service,
        identity_service,
        authenticator,
        refresh_cookie,
    );

    axum::serve(http_listener, http_application).await?;

    tracing::info!("Server exited successfully");

    Ok(())
}
