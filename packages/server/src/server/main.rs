// Main entry point for the PlankPort API server

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use plankport_core::domains::auth::JwtService;
use plankport_core::kernel::scheduled_tasks::start_scheduler;
use plankport_core::kernel::{
    BasePaymentGateway, LocalObjectStore, LoggingMagicLinkSender, ServerDeps, StripeGateway,
};
use plankport_core::server::{build_app, AppOptions};
use plankport_core::Config;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,plankport_core=debug,sqlx=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("Starting PlankPort API");

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    let payment_gateway: Option<Arc<dyn BasePaymentGateway>> = match &config.stripe_secret_key {
        Some(key) => Some(Arc::new(
            StripeGateway::new(key.clone(), config.stripe_api_base.clone())
                .context("Failed to create payment gateway")?,
        )),
        None => {
            tracing::warn!("STRIPE_SECRET_KEY not set; checkout is disabled");
            None
        }
    };

    let deps = Arc::new(ServerDeps::new(
        pool.clone(),
        Arc::new(JwtService::new(&config.jwt_secret, config.jwt_issuer.clone())),
        Arc::new(LocalObjectStore::new(
            config.storage_root.clone(),
            config.storage_public_url.clone(),
        )),
        payment_gateway,
        Arc::new(LoggingMagicLinkSender),
        config.app_base_url.clone(),
        config.auth_profile_timeout,
    ));

    let _scheduler = start_scheduler(pool)
        .await
        .context("Failed to start scheduled tasks")?;

    let app = build_app(
        deps,
        AppOptions {
            allowed_origins: config.allowed_origins.clone(),
            rate_limit_enabled: config.rate_limit_enabled,
            storage_root: Some(PathBuf::from(&config.storage_root)),
        },
    );

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}
