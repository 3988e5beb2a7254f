//! Penpost - A small personal blog

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use penpost::{
    api::{self, AppState},
    config::Config,
    db,
    services::{DisabledMailer, Mailer, SmtpMailer},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "penpost=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Penpost...");

    // Load configuration
    let config = Config::load_with_env(Path::new("config.yml"))?;
    config.validate()?;
    tracing::info!("Configuration loaded");

    // Initialize database
    let pool = db::create_pool(&config.database).await?;
    tracing::info!("Database connected: {:?}", pool.driver());

    // Run migrations
    db::migrations::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    let mailer: Arc<dyn Mailer> = if config.mail.username.is_empty() {
        tracing::warn!("mail.username not set; contact form submissions will not be mailed");
        Arc::new(DisabledMailer)
    } else {
        Arc::new(SmtpMailer::new(&config.mail)?)
    };

    let state = AppState::from_config(&config, pool.clone(), mailer)?;
    tracing::info!("Uploads stored in {:?}", state.upload_config.path);

    // Build router
    let app = api::build_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("Database pool closed, bye");

    Ok(())
}

/// Resolves on Ctrl-C; in-flight requests are drained before `serve` returns
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
