//! Relay web server binary.

use std::sync::Arc;

use database::Database;
use mailer::{build_mailer, MailerConfig};
use openrouter::OpenRouterClient;
use receptionist::{ClerkClient, ClerkConfig};
use relay_web::{AppState, Config};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting Relay web server");

    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    let model = Arc::new(OpenRouterClient::from_env()?);

    let mailer_config = MailerConfig::from_env()?;
    let mailer = build_mailer(&mailer_config)?;
    info!(mailer = mailer.name(), from = %mailer_config.from, "Mailer ready");

    let mut state = AppState::new(
        db,
        model,
        mailer,
        mailer_config.from.clone(),
        config.contact_recipient.clone(),
    )
    .with_identity_header(config.identity_header.clone());

    match ClerkConfig::from_env()? {
        Some(clerk) => {
            state = state.with_identity_provider(Arc::new(ClerkClient::new(clerk)?));
            info!("User sync enabled");
        }
        None => warn!("CLERK_SECRET_KEY not set, user sync disabled"),
    }

    match &config.integration_token {
        Some(token) => state = state.with_integration_token(token.clone()),
        None => warn!("RELAY_INTEGRATION_TOKEN not set, integration API disabled"),
    }

    let app = relay_web::app(state);

    info!(addr = %config.addr, "Relay web server listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
