//! Stripe Backend - HTTP facade over the Stripe payment API.
//!
//! This is the main entry point for the stripe-backend service.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stripe_backend_service::{create_router, AppState, ServiceConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env before anything reads the environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,stripe_backend=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Stripe Backend v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration from environment
    let config = ServiceConfig::from_env();

    tracing::info!(
        listen_addr = %config.listen_addr(),
        stripe_configured = %config.has_stripe_key(),
        stripe_api_base = %config.stripe_api_base,
        customer_match = %config.customer_match,
        "Service configuration loaded"
    );

    let listen_addr = config.listen_addr();

    // Build app state
    let state = AppState::new(config)?;

    // Create the router
    let app = create_router(state);

    // Start HTTP server
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    tracing::info!("Stripe backend listening on http://{listen_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}
