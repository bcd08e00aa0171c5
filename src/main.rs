//! Shadowing Gateway - locale-aware edge service for Language Shadowing
//!
//! This is the main entry point for the shadowing-gateway application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use shadowing_gateway::{
    config::Config,
    state::AppState,
    api::create_router,
    tasks::session_sweeper_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("shadowing_gateway={},tower_http=info", config.log_level()))
        .init();

    info!("Starting shadowing-gateway v{}", env!("CARGO_PKG_VERSION"));

    // Locale configuration errors are fatal
    let routing = config.locale_routing()?;
    info!("Locales: {:?} (default {}, prefix mode {})",
          routing.locales(), routing.default_locale(), routing.prefix_mode());

    let state = Arc::new(
        AppState::new(routing, config.base_url.clone(), config.session_ttl())
            .with_max_sessions(config.max_sessions()),
    );

    // Reclaim abandoned playback sessions in the background
    let sweeper_state = Arc::clone(&state);
    let sweep_interval = config.sweep_interval();
    tokio::spawn(async move {
        session_sweeper_task(sweeper_state, sweep_interval).await;
    });

    let app = create_router(state);

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET    /, /*path                       - Localized pages");
    info!("  POST   /api/sessions/:session_id/delay - Start a playback delay");
    info!("  GET    /api/sessions/:session_id/delay - Poll a playback delay");
    info!("  DELETE /api/sessions/:session_id/delay - Clear a playback delay");
    info!("  GET    /sitemap.xml                    - Localized sitemap");
    info!("  GET    /status                         - Service status");
    info!("  GET    /health                         - Health check");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
