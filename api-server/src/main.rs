//! CardioML API Server - Main Entry Point

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cardioml_api::{create_router, AppState, Config};
use cardioml_core::logic::model::ModelHandle;
use cardioml_core::logic::report::PdfRenderer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cardioml_api=debug,cardioml_core=info,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("CardioML API starting ({})...", config.environment);
    tracing::info!("Model directory: {}", config.model_dir.display());

    // Load model; absence is not fatal
    let model = match ModelHandle::load(&config.model_dir) {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::warn!("Model not loaded: {}", e);
            tracing::warn!("Serving placeholder predictions");
            None
        }
    };

    // Build application state
    let addr = config.addr();
    let state = AppState::new(config, model, PdfRenderer::new());

    // Build router
    let app = create_router(state);

    // Start server
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
