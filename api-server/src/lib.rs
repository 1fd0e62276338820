//! CardioML API Server
//!
//! HTTP adapter over `cardioml-core`.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      CARDIOML API                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌──────────────┐  ┌──────────────────────┐ │
//! │  │  Router   │  │  RiskScorer  │  │  Report Renderer     │ │
//! │  │  (Axum)   │  │  (+ latency) │  │  (genpdf)            │ │
//! │  └─────┬─────┘  └──────┬───────┘  └──────────┬───────────┘ │
//! │        └───────────────┼─────────────────────┘             │
//! │                        ▼                                    │
//! │              ┌───────────────────┐                          │
//! │              │ ModelHandle (Arc) │                          │
//! │              └───────────────────┘                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;

use std::sync::Arc;
use std::time::Instant;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use cardioml_core::logic::model::{ModelCard, ModelHandle};
use cardioml_core::logic::report::PdfRenderer;
use cardioml_core::RiskScorer;

pub use config::Config;
pub use error::{AppError, AppResult};

/// Card reported when no model is loaded
static DEFAULT_CARD: std::sync::OnceLock<ModelCard> = std::sync::OnceLock::new();

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub model: Option<Arc<ModelHandle>>,
    pub scorer: Arc<RiskScorer>,
    pub renderer: Arc<PdfRenderer>,
    pub config: Config,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: Config, model: Option<ModelHandle>, renderer: PdfRenderer) -> Self {
        Self {
            model: model.map(Arc::new),
            scorer: Arc::new(RiskScorer::default()),
            renderer: Arc::new(renderer),
            config,
            started_at: Instant::now(),
        }
    }

    /// Loaded model's card, or the default one
    pub fn card(&self) -> &ModelCard {
        match &self.model {
            Some(model) => model.card(),
            None => DEFAULT_CARD.get_or_init(ModelCard::default),
        }
    }
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health::home))
        .route("/api/health", get(handlers::health::check))
        .route("/api/predict", post(handlers::predict::predict))
        .route("/api/assessment", get(handlers::assessment::info))
        .route("/api/report", post(handlers::report::generate))
        .route("/api/report/pdf", post(handlers::report::pdf))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
