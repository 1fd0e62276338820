//! Model metadata handler

use axum::{extract::State, Json};

use cardioml_core::logic::features::layout::FEATURE_DESCRIPTIONS;
use cardioml_core::logic::features::{LayoutInfo, FEATURE_COUNT};
use cardioml_core::logic::scoring::feature_importance_list;

use crate::models::{AssessmentResponse, ModelMetrics, Uptime};
use crate::AppState;

/// Static model metadata plus live uptime and latency figures
pub async fn info(State(state): State<AppState>) -> Json<AssessmentResponse> {
    let card = state.card();
    let model = state.model.as_deref();

    Json(AssessmentResponse {
        model_name: card.name.clone(),
        model_version: card.version.clone(),
        accuracy: card.accuracy,
        auc_roc: card.auc_roc,
        f1_score: card.f1_score,
        training_dataset: card.training_dataset.clone(),
        features: FEATURE_DESCRIPTIONS.iter().map(|s| s.to_string()).collect(),
        model_metrics: ModelMetrics {
            uptime: Uptime::from_seconds(state.started_at.elapsed().as_secs()),
            inference_speed: state.scorer.latency_status(),
            trained_at: card.trained_at.clone(),
            library: card.library.clone(),
            feature_count: FEATURE_COUNT,
            feature_layout: LayoutInfo::current(),
            model_loaded: model.is_some(),
            checksum: model.and_then(|m| m.checksum()).map(str::to_string),
        },
        hyperparameters: card.hyperparameters_or_default(),
        feature_importance: feature_importance_list(model),
    })
}
