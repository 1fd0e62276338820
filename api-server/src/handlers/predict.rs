//! Prediction handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::Value;

use crate::models::PredictionResponse;
use crate::{AppResult, AppState};

/// Score one patient
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<PredictionResponse>> {
    let Json(body) = payload?;

    let scorer = state.scorer.clone();
    let model = state.model.clone();

    // ONNX runs hold a lock; keep them off the async workers
    let (_, assessment) =
        tokio::task::spawn_blocking(move || scorer.score_json(&body, model.as_deref()))
            .await??;

    tracing::debug!(
        probability = assessment.probability,
        category = %assessment.category,
        method = ?assessment.method,
        "Prediction served"
    );

    Ok(Json(PredictionResponse::new(assessment, state.card())))
}
