//! Report handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::IntoResponse,
    Json,
};

use cardioml_core::logic::report::ReportBundle;

use crate::models::{ReportRequest, ReportResponse};
use crate::{AppResult, AppState};

fn bundle(state: &AppState, request: &ReportRequest) -> ReportBundle {
    ReportBundle::new(request.patient(), request.risk_score(), &state.card().name)
}

/// Report summary as JSON
pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> AppResult<Json<ReportResponse>> {
    let Json(request) = payload?;
    let bundle = bundle(&state, &request);

    Ok(Json(ReportResponse::from(&bundle)))
}

/// Rendered PDF report
pub async fn pdf(
    State(state): State<AppState>,
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(request) = payload?;
    let bundle = bundle(&state, &request);
    let file_name = bundle.file_name("pdf");

    let renderer = state.renderer.clone();
    let bytes = tokio::task::spawn_blocking(move || renderer.render(&bundle)).await??;

    tracing::info!("Rendered PDF report {} ({} bytes)", file_name, bytes.len());

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        bytes,
    ))
}
