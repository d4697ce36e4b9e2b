//! Health check and resource registration handlers

use crate::{
    error::Result,
    extractors::MonitorJson,
    models::{RegisterResponse, Resource},
    AppState,
};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::{info, warn};

pub async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /health - Checking registered resources");

    let response = state.monitor.check().await;
    let status_code =
        StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if !status_code.is_success() {
        warn!("Health check returned {}: {}", response.status, response.message);
    }

    (status_code, Json(response))
}

pub async fn handle_register(
    State(state): State<AppState>,
    MonitorJson(resource): MonitorJson<Resource>,
) -> Result<impl IntoResponse> {
    info!("POST /resources - type: {}, name: {}", resource.kind, resource.name);

    let accepted = state.monitor.register(&resource)?;

    Ok((StatusCode::CREATED, Json(RegisterResponse { accepted })))
}

pub async fn handle_list_resources(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /resources");

    Json(state.monitor.resources())
}

pub async fn handle_liveness() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "alive" })))
}
