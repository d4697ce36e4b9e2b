//! Route table

use super::health::{handle_health, handle_list_resources, handle_liveness, handle_register};
use crate::AppState;
use axum::{
    extract::State,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tracing::info;

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handle_root))
        .route("/health", get(handle_health))
        .route("/live", get(handle_liveness))
        .route("/resources", get(handle_list_resources).post(handle_register))
}

async fn handle_root(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /");

    Json(serde_json::json!({
        "name": state.app_name,
        "version": state.version,
        "timeout_ms": state.monitor.timeout().as_millis() as u64,
        "endpoints": {
            "health": "GET /health",
            "live": "GET /live",
            "resources": {
                "list": "GET /resources",
                "register": "POST /resources"
            }
        }
    }))
}
