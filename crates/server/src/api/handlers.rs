use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::error;

use orator_core::{CatalogEntry, EngineStatus};

use crate::metrics::{collect_dynamic_metrics, encode_metrics};
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Every analysis kind with its direct dependencies.
pub async fn list_analyses(State(state): State<Arc<AppState>>) -> Json<Vec<CatalogEntry>> {
    Json(state.store().catalog().entries())
}

pub async fn engine_status(State(state): State<Arc<AppState>>) -> Json<EngineStatus> {
    Json(state.engine().status())
}

/// Prometheus scrape endpoint.
pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    collect_dynamic_metrics(&state);
    match encode_metrics() {
        Ok(body) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
