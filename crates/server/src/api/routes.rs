use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::{handlers, middleware::metrics_middleware, tickets};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        // Health and engine
        .route("/health", get(handlers::health))
        .route("/engine", get(handlers::engine_status))
        // Catalog
        .route("/analyses", get(handlers::list_analyses))
        // Tickets
        .route("/ticket/new", post(tickets::create_ticket))
        .route("/ticket/video", post(tickets::upload_video))
        .route("/ticket/analyze", post(tickets::request_analysis))
        .route("/ticket/status", get(tickets::get_status))
        .route("/ticket/cancel", post(tickets::cancel_analysis))
        .route("/ticket/delete", post(tickets::delete_ticket));

    Router::new()
        .nest("/api", api_routes)
        .route("/metrics", get(handlers::metrics))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
