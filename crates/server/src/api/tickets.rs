//! Ticket API handlers.
//!
//! Tickets are addressed by the `ticket-id` query parameter and analysis kinds
//! by `type`, matching the web client's URL scheme.

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, warn};

use orator_core::{AnalysisKind, StatusView, TicketError, TicketId, TicketStatus};

use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters naming a ticket.
#[derive(Debug, Deserialize)]
pub struct TicketParams {
    #[serde(rename = "ticket-id", default)]
    pub ticket_id: String,
}

/// Query parameters naming a ticket and, optionally, an analysis kind.
#[derive(Debug, Deserialize)]
pub struct AnalysisParams {
    #[serde(rename = "ticket-id", default)]
    pub ticket_id: String,
    /// Absent means "all kinds".
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Query parameters for the status view.
#[derive(Debug, Deserialize)]
pub struct StatusParams {
    #[serde(rename = "ticket-id", default)]
    pub ticket_id: String,
    /// Payloads are included only for the literal `true`.
    #[serde(rename = "send-results")]
    pub send_results: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NewTicketResponse {
    #[serde(rename = "ticket-id")]
    pub ticket_id: TicketId,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub status: &'static str,
}

impl SuccessResponse {
    fn ok() -> Self {
        Self { status: "success" }
    }
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub status: &'static str,
    pub bytes: usize,
}

/// Response for an analysis request.
///
/// A request for one kind reports the dependencies it pulled in; a request
/// for everything reports every kind it queued.
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub status: &'static str,
    #[serde(rename = "request-deps", skip_serializing_if = "Option::is_none")]
    pub request_deps: Option<Vec<AnalysisKind>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queued: Option<Vec<AnalysisKind>>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    /// Machine-readable code, e.g. `bad-ticket`.
    pub status: &'static str,
    pub error: String,
}

/// Everything a ticket handler can fail with.
#[derive(Debug)]
pub enum ApiError {
    Ticket(TicketError),
    PayloadTooLarge { limit: usize },
    Upload(String),
}

impl From<TicketError> for ApiError {
    fn from(err: TicketError) -> Self {
        ApiError::Ticket(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, error) = match self {
            ApiError::Ticket(err) => {
                let (status, code) = match &err {
                    TicketError::UnknownTicket(_) => (StatusCode::NOT_FOUND, "bad-ticket"),
                    TicketError::UnknownAnalysisKind(_) => (StatusCode::BAD_REQUEST, "bad-type"),
                    TicketError::AlreadyRequested { .. } => {
                        (StatusCode::CONFLICT, "already-analyzing")
                    }
                    TicketError::NotRequested { .. } => (StatusCode::CONFLICT, "not-analyzed"),
                };
                (status, code, err.to_string())
            }
            ApiError::PayloadTooLarge { limit } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "too-large",
                format!("video exceeds upload limit of {} bytes", limit),
            ),
            ApiError::Upload(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal-error", msg),
        };

        (
            status,
            Json(ApiErrorResponse {
                status: code,
                error,
            }),
        )
            .into_response()
    }
}

/// Check the ticket first, then the kind, so a bad ticket always wins.
fn resolve_kind(
    state: &AppState,
    ticket_id: &str,
    kind: Option<&str>,
) -> Result<Option<AnalysisKind>, TicketError> {
    state.store().ensure_exists(ticket_id)?;
    kind.map(|name| {
        state
            .store()
            .catalog()
            .lookup(name)
            .map_err(|_| TicketError::UnknownAnalysisKind(name.to_string()))
    })
    .transpose()
}

// ============================================================================
// Handlers
// ============================================================================

/// Create a new ticket
pub async fn create_ticket(State(state): State<Arc<AppState>>) -> Json<NewTicketResponse> {
    Json(NewTicketResponse {
        ticket_id: state.store().create(),
    })
}

/// Receive the ticket's video.
///
/// The body is drained as a stream and only counted; storing the video is
/// someone else's job. The ticket is marked ready once the stream ends.
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TicketParams>,
    headers: HeaderMap,
    body: Body,
) -> Result<Json<UploadResponse>, ApiError> {
    state.store().ensure_exists(&params.ticket_id)?;
    let limit = state.config().server.max_upload_bytes;

    let declared = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());
    if declared.is_some_and(|len| len > limit) {
        warn!(ticket_id = %params.ticket_id, "Rejected oversized upload");
        return Err(ApiError::PayloadTooLarge { limit });
    }

    let mut stream = body.into_data_stream();
    let mut bytes = 0usize;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| {
            error!(ticket_id = %params.ticket_id, "Video upload failed: {}", e);
            ApiError::Upload(e.to_string())
        })?;
        bytes += chunk.len();
        if bytes > limit {
            warn!(ticket_id = %params.ticket_id, "Rejected oversized upload");
            return Err(ApiError::PayloadTooLarge { limit });
        }
    }

    state.store().mark_video_ready(&params.ticket_id)?;
    Ok(Json(UploadResponse {
        status: "success",
        bytes,
    }))
}

/// Request one analysis kind (with its dependencies) or all of them.
pub async fn request_analysis(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AnalysisParams>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let kind = resolve_kind(&state, &params.ticket_id, params.kind.as_deref())?;
    let outcome = state.store().request_analysis(&params.ticket_id, kind)?;

    let response = match kind {
        Some(_) => AnalyzeResponse {
            status: "success",
            request_deps: Some(outcome.dependencies()),
            queued: None,
        },
        None => AnalyzeResponse {
            status: "success",
            request_deps: None,
            queued: Some(outcome.added),
        },
    };
    Ok(Json(response))
}

/// Current status of every requested analysis.
pub async fn get_status(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StatusParams>,
) -> Result<Json<TicketStatus>, ApiError> {
    let view = StatusView::from_full(params.send_results.as_deref() == Some("true"));
    let status = state.store().status(&params.ticket_id, view)?;
    Ok(Json(status))
}

/// Cancel one analysis kind, or everything when `type` is absent.
pub async fn cancel_analysis(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AnalysisParams>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let kind = resolve_kind(&state, &params.ticket_id, params.kind.as_deref())?;
    state.store().cancel(&params.ticket_id, kind)?;
    Ok(Json(SuccessResponse::ok()))
}

pub async fn delete_ticket(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TicketParams>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.store().delete(&params.ticket_id)?;
    Ok(Json(SuccessResponse::ok()))
}
