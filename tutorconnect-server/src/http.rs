//! TutorConnect HTTP API
//!
//! Axum server on loopback that exposes the dashboard and chat screens as JSON.
//! Runs alongside the Unix socket IPC server on port 8787 (configurable).
//!
//! Each endpoint is a thin axum handler that builds an IPC request and hands it
//! to [`dispatch`], which runs the shared router and maps rejections onto
//! status codes. `dispatch` is directly testable without axum machinery.
//!
//! Endpoints:
//! - GET    /health                   — liveness + directory counts
//! - GET    /version                  — server version info
//! - GET    /landing                  — landing screen content
//! - GET    /tutors?query=&subject=   — filtered directory
//! - GET    /subjects                 — all subjects + quick filters
//! - POST   /sessions                 — connect to an online tutor
//! - GET    /sessions/current         — active session + billing readout
//! - DELETE /sessions/current         — end the active session
//! - POST   /sessions/current/messages — send a student message
//! - POST   /sessions/current/video   — start video call (placeholder)
//! - GET    /wallet                   — balance
//! - POST   /wallet/top-up            — add the configured top-up amount
//! - GET    /wallet/history           — top-ups and ended sessions

use anyhow::Result;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tutorconnect_core::ipc::{TutorConnectRequest, TutorConnectResponse, PROTOCOL_VERSION};
use tutorconnect_core::models::ConnectKind;

use crate::state::AppState;

/// Build the Axum router with all endpoints
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/version", get(version_handler))
        .route("/landing", get(landing_handler))
        .route("/tutors", get(tutors_handler))
        .route("/subjects", get(subjects_handler))
        .route("/sessions", post(connect_handler))
        .route(
            "/sessions/current",
            get(session_handler).delete(end_session_handler),
        )
        .route("/sessions/current/messages", post(send_message_handler))
        .route("/sessions/current/video", post(video_handler))
        .route("/wallet", get(wallet_handler))
        .route("/wallet/top-up", post(top_up_handler))
        .route("/wallet/history", get(history_handler))
        .with_state(state)
}

/// Start the HTTP server on the configured address.
/// Gracefully shuts down when the broadcast shutdown signal fires.
pub async fn start_http_server(state: AppState, mut shutdown: broadcast::Receiver<()>) -> Result<()> {
    let addr = format!("{}:{}", state.config.http.host, state.config.http.port);

    let app = build_router(state);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("TutorConnect HTTP API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            tracing::info!("HTTP server shutting down...");
        })
        .await?;

    Ok(())
}

// ============================================================================
// Request DTOs
// ============================================================================

#[derive(Debug, Deserialize, Default)]
pub struct TutorQuery {
    pub query: Option<String>,
    pub subject: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ConnectRequest {
    pub tutor_id: Option<String>,
    #[serde(default)]
    pub kind: ConnectKind,
}

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub content: Option<String>,
}

/// Standard HTTP error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            error: msg.into(),
            status: "error".to_string(),
            code: None,
        }
    }
}

// ============================================================================
// Inner (directly testable) functions
// ============================================================================

/// Inner version — returns version info (pure, no IO).
pub fn version_inner() -> serde_json::Value {
    serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "protocol": PROTOCOL_VERSION,
    })
}

/// Run a request through the shared router and translate the outcome.
pub async fn dispatch(state: &AppState, request: TutorConnectRequest) -> (StatusCode, serde_json::Value) {
    let response = crate::router::handle_request(request, state).await;
    match response_to_http(response) {
        Ok(data) => (StatusCode::OK, data),
        Err((status, body)) => (status, to_json(&body)),
    }
}

pub async fn connect_inner(state: &AppState, req: ConnectRequest) -> (StatusCode, serde_json::Value) {
    let tutor_id = match req.tutor_id {
        Some(id) if !id.trim().is_empty() => id,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                to_json(&ErrorResponse::new("tutor_id field is required")),
            )
        }
    };
    dispatch(
        state,
        TutorConnectRequest::Connect {
            tutor_id,
            kind: req.kind,
        },
    )
    .await
}

pub async fn send_message_inner(state: &AppState, req: MessageRequest) -> (StatusCode, serde_json::Value) {
    dispatch(
        state,
        TutorConnectRequest::SendMessage {
            content: req.content.unwrap_or_default(),
        },
    )
    .await
}

// ============================================================================
// Axum handler wrappers (thin — delegate to inner functions)
// ============================================================================

pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let (status, body) = dispatch(&state, TutorConnectRequest::Health).await;
    (status, Json(body))
}

pub async fn version_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(version_inner()))
}

pub async fn landing_handler(State(state): State<AppState>) -> impl IntoResponse {
    let (status, body) = dispatch(&state, TutorConnectRequest::Landing).await;
    (status, Json(body))
}

pub async fn tutors_handler(
    State(state): State<AppState>,
    Query(params): Query<TutorQuery>,
) -> impl IntoResponse {
    let request = TutorConnectRequest::ListTutors {
        query: params.query,
        subject: params.subject,
    };
    let (status, body) = dispatch(&state, request).await;
    (status, Json(body))
}

pub async fn subjects_handler(State(state): State<AppState>) -> impl IntoResponse {
    let (status, body) = dispatch(&state, TutorConnectRequest::Subjects).await;
    (status, Json(body))
}

pub async fn connect_handler(
    State(state): State<AppState>,
    Json(req): Json<ConnectRequest>,
) -> impl IntoResponse {
    let (status, body) = connect_inner(&state, req).await;
    (status, Json(body))
}

pub async fn session_handler(State(state): State<AppState>) -> impl IntoResponse {
    let (status, body) = dispatch(&state, TutorConnectRequest::Session).await;
    (status, Json(body))
}

pub async fn end_session_handler(State(state): State<AppState>) -> impl IntoResponse {
    let (status, body) = dispatch(&state, TutorConnectRequest::EndSession).await;
    (status, Json(body))
}

pub async fn send_message_handler(
    State(state): State<AppState>,
    Json(req): Json<MessageRequest>,
) -> impl IntoResponse {
    let (status, body) = send_message_inner(&state, req).await;
    (status, Json(body))
}

pub async fn video_handler(State(state): State<AppState>) -> impl IntoResponse {
    let (status, body) = dispatch(&state, TutorConnectRequest::StartVideoCall).await;
    (status, Json(body))
}

pub async fn wallet_handler(State(state): State<AppState>) -> impl IntoResponse {
    let (status, body) = dispatch(&state, TutorConnectRequest::Wallet).await;
    (status, Json(body))
}

pub async fn top_up_handler(State(state): State<AppState>) -> impl IntoResponse {
    let (status, body) = dispatch(&state, TutorConnectRequest::TopUp).await;
    (status, Json(body))
}

pub async fn history_handler(State(state): State<AppState>) -> impl IntoResponse {
    let (status, body) = dispatch(&state, TutorConnectRequest::History).await;
    (status, Json(body))
}

// ============================================================================
// Helpers
// ============================================================================

/// Status code for a marketplace rejection code.
pub fn status_for_code(code: Option<&str>) -> StatusCode {
    match code {
        Some("tutor_not_found") | Some("no_active_session") => StatusCode::NOT_FOUND,
        Some("tutor_unavailable") | Some("session_already_active") => StatusCode::CONFLICT,
        Some("empty_message") => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Convert an IPC response into an HTTP body value, or a status plus error body.
pub fn response_to_http(
    response: TutorConnectResponse,
) -> std::result::Result<serde_json::Value, (StatusCode, ErrorResponse)> {
    if response.is_ok() {
        return Ok(response.data.unwrap_or(serde_json::json!({})));
    }
    let status = status_for_code(response.code.as_deref());
    Err((
        status,
        ErrorResponse {
            code: response.code,
            ..ErrorResponse::new(response.error.unwrap_or_else(|| "unknown error".to_string()))
        },
    ))
}

fn to_json(body: &ErrorResponse) -> serde_json::Value {
    serde_json::to_value(body).unwrap_or_else(|_| serde_json::json!({"status": "error"}))
}

// ============================================================================
// Unit Tests — call inner functions directly
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tutorconnect_core::{MarketplaceError, TutorConnectConfig};

    fn state() -> AppState {
        AppState::new(TutorConnectConfig::default()).0
    }

    #[test]
    fn test_version_inner_pure() {
        let v = version_inner();
        assert!(v["version"].is_string(), "version must be string");
        assert_eq!(v["protocol"], "tutorconnect/1");
    }

    #[test]
    fn test_response_to_http_ok() {
        let resp = TutorConnectResponse::ok(serde_json::json!({"count": 0}));
        assert_eq!(response_to_http(resp).unwrap()["count"], 0);
    }

    #[test]
    fn test_response_to_http_ok_no_data() {
        let mut resp = TutorConnectResponse::ok(serde_json::json!({}));
        resp.data = None;
        assert!(response_to_http(resp).unwrap().is_object());
    }

    #[test]
    fn test_rejections_map_to_statuses() {
        let cases = [
            (MarketplaceError::TutorNotFound("9".to_string()), StatusCode::NOT_FOUND),
            (MarketplaceError::NoActiveSession, StatusCode::NOT_FOUND),
            (MarketplaceError::EmptyMessage, StatusCode::BAD_REQUEST),
            (MarketplaceError::SessionAlreadyActive(uuid::Uuid::nil()), StatusCode::CONFLICT),
        ];
        for (err, expected) in cases {
            let (status, body) = response_to_http(TutorConnectResponse::rejected(&err)).unwrap_err();
            assert_eq!(status, expected);
            assert_eq!(body.code.as_deref(), Some(err.code()));
        }
    }

    #[test]
    fn test_untyped_error_is_500() {
        let (status, body) = response_to_http(TutorConnectResponse::err("boom")).unwrap_err();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "boom");
    }

    #[tokio::test]
    async fn test_connect_inner_requires_tutor_id() {
        let req = ConnectRequest {
            tutor_id: Some("  ".to_string()),
            kind: ConnectKind::Chat,
        };
        let (status, body) = connect_inner(&state(), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "tutor_id field is required");
    }

    #[tokio::test]
    async fn test_connect_offline_is_conflict() {
        let req = ConnectRequest {
            tutor_id: Some("4".to_string()),
            kind: ConnectKind::Chat,
        };
        let (status, body) = connect_inner(&state(), req).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "tutor_unavailable");
    }

    #[tokio::test]
    async fn test_send_without_content_rejected() {
        let state = state();
        connect_inner(
            &state,
            ConnectRequest {
                tutor_id: Some("1".to_string()),
                kind: ConnectKind::Chat,
            },
        )
        .await;
        let (status, _) = send_message_inner(&state, MessageRequest { content: None }).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
