//! API route handlers

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::Deserialize;
use switchboard_core::SwitchboardError;

use crate::state::AppState;

// ========== Info Routes ==========

/// Static welcome message
pub async fn home() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Welcome to the Switchboard API! Use /chat/ endpoint to interact."
    }))
}

/// Health check with the active provider
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let invoker = state.workflow.invoker();
    Json(serde_json::json!({
        "status": "ok",
        "version": switchboard_core::version(),
        "provider": invoker.id(),
        "model": invoker.model()
    }))
}

// ========== Chat Routes ==========

/// Chat request body (form field or JSON)
#[derive(Deserialize)]
pub struct ChatRequest {
    message: String,
}

/// Run the workflow for a form-encoded `message`
pub async fn chat_form(State(state): State<AppState>, Form(req): Form<ChatRequest>) -> Response {
    run_chat(state, req.message).await
}

/// Run the workflow for a JSON `{"message": ...}` body
pub async fn chat_json(State(state): State<AppState>, Json(req): Json<ChatRequest>) -> Response {
    run_chat(state, req.message).await
}

async fn run_chat(state: AppState, message: String) -> Response {
    if message.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "message must not be empty" })),
        )
            .into_response();
    }

    // Model calls block; keep them off the async workers
    let workflow = state.workflow.clone();
    let outcome = tokio::task::spawn_blocking(move || workflow.run(&message)).await;

    match outcome {
        Ok(Ok(result)) => (StatusCode::OK, Json(result)).into_response(),
        Ok(Err(e)) => {
            tracing::error!("Workflow failed: {}", e);
            (
                error_status(&e),
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Workflow task panicked: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "workflow task failed" })),
            )
                .into_response()
        }
    }
}

/// Map a failed run to an HTTP status
fn error_status(err: &SwitchboardError) -> StatusCode {
    match err {
        SwitchboardError::ModelInvocation(_) => StatusCode::BAD_GATEWAY,
        SwitchboardError::InvalidTransition(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
