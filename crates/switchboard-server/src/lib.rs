//! Switchboard Server Library
//!
//! Provides the HTTP boundary for the supervisor/worker workflow.

pub mod routes;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Once;
use switchboard_core::{build_invoker, SwitchboardConfig, Workflow};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use state::AppState;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing subscriber (only once)
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        tracing_subscriber::registry()
            .with(tracing_subscriber::EnvFilter::new(
                std::env::var("RUST_LOG").unwrap_or_else(|_| {
                    "switchboard_server=debug,switchboard_core=info,tower_http=debug".into()
                }),
            ))
            .with(tracing_subscriber::fmt::layer())
            .init();
    });
}

/// Build the Axum router with all routes
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::home))
        .route("/api/health", get(routes::health_check))
        // Chat routes
        .route("/chat", post(routes::chat_form))
        .route("/chat/", post(routes::chat_form))
        .route("/api/chat", post(routes::chat_json))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Run the Switchboard server with an already-loaded configuration
///
/// Fails before binding if the model provider cannot be configured.
pub async fn run_server(config: SwitchboardConfig) -> anyhow::Result<()> {
    // Initialize tracing (if not already done)
    init_tracing();

    tracing::info!("Starting Switchboard Server...");

    let invoker = build_invoker(&config)?;
    let workflow = Workflow::with_prompts(invoker, config.prompts.clone());
    let app = build_router(AppState::new(workflow));

    // Bind and serve
    let ip: std::net::IpAddr = config.server.host.parse()?;
    let addr = SocketAddr::new(ip, config.server.port);
    tracing::info!("Listening on http://{}", addr);
    tracing::info!("Chat endpoint: POST http://{}/chat/", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use switchboard_core::llm::OutputSchema;
    use switchboard_core::{ChatMessage, LlmError, ModelInvoker};
    use tower::ServiceExt;

    /// Invoker with one canned routing decision and one canned answer
    struct StubInvoker {
        decision: Result<serde_json::Value, LlmError>,
        answer: String,
    }

    impl ModelInvoker for StubInvoker {
        fn id(&self) -> &str {
            "stub"
        }

        fn model(&self) -> &str {
            "stub-1"
        }

        fn complete(&self, _messages: &[ChatMessage]) -> Result<String, LlmError> {
            Ok(self.answer.clone())
        }

        fn complete_structured(
            &self,
            _messages: &[ChatMessage],
            _schema: &OutputSchema,
        ) -> Result<serde_json::Value, LlmError> {
            self.decision.clone()
        }
    }

    fn app(decision: Result<serde_json::Value, LlmError>, answer: &str) -> Router {
        let invoker = Arc::new(StubInvoker {
            decision,
            answer: answer.to_string(),
        });
        build_router(AppState::new(Workflow::new(invoker)))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn form_request(message: &str) -> Request<Body> {
        let body = serde_urlencoded::to_string([("message", message)]).unwrap();
        Request::builder()
            .method("POST")
            .uri("/chat/")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_home() {
        let response = app(Ok(serde_json::json!({})), "")
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert!(json["message"].as_str().unwrap().contains("/chat/"));
    }

    #[tokio::test]
    async fn test_health_reports_provider() {
        let response = app(Ok(serde_json::json!({})), "")
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["provider"], "stub");
        assert_eq!(json["model"], "stub-1");
    }

    #[tokio::test]
    async fn test_chat_form_coder_route() {
        let decision = serde_json::json!({"next": "coder", "reason": "arithmetic"});
        let response = app(Ok(decision), "17 * 4 = 68")
            .oneshot(form_request("What is 17 * 4?"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "completed");
        assert_eq!(json["original_query"], "What is 17 * 4?");
        assert_eq!(json["workflow_steps"].as_array().unwrap().len(), 2);
        assert_eq!(json["workflow_steps"][0]["step"], "supervisor");
        assert_eq!(json["workflow_steps"][1]["role"], "coder");
        assert_eq!(json["final_answer"], "17 * 4 = 68");
        assert!(json["completed_at"].is_string());
    }

    #[tokio::test]
    async fn test_chat_json_finish_route() {
        let decision = serde_json::json!({"next": "FINISH", "reason": "small talk"});
        let request = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"message": "Hello"}"#))
            .unwrap();

        let response = app(Ok(decision), "unused").oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["workflow_steps"].as_array().unwrap().len(), 1);
        assert_eq!(json["workflow_steps"][0]["role"], "supervisor");
        assert_eq!(json["final_answer"], "No answer generated");
    }

    #[tokio::test]
    async fn test_chat_model_failure_is_bad_gateway() {
        let response = app(Err(LlmError::Timeout), "unused")
            .oneshot(form_request("What is 17 * 4?"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = body_json(response).await;
        assert!(json["error"].as_str().unwrap().contains("timed out"));
        assert!(json.get("workflow_steps").is_none());
    }

    #[tokio::test]
    async fn test_chat_form_preserves_query_text() {
        let decision = serde_json::json!({"next": "researcher", "reason": "lookup"});
        let query = "Is 5% of 40 = 2? (yes/no) & why";
        let response = app(Ok(decision), "Yes.")
            .oneshot(form_request(query))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["original_query"], query);
    }

    #[tokio::test]
    async fn test_chat_rejects_empty_message() {
        let response = app(Ok(serde_json::json!({})), "")
            .oneshot(form_request("   "))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_chat_json_rejects_blank_message() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"message": "\t \n"}"#))
            .unwrap();

        let response = app(Err(LlmError::Timeout), "unused")
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "message must not be empty");
    }
}
