//! WebSocket endpoint for repeated question/answer exchanges.
//!
//! Protocol:
//! → Client sends JSON text frames: {"document_id": 1, "question": "..."}
//!   `document_id` is optional per message; when omitted, the document context
//!   established earlier on the same connection is reused.
//! ← Server replies with a plain text frame: the answer, or one of the fixed
//!   diagnostic strings below.
//!
//! The context blob is owned by the connection and discarded on close. A
//! rate-limited or unknown-document message leaves the context untouched.

use axum::{
    extract::{
        ConnectInfo, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use std::net::SocketAddr;
use std::sync::Arc;

use docask_core::error::DocaskError;

use crate::server::AppState;

pub const DOCUMENT_NOT_FOUND: &str = "Document not found.";
pub const NO_CONTEXT: &str = "No document content available for context.";
pub const RATE_LIMIT_NOTICE: &str = "Rate limit exceeded. Please wait a moment.";
pub const INVALID_REQUEST: &str = "Invalid request.";

/// WebSocket upgrade handler.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, addr))
}

/// Handle one WebSocket connection to completion.
async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>, addr: SocketAddr) {
    tracing::info!("WebSocket client connected: {addr}");

    let client_key = addr.ip().to_string();
    // Connection-owned document context; survives across messages.
    let mut document_content: Option<String> = None;

    while let Some(msg) = socket.recv().await {
        match msg {
            Ok(Message::Text(text)) => {
                let reply =
                    handle_question_frame(&state, &client_key, &mut document_content, &text)
                        .await;
                if socket.send(Message::Text(reply.into())).await.is_err() {
                    break;
                }
            }
            Ok(Message::Ping(data)) => {
                let _ = socket.send(Message::Pong(data)).await;
            }
            Ok(Message::Close(_)) => {
                tracing::info!("WebSocket client disconnected (close frame)");
                break;
            }
            Err(e) => {
                tracing::error!("WebSocket error: {e}");
                break;
            }
            _ => {}
        }
    }

    tracing::info!("WebSocket connection closed: {addr}");
}

/// Process one question frame and produce the reply text.
pub(crate) async fn handle_question_frame(
    state: &AppState,
    client_key: &str,
    document_content: &mut Option<String>,
    text: &str,
) -> String {
    let json: serde_json::Value = match serde_json::from_str(text) {
        Ok(j) => j,
        Err(e) => {
            tracing::debug!("Malformed WS frame: {e}");
            return INVALID_REQUEST.to_string();
        }
    };

    if !state.limiter.allow(client_key) {
        return RATE_LIMIT_NOTICE.to_string();
    }

    if let Some(id) = json.get("document_id").and_then(|v| v.as_i64()) {
        match state.store.content(id) {
            Ok(content) => *document_content = Some(content),
            Err(DocaskError::NotFound) => return DOCUMENT_NOT_FOUND.to_string(),
            Err(e) => {
                tracing::error!("Document lookup failed: {e}");
                return DOCUMENT_NOT_FOUND.to_string();
            }
        }
    }

    let question = json.get("question").and_then(|v| v.as_str()).unwrap_or("");

    let Some(content) = document_content.as_deref() else {
        return NO_CONTEXT.to_string();
    };

    state.answers.answer(question, content).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate_limit::{FixedWindowLimiter, RateLimiter, Unlimited};
    use docask_answer::AnswerService;
    use docask_core::config::InferenceConfig;
    use docask_store::DocumentStore;

    fn test_state(limiter: Arc<dyn RateLimiter>) -> AppState {
        let store = DocumentStore::open(std::path::Path::new(":memory:")).unwrap();
        let inference = InferenceConfig {
            api_url: "http://127.0.0.1:1/models/test".into(),
            api_token: String::new(),
            timeout_secs: 2,
            chunk_size: 1000,
        };
        AppState {
            store,
            answers: AnswerService::new(&inference),
            limiter,
            start_time: std::time::Instant::now(),
        }
    }

    #[tokio::test]
    async fn test_question_without_context_gets_diagnostic() {
        let state = test_state(Arc::new(Unlimited));
        let mut ctx = None;
        let reply =
            handle_question_frame(&state, "1.2.3.4", &mut ctx, r#"{"question": "X"}"#).await;
        assert_eq!(reply, NO_CONTEXT);
        assert!(ctx.is_none());
    }

    #[tokio::test]
    async fn test_unknown_document_id_gets_diagnostic_and_keeps_context() {
        let state = test_state(Arc::new(Unlimited));
        let mut ctx = Some("existing context".to_string());
        let reply = handle_question_frame(
            &state,
            "1.2.3.4",
            &mut ctx,
            r#"{"document_id": 777, "question": "X"}"#,
        )
        .await;
        assert_eq!(reply, DOCUMENT_NOT_FOUND);
        assert_eq!(ctx.as_deref(), Some("existing context"));
    }

    #[tokio::test]
    async fn test_document_id_establishes_context_for_later_frames() {
        let state = test_state(Arc::new(Unlimited));
        let meta = state.store.insert("ctx.pdf", "stored context text").unwrap();
        let mut ctx = None;

        let frame = format!(r#"{{"document_id": {}, "question": "X"}}"#, meta.id);
        let reply = handle_question_frame(&state, "1.2.3.4", &mut ctx, &frame).await;
        // Inference collaborator is down; failure is reported as the answer.
        assert!(reply.starts_with("An error occurred:"), "got: {reply}");
        assert_eq!(ctx.as_deref(), Some("stored context text"));

        // Follow-up frame without document_id reuses the context.
        let reply =
            handle_question_frame(&state, "1.2.3.4", &mut ctx, r#"{"question": "Y"}"#).await;
        assert!(reply.starts_with("An error occurred:"), "got: {reply}");
    }

    #[tokio::test]
    async fn test_rate_limited_frame_gets_notice() {
        let limiter = Arc::new(FixedWindowLimiter::new(1, std::time::Duration::from_secs(60)));
        let state = test_state(limiter);
        let mut ctx = None;

        let first =
            handle_question_frame(&state, "1.2.3.4", &mut ctx, r#"{"question": "X"}"#).await;
        assert_eq!(first, NO_CONTEXT);

        let second =
            handle_question_frame(&state, "1.2.3.4", &mut ctx, r#"{"question": "X"}"#).await;
        assert_eq!(second, RATE_LIMIT_NOTICE);
    }

    #[tokio::test]
    async fn test_malformed_json_gets_diagnostic() {
        let state = test_state(Arc::new(Unlimited));
        let mut ctx = None;
        let reply = handle_question_frame(&state, "1.2.3.4", &mut ctx, "not json").await;
        assert_eq!(reply, INVALID_REQUEST);
    }
}
