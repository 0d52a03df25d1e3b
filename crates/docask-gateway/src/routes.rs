//! API route handlers for the gateway.

use axum::{
    Json,
    extract::{ConnectInfo, Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;

use docask_core::error::DocaskError;
use docask_store::DocumentMeta;

use crate::server::AppState;

/// Error wrapper translating the core taxonomy into HTTP responses.
/// Bodies follow the `{"detail": "..."}` shape throughout.
pub struct ApiError(pub DocaskError);

impl From<DocaskError> for ApiError {
    fn from(err: DocaskError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            DocaskError::NotFound => StatusCode::NOT_FOUND,
            DocaskError::Validation(_) => StatusCode::BAD_REQUEST,
            DocaskError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            DocaskError::Extraction(_)
            | DocaskError::Processing(_)
            | DocaskError::Storage(_)
            | DocaskError::Config(_)
            | DocaskError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(serde_json::json!({ "detail": self.0.to_string() }));
        (status, body).into_response()
    }
}

/// Health check endpoint.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "docask-gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": state.start_time.elapsed().as_secs(),
    }))
}

/// Upload a PDF: extract its text page by page and persist it.
pub async fn upload_document(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<DocumentMeta>, ApiError> {
    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| DocaskError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("upload.pdf").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| DocaskError::Processing(e.to_string()))?;
            upload = Some((filename, data.to_vec()));
            break;
        }
    }

    let (filename, bytes) = upload
        .ok_or_else(|| DocaskError::Validation("Multipart field 'file' is required".into()))?;

    tracing::info!("Upload received: {filename} ({} bytes)", bytes.len());
    let content = docask_extract::extract_text(&bytes)?;
    let meta = state.store.insert(&filename, &content)?;
    Ok(Json(meta))
}

/// Retrieve a document's metadata by id.
pub async fn get_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<DocumentMeta>, ApiError> {
    Ok(Json(state.store.get(id)?))
}

/// List all documents.
pub async fn list_documents(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DocumentMeta>>, ApiError> {
    Ok(Json(state.store.list()?))
}

/// Delete a document permanently.
pub async fn delete_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.store.delete(id)?;
    Ok(Json(serde_json::json!({
        "message": "Document deleted successfully"
    })))
}

#[derive(Debug, Deserialize)]
pub struct QuestionRequest {
    pub document_id: i64,
    pub question: String,
}

/// Answer a question about one stored document.
///
/// The rate limiter is consulted before any other work; lookup and validation
/// failures map to status codes, while inference failures come back inside the
/// 200 response as the answer string itself.
pub async fn question_answer(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(state): State<Arc<AppState>>,
    Json(req): Json<QuestionRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !state.limiter.allow(&addr.ip().to_string()) {
        return Err(DocaskError::RateLimited.into());
    }
    if req.question.trim().is_empty() {
        return Err(DocaskError::Validation("Question cannot be empty".into()).into());
    }

    let content = state.store.content(req.document_id)?;
    let answer = state.answers.answer(&req.question, &content).await;
    Ok(Json(serde_json::json!({ "answer": answer })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate_limit::{FixedWindowLimiter, RateLimiter, Unlimited};
    use crate::server::build_router;
    use axum::body::Body;
    use axum::http::Request;
    use docask_answer::AnswerService;
    use docask_core::config::InferenceConfig;
    use docask_store::DocumentStore;
    use tower::util::ServiceExt;

    fn test_state(limiter: Arc<dyn RateLimiter>) -> Arc<AppState> {
        let store = DocumentStore::open(std::path::Path::new(":memory:")).unwrap();
        // Nothing listens on port 1, so inference calls fail fast, which the
        // answering path absorbs into the answer string.
        let inference = InferenceConfig {
            api_url: "http://127.0.0.1:1/models/test".into(),
            api_token: String::new(),
            timeout_secs: 2,
            chunk_size: 1000,
        };
        Arc::new(AppState {
            store,
            answers: AnswerService::new(&inference),
            limiter,
            start_time: std::time::Instant::now(),
        })
    }

    fn with_client(mut req: Request<Body>) -> Request<Body> {
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 40000))));
        req
    }

    fn question_req(document_id: i64, question: &str) -> Request<Body> {
        let body = serde_json::json!({
            "document_id": document_id,
            "question": question,
        });
        with_client(
            Request::builder()
                .method("POST")
                .uri("/question-answer")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
    }

    async fn body_string(resp: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_get_missing_document_is_404() {
        let app = build_router(test_state(Arc::new(Unlimited)));
        let resp = app
            .oneshot(with_client(
                Request::builder()
                    .uri("/documents/9999")
                    .body(Body::empty())
                    .unwrap(),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(body_string(resp).await.contains("Document not found"));
    }

    #[tokio::test]
    async fn test_list_and_get_round_trip() {
        let state = test_state(Arc::new(Unlimited));
        let meta = state.store.insert("notes.pdf", "page one \n").unwrap();
        let app = build_router(state);

        let resp = app
            .clone()
            .oneshot(with_client(
                Request::builder()
                    .uri("/documents")
                    .body(Body::empty())
                    .unwrap(),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let listed: Vec<DocumentMeta> =
            serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].filename, "notes.pdf");

        let resp = app
            .oneshot(with_client(
                Request::builder()
                    .uri(format!("/documents/{}", meta.id))
                    .body(Body::empty())
                    .unwrap(),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let fetched: DocumentMeta = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(fetched, meta);
    }

    #[tokio::test]
    async fn test_delete_document() {
        let state = test_state(Arc::new(Unlimited));
        let meta = state.store.insert("bye.pdf", "text").unwrap();
        let app = build_router(state);

        let resp = app
            .clone()
            .oneshot(with_client(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/documents/{}", meta.id))
                    .body(Body::empty())
                    .unwrap(),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_string(resp).await.contains("Document deleted successfully"));

        let resp = app
            .oneshot(with_client(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/documents/{}", meta.id))
                    .body(Body::empty())
                    .unwrap(),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_question_answer_missing_document_is_404() {
        let app = build_router(test_state(Arc::new(Unlimited)));
        let resp = app.oneshot(question_req(9999, "what?")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(body_string(resp).await.contains("Document not found"));
    }

    #[tokio::test]
    async fn test_question_answer_empty_question_is_400() {
        let state = test_state(Arc::new(Unlimited));
        let meta = state.store.insert("doc.pdf", "some text").unwrap();
        let app = build_router(state);
        let resp = app.oneshot(question_req(meta.id, "")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(body_string(resp).await.contains("Question cannot be empty"));
    }

    #[tokio::test]
    async fn test_question_answer_absorbs_collaborator_failure() {
        let state = test_state(Arc::new(Unlimited));
        let meta = state.store.insert("doc.pdf", "alpha beta gamma").unwrap();
        let app = build_router(state);
        let resp = app
            .oneshot(question_req(meta.id, "what is alpha?"))
            .await
            .unwrap();
        // The inference collaborator is unreachable, but that is reported as
        // data inside a 200 response, never as a protocol-level error.
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value =
            serde_json::from_str(&body_string(resp).await).unwrap();
        let answer = body["answer"].as_str().unwrap();
        assert!(answer.starts_with("An error occurred:"), "got: {answer}");
    }

    #[tokio::test]
    async fn test_sixth_question_in_window_is_429() {
        let limiter = Arc::new(FixedWindowLimiter::new(5, std::time::Duration::from_secs(60)));
        let app = build_router(test_state(limiter));

        for i in 0..5 {
            let resp = app
                .clone()
                .oneshot(question_req(9999, "q"))
                .await
                .unwrap();
            // Admitted by the limiter; fails later on the missing document.
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "request {}", i + 1);
        }

        let resp = app.oneshot(question_req(9999, "q")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(body_string(resp).await.contains("Rate limit exceeded"));
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = build_router(test_state(Arc::new(Unlimited)));
        let resp = app
            .oneshot(with_client(
                Request::builder().uri("/health").body(Body::empty()).unwrap(),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_string(resp).await.contains("\"status\":\"ok\""));
    }
}
