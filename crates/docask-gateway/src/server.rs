//! HTTP server implementation using Axum.

use axum::{
    Router,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use docask_answer::AnswerService;
use docask_core::DocaskConfig;
use docask_store::DocumentStore;

use crate::rate_limit::{FixedWindowLimiter, RateLimiter};

/// Shared state for the gateway server.
pub struct AppState {
    pub store: DocumentStore,
    pub answers: AnswerService,
    pub limiter: Arc<dyn RateLimiter>,
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Wire up all dependencies from configuration.
    pub fn from_config(config: &DocaskConfig) -> docask_core::Result<Self> {
        let store = DocumentStore::open(&config.db_path())?;
        let answers = AnswerService::new(&config.inference);
        let limiter: Arc<dyn RateLimiter> =
            Arc::new(FixedWindowLimiter::from_config(&config.rate_limit));
        Ok(Self {
            store,
            answers,
            limiter,
            start_time: std::time::Instant::now(),
        })
    }
}

/// Build the Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/documents/upload", post(crate::routes::upload_document))
        .route("/documents", get(crate::routes::list_documents))
        .route(
            "/documents/{id}",
            get(crate::routes::get_document).delete(crate::routes::delete_document),
        )
        .route("/question-answer", post(crate::routes::question_answer))
        .route("/ws/question", get(crate::ws::ws_handler))
        .route("/health", get(crate::routes::health_check))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
pub async fn start(config: &DocaskConfig) -> docask_core::Result<()> {
    let state = Arc::new(AppState::from_config(config)?);
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Gateway listening on http://{addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
