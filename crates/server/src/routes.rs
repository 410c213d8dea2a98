use std::sync::Arc;

use axum::{
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;
use service::record::{RecordRepository, RecordService};

use crate::openapi::ApiDoc;

pub mod records;

/// Shared handler state: the record service behind a trait-object repository.
#[derive(Clone)]
pub struct ServerState {
    pub records: Arc<RecordService<dyn RecordRepository>>,
}

impl ServerState {
    pub fn new(repo: Arc<dyn RecordRepository>) -> Self {
        Self { records: Arc::new(RecordService::new(repo)) }
    }
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn metrics() -> (StatusCode, String) {
    common::metrics::encode_metrics()
}

/// Record routes, mounted under `/api`.
fn record_routes() -> Router<ServerState> {
    Router::new()
        .route("/create", post(records::create))
        .route("/delete/:id", delete(records::delete))
        .route("/update/:id", put(records::update))
        .route("/record/user_service", get(records::get_by_user_and_service))
        .route("/record/:id", get(records::get_by_id))
        .route("/records", get(records::list))
        .route("/records/user", get(records::get_by_user))
        .route("/records/summary", get(records::summary))
}

/// Build the full application router: health, metrics, record API and docs.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .nest("/api", record_routes())
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // status code and latency per response
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
