pub mod api;
pub mod config;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod utils;

use crate::services::catalog::CatalogService;
use crate::services::ingest::IngestService;
use crate::services::storage::StorageService;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::files::upload_file,
        api::handlers::files::list_files,
        api::handlers::health::health_check,
    ),
    components(
        schemas(
            models::UploadForm,
            models::UploadResponse,
            models::FileListingEntry,
            models::FileListPage,
            models::ListFilesResponse,
            api::handlers::health::HealthResponse,
        )
    ),
    tags(
        (name = "files", description = "Upload and directory listing endpoints"),
        (name = "system", description = "Service health")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn StorageService>,
    pub ingest: Arc<IngestService>,
    pub catalog: Arc<CatalogService>,
}

impl AppState {
    pub fn new(storage: Arc<dyn StorageService>) -> Self {
        Self {
            ingest: Arc::new(IngestService::new(storage.clone())),
            catalog: Arc::new(CatalogService::new(storage.clone())),
            storage,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(api::handlers::health::health_check))
        .route(
            "/upload",
            // Uploads of any size are accepted.
            post(api::handlers::files::upload_file).layer(DefaultBodyLimit::disable()),
        )
        .route("/files", get(api::handlers::files::list_files))
        .layer(from_fn(api::middleware::metrics::metrics_middleware))
        .layer(from_fn(api::middleware::request_id::request_id_middleware))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
                .expose_headers(Any),
        )
        .with_state(state)
}
