use axum::{
    http::{HeaderValue, StatusCode},
    middleware::from_fn,
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::Config,
    middleware::{make_span_with_request_id, request_id_middleware},
    services::{
        BackendlessStore, IntentClassifier, MovieCatalog, RecordStore, TmdbCatalog,
    },
};

pub mod evaluations;
pub mod extract;
pub mod gateway;
pub mod intention;
pub mod recommendations;

/// Shared handles used by every handler
pub struct AppState {
    pub classifier: Arc<IntentClassifier>,
    pub store: Arc<dyn RecordStore>,
    pub catalog: Arc<dyn MovieCatalog>,
    /// Catalog results kept per recommendation
    pub max_results: usize,
}

impl AppState {
    pub fn new(
        classifier: IntentClassifier,
        store: Arc<dyn RecordStore>,
        catalog: Arc<dyn MovieCatalog>,
        max_results: usize,
    ) -> Self {
        Self {
            classifier: Arc::new(classifier),
            store,
            catalog,
            max_results,
        }
    }

    /// Wires the Backendless store, the TMDB catalog and the configured classifier
    pub fn from_config(config: &Config) -> Self {
        let store = BackendlessStore::new(
            &config.backendless_api_url,
            &config.backendless_app_id,
            &config.backendless_rest_api_key,
        );
        let catalog = TmdbCatalog::new(config.tmdb_api_key.clone(), config.tmdb_api_url.clone());

        Self::new(
            IntentClassifier::from_config(config),
            Arc::new(store),
            Arc::new(catalog),
            config.max_results,
        )
    }
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route(
            "/recomendacion",
            post(recommendations::create).get(recommendations::search),
        )
        .route("/intention", get(intention::identify))
        .route("/evaluar", get(evaluations::pending))
        .route("/evaluar/:id", patch(evaluations::rate))
        .route("/gateway", post(gateway::dispatch))
        .with_state(Arc::new(state))
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
}

/// CORS for the chat frontend. Credentials forbid wildcards, so methods and headers
/// are mirrored from the preflight.
pub fn cors_layer(origin: &str) -> anyhow::Result<CorsLayer> {
    let origin: HeaderValue = origin.parse()?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

async fn root() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "Movie Recommender API running"
    }))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
