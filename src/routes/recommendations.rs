use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{DetailListResponse, RecommendationResponse, SearchType},
    routes::{
        extract::{AppJson, AppQuery},
        AppState,
    },
    services::{listing, recommendations},
};

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub consulta: String,
    #[serde(default)]
    pub tipo_busqueda: SearchType,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// Searches the catalog and stores a new recommendation
pub async fn create(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    AppJson(request): AppJson<RecommendationRequest>,
) -> AppResult<(StatusCode, Json<RecommendationResponse>)> {
    tracing::info!(
        request_id = %request_id,
        consulta = %request.consulta,
        "Processing recommendation request"
    );

    let response = recommendations::create_recommendation(
        state.store.as_ref(),
        state.catalog.as_ref(),
        &request.consulta,
        request.tipo_busqueda,
        state.max_results,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Stored recommendation details whose reason matches `q`
pub async fn search(
    State(state): State<Arc<AppState>>,
    AppQuery(params): AppQuery<SearchQuery>,
) -> AppResult<Json<DetailListResponse>> {
    let q = params.q.unwrap_or_default();
    let detalles = listing::list_details(state.store.as_ref(), Some(&q)).await?;

    Ok(Json(DetailListResponse {
        mensaje: format!(
            "Se encontraron {} resultados que coinciden con '{}'",
            detalles.len(),
            q
        ),
        detalles,
    }))
}
