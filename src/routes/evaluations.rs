use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{EnrichedDetail, RecommendationDetail},
    routes::{extract::AppQuery, AppState},
    services::listing,
};

#[derive(Debug, Deserialize)]
pub struct RatingQuery {
    pub evaluacion: i64,
}

/// Recommendation details still waiting for a rating
pub async fn pending(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<EnrichedDetail>>> {
    let detalles = listing::list_pending_evaluations(state.store.as_ref()).await?;
    Ok(Json(detalles))
}

pub async fn rate(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<String>,
    AppQuery(params): AppQuery<RatingQuery>,
) -> AppResult<Json<RecommendationDetail>> {
    tracing::info!(
        request_id = %request_id,
        detail_id = %id,
        evaluacion = params.evaluacion,
        "Rating recommendation"
    );

    let updated = listing::rate_detail(state.store.as_ref(), &id, params.evaluacion).await?;
    Ok(Json(updated))
}
