use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::SearchType,
    routes::{extract::AppJson, AppState},
    services::{route_utterance, GatewayResponse},
};

#[derive(Debug, Deserialize)]
pub struct GatewayRequest {
    pub utterance: String,
    #[serde(default)]
    pub tipo_busqueda: SearchType,
}

/// Handler for the free-text gateway endpoint
pub async fn dispatch(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    AppJson(request): AppJson<GatewayRequest>,
) -> AppResult<Json<GatewayResponse>> {
    tracing::info!(
        request_id = %request_id,
        utterance = %request.utterance,
        "Processing gateway request"
    );

    let response = route_utterance(
        &state.classifier,
        state.store.as_ref(),
        state.catalog.as_ref(),
        &request.utterance,
        request.tipo_busqueda,
        state.max_results,
    )
    .await?;

    Ok(Json(response))
}
