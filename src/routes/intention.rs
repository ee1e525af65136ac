use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::Intent,
    routes::{extract::AppQuery, AppState},
};

#[derive(Debug, Deserialize)]
pub struct IntentionQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct IntentionResponse {
    pub resultado: &'static str,
    pub tipo: Intent,
    pub consulta: Option<String>,
    pub similitud: f32,
    pub z_score: f32,
}

/// Classifies `q` without acting on it
pub async fn identify(
    State(state): State<Arc<AppState>>,
    AppQuery(params): AppQuery<IntentionQuery>,
) -> AppResult<Json<IntentionResponse>> {
    let analysis = state.classifier.classify(&params.q).await?;

    Ok(Json(IntentionResponse {
        resultado: "Intención identificada",
        tipo: analysis.intencion,
        consulta: analysis.consulta,
        similitud: analysis.similitud,
        z_score: analysis.z_score,
    }))
}
