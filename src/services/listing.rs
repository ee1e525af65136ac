use crate::{
    error::{AppError, AppResult},
    models::{EnrichedDetail, RecommendationDetail},
    services::{intent::text::normalize, storage::RecordStore},
};

/// Highest accepted rating
pub const MAX_RATING: i64 = 5;

/// Attaches the referenced movie, or `None` when the detail has no movie id or the
/// movie no longer exists
async fn enrich(store: &dyn RecordStore, detail: RecommendationDetail) -> AppResult<EnrichedDetail> {
    let pelicula = match detail.pelicula_id.as_deref() {
        Some(id) if !id.is_empty() => store
            .get_movie(id)
            .await?
            .filter(|movie| movie.object_id.is_some()),
        _ => None,
    };

    Ok(EnrichedDetail { detail, pelicula })
}

async fn enrich_all(
    store: &dyn RecordStore,
    details: Vec<RecommendationDetail>,
) -> AppResult<Vec<EnrichedDetail>> {
    let mut enriched = Vec::with_capacity(details.len());
    for detail in details {
        enriched.push(enrich(store, detail).await?);
    }
    Ok(enriched)
}

/// Stored details whose reason contains `filter`, ignoring case and accents.
/// An empty or missing filter keeps every detail.
pub async fn list_details(
    store: &dyn RecordStore,
    filter: Option<&str>,
) -> AppResult<Vec<EnrichedDetail>> {
    let needle = filter.map(normalize).unwrap_or_default();

    let details: Vec<RecommendationDetail> = store
        .list_details()
        .await?
        .into_iter()
        .filter(|detail| normalize(&detail.razon_recomendacion).contains(&needle))
        .collect();

    tracing::info!(filter = ?filter, matches = details.len(), "Listing recommendation details");

    enrich_all(store, details).await
}

/// Details still waiting for a rating
pub async fn list_pending_evaluations(store: &dyn RecordStore) -> AppResult<Vec<EnrichedDetail>> {
    let pending: Vec<RecommendationDetail> = store
        .list_details()
        .await?
        .into_iter()
        .filter(|detail| detail.evaluacion.is_none())
        .collect();

    enrich_all(store, pending).await
}

/// Stores a 0–5 rating on a recommendation detail
pub async fn rate_detail(
    store: &dyn RecordStore,
    object_id: &str,
    evaluacion: i64,
) -> AppResult<RecommendationDetail> {
    if !(0..=MAX_RATING).contains(&evaluacion) {
        return Err(AppError::InvalidInput(format!(
            "evaluacion must be between 0 and {}, got {}",
            MAX_RATING, evaluacion
        )));
    }

    if store.get_detail(object_id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "Recommendation detail {} not found",
            object_id
        )));
    }

    let updated = store.rate_detail(object_id, evaluacion as u8).await?;

    tracing::info!(detail_id = %object_id, evaluacion = evaluacion, "Recommendation rated");

    Ok(updated)
}
