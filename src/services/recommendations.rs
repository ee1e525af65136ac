use chrono::Utc;

use crate::{
    error::AppResult,
    models::{
        CatalogListResponse, CatalogMovie, CreatedDetail, Movie, NewMovie, Recommendation,
        RecommendationDetail, RecommendationResponse, SearchType,
    },
    services::{catalog::MovieCatalog, storage::RecordStore},
};

/// Returns the stored movie for a catalog entry, creating it on first reference
pub async fn find_or_create_movie(
    store: &dyn RecordStore,
    catalog_movie: &CatalogMovie,
) -> AppResult<Movie> {
    let mdb_id = catalog_movie.id.to_string();

    if let Some(existing) = store.find_movie_by_catalog_id(&mdb_id).await? {
        tracing::debug!(mdb_id = %mdb_id, "Reusing stored movie");
        return Ok(existing);
    }

    tracing::debug!(mdb_id = %mdb_id, "Storing new movie");
    store.create_movie(&NewMovie::from(catalog_movie)).await
}

/// Searches the catalog for `consulta` and persists the outcome as a recommendation.
///
/// The header is stored first, then one detail per result in catalog order with a
/// dense 1-based `orden`. Writes are not transactional: if a store call fails midway,
/// the rows written so far stay and the error is returned.
pub async fn create_recommendation(
    store: &dyn RecordStore,
    catalog: &dyn MovieCatalog,
    consulta: &str,
    search_type: SearchType,
    max_results: usize,
) -> AppResult<RecommendationResponse> {
    let movies = match search_type {
        SearchType::Keyword => catalog.search_by_keyword(consulta, max_results).await?,
        SearchType::Texto => catalog.search_movies(consulta, max_results).await?,
    };

    let timestamp = Utc::now().timestamp_millis();

    tracing::info!(
        consulta = %consulta,
        search_type = ?search_type,
        results = movies.len(),
        catalog = catalog.name(),
        "Creating recommendation"
    );

    let header = Recommendation::new(consulta, movies.len(), timestamp);
    let recomendacion = store.create_recommendation(&header).await?;

    if movies.is_empty() {
        return Ok(RecommendationResponse {
            mensaje: "Sin resultados".to_string(),
            recomendacion,
            detalles: Vec::new(),
        });
    }

    let razon = RecommendationDetail::reason_for(consulta);
    let mut detalles = Vec::with_capacity(movies.len());

    for (orden, catalog_movie) in (1u32..).zip(movies.iter()) {
        let pelicula = find_or_create_movie(store, catalog_movie).await?;

        let detail = RecommendationDetail {
            object_id: None,
            recomendacion_id: recomendacion.object_id.clone(),
            pelicula_id: pelicula.object_id.clone(),
            razon_recomendacion: razon.clone(),
            orden,
            fecha_creacion: timestamp,
            evaluacion: None,
        };
        store.create_detail(&detail).await?;

        detalles.push(CreatedDetail {
            pelicula,
            razon_recomendacion: detail.razon_recomendacion,
            orden,
            fecha_creacion: timestamp,
        });
    }

    tracing::info!(
        recommendation_id = ?recomendacion.object_id,
        details = detalles.len(),
        store = store.name(),
        "Recommendation stored"
    );

    Ok(RecommendationResponse {
        mensaje: "Recomendación creada correctamente".to_string(),
        recomendacion,
        detalles,
    })
}

/// Movies trending in the catalog this week
pub async fn trending(
    catalog: &dyn MovieCatalog,
    max_results: usize,
) -> AppResult<CatalogListResponse> {
    let peliculas = catalog.trending(max_results).await?;

    Ok(CatalogListResponse {
        mensaje: format!("{} películas en tendencia", peliculas.len()),
        peliculas,
    })
}

/// Movies similar to the first catalog hit for `topic`
pub async fn similar_to(
    catalog: &dyn MovieCatalog,
    topic: &str,
    max_results: usize,
) -> AppResult<CatalogListResponse> {
    let hits = catalog.search_movies(topic, 1).await?;

    let Some(reference) = hits.first() else {
        return Ok(CatalogListResponse {
            mensaje: format!("No se encontró '{}' en el catálogo", topic),
            peliculas: Vec::new(),
        });
    };

    let peliculas = catalog.similar(reference.id, max_results).await?;

    Ok(CatalogListResponse {
        mensaje: format!(
            "Se encontraron {} películas similares a '{}'",
            peliculas.len(),
            reference.title
        ),
        peliculas,
    })
}
