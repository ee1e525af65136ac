//! Free-text entry point: classify an utterance and dispatch to the matching operation.

use serde::Serialize;

use crate::{
    error::{AppError, AppResult},
    models::{
        CatalogListResponse, DetailListResponse, Intent, RecommendationResponse, SearchType,
    },
    services::{
        catalog::MovieCatalog, intent::IntentClassifier, listing, recommendations,
        storage::RecordStore,
    },
};

/// Query used for a new recommendation when the utterance names no topic
pub const DEFAULT_TOPIC: &str = "popular";

/// Body returned by the gateway; shape depends on the dispatched operation
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum GatewayResponse {
    Created(RecommendationResponse),
    Listed(DetailListResponse),
    Catalog(CatalogListResponse),
}

pub async fn route_utterance(
    classifier: &IntentClassifier,
    store: &dyn RecordStore,
    catalog: &dyn MovieCatalog,
    utterance: &str,
    search_type: SearchType,
    max_results: usize,
) -> AppResult<GatewayResponse> {
    let analysis = classifier.classify(utterance).await?;

    tracing::info!(
        intent = %analysis.intencion,
        topic = ?analysis.consulta,
        "Routing utterance"
    );

    match analysis.intencion {
        Intent::NuevaRecomendacion => {
            let consulta = analysis.consulta.as_deref().unwrap_or(DEFAULT_TOPIC);
            let created = recommendations::create_recommendation(
                store,
                catalog,
                consulta,
                search_type,
                max_results,
            )
            .await?;
            Ok(GatewayResponse::Created(created))
        }
        Intent::VerRecomendaciones => {
            let detalles = listing::list_details(store, None).await?;
            Ok(GatewayResponse::Listed(DetailListResponse {
                mensaje: format!("Se encontraron {} resultados", detalles.len()),
                detalles,
            }))
        }
        Intent::CalificarRecomendaciones => {
            let detalles = listing::list_pending_evaluations(store).await?;
            Ok(GatewayResponse::Listed(DetailListResponse {
                mensaje: format!("{} recomendaciones pendientes de evaluar", detalles.len()),
                detalles,
            }))
        }
        Intent::VerTendencias => Ok(GatewayResponse::Catalog(
            recommendations::trending(catalog, max_results).await?,
        )),
        Intent::BuscarSimilares => {
            let topic = analysis.consulta.as_deref().ok_or_else(|| {
                AppError::UnsupportedIntent(format!(
                    "{} sin película de referencia",
                    Intent::BuscarSimilares
                ))
            })?;
            Ok(GatewayResponse::Catalog(
                recommendations::similar_to(catalog, topic, max_results).await?,
            ))
        }
        Intent::NoImplementada => Err(AppError::UnsupportedIntent(
            analysis.intencion.to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{CatalogMovie, RecommendationDetail},
        services::{
            catalog::MockMovieCatalog,
            intent::{
                exemplars::INTENT_EXAMPLES,
                similarity::{LexicalSimilarity, SimilarityModel},
                text::normalize,
                AcceptancePolicy,
            },
            storage::MockRecordStore,
        },
    };
    use mockall::predicate::eq;
    use std::sync::Arc;

    fn classifier() -> IntentClassifier {
        IntentClassifier::new(Arc::new(LexicalSimilarity), AcceptancePolicy::default())
    }

    /// Scores every exemplar of one intent high and everything else 0
    struct FavorIntent(Intent);

    #[async_trait::async_trait]
    impl SimilarityModel for FavorIntent {
        async fn similarities(&self, _text: &str, candidates: &[String]) -> AppResult<Vec<f32>> {
            let favored: Vec<String> = INTENT_EXAMPLES
                .iter()
                .filter(|(intent, _)| *intent == self.0)
                .flat_map(|(_, phrases)| phrases.iter().map(|p| normalize(p)))
                .collect();
            Ok(candidates
                .iter()
                .map(|c| if favored.contains(c) { 0.9 } else { 0.0 })
                .collect())
        }

        fn name(&self) -> &'static str {
            "favor-intent"
        }
    }

    fn detail(id: &str, evaluacion: Option<u8>) -> RecommendationDetail {
        RecommendationDetail {
            object_id: Some(id.to_string()),
            recomendacion_id: Some("R1".to_string()),
            pelicula_id: None,
            razon_recomendacion: "Coincide con 'terror'".to_string(),
            orden: 1,
            fecha_creacion: 0,
            evaluacion,
        }
    }

    fn catalog_movie(id: u64, title: &str) -> CatalogMovie {
        CatalogMovie {
            id,
            title: title.to_string(),
            overview: None,
            release_date: None,
        }
    }

    #[tokio::test]
    async fn test_unrecognized_utterance_is_unsupported() {
        let store = MockRecordStore::new();
        let catalog = MockMovieCatalog::new();

        let result = route_utterance(
            &classifier(),
            &store,
            &catalog,
            "hola buenos días",
            SearchType::Texto,
            5,
        )
        .await;

        match result {
            Err(AppError::UnsupportedIntent(intent)) => assert_eq!(intent, "no_implementada"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_list_recommendations() {
        let mut store = MockRecordStore::new();
        store.expect_list_details().returning(|| {
            Ok(vec![RecommendationDetail {
                object_id: Some("D1".to_string()),
                recomendacion_id: Some("R1".to_string()),
                pelicula_id: None,
                razon_recomendacion: "Coincide con 'terror'".to_string(),
                orden: 1,
                fecha_creacion: 0,
                evaluacion: None,
            }])
        });
        let catalog = MockMovieCatalog::new();

        let response = route_utterance(
            &classifier(),
            &store,
            &catalog,
            "Muéstrame las recomendaciones",
            SearchType::Texto,
            5,
        )
        .await
        .unwrap();

        match response {
            GatewayResponse::Listed(listed) => {
                assert_eq!(listed.mensaje, "Se encontraron 1 resultados");
                assert_eq!(listed.detalles.len(), 1);
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_trending() {
        let store = MockRecordStore::new();
        let mut catalog = MockMovieCatalog::new();
        catalog
            .expect_trending()
            .with(eq(3usize))
            .times(1)
            .returning(|_| {
                Ok(vec![CatalogMovie {
                    id: 1,
                    title: "Dune".to_string(),
                    overview: None,
                    release_date: None,
                }])
            });

        let response = route_utterance(
            &classifier(),
            &store,
            &catalog,
            "¿Qué películas están de moda?",
            SearchType::Texto,
            3,
        )
        .await
        .unwrap();

        match response {
            GatewayResponse::Catalog(list) => assert_eq!(list.peliculas.len(), 1),
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_new_recommendation_uses_topic() {
        let mut store = MockRecordStore::new();
        store.expect_name().return_const("mock");
        store
            .expect_create_recommendation()
            .returning(|rec| Ok(rec.clone()));
        let mut catalog = MockMovieCatalog::new();
        catalog.expect_name().return_const("mock");
        catalog
            .expect_search_movies()
            .with(eq("terror"), eq(5usize))
            .times(1)
            .returning(|_, _| Ok(Vec::new()));

        let response = route_utterance(
            &classifier(),
            &store,
            &catalog,
            "recomiéndame películas de terror",
            SearchType::Texto,
            5,
        )
        .await
        .unwrap();

        match response {
            GatewayResponse::Created(created) => {
                assert_eq!(created.recomendacion.consulta, "terror");
                assert!(created.detalles.is_empty());
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_rate_request_lists_pending_evaluations() {
        let mut store = MockRecordStore::new();
        store
            .expect_list_details()
            .times(1)
            .returning(|| Ok(vec![detail("D1", Some(5)), detail("D2", None)]));
        let catalog = MockMovieCatalog::new();

        let response = route_utterance(
            &classifier(),
            &store,
            &catalog,
            "quiero calificar las recomendaciones",
            SearchType::Texto,
            5,
        )
        .await
        .unwrap();

        match response {
            GatewayResponse::Listed(listed) => {
                assert_eq!(listed.mensaje, "1 recomendaciones pendientes de evaluar");
                assert_eq!(listed.detalles.len(), 1);
                assert_eq!(listed.detalles[0].detail.object_id.as_deref(), Some("D2"));
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_similar_movies_for_named_title() {
        let store = MockRecordStore::new();
        let mut catalog = MockMovieCatalog::new();
        catalog
            .expect_search_movies()
            .with(eq("titanic"), eq(1usize))
            .times(1)
            .returning(|_, _| Ok(vec![catalog_movie(597, "Titanic")]));
        catalog
            .expect_similar()
            .with(eq(597u64), eq(5usize))
            .times(1)
            .returning(|_, _| {
                Ok(vec![
                    catalog_movie(1, "Romeo + Julieta"),
                    catalog_movie(2, "Pearl Harbor"),
                ])
            });

        let response = route_utterance(
            &classifier(),
            &store,
            &catalog,
            "muéstrame películas parecidas a Titanic",
            SearchType::Texto,
            5,
        )
        .await
        .unwrap();

        match response {
            GatewayResponse::Catalog(list) => {
                assert_eq!(list.mensaje, "Se encontraron 2 películas similares a 'Titanic'");
                assert_eq!(list.peliculas[1].title, "Pearl Harbor");
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_similar_movies_without_reference_is_unsupported() {
        let classifier = IntentClassifier::new(
            Arc::new(FavorIntent(Intent::BuscarSimilares)),
            AcceptancePolicy::default(),
        );
        let store = MockRecordStore::new();
        let mut catalog = MockMovieCatalog::new();
        catalog.expect_search_movies().never();
        catalog.expect_similar().never();

        // Only command words: no topic can be extracted
        let result = route_utterance(
            &classifier,
            &store,
            &catalog,
            "quiero algo",
            SearchType::Texto,
            5,
        )
        .await;

        match result {
            Err(AppError::UnsupportedIntent(message)) => {
                assert!(message.starts_with("buscar_similares"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
