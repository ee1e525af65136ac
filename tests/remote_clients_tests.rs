use serde_json::{json, Value};
use wiremock::{
    matchers::{body_json, header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

use movie_intent_api::{
    error::AppError,
    models::Recommendation,
    services::{
        intent::similarity::{EmbeddingSimilarity, SimilarityModel},
        BackendlessStore, MovieCatalog, RecordStore, TmdbCatalog,
    },
};

const DATA_PREFIX: &str = "/APP/KEY/data";

fn store(server: &MockServer) -> BackendlessStore {
    BackendlessStore::new(&server.uri(), "APP", "KEY")
}

fn catalog(server: &MockServer) -> TmdbCatalog {
    TmdbCatalog::new("tmdb-key".to_string(), server.uri())
}

fn detail_rows(range: std::ops::Range<usize>) -> Value {
    Value::Array(
        range
            .map(|i| json!({ "objectId": format!("D{}", i), "razon_recomendacion": "x", "orden": 1 }))
            .collect(),
    )
}

#[tokio::test]
async fn test_backendless_lists_every_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/detalleRecomendaciones", DATA_PREFIX)))
        .and(query_param("offset", "0"))
        .and(query_param("pageSize", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(detail_rows(0..100)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{}/detalleRecomendaciones", DATA_PREFIX)))
        .and(query_param("offset", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(detail_rows(100..103)))
        .expect(1)
        .mount(&server)
        .await;

    let details = store(&server).list_details().await.unwrap();
    assert_eq!(details.len(), 103);
    assert_eq!(details[102].object_id.as_deref(), Some("D102"));
}

#[tokio::test]
async fn test_backendless_reads_double_columns() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/detalleRecomendaciones", DATA_PREFIX)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "objectId": "D1", "orden": 1.0, "fecha_creacion": 1718000000000.0, "evaluacion": 4.0 },
            { "objectId": "D2", "orden": 2, "fecha_creacion": 1718000000000_i64, "evaluacion": null }
        ])))
        .mount(&server)
        .await;

    let details = store(&server).list_details().await.unwrap();
    assert_eq!(details.len(), 2);
    assert_eq!(details[0].evaluacion, Some(4));
    assert_eq!(details[1].orden, 2);
    assert_eq!(details[1].evaluacion, None);
}

#[tokio::test]
async fn test_backendless_finds_movie_with_where_clause() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/peliculas", DATA_PREFIX)))
        .and(query_param("where", "mdb_id='603'"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "objectId": "M1", "mdb_id": "603", "titulo": "Matrix" }
        ])))
        .mount(&server)
        .await;

    let movie = store(&server)
        .find_movie_by_catalog_id("603")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(movie.object_id.as_deref(), Some("M1"));
    assert_eq!(movie.titulo.as_deref(), Some("Matrix"));
}

#[tokio::test]
async fn test_backendless_missing_row_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/detalleRecomendaciones/NOPE", DATA_PREFIX)))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "code": 1000 })))
        .mount(&server)
        .await;

    let detail = store(&server).get_detail("NOPE").await.unwrap();
    assert!(detail.is_none());
}

#[tokio::test]
async fn test_backendless_rating_uses_put() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(format!("{}/detalleRecomendaciones/D1", DATA_PREFIX)))
        .and(body_json(json!({ "evaluacion": 4 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "objectId": "D1", "razon_recomendacion": "Coincide con 'terror'", "orden": 2, "evaluacion": 4
        })))
        .expect(1)
        .mount(&server)
        .await;

    let updated = store(&server).rate_detail("D1", 4).await.unwrap();
    assert_eq!(updated.evaluacion, Some(4));
    assert_eq!(updated.orden, 2);
}

#[tokio::test]
async fn test_backendless_error_status_surfaces() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{}/recomendaciones", DATA_PREFIX)))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad table"))
        .mount(&server)
        .await;

    let result = store(&server)
        .create_recommendation(&Recommendation::new("terror", 0, 1))
        .await;

    match result {
        Err(AppError::ExternalApi(message)) => {
            assert!(message.contains("400"));
            assert!(message.contains("bad table"));
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_tmdb_search_sends_key_and_language() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/movie"))
        .and(query_param("api_key", "tmdb-key"))
        .and(query_param("query", "matrix"))
        .and(query_param("language", "es-MX"))
        .and(query_param("include_adult", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "results": [
                { "id": 603, "title": "Matrix", "overview": "Neo", "release_date": "1999-03-30" },
                { "id": 604, "title": "Matrix Reloaded", "overview": "", "release_date": "2003-05-15" },
                { "id": 605, "title": "Matrix Revolutions", "overview": "", "release_date": "" }
            ]
        })))
        .mount(&server)
        .await;

    let movies = catalog(&server).search_movies("matrix", 2).await.unwrap();
    assert_eq!(movies.len(), 2);
    assert_eq!(movies[0].id, 603);
    assert_eq!(movies[1].title, "Matrix Reloaded");
}

#[tokio::test]
async fn test_tmdb_keyword_search_discovers_by_first_keyword() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/keyword"))
        .and(query_param("query", "robots"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "id": 14544, "name": "robot" }, { "id": 1, "name": "other" }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/discover/movie"))
        .and(query_param("with_keywords", "14544"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "id": 2048, "title": "Yo, robot" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let movies = catalog(&server).search_by_keyword("robots", 5).await.unwrap();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].title, "Yo, robot");
}

#[tokio::test]
async fn test_tmdb_unknown_keyword_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/keyword"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/discover/movie"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let movies = catalog(&server).search_by_keyword("zzz", 5).await.unwrap();
    assert!(movies.is_empty());
}

#[tokio::test]
async fn test_tmdb_similar_and_trending_paths() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/603/similar"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "id": 1, "title": "Dark City" }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/trending/movie/week"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "id": 2, "title": "Dune" }, { "id": 3, "title": "Oppenheimer" }]
        })))
        .mount(&server)
        .await;

    let tmdb = catalog(&server);
    assert_eq!(tmdb.similar(603, 5).await.unwrap()[0].title, "Dark City");
    assert_eq!(tmdb.trending(1).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_tmdb_error_status_surfaces() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/movie"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
        .mount(&server)
        .await;

    let result = catalog(&server).search_movies("matrix", 5).await;
    assert!(matches!(result, Err(AppError::ExternalApi(_))));
}

#[tokio::test]
async fn test_tmdb_empty_query_rejected() {
    let server = MockServer::start().await;
    let result = catalog(&server).search_movies("  ", 5).await;
    assert!(matches!(result, Err(AppError::InvalidInput(_))));
}

#[tokio::test]
async fn test_embeddings_scores_candidates_in_order() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_json(json!({
            "model": "test-model",
            "input": ["hola", "a", "b"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "index": 2, "embedding": [-1.0, 0.0] },
                { "index": 0, "embedding": [1.0, 0.0] },
                { "index": 1, "embedding": [1.0, 0.0] }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let model = EmbeddingSimilarity::new(
        format!("{}/embeddings", server.uri()),
        "test-model".to_string(),
        Some("sk-test".to_string()),
    );
    let scores = model
        .similarities("hola", &["a".to_string(), "b".to_string()])
        .await
        .unwrap();

    assert_eq!(scores.len(), 2);
    assert!((scores[0] - 1.0).abs() < 1e-6);
    // Opposite vectors clamp to zero
    assert_eq!(scores[1], 0.0);
}

#[tokio::test]
async fn test_embeddings_vector_count_mismatch() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "index": 0, "embedding": [1.0] }]
        })))
        .mount(&server)
        .await;

    let model = EmbeddingSimilarity::new(
        format!("{}/embeddings", server.uri()),
        "test-model".to_string(),
        None,
    );
    let result = model.similarities("hola", &["a".to_string()]).await;
    assert!(matches!(result, Err(AppError::ExternalApi(_))));
}
