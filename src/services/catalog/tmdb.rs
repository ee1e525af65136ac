/// TMDB catalog
///
/// API Flow:
/// 1. Text search: /search/movie
/// 2. Keyword search: /search/keyword → first keyword id → /discover/movie?with_keywords=
/// 3. Trending: /trending/movie/week
/// 4. Similar: /movie/{id}/similar
use crate::{
    error::{AppError, AppResult},
    models::CatalogMovie,
    services::catalog::MovieCatalog,
};
use reqwest::Client as HttpClient;
use serde::{de::DeserializeOwned, Deserialize};

const LANGUAGE: &str = "es-MX";

/// Paged result envelope shared by TMDB list endpoints
#[derive(Debug, Deserialize)]
struct ResultsPage<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct KeywordResult {
    id: u64,
}

#[derive(Clone)]
pub struct TmdbCatalog {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbCatalog {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    /// GETs `path` with the API key attached and returns the `results` array
    async fn get_results<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> AppResult<Vec<T>> {
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let page: ResultsPage<T> = response.json().await?;
        Ok(page.results)
    }

    async fn movie_list(
        &self,
        path: &str,
        params: &[(&str, &str)],
        limit: usize,
    ) -> AppResult<Vec<CatalogMovie>> {
        let mut movies: Vec<CatalogMovie> = self.get_results(path, params).await?;
        movies.truncate(limit);

        tracing::info!(
            path = %path,
            results = movies.len(),
            provider = "tmdb",
            "Catalog lookup completed"
        );

        Ok(movies)
    }
}

#[async_trait::async_trait]
impl MovieCatalog for TmdbCatalog {
    async fn search_movies(&self, query: &str, limit: usize) -> AppResult<Vec<CatalogMovie>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        self.movie_list(
            "/search/movie",
            &[
                ("query", query),
                ("language", LANGUAGE),
                ("include_adult", "false"),
                ("page", "1"),
            ],
            limit,
        )
        .await
    }

    async fn search_by_keyword(&self, keyword: &str, limit: usize) -> AppResult<Vec<CatalogMovie>> {
        let keywords: Vec<KeywordResult> = self
            .get_results("/search/keyword", &[("query", keyword)])
            .await?;

        let Some(first) = keywords.first() else {
            tracing::info!(keyword = %keyword, "No catalog keyword matched");
            return Ok(Vec::new());
        };

        let keyword_id = first.id.to_string();
        self.movie_list(
            "/discover/movie",
            &[
                ("with_keywords", keyword_id.as_str()),
                ("language", LANGUAGE),
                ("include_adult", "false"),
            ],
            limit,
        )
        .await
    }

    async fn trending(&self, limit: usize) -> AppResult<Vec<CatalogMovie>> {
        self.movie_list("/trending/movie/week", &[("language", LANGUAGE)], limit)
            .await
    }

    async fn similar(&self, movie_id: u64, limit: usize) -> AppResult<Vec<CatalogMovie>> {
        let path = format!("/movie/{}/similar", movie_id);
        self.movie_list(&path, &[("language", LANGUAGE), ("page", "1")], limit)
            .await
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
