/// Backendless REST store
///
/// Every table lives under `{api_url}/{app_id}/{rest_api_key}/data/{table}`:
/// - `GET` lists rows (optionally filtered with a `where` clause, paged)
/// - `GET /{objectId}` fetches one row
/// - `POST` creates a row, `PUT /{objectId}` updates the given fields
use crate::{
    error::{AppError, AppResult},
    models::{Movie, NewMovie, Recommendation, RecommendationDetail},
    services::storage::{RecordStore, DETAILS_TABLE, MOVIES_TABLE, RECOMMENDATIONS_TABLE},
};
use reqwest::{Client as HttpClient, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;

/// Rows per listing request. The store returns 10 when no page size is given.
const PAGE_SIZE: usize = 100;

#[derive(Clone)]
pub struct BackendlessStore {
    http_client: HttpClient,
    base_url: String,
}

impl BackendlessStore {
    pub fn new(api_url: &str, app_id: &str, rest_api_key: &str) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url: format!(
                "{}/{}/{}",
                api_url.trim_end_matches('/'),
                app_id,
                rest_api_key
            ),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/data/{}", self.base_url, table)
    }

    /// Fails on any non-2xx status, keeping the body for diagnostics
    async fn ensure_success(response: Response) -> AppResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(AppError::ExternalApi(format!(
            "Backendless returned status {}: {}",
            status, body
        )))
    }

    async fn list<T: DeserializeOwned>(
        &self,
        table: &str,
        where_clause: Option<&str>,
    ) -> AppResult<Vec<T>> {
        let url = self.table_url(table);
        let mut rows = Vec::new();
        let mut offset = 0;

        loop {
            let mut params = vec![
                ("pageSize", PAGE_SIZE.to_string()),
                ("offset", offset.to_string()),
            ];
            if let Some(clause) = where_clause {
                params.push(("where", clause.to_string()));
            }

            let response = self.http_client.get(&url).query(&params).send().await?;
            let page: Vec<T> = Self::ensure_success(response).await?.json().await?;
            let page_len = page.len();
            rows.extend(page);

            if page_len < PAGE_SIZE {
                break;
            }
            offset += PAGE_SIZE;
        }

        tracing::debug!(table = %table, rows = rows.len(), "Listed Backendless rows");

        Ok(rows)
    }

    async fn fetch<T: DeserializeOwned>(&self, table: &str, object_id: &str) -> AppResult<Option<T>> {
        let url = format!("{}/{}", self.table_url(table), object_id);
        let response = self.http_client.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let row = Self::ensure_success(response).await?.json().await?;
        Ok(Some(row))
    }

    async fn create<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        table: &str,
        body: &B,
    ) -> AppResult<T> {
        let response = self
            .http_client
            .post(self.table_url(table))
            .json(body)
            .send()
            .await?;

        let row = Self::ensure_success(response).await?.json().await?;
        tracing::debug!(table = %table, "Created Backendless row");
        Ok(row)
    }

    async fn update<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        table: &str,
        object_id: &str,
        body: &B,
    ) -> AppResult<T> {
        let url = format!("{}/{}", self.table_url(table), object_id);
        let response = self.http_client.put(&url).json(body).send().await?;

        let row = Self::ensure_success(response).await?.json().await?;
        Ok(row)
    }
}

/// Quotes a literal for a Backendless `where` clause
fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[async_trait::async_trait]
impl RecordStore for BackendlessStore {
    async fn create_recommendation(
        &self,
        recommendation: &Recommendation,
    ) -> AppResult<Recommendation> {
        self.create(RECOMMENDATIONS_TABLE, recommendation).await
    }

    async fn find_movie_by_catalog_id(&self, mdb_id: &str) -> AppResult<Option<Movie>> {
        let clause = format!("mdb_id={}", quote_literal(mdb_id));
        let movies: Vec<Movie> = self.list(MOVIES_TABLE, Some(&clause)).await?;
        Ok(movies.into_iter().next())
    }

    async fn create_movie(&self, movie: &NewMovie) -> AppResult<Movie> {
        self.create(MOVIES_TABLE, movie).await
    }

    async fn get_movie(&self, object_id: &str) -> AppResult<Option<Movie>> {
        self.fetch(MOVIES_TABLE, object_id).await
    }

    async fn create_detail(
        &self,
        detail: &RecommendationDetail,
    ) -> AppResult<RecommendationDetail> {
        self.create(DETAILS_TABLE, detail).await
    }

    async fn list_details(&self) -> AppResult<Vec<RecommendationDetail>> {
        self.list(DETAILS_TABLE, None).await
    }

    async fn get_detail(&self, object_id: &str) -> AppResult<Option<RecommendationDetail>> {
        self.fetch(DETAILS_TABLE, object_id).await
    }

    async fn rate_detail(
        &self,
        object_id: &str,
        evaluacion: u8,
    ) -> AppResult<RecommendationDetail> {
        self.update(DETAILS_TABLE, object_id, &json!({ "evaluacion": evaluacion }))
            .await
    }

    fn name(&self) -> &'static str {
        "backendless"
    }
}
