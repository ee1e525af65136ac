/// Movie catalog abstraction
///
/// Read-only access to a third-party movie metadata service. Results are
/// returned in catalog order and cut to the requested limit.
use crate::{error::AppResult, models::CatalogMovie};

pub mod tmdb;

pub use tmdb::TmdbCatalog;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Free-text title search
    async fn search_movies(&self, query: &str, limit: usize) -> AppResult<Vec<CatalogMovie>>;

    /// Resolves `keyword` to the catalog's first matching keyword id and discovers
    /// movies tagged with it. Empty when the keyword is unknown.
    async fn search_by_keyword(&self, keyword: &str, limit: usize)
        -> AppResult<Vec<CatalogMovie>>;

    /// Movies trending this week
    async fn trending(&self, limit: usize) -> AppResult<Vec<CatalogMovie>>;

    /// Movies the catalog considers similar to `movie_id`
    async fn similar(&self, movie_id: u64, limit: usize) -> AppResult<Vec<CatalogMovie>>;

    /// Catalog name for logging
    fn name(&self) -> &'static str;
}
