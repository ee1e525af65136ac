/// Persistent record store abstraction
///
/// Recommendations, their details and the movies they reference live in a remote
/// backend-as-a-service. Handlers and services only see this trait so tests can
/// swap in mocks or in-memory fakes.
use crate::{
    error::AppResult,
    models::{Movie, NewMovie, Recommendation, RecommendationDetail},
};

pub mod backendless;

pub use backendless::BackendlessStore;

pub const RECOMMENDATIONS_TABLE: &str = "recomendaciones";
pub const DETAILS_TABLE: &str = "detalleRecomendaciones";
pub const MOVIES_TABLE: &str = "peliculas";

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    /// Persists a recommendation header and returns the stored row
    async fn create_recommendation(&self, recommendation: &Recommendation)
        -> AppResult<Recommendation>;

    /// Looks a movie up by its external catalog id
    async fn find_movie_by_catalog_id(&self, mdb_id: &str) -> AppResult<Option<Movie>>;

    async fn create_movie(&self, movie: &NewMovie) -> AppResult<Movie>;

    /// Fetches a movie by store id; `None` when it does not exist
    async fn get_movie(&self, object_id: &str) -> AppResult<Option<Movie>>;

    async fn create_detail(&self, detail: &RecommendationDetail)
        -> AppResult<RecommendationDetail>;

    /// Every stored recommendation detail
    async fn list_details(&self) -> AppResult<Vec<RecommendationDetail>>;

    async fn get_detail(&self, object_id: &str) -> AppResult<Option<RecommendationDetail>>;

    /// Sets the rating of a detail and returns the updated row
    async fn rate_detail(&self, object_id: &str, evaluacion: u8)
        -> AppResult<RecommendationDetail>;

    /// Store name for logging
    fn name(&self) -> &'static str;
}
