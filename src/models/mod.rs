pub mod intent;
pub mod movie;
pub mod recommendation;

pub use intent::{Intent, IntentAnalysis};
pub use movie::{truncate_synopsis, CatalogMovie, Movie, NewMovie, MAX_SYNOPSIS_CHARS};
pub use recommendation::{
    CatalogListResponse, CreatedDetail, DetailListResponse, EnrichedDetail, Recommendation,
    RecommendationDetail, RecommendationResponse, SearchType,
};
