use serde::{Deserialize, Serialize};

/// Maximum synopsis length accepted by the `peliculas` table
pub const MAX_SYNOPSIS_CHARS: usize = 256;

const ELLIPSIS: &str = "...";

/// A movie persisted in the store, keyed by its catalog id (`mdb_id`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    #[serde(rename = "objectId", default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    #[serde(default)]
    pub titulo: Option<String>,
    #[serde(default)]
    pub mdb_id: Option<String>,
    #[serde(default)]
    pub sinopsis: Option<String>,
    #[serde(default)]
    pub fecha_estreno: Option<String>,
}

/// Payload for creating a movie row
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewMovie {
    pub mdb_id: String,
    pub titulo: String,
    pub fecha_estreno: Option<String>,
    pub sinopsis: String,
}

/// A movie as returned by the catalog (TMDB result object)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogMovie {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
}

impl From<&CatalogMovie> for NewMovie {
    fn from(movie: &CatalogMovie) -> Self {
        let fecha_estreno = movie
            .release_date
            .as_deref()
            .filter(|date| !date.is_empty())
            .map(str::to_string);

        Self {
            mdb_id: movie.id.to_string(),
            titulo: movie.title.clone(),
            fecha_estreno,
            sinopsis: truncate_synopsis(movie.overview.as_deref().unwrap_or_default()),
        }
    }
}

/// Cuts an overview to fit the synopsis column.
///
/// Overviews longer than [`MAX_SYNOPSIS_CHARS`] keep their first 253 characters,
/// lose trailing whitespace and gain `"..."`. Lengths are counted in chars.
pub fn truncate_synopsis(overview: &str) -> String {
    if overview.chars().count() <= MAX_SYNOPSIS_CHARS {
        return overview.to_string();
    }

    let kept: String = overview
        .chars()
        .take(MAX_SYNOPSIS_CHARS - ELLIPSIS.len())
        .collect();
    format!("{}{}", kept.trim_end(), ELLIPSIS)
}
