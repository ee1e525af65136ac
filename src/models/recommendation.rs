use serde::{de::Error as _, Deserialize, Deserializer, Serialize};

use super::{CatalogMovie, Movie};

/// Data source tag stored on every recommendation header
pub const DATA_SOURCE: &str = "TMDB";

pub const MESSAGE_SEARCH_OK: &str = "Búsqueda exitosa";
pub const MESSAGE_NO_RESULTS: &str = "No se encontraron resultados";

/// Recommendation header (`recomendaciones` table)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    #[serde(rename = "objectId", default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    #[serde(default)]
    pub consulta: String,
    #[serde(default)]
    pub fuente_datos: String,
    #[serde(default, deserialize_with = "lenient_usize")]
    pub num_resultados: usize,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub fecha_creacion: i64,
    #[serde(default)]
    pub mensaje_resultado: String,
}

impl Recommendation {
    /// Builds an unsaved header for a catalog search that produced `num_resultados` hits
    pub fn new(consulta: &str, num_resultados: usize, fecha_creacion: i64) -> Self {
        let mensaje_resultado = if num_resultados == 0 {
            MESSAGE_NO_RESULTS
        } else {
            MESSAGE_SEARCH_OK
        };

        Self {
            object_id: None,
            consulta: consulta.to_string(),
            fuente_datos: DATA_SOURCE.to_string(),
            num_resultados,
            fecha_creacion,
            mensaje_resultado: mensaje_resultado.to_string(),
        }
    }
}

/// One ranked movie of a recommendation (`detalleRecomendaciones` table)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationDetail {
    #[serde(rename = "objectId", default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    #[serde(rename = "recomendacionId", default)]
    pub recomendacion_id: Option<String>,
    #[serde(rename = "peliculaId", default)]
    pub pelicula_id: Option<String>,
    #[serde(default)]
    pub razon_recomendacion: String,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub orden: u32,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub fecha_creacion: i64,
    /// User rating, 0 to 5
    #[serde(
        default,
        deserialize_with = "lenient_rating",
        skip_serializing_if = "Option::is_none"
    )]
    pub evaluacion: Option<u8>,
}

impl RecommendationDetail {
    pub fn reason_for(consulta: &str) -> String {
        format!("Coincide con '{}'", consulta)
    }
}

// Backendless returns numeric columns as integers or doubles (`4` or `4.0`)
// depending on the column type. Whole doubles are accepted; null reads as the default.

fn whole_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let Some(value) = Option::<f64>::deserialize(deserializer)? else {
        return Ok(None);
    };

    if !value.is_finite() || value.fract() != 0.0 {
        return Err(D::Error::custom(format!("expected a whole number, got {}", value)));
    }

    Ok(Some(value as i64))
}

fn lenient_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Ok(whole_number(deserializer)?.unwrap_or_default())
}

fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = whole_number(deserializer)?.unwrap_or_default();
    u32::try_from(value).map_err(|_| D::Error::custom(format!("{} out of range", value)))
}

fn lenient_usize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    let value = whole_number(deserializer)?.unwrap_or_default();
    usize::try_from(value).map_err(|_| D::Error::custom(format!("{} out of range", value)))
}

fn lenient_rating<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u8>, D::Error> {
    whole_number(deserializer)?
        .map(|value| {
            u8::try_from(value)
                .map_err(|_| D::Error::custom(format!("rating {} out of range", value)))
        })
        .transpose()
}

/// Search mode used against the catalog.
///
/// Anything other than `"keyword"` (null, missing, unknown names) reads as a
/// free-text search.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    /// Free-text title search
    #[default]
    Texto,
    /// Keyword (theme) discovery
    Keyword,
}

impl<'de> Deserialize<'de> for SearchType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<serde_json::Value>::deserialize(deserializer)?;
        let is_keyword = value
            .as_ref()
            .and_then(serde_json::Value::as_str)
            .is_some_and(|name| name.trim().eq_ignore_ascii_case("keyword"));

        Ok(if is_keyword {
            SearchType::Keyword
        } else {
            SearchType::Texto
        })
    }
}

/// Detail echoed back right after a recommendation is created
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreatedDetail {
    pub pelicula: Movie,
    pub razon_recomendacion: String,
    pub orden: u32,
    pub fecha_creacion: i64,
}

/// Stored detail with its movie attached
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnrichedDetail {
    #[serde(flatten)]
    pub detail: RecommendationDetail,
    pub pelicula: Option<Movie>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationResponse {
    pub mensaje: String,
    pub recomendacion: Recommendation,
    pub detalles: Vec<CreatedDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetailListResponse {
    pub mensaje: String,
    pub detalles: Vec<EnrichedDetail>,
}

/// Read-only catalog listing (trending, similar movies)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogListResponse {
    pub mensaje: String,
    pub peliculas: Vec<CatalogMovie>,
}
