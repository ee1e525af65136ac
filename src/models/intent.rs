use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// User goal recognized from an utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    NuevaRecomendacion,
    VerRecomendaciones,
    CalificarRecomendaciones,
    BuscarSimilares,
    VerTendencias,
    /// Nothing matched well enough
    NoImplementada,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::NuevaRecomendacion => "nueva_recomendacion",
            Intent::VerRecomendaciones => "ver_recomendaciones",
            Intent::CalificarRecomendaciones => "calificar_recomendaciones",
            Intent::BuscarSimilares => "buscar_similares",
            Intent::VerTendencias => "ver_tendencias",
            Intent::NoImplementada => "no_implementada",
        }
    }
}

impl Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of classifying one utterance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntentAnalysis {
    pub intencion: Intent,
    /// Best exemplar similarity
    pub similitud: f32,
    pub z_score: f32,
    /// Mean similarity over every exemplar
    pub media: f32,
    pub consulta: Option<String>,
}
