/// Text similarity backends
///
/// The classifier only needs "how close are these two short texts", scored in [0, 1].
/// Two backends are available:
/// - [`LexicalSimilarity`]: cosine over bags of stemmed content words, offline
/// - [`EmbeddingSimilarity`]: cosine over vectors from an OpenAI-compatible
///   embeddings endpoint
use crate::{
    error::{AppError, AppResult},
    services::intent::text::{is_stopword, normalize, tokenize},
};
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Characters kept per word by the lexical stemmer
const STEM_CHARS: usize = 6;

#[async_trait::async_trait]
pub trait SimilarityModel: Send + Sync {
    /// Scores `text` against each candidate, in candidate order
    async fn similarities(&self, text: &str, candidates: &[String]) -> AppResult<Vec<f32>>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

/// Cosine similarity between two dense vectors, 0 for mismatched or zero vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    dot_product / (magnitude_a * magnitude_b)
}

// ============================================================================
// Lexical backend
// ============================================================================

/// Bag-of-stems cosine similarity.
///
/// Words are normalized, stopwords dropped and each word cut to its first six
/// characters, so inflections like "recomienda"/"recomiéndame" share a stem while
/// "recomendaciones" does not.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalSimilarity;

impl LexicalSimilarity {
    fn stems(text: &str) -> HashMap<String, f32> {
        let normalized = normalize(text);
        let mut bag = HashMap::new();
        for token in tokenize(&normalized) {
            if is_stopword(token) {
                continue;
            }
            let stem: String = token.chars().take(STEM_CHARS).collect();
            *bag.entry(stem).or_insert(0.0) += 1.0;
        }
        bag
    }

    pub fn score(a: &str, b: &str) -> f32 {
        let bag_a = Self::stems(a);
        let bag_b = Self::stems(b);
        if bag_a.is_empty() || bag_b.is_empty() {
            return 0.0;
        }

        let dot: f32 = bag_a
            .iter()
            .filter_map(|(stem, count)| bag_b.get(stem).map(|other| count * other))
            .sum();
        let norm_a: f32 = bag_a.values().map(|c| c * c).sum::<f32>().sqrt();
        let norm_b: f32 = bag_b.values().map(|c| c * c).sum::<f32>().sqrt();

        dot / (norm_a * norm_b)
    }
}

#[async_trait::async_trait]
impl SimilarityModel for LexicalSimilarity {
    async fn similarities(&self, text: &str, candidates: &[String]) -> AppResult<Vec<f32>> {
        Ok(candidates
            .iter()
            .map(|candidate| Self::score(text, candidate))
            .collect())
    }

    fn name(&self) -> &'static str {
        "lexical"
    }
}

// ============================================================================
// Embeddings backend
// ============================================================================

#[derive(Serialize, Debug)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

#[derive(Deserialize, Debug)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize, Debug)]
struct EmbeddingData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

/// Similarity from a remote OpenAI-compatible `/embeddings` endpoint.
///
/// The text and all candidates are embedded in one request; negative cosines are
/// clamped to 0.
#[derive(Clone)]
pub struct EmbeddingSimilarity {
    http_client: HttpClient,
    api_url: String,
    model: String,
    api_key: Option<String>,
}

impl EmbeddingSimilarity {
    pub fn new(api_url: String, model: String, api_key: Option<String>) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url,
            model,
            api_key,
        }
    }

    async fn embed(&self, inputs: Vec<&str>) -> AppResult<Vec<Vec<f32>>> {
        let expected = inputs.len();
        let body = EmbeddingRequest {
            model: &self.model,
            input: inputs,
        };

        let mut request = self.http_client.post(&self.api_url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Embeddings API returned status {}: {}",
                status, body
            )));
        }

        let mut parsed: EmbeddingResponse = response.json().await?;
        if parsed.data.len() != expected {
            return Err(AppError::ExternalApi(format!(
                "Embeddings API returned {} vectors for {} inputs",
                parsed.data.len(),
                expected
            )));
        }

        parsed.data.sort_by_key(|d| d.index);
        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait::async_trait]
impl SimilarityModel for EmbeddingSimilarity {
    async fn similarities(&self, text: &str, candidates: &[String]) -> AppResult<Vec<f32>> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let inputs: Vec<&str> = std::iter::once(text)
            .chain(candidates.iter().map(String::as_str))
            .collect();
        let vectors = self.embed(inputs).await?;

        let (query, rest) = vectors
            .split_first()
            .ok_or_else(|| AppError::ExternalApi("Embeddings API returned no vectors".to_string()))?;

        Ok(rest
            .iter()
            .map(|vector| cosine_similarity(query, vector).max(0.0))
            .collect())
    }

    fn name(&self) -> &'static str {
        "embeddings"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &c).abs() < 0.001);

        assert_eq!(cosine_similarity(&a, &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_lexical_identical_texts_score_one() {
        let score = LexicalSimilarity::score("muéstrame las recomendaciones", "muestrame las recomendaciones");
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_lexical_shares_stems_across_inflections() {
        let score = LexicalSimilarity::score("recomienda una pelicula", "recomiéndame una película");
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_lexical_distinguishes_recommend_from_recommendations() {
        let score = LexicalSimilarity::score("recomienda", "recomendaciones");
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_lexical_only_stopwords_scores_zero() {
        assert_eq!(LexicalSimilarity::score("de la", "de la"), 0.0);
        assert_eq!(LexicalSimilarity::score("", "pelicula"), 0.0);
    }

    #[test]
    fn test_lexical_partial_overlap() {
        // {busca, pelicu, terror} vs {pelicu, terror}
        let score = LexicalSimilarity::score("busca peliculas de terror", "peliculas de terror");
        let expected = 2.0 / (3.0f32.sqrt() * 2.0f32.sqrt());
        assert!((score - expected).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_lexical_model_keeps_candidate_order() {
        let model = LexicalSimilarity;
        let candidates = vec!["lista de recomendaciones".to_string(), "hola".to_string()];
        let scores = model.similarities("recomendaciones", &candidates).await.unwrap();
        assert_eq!(scores.len(), 2);
        assert!(scores[0] > 0.0);
        assert_eq!(scores[1], 0.0);
    }
}
