//! Intent classification.
//!
//! An utterance is normalized, scored against every exemplar phrase of every intent
//! and assigned the intent of the best exemplar when that score stands out enough
//! under the configured [`AcceptancePolicy`]. A topic phrase is extracted alongside.

pub mod exemplars;
pub mod similarity;
pub mod text;
pub mod topic;

use std::sync::Arc;

use crate::{
    config::{Config, IntentPolicyKind},
    error::AppResult,
    models::{Intent, IntentAnalysis},
};

use self::{
    exemplars::INTENT_EXAMPLES,
    similarity::{EmbeddingSimilarity, LexicalSimilarity, SimilarityModel},
};

/// Rule deciding whether the best-scoring intent is accepted
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AcceptancePolicy {
    /// Best score must sit at least `min_z` population standard deviations above
    /// the mean of all exemplar scores
    ZScore { min_z: f32 },
    /// Best score must reach `min_score`
    Cutoff { min_score: f32 },
}

impl Default for AcceptancePolicy {
    fn default() -> Self {
        AcceptancePolicy::ZScore { min_z: 0.5 }
    }
}

impl AcceptancePolicy {
    pub fn from_config(config: &Config) -> Self {
        match config.intent_policy {
            IntentPolicyKind::Zscore => AcceptancePolicy::ZScore {
                min_z: config.intent_min_z,
            },
            IntentPolicyKind::Cutoff => AcceptancePolicy::Cutoff {
                min_score: config.intent_cutoff,
            },
        }
    }

    fn accepts(&self, best: f32, z_score: f32) -> bool {
        match *self {
            AcceptancePolicy::ZScore { min_z } => z_score >= min_z,
            AcceptancePolicy::Cutoff { min_score } => best >= min_score,
        }
    }
}

/// Mean and population standard deviation
fn mean_and_pstdev(values: &[f32]) -> (f32, f32) {
    if values.is_empty() {
        return (0.0, 0.0);
    }

    let n = values.len() as f32;
    let mean = values.iter().sum::<f32>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / n;
    (mean, variance.sqrt())
}

/// Spreads below this are float noise over identical scores
const MIN_STD: f32 = 1e-6;

/// Verb prefixes that, next to a movie noun, always ask for a new recommendation
const REQUEST_VERB_PREFIXES: &[&str] = &["recomiend", "sugier", "recomendar", "sugerir"];

const MOVIE_NOUNS: &[&str] = &["pelicula", "peliculas"];

/// "recomiéndame una película ...", "sugiere películas ...": an explicit request
/// wins over any exemplar match, including "parecidas a X" phrasings
fn is_explicit_movie_request(normalized: &str) -> bool {
    let tokens = text::tokenize(normalized);
    tokens.iter().any(|token| MOVIE_NOUNS.contains(token))
        && tokens.iter().any(|token| {
            REQUEST_VERB_PREFIXES
                .iter()
                .any(|prefix| token.starts_with(prefix))
        })
}

fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

pub struct IntentClassifier {
    model: Arc<dyn SimilarityModel>,
    policy: AcceptancePolicy,
    /// Normalized exemplars paired with their intent, in table order
    exemplar_intents: Vec<Intent>,
    exemplar_texts: Vec<String>,
}

impl IntentClassifier {
    pub fn new(model: Arc<dyn SimilarityModel>, policy: AcceptancePolicy) -> Self {
        let (exemplar_intents, exemplar_texts) = INTENT_EXAMPLES
            .iter()
            .flat_map(|(intent, phrases)| {
                phrases
                    .iter()
                    .map(move |phrase| (*intent, text::normalize(phrase)))
            })
            .unzip();

        Self {
            model,
            policy,
            exemplar_intents,
            exemplar_texts,
        }
    }

    /// Picks the similarity backend from config: remote embeddings when an endpoint
    /// is configured, the lexical scorer otherwise
    pub fn from_config(config: &Config) -> Self {
        let model: Arc<dyn SimilarityModel> = match &config.embedding_api_url {
            Some(url) => Arc::new(EmbeddingSimilarity::new(
                url.clone(),
                config.embedding_model.clone(),
                config.embedding_api_key.clone(),
            )),
            None => Arc::new(LexicalSimilarity),
        };

        tracing::info!(
            model = model.name(),
            policy = ?AcceptancePolicy::from_config(config),
            "Intent classifier configured"
        );

        Self::new(model, AcceptancePolicy::from_config(config))
    }

    pub fn policy(&self) -> AcceptancePolicy {
        self.policy
    }

    /// Highest-scoring exemplar, optionally restricted to one intent. Ties keep the
    /// earlier exemplar.
    fn best_match(&self, scores: &[f32], only: Option<Intent>) -> (Intent, f32) {
        let mut best_intent = Intent::NoImplementada;
        let mut best_score = 0.0f32;
        for (intent, score) in self.exemplar_intents.iter().zip(scores) {
            if only.is_some_and(|wanted| wanted != *intent) {
                continue;
            }
            if *score > best_score {
                best_score = *score;
                best_intent = *intent;
            }
        }
        (best_intent, best_score)
    }

    /// Classifies a raw utterance and extracts its topic
    pub async fn classify(&self, utterance: &str) -> AppResult<IntentAnalysis> {
        let normalized = text::normalize(utterance);

        if normalized.trim().is_empty() {
            return Ok(IntentAnalysis {
                intencion: Intent::NoImplementada,
                similitud: 0.0,
                z_score: 0.0,
                media: 0.0,
                consulta: None,
            });
        }

        let scores = self
            .model
            .similarities(&normalized, &self.exemplar_texts)
            .await?;

        let explicit_request = is_explicit_movie_request(&normalized);
        let (best_intent, best_score) = self.best_match(
            &scores,
            explicit_request.then_some(Intent::NuevaRecomendacion),
        );

        let (mean, std) = mean_and_pstdev(&scores);
        let z_score = if std > MIN_STD {
            (best_score - mean) / std
        } else {
            0.0
        };

        let best_intent = if explicit_request {
            Intent::NuevaRecomendacion
        } else if self.policy.accepts(best_score, z_score) {
            best_intent
        } else {
            Intent::NoImplementada
        };

        let consulta = topic::extract_topic(self.model.as_ref(), utterance, &normalized).await?;

        tracing::info!(
            intent = %best_intent,
            similarity = best_score,
            z_score = z_score,
            mean = mean,
            topic = ?consulta,
            "Utterance classified"
        );

        Ok(IntentAnalysis {
            intencion: best_intent,
            similitud: round2(best_score),
            z_score: round2(z_score),
            media: round2(mean),
            consulta,
        })
    }
}
