//! Topic extraction.
//!
//! The topic is the phrase the user wants searched ("películas de terror" → "terror").
//! Heuristics run in a fixed order and the first one that yields text wins:
//! text after the last preposition, a capitalized name, the noun phrase closest
//! to the whole utterance, the first content word.

use crate::{
    error::AppResult,
    services::intent::{
        similarity::SimilarityModel,
        text::{clean_topic, is_stopword, normalize, tokenize},
    },
};

const PREPOSITIONS: &[&str] = &["a", "de", "sobre", "acerca", "por"];

/// Lowercase words allowed inside a multi-word name ("El Señor de los Anillos")
const NAME_CONNECTORS: &[&str] = &["de", "del", "el", "la", "las", "los"];

/// Request verbs and generic nouns that never form a topic on their own
const COMMAND_WORDS: &[&str] = &[
    "algo", "anteriores", "asignar", "busca", "buscame", "buscar", "calificar", "cine", "consulta",
    "consultar", "dame", "dar", "deseo", "descubrir", "diferente", "dime", "ensena", "ensename",
    "evaluar", "film", "filme", "guardadas", "hay", "lista", "listar", "mostrar", "muestra",
    "muestrame", "necesito", "nueva", "nuevo", "otra", "otro", "pelicula", "peliculas", "poner",
    "puedes", "quiero", "quisiera", "recomendacion", "recomendaciones", "recomendar",
    "recomienda", "recomiendame", "recomiendas", "revisar", "sugerencia", "sugerencias",
    "sugerir", "sugiere", "sugiereme", "ver", "favor",
];

fn is_content_word(token: &str) -> bool {
    !is_stopword(token) && !COMMAND_WORDS.contains(&token)
}

/// Words following the last preposition, or `None` when there is no preposition
/// or it closes the utterance
pub fn after_last_preposition(normalized: &str) -> Option<String> {
    let tokens = tokenize(normalized);
    let last = tokens
        .iter()
        .rposition(|token| PREPOSITIONS.contains(token))?;

    if last + 1 >= tokens.len() {
        return None;
    }

    clean_topic(&tokens[last + 1..].join(" "))
}

fn strip_punctuation(word: &str) -> &str {
    word.trim_matches(|c: char| !c.is_alphanumeric())
}

fn is_capitalized(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_uppercase)
}

/// First run of capitalized words in the raw utterance, normalized.
///
/// The sentence-initial word is skipped since it is capitalized anyway.
pub fn named_entity(raw: &str) -> Option<String> {
    let words: Vec<&str> = raw
        .split_whitespace()
        .map(strip_punctuation)
        .filter(|w| !w.is_empty())
        .collect();

    let start = (1..words.len()).find(|&i| is_capitalized(words[i]))?;
    let mut end = start + 1;

    while end < words.len() {
        if is_capitalized(words[end]) {
            end += 1;
            continue;
        }

        // Connectors only count when a capitalized word follows them
        let mut cursor = end;
        while cursor < words.len() && NAME_CONNECTORS.contains(&words[cursor]) {
            cursor += 1;
        }
        if cursor > end && cursor < words.len() && is_capitalized(words[cursor]) {
            end = cursor + 1;
        } else {
            break;
        }
    }

    clean_topic(&normalize(&words[start..end].join(" ")))
}

/// Maximal runs of content words
pub fn noun_phrases(normalized: &str) -> Vec<String> {
    let mut phrases = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for token in tokenize(normalized) {
        if is_content_word(token) {
            current.push(token);
        } else if !current.is_empty() {
            phrases.push(current.join(" "));
            current.clear();
        }
    }
    if !current.is_empty() {
        phrases.push(current.join(" "));
    }

    phrases
}

/// Noun phrase most similar to the whole utterance, ignoring one-letter phrases
pub async fn best_noun_phrase(
    model: &dyn SimilarityModel,
    normalized: &str,
) -> AppResult<Option<String>> {
    let phrases: Vec<String> = noun_phrases(normalized)
        .into_iter()
        .filter(|p| p.chars().count() >= 2)
        .collect();

    if phrases.is_empty() {
        return Ok(None);
    }

    let scores = model.similarities(normalized, &phrases).await?;

    let mut best = None;
    let mut best_score = 0.0f32;
    for (phrase, score) in phrases.iter().zip(scores) {
        if score > best_score {
            best_score = score;
            best = Some(phrase.clone());
        }
    }

    Ok(best)
}

/// First content word
pub fn root_noun(normalized: &str) -> Option<String> {
    tokenize(normalized)
        .into_iter()
        .find(|token| is_content_word(token))
        .map(str::to_string)
}

/// Runs the extraction cascade over an utterance
pub async fn extract_topic(
    model: &dyn SimilarityModel,
    raw: &str,
    normalized: &str,
) -> AppResult<Option<String>> {
    if let Some(topic) = after_last_preposition(normalized) {
        return Ok(Some(topic));
    }

    if let Some(topic) = named_entity(raw) {
        return Ok(Some(topic));
    }

    if let Some(topic) = best_noun_phrase(model, normalized).await? {
        return Ok(clean_topic(&topic));
    }

    Ok(root_noun(normalized))
}
