use regex::Regex;
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

/// Spanish function words ignored when comparing or chunking text
pub const STOPWORDS: &[&str] = &[
    "a", "al", "como", "con", "de", "del", "e", "el", "en", "es", "esa", "ese", "esta", "estan",
    "este", "esto", "la", "las", "le", "les", "lo", "los", "mas", "me", "mi", "mis", "o", "para",
    "por", "que", "se", "sobre", "son", "su", "sus", "te", "tu", "un", "una", "unas", "unos", "y",
];

/// Lowercases and strips diacritics (`"Película"` → `"pelicula"`, `"ñ"` → `"n"`).
///
/// Non-ASCII code points left after NFD decomposition are dropped.
pub fn normalize(text: &str) -> String {
    text.nfd()
        .filter(char::is_ascii)
        .collect::<String>()
        .to_lowercase()
}

/// Splits normalized text into alphanumeric tokens, dropping punctuation
pub fn tokenize(text: &str) -> Vec<&str> {
    static WORD: OnceLock<Regex> = OnceLock::new();
    let word = WORD.get_or_init(|| Regex::new(r"[[:alnum:]]+").expect("static regex"));
    word.find_iter(text).map(|m| m.as_str()).collect()
}

pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token)
}

/// Collapses runs of whitespace and trims; `None` when nothing is left
pub fn clean_topic(topic: &str) -> Option<String> {
    static SPACES: OnceLock<Regex> = OnceLock::new();
    let spaces = SPACES.get_or_init(|| Regex::new(r"\s+").expect("static regex"));
    let cleaned = spaces.replace_all(topic, " ").trim().to_string();
    (!cleaned.is_empty()).then_some(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_accents_and_case() {
        assert_eq!(normalize("Recomiéndame una PELÍCULA"), "recomiendame una pelicula");
        assert_eq!(normalize("muéstrame"), "muestrame");
        assert_eq!(normalize("Señor"), "senor");
        assert_eq!(normalize("¿qué hay?"), "que hay?");
    }

    #[test]
    fn test_tokenize_drops_punctuation() {
        assert_eq!(
            tokenize("peliculas de terror, por favor!"),
            vec!["peliculas", "de", "terror", "por", "favor"]
        );
        assert!(tokenize("?!").is_empty());
    }

    #[test]
    fn test_comparison_word_is_stopword() {
        assert!(is_stopword("como"));
        assert!(!is_stopword("pelicula"));
    }

    #[test]
    fn test_clean_topic() {
        assert_eq!(clean_topic("  ciencia   ficcion \n"), Some("ciencia ficcion".to_string()));
        assert_eq!(clean_topic("   "), None);
    }
}
