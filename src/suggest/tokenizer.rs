use crate::config::StopwordSource;
use crate::validate::placeholder::strip_placeholders;

/// Shortest token that takes part in scoring
pub const MIN_TOKEN_CHARS: usize = 2;

/// Words of `text` relevant for matching: alphanumeric runs of at least
/// [`MIN_TOKEN_CHARS`] characters outside placeholders, minus the stopwords
/// of `language`. Case is preserved.
pub fn tokenize(text: &str, language: &str, stopwords: &dyn StopwordSource) -> Vec<String> {
    strip_placeholders(text)
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| word.chars().count() >= MIN_TOKEN_CHARS)
        .filter(|word| !stopwords.is_stopword(language, &word.to_lowercase()))
        .map(str::to_string)
        .collect()
}
