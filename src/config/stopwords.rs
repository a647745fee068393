/// Lookup of words that carry no meaning for suggestion scoring
pub trait StopwordSource {
    /// Whether `word` (already lowercased) is a stopword in `language`
    fn is_stopword(&self, language: &str, word: &str) -> bool;
}

/// Built-in stopword tables keyed by two-letter language code
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticStopwords;

const EN: &[&str] = &[
    "a", "about", "after", "all", "an", "and", "are", "as", "at", "be", "been", "but", "by",
    "can", "do", "for", "from", "has", "have", "if", "in", "into", "is", "it", "its", "no",
    "not", "of", "on", "or", "so", "than", "that", "the", "their", "then", "there", "these",
    "this", "to", "was", "were", "will", "with", "you", "your",
];

const DE: &[&str] = &[
    "aber", "als", "am", "an", "auf", "aus", "bei", "bis", "das", "dass", "dem", "den", "der",
    "des", "die", "du", "ein", "eine", "einem", "einen", "einer", "es", "für", "hat", "ich",
    "im", "in", "ist", "mit", "nach", "nicht", "noch", "oder", "sich", "sie", "sind", "so",
    "über", "um", "und", "uns", "von", "vor", "war", "wie", "wir", "wird", "zu", "zum", "zur",
];

const FR: &[&str] = &[
    "au", "aux", "avec", "ce", "ces", "dans", "de", "des", "du", "elle", "en", "et", "est",
    "il", "je", "la", "le", "les", "leur", "lui", "ma", "mais", "me", "mes", "ne", "nous",
    "on", "ou", "par", "pas", "pour", "qu", "que", "qui", "sa", "se", "ses", "son", "sur",
    "ta", "te", "tu", "un", "une", "vos", "votre", "vous",
];

const ES: &[&str] = &[
    "al", "como", "con", "de", "del", "el", "en", "es", "esta", "este", "la", "las", "le",
    "lo", "los", "mas", "mi", "no", "nos", "o", "para", "pero", "por", "que", "se", "si",
    "sin", "su", "sus", "un", "una", "uno", "y", "ya",
];

const IT: &[&str] = &[
    "al", "alla", "che", "chi", "con", "da", "dal", "del", "della", "di", "e", "gli", "il",
    "in", "la", "le", "lo", "ma", "mi", "ne", "nel", "non", "per", "più", "se", "si", "su",
    "sul", "ti", "tra", "un", "una", "uno",
];

const NL: &[&str] = &[
    "aan", "als", "bij", "dat", "de", "den", "der", "die", "dit", "een", "en", "er", "het",
    "hij", "in", "is", "je", "met", "na", "niet", "of", "om", "op", "te", "tot", "uit", "van",
    "voor", "wat", "we", "wij", "ze", "zij", "zijn",
];

impl StaticStopwords {
    fn table(language: &str) -> &'static [&'static str] {
        match language {
            "en" => EN,
            "de" => DE,
            "fr" => FR,
            "es" => ES,
            "it" => IT,
            "nl" => NL,
            _ => &[],
        }
    }
}

impl StopwordSource for StaticStopwords {
    fn is_stopword(&self, language: &str, word: &str) -> bool {
        Self::table(language).contains(&word)
    }
}

/// Two-letter language of a culture name (`de-CH` is `de`)
pub fn language_of(culture: &str) -> String {
    culture
        .split(['-', '_'])
        .next()
        .unwrap_or(culture)
        .to_lowercase()
}
