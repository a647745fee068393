use serde::{Deserialize, Serialize};

/// Interchange format a document was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormatVersion {
    /// One document per culture, `<text>` directly below `<translation>`
    V1,
    /// One document, `<culture>` elements below `<translation>`
    V2,
}

/// A single `<text>` element
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationEntry {
    /// The full key (e.g., "ns:invoice.labels.add_new")
    pub key: String,
    pub text: String,
    /// `None` for the default text, otherwise the quantity it applies to
    pub count: Option<i32>,
    /// 0 when unused
    pub modulo: i32,
    pub accept_missing: bool,
    pub accept_placeholders: bool,
    pub accept_punctuation: bool,
    pub comment: Option<String>,
}

impl TranslationEntry {
    pub fn new(key: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
            ..Self::default()
        }
    }
}

/// All entries of one culture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CultureDocument {
    pub name: String,
    pub primary: bool,
    pub entries: Vec<TranslationEntry>,
}

/// A `<text>` element that was dropped while reading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedEntry {
    pub culture: String,
    pub key: Option<String>,
    pub reason: String,
}

/// Result of reading one dictionary file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub source_name: String,
    pub format: FormatVersion,
    pub cultures: Vec<CultureDocument>,
    pub skipped: Vec<SkippedEntry>,
}

impl ParsedDocument {
    pub fn entry_count(&self) -> usize {
        self.cultures.iter().map(|c| c.entries.len()).sum()
    }
}
