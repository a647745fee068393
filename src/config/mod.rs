pub mod stopwords;

use crate::error::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub use stopwords::{language_of, StaticStopwords, StopwordSource};

/// Namespace holding engine-internal keys; never validated, never suggested
pub const DEFAULT_SYSTEM_NAMESPACE: &str = "Tx";

/// Minimum score a suggestion needs to be reported
pub const DEFAULT_SUGGESTION_THRESHOLD: f64 = 0.5;

/// Characters compared at the start and end of translated texts
pub fn default_punctuation() -> String {
    concat!(
        " \t\r\n\u{00a0}",
        ".,:;!?\u{2026}\u{00a1}\u{00bf}",
        "\"'\u{00ab}\u{00bb}\u{201e}\u{201c}\u{201d}\u{2018}\u{2019}",
        "()[]-\u{2013}\u{2014}*/\\|"
    )
    .to_string()
}

/// Engine settings.
///
/// Every field has a default, so a JSON file only needs the values it changes:
///
/// ```json
/// { "system_namespace": "Sys", "suggestion_threshold": 0.75 }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub system_namespace: String,
    pub punctuation: String,
    pub suggestion_threshold: f64,
    /// Compare quantified variants against the primary default text when the
    /// primary culture has no variant for the same count
    pub fallback_to_primary_culture: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            system_namespace: DEFAULT_SYSTEM_NAMESPACE.to_string(),
            punctuation: default_punctuation(),
            suggestion_threshold: DEFAULT_SUGGESTION_THRESHOLD,
            fallback_to_primary_culture: true,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn is_punctuation(&self, c: char) -> bool {
        self.punctuation.contains(c)
    }

    /// Whether `key` lies in the system namespace
    pub fn is_system_key(&self, key: &str) -> bool {
        key.split_once(':')
            .map(|(ns, _)| ns)
            .unwrap_or(key)
            == self.system_namespace
    }
}
