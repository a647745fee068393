//! Translation reuse suggestions.
//!
//! Given the primary text of a key, finds other keys whose primary text
//! shares words with it and offers their translations.

pub mod tokenizer;

use crate::compare::natural;
use crate::config::{language_of, EngineConfig, StaticStopwords, StopwordSource};
use crate::error::Result;
use crate::tree::{Dictionary, NodeId};
use log::debug;
use serde::Serialize;
use std::collections::HashSet;

pub use tokenizer::tokenize;

/// Score of a candidate whose primary text equals the reference text
pub const EXACT_MATCH_SCORE: f64 = f64::MAX;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub key: String,
    pub primary_text: String,
    /// Text in the requested culture, when that is not the primary culture
    pub target_text: Option<String>,
    pub score: f64,
}

impl Suggestion {
    pub fn is_exact(&self) -> bool {
        self.score == EXACT_MATCH_SCORE
    }
}

pub struct SuggestionEngine<'a> {
    config: &'a EngineConfig,
    stopwords: Box<dyn StopwordSource + 'a>,
}

impl<'a> SuggestionEngine<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self {
            config,
            stopwords: Box::new(StaticStopwords),
        }
    }

    pub fn with_stopwords(mut self, stopwords: impl StopwordSource + 'a) -> Self {
        self.stopwords = Box::new(stopwords);
        self
    }

    /// Suggestions for the key `node`, using its primary text as reference
    pub fn suggest(&self, dict: &Dictionary, node: NodeId, target_culture: &str) -> Result<Vec<Suggestion>> {
        let Some(primary) = dict.comment_culture() else {
            return Ok(Vec::new());
        };
        let reference = dict.get(node)?.text(primary).to_string();
        Ok(self.suggest_for_text(dict, &reference, Some(node), target_culture))
    }

    /// Suggestions for an arbitrary reference text
    pub fn suggest_for_text(
        &self,
        dict: &Dictionary,
        reference: &str,
        exclude: Option<NodeId>,
        target_culture: &str,
    ) -> Vec<Suggestion> {
        let Some(primary) = dict.comment_culture() else {
            return Vec::new();
        };
        if reference.trim().is_empty() {
            return Vec::new();
        }
        let language = language_of(primary);
        let reference_tokens = tokenize(reference, &language, self.stopwords.as_ref());
        let exact: HashSet<&str> = reference_tokens.iter().map(String::as_str).collect();
        let folded: HashSet<String> = reference_tokens.iter().map(|t| t.to_lowercase()).collect();

        let mut suggestions = Vec::new();
        for id in dict.full_keys() {
            if Some(id) == exclude {
                continue;
            }
            let Some(node) = dict.node(id) else { continue };
            if self.config.is_system_key(node.full_key()) {
                continue;
            }
            let candidate = node.text(primary);
            if candidate.is_empty() {
                continue;
            }

            let score = if candidate == reference {
                EXACT_MATCH_SCORE
            } else {
                let tokens = tokenize(candidate, &language, self.stopwords.as_ref());
                score_tokens(&tokens, &exact, &folded)
            };
            if score < self.config.suggestion_threshold {
                continue;
            }

            let target_text = (target_culture != primary).then(|| node.text(target_culture).to_string());
            suggestions.push(Suggestion {
                key: node.full_key().to_string(),
                primary_text: candidate.to_string(),
                target_text,
                score,
            });
        }

        suggestions.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| natural::compare(&a.key, &b.key))
        });
        debug!(
            "{} suggestions for '{}' (culture {})",
            suggestions.len(),
            reference,
            target_culture
        );
        suggestions
    }
}

/// Each candidate token matching a reference token ignoring case scores 1,
/// plus 2 when it also matches exactly; the sum is divided by the square root
/// of the candidate's token count
fn score_tokens(candidate: &[String], exact: &HashSet<&str>, folded: &HashSet<String>) -> f64 {
    if candidate.is_empty() {
        return 0.0;
    }
    let mut insensitive = 0usize;
    let mut sensitive = 0usize;
    for token in candidate {
        if folded.contains(&token.to_lowercase()) {
            insensitive += 1;
        }
        if exact.contains(token.as_str()) {
            sensitive += 1;
        }
    }
    (insensitive + 2 * sensitive) as f64 / (candidate.len() as f64).sqrt()
}
