use crate::config::EngineConfig;
use crate::tree::{CultureText, Dictionary, DictionaryNode};
use std::collections::{BTreeSet, HashSet};

use super::placeholder::{key_references, placeholder_names};

/// Run all checks on a full key in order and describe the first failure
pub(crate) fn check_node(dict: &Dictionary, node: &DictionaryNode, config: &EngineConfig) -> Option<String> {
    check_ranges(node)
        .or_else(|| check_missing(dict, node))
        .or_else(|| check_references(dict, node))
        .or_else(|| check_consistency(dict, node, config))
}

fn check_ranges(node: &DictionaryNode) -> Option<String> {
    for (culture, text) in node.culture_texts() {
        let mut seen = HashSet::new();
        for q in text.quantified() {
            if !q.count_in_range() {
                return Some(format!("[{}] count {} is out of range", culture, q.count));
            }
            if !q.modulo_in_range() {
                return Some(format!("[{}] modulo {} is out of range", culture, q.modulo));
            }
            if !seen.insert((q.count, q.modulo)) {
                return Some(if q.modulo == 0 {
                    format!("[{}] duplicate text for count {}", culture, q.count)
                } else {
                    format!(
                        "[{}] duplicate text for count {} modulo {}",
                        culture, q.count, q.modulo
                    )
                });
            }
        }
    }
    None
}

fn check_missing(dict: &Dictionary, node: &DictionaryNode) -> Option<String> {
    for culture in dict.cultures() {
        let text = node.culture_text(culture);
        if text.is_some_and(|t| t.accept_missing || !t.text.is_empty()) {
            continue;
        }
        if culture.len() == 5 {
            // Region cultures fall back to their language
            let parent = &culture[..2];
            if node.culture_text(parent).is_some() {
                continue;
            }
        }
        return Some(format!("[{}] missing translation", culture));
    }
    None
}

fn check_references(dict: &Dictionary, node: &DictionaryNode) -> Option<String> {
    let own_key = node.full_key();
    for (culture, text) in node.culture_texts() {
        for target in references_of(text) {
            if target == own_key {
                return Some(format!("[{}] text references its own key", culture));
            }
            if !dict.contains_key(target) {
                return Some(format!("[{}] referenced key '{}' does not exist", culture, target));
            }
            if reaches(dict, target, own_key) {
                return Some(format!(
                    "[{}] reference to '{}' leads back to this key",
                    culture, target
                ));
            }
        }
    }
    None
}

fn references_of(text: &CultureText) -> Vec<&str> {
    std::iter::once(text.text.as_str())
        .chain(text.quantified().iter().map(|q| q.text.as_str()))
        .flat_map(key_references)
        .collect()
}

/// Whether following references from `start` arrives at `goal`
fn reaches(dict: &Dictionary, start: &str, goal: &str) -> bool {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut stack = vec![start];
    while let Some(key) = stack.pop() {
        if !visited.insert(key) {
            continue;
        }
        let Some(node) = dict.find_key(key).and_then(|id| dict.node(id)) else {
            continue;
        };
        for text in node.culture_texts().values() {
            for target in references_of(text) {
                if target == goal {
                    return true;
                }
                stack.push(target);
            }
        }
    }
    false
}

fn check_consistency(dict: &Dictionary, node: &DictionaryNode, config: &EngineConfig) -> Option<String> {
    let primary_culture = dict.primary_culture()?;
    let primary = node.culture_text(primary_culture)?;

    for (culture, text) in node.culture_texts() {
        if culture == primary_culture {
            continue;
        }
        if let Some(remark) = compare_texts(culture, &primary.text, &text.text, true, text, config) {
            return Some(remark);
        }
        for q in text.quantified() {
            let reference = match primary.find_quantified(q.count, q.modulo) {
                Some(p) => p.text.as_str(),
                None if config.fallback_to_primary_culture => primary.text.as_str(),
                None => continue,
            };
            if let Some(remark) = compare_texts(culture, reference, &q.text, false, text, config) {
                return Some(remark);
            }
        }
    }
    None
}

fn compare_texts(
    culture: &str,
    reference: &str,
    translated: &str,
    include_count: bool,
    flags: &CultureText,
    config: &EngineConfig,
) -> Option<String> {
    if reference.is_empty() || translated.is_empty() {
        return None;
    }
    if !flags.accept_placeholders {
        let expected = placeholder_names(reference, include_count);
        let actual = placeholder_names(translated, include_count);
        if expected != actual {
            return Some(format!(
                "[{}] placeholders differ: expected {}, found {}",
                culture,
                describe(&expected),
                describe(&actual)
            ));
        }
    }
    if !flags.accept_punctuation {
        let (lead_ref, trail_ref) = punctuation_runs(reference, config);
        let (lead, trail) = punctuation_runs(translated, config);
        if lead_ref != lead {
            return Some(format!(
                "[{}] leading punctuation differs: expected '{}', found '{}'",
                culture, lead_ref, lead
            ));
        }
        if trail_ref != trail {
            return Some(format!(
                "[{}] trailing punctuation differs: expected '{}', found '{}'",
                culture, trail_ref, trail
            ));
        }
    }
    None
}

/// Leading and trailing runs of punctuation characters.
///
/// A text made only of punctuation has it all as leading run.
fn punctuation_runs<'a>(text: &'a str, config: &EngineConfig) -> (&'a str, &'a str) {
    let lead_end = text
        .char_indices()
        .find(|(_, c)| !config.is_punctuation(*c))
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    let rest = &text[lead_end..];
    let trail_start = rest
        .char_indices()
        .rev()
        .find(|(_, c)| !config.is_punctuation(*c))
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(rest.len());
    (&text[..lead_end], &rest[trail_start..])
}

fn describe(names: &BTreeSet<&str>) -> String {
    if names.is_empty() {
        return "none".to_string();
    }
    names
        .iter()
        .map(|n| format!("{{{}}}", n))
        .collect::<Vec<_>>()
        .join(" ")
}
