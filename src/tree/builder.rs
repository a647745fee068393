use crate::error::Result;
use crate::parse::{ParsedDocument, SkippedEntry, TranslationEntry};
use crate::tree::{Dictionary, KeyPath, QuantifiedText};
use log::{debug, info, warn};
use std::collections::HashSet;

/// A dictionary assembled from parsed documents, with every entry that
/// could not be placed in it
#[derive(Debug)]
pub struct BuildOutcome {
    pub dictionary: Dictionary,
    pub skipped: Vec<SkippedEntry>,
}

/// Merges parsed documents (a v2 document, or a set of v1 documents) into a
/// single dictionary
#[derive(Debug, Default)]
pub struct DictionaryBuilder {
    documents: Vec<ParsedDocument>,
}

impl DictionaryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_document(&mut self, document: ParsedDocument) -> &mut Self {
        self.documents.push(document);
        self
    }

    pub fn from_documents(documents: impl IntoIterator<Item = ParsedDocument>) -> Self {
        Self {
            documents: documents.into_iter().collect(),
        }
    }

    /// Build the dictionary.
    ///
    /// Entries that fail to resolve (conflicting namespace usage) are skipped
    /// and reported together with those the reader already dropped. The
    /// result is unmodified and has no pending events.
    pub fn build(self) -> Result<BuildOutcome> {
        let mut dict = Dictionary::new();
        let mut skipped: Vec<SkippedEntry> = Vec::new();
        let namespaces = self.namespace_names();

        let mut usable = Vec::new();
        for document in &self.documents {
            skipped.extend(document.skipped.iter().cloned());
            for culture in &document.cultures {
                match dict.add_culture(&culture.name) {
                    Ok(_) => usable.push(culture),
                    Err(e) => {
                        warn!("{}: {}", document.source_name, e);
                        skipped.push(SkippedEntry {
                            culture: culture.name.clone(),
                            key: None,
                            reason: e.to_string(),
                        });
                        continue;
                    }
                }
                if culture.primary && dict.primary_culture().is_none() {
                    dict.set_primary_culture(Some(&culture.name))?;
                }
            }
        }

        for culture in usable {
            for entry in &culture.entries {
                if let Err(e) = Self::apply_entry(&mut dict, &culture.name, entry, &namespaces) {
                    warn!("skipping '{}' in culture '{}': {}", entry.key, culture.name, e);
                    skipped.push(SkippedEntry {
                        culture: culture.name.clone(),
                        key: Some(entry.key.clone()),
                        reason: e.to_string(),
                    });
                }
            }
        }

        dict.mark_saved();
        dict.take_events();
        info!(
            "built dictionary: {} keys, {} cultures, {} entries skipped",
            dict.len(),
            dict.cultures().len(),
            skipped.len()
        );
        Ok(BuildOutcome {
            dictionary: dict,
            skipped,
        })
    }

    /// Names used as a namespace by any entry of any document
    fn namespace_names(&self) -> HashSet<String> {
        self.documents
            .iter()
            .flat_map(|d| d.cultures.iter())
            .flat_map(|c| c.entries.iter())
            .filter_map(|e| KeyPath::parse(&e.key).ok()?.namespace)
            .collect()
    }

    fn apply_entry(
        dict: &mut Dictionary,
        culture: &str,
        entry: &TranslationEntry,
        namespaces: &HashSet<String>,
    ) -> Result<()> {
        let path = KeyPath::parse(&entry.key)?;
        let hint = path.namespace.is_none()
            && path.segments.len() == 1
            && namespaces.contains(&path.segments[0]);
        let id = dict.ensure_path(&path, hint)?;
        if !dict.get(id)?.is_full_key {
            dict.register_key(id)?;
        }

        let is_primary = dict.primary_culture() == Some(culture);
        let node = dict.get_mut(id)?;
        let text = node.culture_texts.entry(culture.to_string()).or_default();
        match entry.count {
            Some(count) => {
                text.push_quantified(QuantifiedText::new(count, entry.modulo, entry.text.clone()))
            }
            None => {
                if !entry.text.is_empty() || text.text.is_empty() {
                    text.text = entry.text.clone();
                }
            }
        }
        text.accept_missing |= entry.accept_missing;
        text.accept_placeholders |= entry.accept_placeholders;
        text.accept_punctuation |= entry.accept_punctuation;

        if let Some(comment) = &entry.comment {
            if node.comment.is_none() || is_primary {
                node.comment = Some(comment.clone());
            }
        }
        debug!("loaded '{}' [{}]", entry.key, culture);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{CultureDocument, FormatVersion};

    fn doc(cultures: Vec<CultureDocument>) -> ParsedDocument {
        ParsedDocument {
            source_name: "test".to_string(),
            format: FormatVersion::V2,
            cultures,
            skipped: Vec::new(),
        }
    }

    fn culture(name: &str, primary: bool, entries: Vec<TranslationEntry>) -> CultureDocument {
        CultureDocument {
            name: name.to_string(),
            primary,
            entries,
        }
    }

    #[test]
    fn test_build_merges_cultures() {
        let mut builder = DictionaryBuilder::new();
        builder.add_document(doc(vec![
            culture("en", true, vec![TranslationEntry::new("app:title", "Title")]),
            culture("de", false, vec![TranslationEntry::new("app:title", "Titel")]),
        ]));
        let outcome = builder.build().unwrap();
        let dict = outcome.dictionary;

        assert_eq!(dict.primary_culture(), Some("en"));
        let id = dict.find_key("app:title").unwrap();
        assert_eq!(dict.get(id).unwrap().text("de"), "Titel");
        assert!(!dict.is_modified());
        assert!(outcome.skipped.is_empty());
    }

    #[test]
    fn test_single_segment_namespace_key() {
        let builder = DictionaryBuilder::from_documents(vec![doc(vec![culture(
            "en",
            true,
            vec![
                TranslationEntry::new("ns", "Namespace text"),
                TranslationEntry::new("ns:a", "A"),
            ],
        )])]);
        let dict = builder.build().unwrap().dictionary;
        let ns = dict.find_key("ns").unwrap();
        assert!(dict.get(ns).unwrap().is_namespace());
        assert!(dict.get(ns).unwrap().is_full_key());
    }

    #[test]
    fn test_conflicting_entry_is_skipped() {
        let builder = DictionaryBuilder::from_documents(vec![doc(vec![culture(
            "en",
            true,
            vec![
                TranslationEntry::new("a.b", "plain"),
                TranslationEntry::new("a:c", "namespaced"),
            ],
        )])]);
        let outcome = builder.build().unwrap();
        assert_eq!(outcome.dictionary.len(), 1);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].key.as_deref(), Some("a:c"));
    }

    #[test]
    fn test_primary_comment_wins() {
        let mut de_entry = TranslationEntry::new("k", "K");
        de_entry.comment = Some("from de".to_string());
        let mut en_entry = TranslationEntry::new("k", "K");
        en_entry.comment = Some("from en".to_string());

        let builder = DictionaryBuilder::from_documents(vec![doc(vec![
            culture("de", false, vec![de_entry]),
            culture("en", true, vec![en_entry]),
        ])]);
        let dict = builder.build().unwrap().dictionary;
        let id = dict.find_key("k").unwrap();
        assert_eq!(dict.get(id).unwrap().comment(), Some("from en"));
    }

    #[test]
    fn test_quantified_entries_keep_duplicates() {
        let mut one = TranslationEntry::new("items", "one");
        one.count = Some(1);
        let mut again = TranslationEntry::new("items", "again");
        again.count = Some(1);

        let builder = DictionaryBuilder::from_documents(vec![doc(vec![culture(
            "en",
            true,
            vec![TranslationEntry::new("items", "{#} items"), one, again],
        )])]);
        let dict = builder.build().unwrap().dictionary;
        let id = dict.find_key("items").unwrap();
        let text = dict.get(id).unwrap().culture_text("en").unwrap();
        assert_eq!(text.quantified().len(), 2);
        assert_eq!(text.text, "{#} items");
    }
}
