use crate::error::{DictError, Result};
use crate::tree::{CultureText, Dictionary, DictionaryEvent, NodeId};
use log::debug;

/// Per-culture switches that silence specific validator findings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AcceptFlags {
    pub missing: bool,
    pub placeholders: bool,
    pub punctuation: bool,
}

impl Dictionary {
    /// Register a culture; every full key gets an empty text for it.
    /// Returns `false` if the culture was already known.
    pub fn add_culture(&mut self, culture: &str) -> Result<bool> {
        validate_culture_name(culture)?;
        if self.cultures.iter().any(|c| c == culture) {
            return Ok(false);
        }
        debug!("adding culture '{}'", culture);
        self.cultures.push(culture.to_string());
        for id in self.index.values().copied().collect::<Vec<_>>() {
            self.get_mut(id)?
                .culture_texts
                .entry(culture.to_string())
                .or_default();
        }
        self.events
            .push(DictionaryEvent::CultureAdded(culture.to_string()));
        self.touch();
        Ok(true)
    }

    /// Remove a culture and all its texts. Returns `false` if it was unknown.
    pub fn remove_culture(&mut self, culture: &str) -> Result<bool> {
        let Some(pos) = self.cultures.iter().position(|c| c == culture) else {
            return Ok(false);
        };
        debug!("removing culture '{}'", culture);
        self.cultures.remove(pos);
        for node in self.nodes.iter_mut().flatten() {
            node.culture_texts.remove(culture);
        }
        if self.primary_culture.as_deref() == Some(culture) {
            self.primary_culture = None;
            self.events.push(DictionaryEvent::PrimaryCultureChanged(None));
        }
        self.events
            .push(DictionaryEvent::CultureRemoved(culture.to_string()));
        self.touch();
        Ok(true)
    }

    pub fn set_primary_culture(&mut self, culture: Option<&str>) -> Result<()> {
        if let Some(c) = culture {
            if !self.cultures.iter().any(|known| known == c) {
                return Err(DictError::InvalidOperation(format!(
                    "unknown culture '{}'",
                    c
                )));
            }
        }
        if self.primary_culture.as_deref() == culture {
            return Ok(());
        }
        self.primary_culture = culture.map(str::to_string);
        self.events.push(DictionaryEvent::PrimaryCultureChanged(
            self.primary_culture.clone(),
        ));
        self.touch();
        Ok(())
    }

    pub fn set_text(&mut self, node: NodeId, culture: &str, text: impl Into<String>) -> Result<()> {
        let text = text.into();
        self.culture_text_mut(node, culture)?.text = text;
        self.text_changed(node, culture)
    }

    pub fn set_quantified_text(
        &mut self,
        node: NodeId,
        culture: &str,
        count: i32,
        modulo: i32,
        text: impl Into<String>,
    ) -> Result<()> {
        self.culture_text_mut(node, culture)?
            .set_quantified(count, modulo, text);
        self.text_changed(node, culture)
    }

    pub fn remove_quantified_text(
        &mut self,
        node: NodeId,
        culture: &str,
        count: i32,
        modulo: i32,
    ) -> Result<bool> {
        let removed = self
            .culture_text_mut(node, culture)?
            .remove_quantified(count, modulo);
        if removed {
            self.text_changed(node, culture)?;
        }
        Ok(removed)
    }

    pub fn set_accept_flags(&mut self, node: NodeId, culture: &str, flags: AcceptFlags) -> Result<()> {
        let ct = self.culture_text_mut(node, culture)?;
        ct.accept_missing = flags.missing;
        ct.accept_placeholders = flags.placeholders;
        ct.accept_punctuation = flags.punctuation;
        self.text_changed(node, culture)
    }

    pub fn set_comment(&mut self, node: NodeId, comment: Option<String>) -> Result<()> {
        let target = self.full_key_mut(node)?;
        target.comment = comment.filter(|c| !c.is_empty());
        let key = target.full_key.clone();
        self.events.push(DictionaryEvent::CommentChanged(key));
        self.touch();
        Ok(())
    }

    fn full_key_mut(&mut self, node: NodeId) -> Result<&mut crate::tree::DictionaryNode> {
        let target = self.get_mut(node)?;
        if !target.is_full_key {
            return Err(DictError::NotAFullKey {
                key: target.full_key.clone(),
            });
        }
        Ok(target)
    }

    fn culture_text_mut(&mut self, node: NodeId, culture: &str) -> Result<&mut CultureText> {
        if !self.cultures.iter().any(|c| c == culture) {
            return Err(DictError::InvalidOperation(format!(
                "unknown culture '{}'",
                culture
            )));
        }
        Ok(self
            .full_key_mut(node)?
            .culture_texts
            .entry(culture.to_string())
            .or_default())
    }

    fn text_changed(&mut self, node: NodeId, culture: &str) -> Result<()> {
        let key = self.get(node)?.full_key.clone();
        self.events.push(DictionaryEvent::TextChanged {
            key,
            culture: culture.to_string(),
        });
        self.touch();
        Ok(())
    }
}

/// Culture names are `xx` or `xx-YY` style tags
fn validate_culture_name(culture: &str) -> Result<()> {
    let valid = !culture.is_empty()
        && culture
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(DictError::InvalidOperation(format!(
            "invalid culture name '{}'",
            culture
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_culture_fills_existing_keys() {
        let mut dict = Dictionary::new();
        let id = dict.resolve("a", true, false).unwrap().unwrap();
        assert!(dict.add_culture("de").unwrap());
        assert!(!dict.add_culture("de").unwrap());
        assert!(dict.get(id).unwrap().culture_text("de").is_some());
    }

    #[test]
    fn test_new_keys_get_all_cultures() {
        let mut dict = Dictionary::new();
        dict.add_culture("en").unwrap();
        dict.add_culture("de").unwrap();
        let id = dict.resolve("a", true, false).unwrap().unwrap();
        assert_eq!(dict.get(id).unwrap().culture_texts().len(), 2);
    }

    #[test]
    fn test_remove_culture_clears_primary() {
        let mut dict = Dictionary::new();
        dict.add_culture("en").unwrap();
        dict.set_primary_culture(Some("en")).unwrap();
        dict.remove_culture("en").unwrap();
        assert_eq!(dict.primary_culture(), None);
    }

    #[test]
    fn test_set_text_requires_full_key() {
        let mut dict = Dictionary::new();
        dict.add_culture("en").unwrap();
        dict.resolve("a.b", true, false).unwrap();
        let a = dict.lookup("a", false).unwrap().unwrap();
        let err = dict.set_text(a, "en", "x").unwrap_err();
        assert!(matches!(err, DictError::NotAFullKey { .. }));
    }

    #[test]
    fn test_set_text_unknown_culture() {
        let mut dict = Dictionary::new();
        let a = dict.resolve("a", true, false).unwrap().unwrap();
        assert!(dict.set_text(a, "fr", "x").is_err());
    }

    #[test]
    fn test_edits_emit_events_and_bump_generation() {
        let mut dict = Dictionary::new();
        dict.add_culture("en").unwrap();
        let a = dict.resolve("a", true, false).unwrap().unwrap();
        dict.take_events();

        let before = dict.generation();
        dict.set_text(a, "en", "Hello").unwrap();
        assert!(dict.generation() > before);
        assert_eq!(
            dict.take_events(),
            vec![DictionaryEvent::TextChanged {
                key: "a".to_string(),
                culture: "en".to_string()
            }]
        );
    }

    #[test]
    fn test_invalid_culture_name() {
        let mut dict = Dictionary::new();
        assert!(dict.add_culture("").is_err());
        assert!(dict.add_culture("de CH").is_err());
    }
}
