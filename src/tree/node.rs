use serde::Serialize;
use std::collections::BTreeMap;

/// Largest valid count of a quantified text
pub const MAX_COUNT: i32 = 65535;
/// Valid modulo range when modulo is used (0 means unused)
pub const MIN_MODULO: i32 = 2;
pub const MAX_MODULO: i32 = 1000;

/// Stable address of a node in the dictionary arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Text variant selected by a count and an optional modulo
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuantifiedText {
    pub count: i32,
    /// 0 when unused
    pub modulo: i32,
    pub text: String,
}

impl QuantifiedText {
    pub fn new(count: i32, modulo: i32, text: impl Into<String>) -> Self {
        Self {
            count,
            modulo,
            text: text.into(),
        }
    }

    pub fn count_in_range(&self) -> bool {
        (0..=MAX_COUNT).contains(&self.count)
    }

    pub fn modulo_in_range(&self) -> bool {
        self.modulo == 0 || (MIN_MODULO..=MAX_MODULO).contains(&self.modulo)
    }

    fn slot(&self) -> (i32, i32) {
        (self.count, self.modulo)
    }
}

/// One culture's text of a key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CultureText {
    pub text: String,
    pub accept_missing: bool,
    pub accept_placeholders: bool,
    pub accept_punctuation: bool,
    /// Ordered by `(count, modulo)`
    pub(crate) quantified: Vec<QuantifiedText>,
}

impl CultureText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn quantified(&self) -> &[QuantifiedText] {
        &self.quantified
    }

    pub fn find_quantified(&self, count: i32, modulo: i32) -> Option<&QuantifiedText> {
        self.quantified
            .iter()
            .find(|q| q.count == count && q.modulo == modulo)
    }

    /// Neither default text nor any quantified text
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.quantified.is_empty()
    }

    /// Insert or replace the text for `(count, modulo)`
    pub fn set_quantified(&mut self, count: i32, modulo: i32, text: impl Into<String>) {
        let text = text.into();
        match self
            .quantified
            .iter_mut()
            .find(|q| q.count == count && q.modulo == modulo)
        {
            Some(existing) => existing.text = text,
            None => self.push_quantified(QuantifiedText::new(count, modulo, text)),
        }
    }

    /// Insert keeping the order, without replacing an existing slot.
    ///
    /// Used when loading so that duplicate slots in a file stay visible to
    /// the validator.
    pub(crate) fn push_quantified(&mut self, quantified: QuantifiedText) {
        let pos = self
            .quantified
            .iter()
            .position(|q| q.slot() > quantified.slot())
            .unwrap_or(self.quantified.len());
        self.quantified.insert(pos, quantified);
    }

    pub fn remove_quantified(&mut self, count: i32, modulo: i32) -> bool {
        let before = self.quantified.len();
        self.quantified
            .retain(|q| !(q.count == count && q.modulo == modulo));
        before != self.quantified.len()
    }

    /// Merge `source` into this text; the source wins wherever it is non-empty
    pub fn merge_from(&mut self, source: &CultureText) {
        if !source.text.is_empty() {
            self.text = source.text.clone();
        }
        for q in &source.quantified {
            if !q.text.is_empty() {
                self.set_quantified(q.count, q.modulo, q.text.clone());
            }
        }
        self.accept_missing |= source.accept_missing;
        self.accept_placeholders |= source.accept_placeholders;
        self.accept_punctuation |= source.accept_punctuation;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// A node of the dictionary tree: namespace, intermediate segment or full key
#[derive(Debug, Clone)]
pub struct DictionaryNode {
    pub(crate) segment_name: String,
    pub(crate) full_key: String,
    pub(crate) is_namespace: bool,
    pub(crate) is_full_key: bool,
    pub(crate) comment: Option<String>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) culture_texts: BTreeMap<String, CultureText>,
}

impl DictionaryNode {
    pub(crate) fn root() -> Self {
        Self::new(String::new(), String::new(), false, None)
    }

    pub(crate) fn new(
        segment_name: String,
        full_key: String,
        is_namespace: bool,
        parent: Option<NodeId>,
    ) -> Self {
        Self {
            segment_name,
            full_key,
            is_namespace,
            is_full_key: false,
            comment: None,
            parent,
            children: Vec::new(),
            culture_texts: BTreeMap::new(),
        }
    }

    pub fn segment_name(&self) -> &str {
        &self.segment_name
    }

    pub fn full_key(&self) -> &str {
        &self.full_key
    }

    pub fn is_namespace(&self) -> bool {
        self.is_namespace
    }

    pub fn is_full_key(&self) -> bool {
        self.is_full_key
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn culture_texts(&self) -> &BTreeMap<String, CultureText> {
        &self.culture_texts
    }

    pub fn culture_text(&self, culture: &str) -> Option<&CultureText> {
        self.culture_texts.get(culture)
    }

    /// Text of `culture`, empty when the culture has no entry
    pub fn text(&self, culture: &str) -> &str {
        self.culture_texts
            .get(culture)
            .map(|ct| ct.text.as_str())
            .unwrap_or("")
    }
}
