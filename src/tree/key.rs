use crate::error::{DictError, Result};
use std::fmt;

pub const NAMESPACE_SEPARATOR: char = ':';
pub const SEGMENT_SEPARATOR: char = '.';

/// A parsed text key: `("<namespace>":)?<segment>("."<segment>)*`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPath {
    pub namespace: Option<String>,
    pub segments: Vec<String>,
}

impl KeyPath {
    /// Parse and validate a key string
    pub fn parse(key: &str) -> Result<Self> {
        if key.is_empty() {
            return Err(DictError::invalid_key(key, "key is empty"));
        }
        if key.matches(NAMESPACE_SEPARATOR).count() > 1 {
            return Err(DictError::invalid_key(key, "more than one ':'"));
        }

        let (namespace, rest) = match key.split_once(NAMESPACE_SEPARATOR) {
            Some((ns, rest)) => {
                validate_segment(key, ns)?;
                (Some(ns.to_string()), rest)
            }
            None => (None, key),
        };

        let mut segments = Vec::new();
        for segment in rest.split(SEGMENT_SEPARATOR) {
            validate_segment(key, segment)?;
            segments.push(segment.to_string());
        }

        Ok(Self {
            namespace,
            segments,
        })
    }

    /// Tree slots from the root down, as `(name, is_namespace)` pairs.
    ///
    /// A single-segment path without a namespace occupies a namespace slot
    /// when `namespace_hint` is set.
    pub fn slots(&self, namespace_hint: bool) -> Vec<(&str, bool)> {
        let mut slots = Vec::with_capacity(self.segments.len() + 1);
        match &self.namespace {
            Some(ns) => {
                slots.push((ns.as_str(), true));
                slots.extend(self.segments.iter().map(|s| (s.as_str(), false)));
            }
            None => {
                let single = self.segments.len() == 1;
                for (i, segment) in self.segments.iter().enumerate() {
                    slots.push((segment.as_str(), i == 0 && single && namespace_hint));
                }
            }
        }
        slots
    }

    pub fn depth(&self) -> usize {
        self.segments.len() + usize::from(self.namespace.is_some())
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ns) = &self.namespace {
            write!(f, "{}{}", ns, NAMESPACE_SEPARATOR)?;
        }
        write!(f, "{}", self.segments.join(&SEGMENT_SEPARATOR.to_string()))
    }
}

fn validate_segment(key: &str, segment: &str) -> Result<()> {
    if segment.is_empty() {
        return Err(DictError::invalid_key(key, "empty segment"));
    }
    if segment.contains(SEGMENT_SEPARATOR) || segment.contains(NAMESPACE_SEPARATOR) {
        return Err(DictError::invalid_key(
            key,
            format!("segment '{}' contains a separator", segment),
        ));
    }
    if segment.trim() != segment {
        return Err(DictError::invalid_key(
            key,
            format!("segment '{}' has leading or trailing whitespace", segment),
        ));
    }
    Ok(())
}

/// Full key of a child node given its parent.
///
/// `parent` is `None` for children of the root.
pub fn child_key(parent: Option<(&str, bool)>, name: &str) -> String {
    match parent {
        None => name.to_string(),
        Some((parent_key, true)) => format!("{}{}{}", parent_key, NAMESPACE_SEPARATOR, name),
        Some((parent_key, false)) => format!("{}{}{}", parent_key, SEGMENT_SEPARATOR, name),
    }
}
