use crate::error::{DictError, Result};
use crate::tree::{Dictionary, KeyPath, NodeId};
use log::debug;

impl Dictionary {
    /// Find the node of `path`, optionally creating it.
    ///
    /// Intermediate nodes are created as non-full segments. With
    /// `create_if_missing` the terminal node is promoted to a full key and
    /// indexed. `namespace_hint` only matters for a single-segment path
    /// without `:`, which then denotes a namespace.
    pub fn resolve(
        &mut self,
        path: &str,
        create_if_missing: bool,
        namespace_hint: bool,
    ) -> Result<Option<NodeId>> {
        let key = KeyPath::parse(path)?;
        if !create_if_missing {
            return self.lookup_path(&key, namespace_hint);
        }

        let id = self.ensure_path(&key, namespace_hint)?;
        if !self.get(id)?.is_full_key {
            debug!("registering key '{}'", path);
            self.register_key(id)?;
            self.touch();
        }
        Ok(Some(id))
    }

    /// Non-mutating variant of [`Dictionary::resolve`]
    pub fn lookup(&self, path: &str, namespace_hint: bool) -> Result<Option<NodeId>> {
        let key = KeyPath::parse(path)?;
        self.lookup_path(&key, namespace_hint)
    }

    /// Node of a full key, failing when it does not exist
    pub fn require_key(&self, path: &str) -> Result<NodeId> {
        self.find_key(path)
            .ok_or_else(|| DictError::key_not_found(path))
    }

    pub(crate) fn lookup_path(&self, key: &KeyPath, namespace_hint: bool) -> Result<Option<NodeId>> {
        let mut current = self.root;
        for (name, is_namespace) in key.slots(namespace_hint) {
            match self.find_child(current, name) {
                Some(child) => {
                    self.check_slot(child, is_namespace)?;
                    current = child;
                }
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    /// Walk to the node of `key`, creating missing nodes without promoting
    /// the terminal node to a full key
    pub(crate) fn ensure_path(&mut self, key: &KeyPath, namespace_hint: bool) -> Result<NodeId> {
        let slots: Vec<(String, bool)> = key
            .slots(namespace_hint)
            .into_iter()
            .map(|(name, ns)| (name.to_string(), ns))
            .collect();
        self.ensure_slots(&slots)
    }

    pub(crate) fn ensure_slots(&mut self, slots: &[(String, bool)]) -> Result<NodeId> {
        let mut current = self.root;
        for (name, is_namespace) in slots {
            current = match self.find_child(current, name) {
                Some(child) => {
                    self.check_slot(child, *is_namespace)?;
                    child
                }
                None => {
                    let child = self.create_child(current, name, *is_namespace)?;
                    self.touch();
                    child
                }
            };
        }
        Ok(current)
    }

    fn check_slot(&self, child: NodeId, want_namespace: bool) -> Result<()> {
        let node = self.get(child)?;
        match (want_namespace, node.is_namespace) {
            (true, false) => Err(DictError::NamespaceConflict {
                key: node.full_key.clone(),
            }),
            (false, true) => Err(DictError::NonNamespaceConflict {
                key: node.full_key.clone(),
            }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_creates_intermediate_nodes() {
        let mut dict = Dictionary::new();
        let id = dict.resolve("ns:a.b", true, false).unwrap().unwrap();

        let node = dict.get(id).unwrap();
        assert_eq!(node.full_key(), "ns:a.b");
        assert!(node.is_full_key());

        let ns = dict.lookup("ns", true).unwrap().unwrap();
        assert!(dict.get(ns).unwrap().is_namespace());
        assert!(!dict.get(ns).unwrap().is_full_key());

        let a = dict.lookup("ns:a", false).unwrap().unwrap();
        assert!(!dict.get(a).unwrap().is_full_key());
        assert_eq!(dict.len(), 1);
    }

    #[test]
    fn test_resolve_without_create_returns_none() {
        let mut dict = Dictionary::new();
        assert!(dict.resolve("a.b", false, false).unwrap().is_none());
        assert!(!dict.is_modified());
    }

    #[test]
    fn test_resolve_promotes_existing_intermediate() {
        let mut dict = Dictionary::new();
        dict.resolve("a.b", true, false).unwrap();
        let a = dict.resolve("a", true, false).unwrap().unwrap();
        assert!(dict.get(a).unwrap().is_full_key());
        assert_eq!(dict.find_key("a"), Some(a));
    }

    #[test]
    fn test_namespace_conflicts() {
        let mut dict = Dictionary::new();
        dict.resolve("plain.x", true, false).unwrap();
        dict.resolve("ns:x", true, false).unwrap();

        let err = dict.resolve("plain:y", true, false).unwrap_err();
        assert!(matches!(err, DictError::NamespaceConflict { .. }));

        let err = dict.resolve("ns.y", true, false).unwrap_err();
        assert!(matches!(err, DictError::NonNamespaceConflict { .. }));
        assert!(err.is_conflict());
    }

    #[test]
    fn test_namespace_hint_on_single_segment() {
        let mut dict = Dictionary::new();
        let ns = dict.resolve("Tx", true, true).unwrap().unwrap();
        assert!(dict.get(ns).unwrap().is_namespace());
        dict.resolve("Tx:date", true, false).unwrap();
        assert!(dict.contains_key("Tx:date"));
    }
}
