use crate::error::{DictError, Result};
use crate::tree::{Dictionary, KeyPath, NodeId};
use log::debug;

impl Dictionary {
    /// Copy a node's content to `new_path`, and with `include_children` its
    /// whole subtree, re-based under the new key. The source is left
    /// untouched; existing content at the destination is merged.
    ///
    /// Returns the destination node.
    pub fn duplicate(
        &mut self,
        node: NodeId,
        new_path: &str,
        include_children: bool,
    ) -> Result<NodeId> {
        let target = KeyPath::parse(new_path)?;
        let source = self.get(node)?;
        if source.is_root() {
            return Err(DictError::InvalidOperation(
                "the root cannot be duplicated".to_string(),
            ));
        }
        let hint = source.is_namespace;
        debug!(
            "duplicating '{}' to '{}' (subtree: {})",
            source.full_key, target, include_children
        );

        // Taken before writing so that copying into the own subtree terminates
        let entries = self.snapshot_subtree(node, include_children)?;
        let dest = self.ensure_path(&target, hint)?;

        for entry in &entries {
            let mut current = dest;
            for name in &entry.relative {
                current = match self.find_child(current, name) {
                    Some(child) => child,
                    None => self.create_child(current, name, false)?,
                };
            }
            self.merge_content(&entry.content, current)?;
        }

        // Nothing may have been copied, e.g. from an intermediate node
        for entry in entries.iter().rev() {
            let mut current = Some(dest);
            for name in &entry.relative {
                current = current.and_then(|c| self.find_child(c, name));
            }
            if let Some(id) = current {
                self.prune_upward(id)?;
            }
        }

        self.touch();
        Ok(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict_with(keys: &[(&str, &str)]) -> Dictionary {
        let mut dict = Dictionary::new();
        dict.add_culture("en").unwrap();
        for (key, text) in keys {
            let id = dict.resolve(key, true, false).unwrap().unwrap();
            dict.set_text(id, "en", *text).unwrap();
        }
        dict
    }

    #[test]
    fn test_duplicate_single_key() {
        let mut dict = dict_with(&[("a", "A"), ("a.b", "B")]);
        let a = dict.find_key("a").unwrap();
        let copy = dict.duplicate(a, "z", false).unwrap();

        assert_eq!(dict.get(copy).unwrap().text("en"), "A");
        assert!(!dict.get(copy).unwrap().has_children());
        assert_eq!(dict.get(a).unwrap().text("en"), "A");
        assert!(dict.contains_key("a.b"));
    }

    #[test]
    fn test_duplicate_subtree() {
        let mut dict = dict_with(&[("a", "A"), ("a.b.c", "C")]);
        let a = dict.find_key("a").unwrap();
        dict.duplicate(a, "ns:copy", true).unwrap();

        assert!(dict.contains_key("ns:copy"));
        assert!(dict.contains_key("ns:copy.b.c"));
        assert!(!dict.contains_key("ns:copy.b"));
        assert!(dict.contains_key("a.b.c"));
    }

    #[test]
    fn test_duplicate_into_own_subtree_terminates() {
        let mut dict = dict_with(&[("a", "A"), ("a.b", "B")]);
        let a = dict.find_key("a").unwrap();
        dict.duplicate(a, "a.b.copy", true).unwrap();

        assert!(dict.contains_key("a.b.copy"));
        assert!(dict.contains_key("a.b.copy.b"));
        assert!(!dict.contains_key("a.b.copy.b.copy"));
    }

    #[test]
    fn test_duplicate_of_intermediate_without_children_leaves_nothing() {
        let mut dict = dict_with(&[("a.b", "B")]);
        let a = dict.lookup("a", false).unwrap().unwrap();
        dict.duplicate(a, "z", false).unwrap();
        assert!(dict.lookup("z", false).unwrap().is_none());
    }
}
