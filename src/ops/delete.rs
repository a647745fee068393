use crate::error::{DictError, Result};
use crate::tree::{Dictionary, DictionaryEvent, NodeId};
use log::debug;

impl Dictionary {
    /// Delete a key.
    ///
    /// With `include_children` all descendants are removed first. A node left
    /// without children is removed and its empty ancestors are pruned; a node
    /// that still has children is demoted to an intermediate node with its
    /// text and comment cleared.
    pub fn delete(&mut self, node: NodeId, include_children: bool) -> Result<()> {
        let target = self.get(node)?;
        if target.is_root() {
            return Err(DictError::InvalidOperation(
                "the root cannot be deleted".to_string(),
            ));
        }
        debug!(
            "deleting '{}' (subtree: {})",
            target.full_key, include_children
        );
        let parent = target.parent;

        if include_children {
            for child in self.get(node)?.children.clone() {
                self.delete_subtree(child)?;
            }
        }

        let old_key = self.unregister_key(node)?;
        if self.get(node)?.has_children() {
            if let Some(key) = old_key {
                self.events.push(DictionaryEvent::KeyDemoted(key));
            }
        } else {
            if let Some(key) = old_key {
                self.events.push(DictionaryEvent::KeyRemoved(key));
            }
            self.remove_leaf(node)?;
            if let Some(parent) = parent {
                self.prune_upward(parent)?;
            }
        }

        self.touch();
        Ok(())
    }

    /// Delete a key by name
    pub fn delete_key(&mut self, key: &str, include_children: bool) -> Result<()> {
        let id = self.require_key(key)?;
        self.delete(id, include_children)
    }

    fn delete_subtree(&mut self, node: NodeId) -> Result<()> {
        for child in self.get(node)?.children.clone() {
            self.delete_subtree(child)?;
        }
        if let Some(key) = self.unregister_key(node)? {
            self.events.push(DictionaryEvent::KeyRemoved(key));
        }
        self.remove_leaf(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_leaf_prunes_ancestors() {
        let mut dict = Dictionary::new();
        dict.resolve("a.b.c", true, false).unwrap();
        dict.delete_key("a.b.c", false).unwrap();

        assert!(dict.is_empty());
        assert!(dict.get(dict.root()).unwrap().children().is_empty());
    }

    #[test]
    fn test_delete_key_with_children_demotes() {
        let mut dict = Dictionary::new();
        dict.add_culture("en").unwrap();
        let a = dict.resolve("a", true, false).unwrap().unwrap();
        dict.set_text(a, "en", "A").unwrap();
        dict.set_comment(a, Some("note".to_string())).unwrap();
        dict.resolve("a.b", true, false).unwrap();

        dict.delete(a, false).unwrap();
        let node = dict.get(a).unwrap();
        assert!(!node.is_full_key());
        assert_eq!(node.text("en"), "");
        assert_eq!(node.comment(), None);
        assert!(dict.contains_key("a.b"));
    }

    #[test]
    fn test_delete_with_children_removes_subtree() {
        let mut dict = Dictionary::new();
        dict.resolve("x.keep", true, false).unwrap();
        dict.resolve("x.a", true, false).unwrap();
        dict.resolve("x.a.b", true, false).unwrap();
        dict.resolve("x.a.b.c", true, false).unwrap();

        dict.delete_key("x.a", true).unwrap();
        assert_eq!(dict.len(), 1);
        assert!(dict.contains_key("x.keep"));
        assert!(dict.lookup("x.a", false).unwrap().is_none());
    }

    #[test]
    fn test_delete_root_is_rejected() {
        let mut dict = Dictionary::new();
        let root = dict.root();
        assert!(dict.delete(root, true).is_err());
    }
}
