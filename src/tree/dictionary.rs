use crate::compare::natural;
use crate::error::{DictError, Result};
use crate::tree::events::DictionaryEvent;
use crate::tree::key::child_key;
use crate::tree::node::{DictionaryNode, NodeId};
use crate::validate::{NodeStatus, ValidationReport};
use log::trace;
use std::cmp::Ordering;
use std::collections::HashMap;

/// The dictionary: an arena of nodes, the full-key index and the culture list.
///
/// Nodes are addressed by [`NodeId`]. Structural mutation goes through the key
/// operations in [`crate::ops`], which keep the index consistent with the tree.
#[derive(Debug)]
pub struct Dictionary {
    pub(crate) nodes: Vec<Option<DictionaryNode>>,
    pub(crate) free: Vec<usize>,
    pub(crate) root: NodeId,
    pub(crate) index: HashMap<String, NodeId>,
    /// In the order they were added
    pub(crate) cultures: Vec<String>,
    pub(crate) primary_culture: Option<String>,
    pub(crate) modified: bool,
    pub(crate) generation: u64,
    pub(crate) events: Vec<DictionaryEvent>,
    pub(crate) validation: Option<ValidationReport>,
}

/// Summary counts over the dictionary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    pub full_keys: usize,
    /// Culture name and number of keys with non-empty default text
    pub translated: Vec<(String, usize)>,
    /// Only known when a validation report is applied
    pub keys_with_problems: Option<usize>,
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}

impl Dictionary {
    pub fn new() -> Self {
        Self {
            nodes: vec![Some(DictionaryNode::root())],
            free: Vec::new(),
            root: NodeId(0),
            index: HashMap::new(),
            cultures: Vec::new(),
            primary_culture: None,
            modified: false,
            generation: 0,
            events: Vec::new(),
            validation: None,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&DictionaryNode> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    pub fn get(&self, id: NodeId) -> Result<&DictionaryNode> {
        self.node(id).ok_or(DictError::UnknownNode(id))
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Result<&mut DictionaryNode> {
        self.nodes
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(DictError::UnknownNode(id))
    }

    /// Look up a full key through the index
    pub fn find_key(&self, key: &str) -> Option<NodeId> {
        self.index.get(key).copied()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Number of full keys
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn cultures(&self) -> &[String] {
        &self.cultures
    }

    pub fn primary_culture(&self) -> Option<&str> {
        self.primary_culture.as_deref()
    }

    /// Culture whose entries carry key comments in the file formats
    pub fn comment_culture(&self) -> Option<&str> {
        self.primary_culture
            .as_deref()
            .or_else(|| self.cultures.first().map(String::as_str))
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Clear the modified flag after the host persisted the dictionary
    pub fn mark_saved(&mut self) {
        self.modified = false;
    }

    /// Incremented on every mutation
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Drain pending change events
    pub fn take_events(&mut self) -> Vec<DictionaryEvent> {
        std::mem::take(&mut self.events)
    }

    /// Validation results stored by [`Dictionary::apply_validation`], if still current
    pub fn validation(&self) -> Option<&ValidationReport> {
        self.validation.as_ref()
    }

    pub fn node_status(&self, id: NodeId) -> Option<&NodeStatus> {
        self.validation.as_ref().and_then(|report| report.status(id))
    }

    /// Store a validation report as the persistent per-node problem flags
    pub fn apply_validation(&mut self, report: ValidationReport) -> Result<()> {
        if report.generation() != self.generation {
            return Err(DictError::StaleValidation);
        }
        self.validation = Some(report);
        Ok(())
    }

    /// All nodes below `id` (inclusive) in depth-first pre-order
    pub fn walk(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.node(current) {
                out.push(current);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// Full keys in tree order
    pub fn full_keys(&self) -> Vec<NodeId> {
        self.walk(self.root)
            .into_iter()
            .filter(|id| self.node(*id).is_some_and(|n| n.is_full_key))
            .collect()
    }

    /// Whether `id` lies in the subtree of `ancestor` (inclusive)
    pub fn is_descendant_of(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.node(c).and_then(|n| n.parent);
        }
        false
    }

    pub fn statistics(&self) -> Statistics {
        let keys = self.full_keys();
        let translated = self
            .cultures
            .iter()
            .map(|culture| {
                let count = keys
                    .iter()
                    .filter_map(|id| self.node(*id))
                    .filter(|n| !n.text(culture).is_empty())
                    .count();
                (culture.clone(), count)
            })
            .collect();
        let keys_with_problems = self.validation.as_ref().map(|report| {
            keys.iter()
                .filter(|id| report.status(**id).is_some_and(|s| s.has_own_problem))
                .count()
        });
        Statistics {
            full_keys: keys.len(),
            translated,
            keys_with_problems,
        }
    }

    // Internal arena plumbing. Key operations build on these and are
    // responsible for keeping the index in step.

    pub(crate) fn alloc(&mut self, node: DictionaryNode) -> NodeId {
        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = Some(node);
                NodeId(slot)
            }
            None => {
                self.nodes.push(Some(node));
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    pub(crate) fn find_child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        let node = self.node(parent)?;
        node.children
            .iter()
            .copied()
            .find(|c| self.node(*c).is_some_and(|n| n.segment_name == name))
    }

    /// Namespaces first, then natural order of segment names
    pub(crate) fn sibling_order(&self, a: NodeId, b: NodeId) -> Ordering {
        match (self.node(a), self.node(b)) {
            (Some(a), Some(b)) => b
                .is_namespace
                .cmp(&a.is_namespace)
                .then_with(|| natural::compare(&a.segment_name, &b.segment_name)),
            _ => Ordering::Equal,
        }
    }

    pub(crate) fn attach_sorted(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let siblings = self.get(parent)?.children.clone();
        let pos = siblings
            .iter()
            .position(|s| self.sibling_order(child, *s) == Ordering::Less)
            .unwrap_or(siblings.len());
        self.get_mut(parent)?.children.insert(pos, child);
        self.get_mut(child)?.parent = Some(parent);
        Ok(())
    }

    pub(crate) fn detach(&mut self, child: NodeId) -> Result<()> {
        if let Some(parent) = self.get(child)?.parent {
            self.get_mut(parent)?.children.retain(|c| *c != child);
        }
        Ok(())
    }

    /// Create a child under `parent` and insert it in sibling order
    pub(crate) fn create_child(
        &mut self,
        parent: NodeId,
        name: &str,
        is_namespace: bool,
    ) -> Result<NodeId> {
        let key = self.key_for_child(parent, name)?;
        trace!("creating node '{}'", key);
        let id = self.alloc(DictionaryNode::new(
            name.to_string(),
            key,
            is_namespace,
            Some(parent),
        ));
        self.attach_sorted(parent, id)?;
        Ok(id)
    }

    pub(crate) fn key_for_child(&self, parent: NodeId, name: &str) -> Result<String> {
        let parent_node = self.get(parent)?;
        let parent_ref = if parent_node.is_root() {
            None
        } else {
            Some((parent_node.full_key.as_str(), parent_node.is_namespace))
        };
        Ok(child_key(parent_ref, name))
    }

    /// Promote a node to full key and index it
    pub(crate) fn register_key(&mut self, id: NodeId) -> Result<()> {
        let cultures = self.cultures.clone();
        let node = self.get_mut(id)?;
        if node.is_root() {
            return Err(DictError::InvalidOperation(
                "the root cannot be a full key".to_string(),
            ));
        }
        node.is_full_key = true;
        for culture in cultures {
            node.culture_texts.entry(culture).or_default();
        }
        let key = node.full_key.clone();
        self.index.insert(key.clone(), id);
        self.events.push(DictionaryEvent::KeyAdded(key));
        Ok(())
    }

    /// Take a node out of the index: text and comment are cleared, the node
    /// stays. Returns the key it was indexed under; the caller reports it.
    pub(crate) fn unregister_key(&mut self, id: NodeId) -> Result<Option<String>> {
        let node = self.get_mut(id)?;
        if !node.is_full_key {
            return Ok(None);
        }
        node.is_full_key = false;
        node.comment = None;
        node.culture_texts.clear();
        let key = node.full_key.clone();
        self.index.remove(&key);
        Ok(Some(key))
    }

    /// Recompute the full keys of a subtree after its position or
    /// separators changed, rewriting the index entries
    pub(crate) fn rekey_subtree(&mut self, id: NodeId) -> Result<()> {
        let parent = self.get(id)?.parent.ok_or_else(|| {
            DictError::InvalidOperation("the root has no key".to_string())
        })?;
        let name = self.get(id)?.segment_name.clone();
        let new_key = self.key_for_child(parent, &name)?;

        let node = self.get_mut(id)?;
        let old_key = std::mem::replace(&mut node.full_key, new_key.clone());
        let is_full = node.is_full_key;
        let children = node.children.clone();

        if is_full && old_key != new_key {
            self.index.remove(&old_key);
            self.index.insert(new_key.clone(), id);
            self.events.push(DictionaryEvent::KeyRemoved(old_key));
            self.events.push(DictionaryEvent::KeyAdded(new_key));
        }
        for child in children {
            self.rekey_subtree(child)?;
        }
        Ok(())
    }

    /// Remove a childless, non-full node from the tree
    pub(crate) fn remove_leaf(&mut self, id: NodeId) -> Result<()> {
        let node = self.get(id)?;
        if node.is_root() || node.has_children() || node.is_full_key {
            return Err(DictError::InvalidOperation(format!(
                "node '{}' is not deletable",
                node.full_key
            )));
        }
        trace!("removing node '{}'", node.full_key);
        self.detach(id)?;
        self.nodes[id.0] = None;
        self.free.push(id.0);
        Ok(())
    }

    /// Remove `id` and its ancestors while they are empty, non-full and not the root
    pub(crate) fn prune_upward(&mut self, id: NodeId) -> Result<()> {
        let mut current = Some(id);
        while let Some(c) = current {
            let Some(node) = self.node(c) else { break };
            if node.is_root() || node.has_children() || node.is_full_key {
                break;
            }
            current = node.parent;
            self.remove_leaf(c)?;
        }
        Ok(())
    }

    /// Record a mutation: modified flag, generation and stored validation
    pub(crate) fn touch(&mut self) {
        self.modified = true;
        self.generation += 1;
        self.validation = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_dictionary_has_only_root() {
        let dict = Dictionary::new();
        let root = dict.get(dict.root()).unwrap();
        assert!(root.is_root());
        assert!(!root.is_full_key());
        assert!(dict.is_empty());
        assert!(!dict.is_modified());
    }

    #[test]
    fn test_children_sorted_namespaces_first() {
        let mut dict = Dictionary::new();
        let root = dict.root();
        dict.create_child(root, "item10", false).unwrap();
        dict.create_child(root, "item2", false).unwrap();
        dict.create_child(root, "zeta", true).unwrap();

        let names: Vec<_> = dict
            .get(root)
            .unwrap()
            .children()
            .iter()
            .map(|c| dict.get(*c).unwrap().segment_name().to_string())
            .collect();
        assert_eq!(names, vec!["zeta", "item2", "item10"]);
    }

    #[test]
    fn test_prune_upward_stops_at_full_key() {
        let mut dict = Dictionary::new();
        let root = dict.root();
        let a = dict.create_child(root, "a", false).unwrap();
        let b = dict.create_child(a, "b", false).unwrap();
        let c = dict.create_child(b, "c", false).unwrap();
        dict.register_key(a).unwrap();

        dict.prune_upward(c).unwrap();
        assert!(dict.node(c).is_none());
        assert!(dict.node(b).is_none());
        assert!(dict.node(a).is_some());
    }

    #[test]
    fn test_freed_slots_are_reused() {
        let mut dict = Dictionary::new();
        let root = dict.root();
        let a = dict.create_child(root, "a", false).unwrap();
        dict.remove_leaf(a).unwrap();
        let b = dict.create_child(root, "b", false).unwrap();
        assert_eq!(a, b);
        assert_eq!(dict.get(b).unwrap().full_key(), "b");
    }
}
