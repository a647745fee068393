use crate::error::{DictError, Result};
use crate::tree::{Dictionary, DictionaryEvent, NodeId};
use log::debug;

impl Dictionary {
    /// Turn a top-level key into a namespace; keys below it switch from
    /// `a.b` to `a:b`
    pub fn convert_to_namespace(&mut self, node: NodeId) -> Result<()> {
        let target = self.get(node)?;
        if target.is_namespace {
            return Err(DictError::InvalidOperation(format!(
                "'{}' is already a namespace",
                target.full_key
            )));
        }
        if target.parent != Some(self.root) {
            return Err(DictError::InvalidOperation(format!(
                "only top-level keys can become namespaces, '{}' is nested",
                target.full_key
            )));
        }
        self.set_namespace_flag(node, true)
    }

    /// Turn a namespace back into a plain top-level key; keys below it
    /// switch from `a:b` to `a.b`
    pub fn convert_to_key(&mut self, node: NodeId) -> Result<()> {
        let target = self.get(node)?;
        if !target.is_namespace {
            return Err(DictError::InvalidOperation(format!(
                "'{}' is not a namespace",
                target.full_key
            )));
        }
        if target.is_full_key {
            return Err(DictError::InvalidOperation(format!(
                "namespace '{}' has its own text and cannot be converted",
                target.full_key
            )));
        }
        self.set_namespace_flag(node, false)
    }

    fn set_namespace_flag(&mut self, node: NodeId, is_namespace: bool) -> Result<()> {
        let root = self.root;
        debug!(
            "converting '{}' (namespace: {})",
            self.get(node)?.full_key,
            is_namespace
        );
        self.get_mut(node)?.is_namespace = is_namespace;
        // Re-sort among siblings: namespaces come first
        self.detach(node)?;
        self.attach_sorted(root, node)?;
        self.rekey_subtree(node)?;

        let key = self.get(node)?.full_key.clone();
        self.events
            .push(DictionaryEvent::NodeConverted { key, is_namespace });
        self.touch();
        Ok(())
    }
}
