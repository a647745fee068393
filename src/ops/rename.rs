use crate::error::{DictError, Result};
use crate::tree::key::{NAMESPACE_SEPARATOR, SEGMENT_SEPARATOR};
use crate::tree::{Dictionary, DictionaryEvent, KeyPath, NodeId};
use log::debug;

/// How a target key relates to the key being moved or copied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Relation {
    Same,
    Inside,
    Ancestor,
    Unrelated,
}

pub(crate) fn relation(source_key: &str, source_is_namespace: bool, target_key: &str) -> Relation {
    if source_key == target_key {
        return Relation::Same;
    }
    let sep = if source_is_namespace {
        NAMESPACE_SEPARATOR
    } else {
        SEGMENT_SEPARATOR
    };
    if target_key
        .strip_prefix(source_key)
        .is_some_and(|rest| rest.starts_with(sep))
    {
        return Relation::Inside;
    }
    let is_ancestor = source_key.strip_prefix(target_key).is_some_and(|rest| {
        rest.starts_with(SEGMENT_SEPARATOR) || rest.starts_with(NAMESPACE_SEPARATOR)
    });
    if is_ancestor {
        Relation::Ancestor
    } else {
        Relation::Unrelated
    }
}

impl Dictionary {
    /// Rename a node to `new_path`.
    ///
    /// With `include_children`, or when the node has no children, the whole
    /// subtree moves and every key below it is rewritten; existing content at
    /// the destination is merged. Otherwise only the node's own content moves:
    /// it is merged into the destination key and the source is demoted to an
    /// intermediate node.
    ///
    /// Returns the node now holding the renamed key.
    pub fn rename(
        &mut self,
        node: NodeId,
        new_path: &str,
        include_children: bool,
    ) -> Result<NodeId> {
        let target = KeyPath::parse(new_path)?;
        let target_key = target.to_string();
        let source = self.get(node)?;
        if source.is_root() {
            return Err(DictError::InvalidOperation(
                "the root cannot be renamed".to_string(),
            ));
        }
        let source_key = source.full_key.clone();
        let hint = source.is_namespace;
        let has_children = source.has_children();
        let is_full = source.is_full_key;

        let relation = relation(&source_key, hint, &target_key);
        if relation == Relation::Same {
            return Ok(node);
        }

        let move_subtree = include_children || !has_children;
        debug!(
            "renaming '{}' to '{}' (subtree: {})",
            source_key, target_key, move_subtree
        );

        let result = if move_subtree {
            match relation {
                Relation::Inside if has_children => {
                    return Err(DictError::InvalidOperation(format!(
                        "cannot move '{}' into its own subtree",
                        source_key
                    )));
                }
                Relation::Ancestor if has_children => {
                    return Err(DictError::InvalidOperation(format!(
                        "cannot merge '{}' into its ancestor '{}'",
                        source_key, target_key
                    )));
                }
                Relation::Inside => self.move_own_content(node, &target, hint)?,
                _ => self.move_subtree(node, &target, hint)?,
            }
        } else {
            if !is_full {
                return Err(DictError::InvalidOperation(format!(
                    "'{}' has no text of its own to rename",
                    source_key
                )));
            }
            self.move_own_content(node, &target, hint)?
        };

        self.touch();
        Ok(result)
    }

    fn move_subtree(&mut self, node: NodeId, target: &KeyPath, hint: bool) -> Result<NodeId> {
        let old_parent = self.get(node)?.parent;

        if let Some(existing) = self.lookup_path(target, hint)? {
            self.merge_subtree_into(node, existing)?;
            if let Some(parent) = old_parent {
                self.prune_upward(parent)?;
            }
            return Ok(existing);
        }

        let slots: Vec<(String, bool)> = target
            .slots(hint)
            .into_iter()
            .map(|(name, ns)| (name.to_string(), ns))
            .collect();
        let Some(((name, is_namespace), parents)) = slots.split_last() else {
            return Err(DictError::invalid_key(target.to_string(), "key is empty"));
        };
        let new_parent = self.ensure_slots(parents)?;

        self.detach(node)?;
        let moved = self.get_mut(node)?;
        moved.segment_name = name.clone();
        moved.is_namespace = *is_namespace;
        self.attach_sorted(new_parent, node)?;
        self.rekey_subtree(node)?;

        if let Some(parent) = old_parent {
            self.prune_upward(parent)?;
        }
        Ok(node)
    }

    /// Merge the node's own content into the target key and demote the node
    fn move_own_content(&mut self, node: NodeId, target: &KeyPath, hint: bool) -> Result<NodeId> {
        let content = self.content_of(node)?;
        let dest = self.ensure_path(target, hint)?;
        self.merge_content(&content, dest)?;

        let still_has_children = self.get(node)?.has_children();
        if let Some(old_key) = self.unregister_key(node)? {
            let event = if still_has_children {
                DictionaryEvent::KeyDemoted(old_key)
            } else {
                DictionaryEvent::KeyRemoved(old_key)
            };
            self.events.push(event);
        }
        self.prune_upward(node)?;
        self.prune_upward(dest)?;
        Ok(dest)
    }
}
