use crate::error::Result;
use crate::tree::{CultureText, Dictionary, DictionaryEvent, NodeId};
use std::collections::BTreeMap;

/// Own content of a node, detached from the tree
#[derive(Debug, Clone)]
pub(crate) struct NodeContent {
    pub is_full_key: bool,
    pub comment: Option<String>,
    pub culture_texts: BTreeMap<String, CultureText>,
}

/// A node's content together with its segment path below the copied root
#[derive(Debug, Clone)]
pub(crate) struct SubtreeEntry {
    pub relative: Vec<String>,
    pub content: NodeContent,
}

impl Dictionary {
    pub(crate) fn content_of(&self, id: NodeId) -> Result<NodeContent> {
        let node = self.get(id)?;
        Ok(NodeContent {
            is_full_key: node.is_full_key,
            comment: node.comment.clone(),
            culture_texts: node.culture_texts.clone(),
        })
    }

    /// Merge content into `dest`.
    ///
    /// A full-key source makes `dest` a full key. Per culture the source text
    /// wins wherever it is non-empty (see [`CultureText::merge_from`]); a
    /// non-empty source comment replaces the destination comment.
    pub(crate) fn merge_content(&mut self, content: &NodeContent, dest: NodeId) -> Result<()> {
        if !content.is_full_key {
            return Ok(());
        }
        if !self.get(dest)?.is_full_key {
            self.register_key(dest)?;
        }
        let node = self.get_mut(dest)?;
        for (culture, text) in &content.culture_texts {
            node.culture_texts
                .entry(culture.clone())
                .or_default()
                .merge_from(text);
        }
        if let Some(comment) = content.comment.as_ref().filter(|c| !c.is_empty()) {
            node.comment = Some(comment.clone());
        }
        Ok(())
    }

    /// Move everything below and including `source` into `dest`, merging
    /// where `dest` already has same-named children. `source` is removed;
    /// the caller prunes its former ancestors.
    pub(crate) fn merge_subtree_into(&mut self, source: NodeId, dest: NodeId) -> Result<()> {
        let content = self.content_of(source)?;
        self.merge_content(&content, dest)?;

        let children = self.get(source)?.children.clone();
        for child in children {
            let name = self.get(child)?.segment_name.clone();
            match self.find_child(dest, &name) {
                Some(existing) => self.merge_subtree_into(child, existing)?,
                None => {
                    self.detach(child)?;
                    self.get_mut(child)?.is_namespace = false;
                    self.attach_sorted(dest, child)?;
                    self.rekey_subtree(child)?;
                }
            }
        }

        if let Some(old_key) = self.unregister_key(source)? {
            self.events.push(DictionaryEvent::KeyRemoved(old_key));
        }
        self.remove_leaf(source)
    }

    /// Content of `id` and (optionally) all its descendants, parents first
    pub(crate) fn snapshot_subtree(
        &self,
        id: NodeId,
        include_children: bool,
    ) -> Result<Vec<SubtreeEntry>> {
        let mut out = vec![SubtreeEntry {
            relative: Vec::new(),
            content: self.content_of(id)?,
        }];
        if include_children {
            self.snapshot_children(id, &mut Vec::new(), &mut out)?;
        }
        Ok(out)
    }

    fn snapshot_children(
        &self,
        id: NodeId,
        path: &mut Vec<String>,
        out: &mut Vec<SubtreeEntry>,
    ) -> Result<()> {
        for child in &self.get(id)?.children {
            path.push(self.get(*child)?.segment_name.clone());
            out.push(SubtreeEntry {
                relative: path.clone(),
                content: self.content_of(*child)?,
            });
            self.snapshot_children(*child, path, out)?;
            path.pop();
        }
        Ok(())
    }
}
