//! Consistency validation.
//!
//! [`validate`] is a pure function of the dictionary: it produces a
//! [`ValidationReport`] stamped with the generation it saw. Hosts may run it
//! off the interactive thread and hand the report back with
//! [`Dictionary::apply_validation`], which refuses reports that are stale.
//!
//! Per full key the checks run in this order and stop at the first failure:
//!
//! 1. quantified text ranges and duplicate `(count, modulo)` pairs
//! 2. missing translations
//! 3. `[[key]]` references: self references, missing targets, cycles
//! 4. placeholders and surrounding punctuation against the primary culture
//!
//! Keys in the system namespace are never flagged.

pub mod checks;
pub mod placeholder;

use crate::config::EngineConfig;
use crate::tree::{Dictionary, NodeId};
use log::debug;
use serde::Serialize;
use std::collections::HashMap;

/// Validation state of one node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NodeStatus {
    /// A check failed on this node itself (full keys only)
    pub has_own_problem: bool,
    /// This node or any descendant has a problem
    pub has_problem: bool,
    /// Description of the failed check
    pub remark: Option<String>,
}

/// A full key with a problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Problem {
    pub node: NodeId,
    pub key: String,
    pub remark: String,
}

/// Immutable result of one validation run
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    generation: u64,
    #[serde(skip)]
    statuses: HashMap<NodeId, NodeStatus>,
    problems: Vec<Problem>,
}

impl ValidationReport {
    /// Dictionary generation this report describes
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn status(&self, id: NodeId) -> Option<&NodeStatus> {
        self.statuses.get(&id)
    }

    /// Problem keys in tree order
    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    pub fn has_problems(&self) -> bool {
        !self.problems.is_empty()
    }
}

pub fn validate(dict: &Dictionary, config: &EngineConfig) -> ValidationReport {
    let order = dict.walk(dict.root());
    let mut statuses: HashMap<NodeId, NodeStatus> = HashMap::with_capacity(order.len());
    let mut problems = Vec::new();

    for &id in &order {
        let Some(node) = dict.node(id) else { continue };
        let mut status = NodeStatus::default();
        if node.is_full_key() && !config.is_system_key(node.full_key()) {
            if let Some(remark) = checks::check_node(dict, node, config) {
                status.has_own_problem = true;
                status.has_problem = true;
                problems.push(Problem {
                    node: id,
                    key: node.full_key().to_string(),
                    remark: remark.clone(),
                });
                status.remark = Some(remark);
            }
        }
        statuses.insert(id, status);
    }

    // Pre-order reversed visits children before their parents
    for &id in order.iter().rev() {
        let flagged = statuses.get(&id).is_some_and(|s| s.has_problem);
        if !flagged {
            continue;
        }
        if let Some(parent) = dict.node(id).and_then(|n| n.parent()) {
            if let Some(status) = statuses.get_mut(&parent) {
                status.has_problem = true;
            }
        }
    }

    debug!(
        "validated generation {}: {} nodes, {} problems",
        dict.generation(),
        order.len(),
        problems.len()
    );
    ValidationReport {
        generation: dict.generation(),
        statuses,
        problems,
    }
}
