//! The dictionary tree.
//!
//! Keys like `ns:invoice.labels.add` map onto a path of nodes below a single
//! root: an optional namespace node (only ever a direct child of the root)
//! followed by one node per dotted segment. Nodes live in an arena owned by
//! [`Dictionary`]; a full-key index maps key strings to their node.

pub mod builder;
pub mod dictionary;
pub mod events;
pub mod key;
pub mod node;

pub use builder::{BuildOutcome, DictionaryBuilder};
pub use dictionary::{Dictionary, Statistics};
pub use events::DictionaryEvent;
pub use key::KeyPath;
pub use node::{CultureText, DictionaryNode, NodeId, QuantifiedText};
