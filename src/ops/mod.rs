//! Key operations: the only way the tree is mutated.
//!
//! Every operation keeps the full-key index in step with the tree, prunes
//! intermediate nodes that became empty, marks the dictionary modified and
//! drops any stored validation report.
//!
//! - [`Dictionary::resolve`] finds or creates the node of a key
//! - [`Dictionary::rename`] moves a key (optionally with its subtree)
//! - [`Dictionary::duplicate`] copies a key (optionally with its subtree)
//! - [`Dictionary::delete`] removes or demotes a key
//! - [`Dictionary::convert_to_namespace`] / [`Dictionary::convert_to_key`]
//! - text, comment and culture setters in [`edit`]
//!
//! [`Dictionary::resolve`]: crate::Dictionary::resolve
//! [`Dictionary::rename`]: crate::Dictionary::rename
//! [`Dictionary::duplicate`]: crate::Dictionary::duplicate
//! [`Dictionary::delete`]: crate::Dictionary::delete
//! [`Dictionary::convert_to_namespace`]: crate::Dictionary::convert_to_namespace
//! [`Dictionary::convert_to_key`]: crate::Dictionary::convert_to_key

pub mod convert;
pub mod delete;
pub mod duplicate;
pub mod edit;
pub mod merge;
pub mod rename;
pub mod resolve;

pub use edit::AcceptFlags;
