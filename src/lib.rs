//! Hierarchical multi-culture text-key dictionary.
//!
//! Translatable texts are addressed by keys such as `ns:group.label`. The
//! [`Dictionary`] stores them as a tree, one node per key segment, with a
//! text per culture plus count-specific variants. [`ops`] holds the key
//! operations that keep tree and key index in step, [`validate`] flags
//! inconsistent translations and [`suggest`] finds existing translations
//! worth reusing. Dictionaries are read and written in the XML interchange
//! formats by [`parse`].

pub mod compare;
pub mod config;
pub mod error;
pub mod ops;
pub mod output;
pub mod parse;
pub mod suggest;
pub mod tree;
pub mod validate;

use log::info;
use std::path::{Path, PathBuf};

// Re-export commonly used types
pub use compare::NaturalOrderComparator;
pub use config::{EngineConfig, StaticStopwords, StopwordSource};
pub use error::{DictError, Result};
pub use ops::AcceptFlags;
pub use output::{SimpleFormatter, TreeFormatter};
pub use parse::{FormatVersion, ParsedDocument, SkippedEntry, XmlReader, XmlWriter};
pub use suggest::{Suggestion, SuggestionEngine};
pub use tree::{
    CultureText, Dictionary, DictionaryBuilder, DictionaryEvent, DictionaryNode, KeyPath, NodeId,
    QuantifiedText, Statistics,
};
pub use validate::{validate, NodeStatus, Problem, ValidationReport};

/// A dictionary loaded from files, with what had to be left out
#[derive(Debug)]
pub struct LoadedDictionary {
    pub dictionary: Dictionary,
    /// `<text>` entries dropped while reading or merging
    pub skipped: Vec<SkippedEntry>,
    /// Files that could not be read at all
    pub failures: Vec<(PathBuf, DictError)>,
}

/// Load a dictionary from files and directories.
///
/// Each path is either a single v1/v2 document or a directory searched for
/// documents. All documents found are merged into one dictionary; a file
/// inside a directory that fails to load is reported in
/// [`LoadedDictionary::failures`], while an explicitly named file that fails
/// is an error.
#[must_use = "this function returns a Result that should be handled"]
pub fn load_dictionary<P: AsRef<Path>>(paths: &[P]) -> Result<LoadedDictionary> {
    let mut builder = DictionaryBuilder::new();
    let mut failures = Vec::new();

    for path in paths {
        let path = path.as_ref();
        if path.is_dir() {
            let outcome = parse::load_dir(path)?;
            for doc in outcome.documents {
                builder.add_document(doc);
            }
            failures.extend(outcome.failures);
        } else {
            builder.add_document(parse::load_file(path)?);
        }
    }

    let outcome = builder.build()?;
    info!(
        "loaded {} keys from {} paths ({} skipped entries, {} failed files)",
        outcome.dictionary.len(),
        paths.len(),
        outcome.skipped.len(),
        failures.len()
    );
    Ok(LoadedDictionary {
        dictionary: outcome.dictionary,
        skipped: outcome.skipped,
        failures,
    })
}

/// Validate the dictionary and store the result as its problem flags
#[must_use = "this function returns a Result that should be handled"]
pub fn run_check(dict: &mut Dictionary, config: &EngineConfig) -> Result<ValidationReport> {
    let report = validate(dict, config);
    dict.apply_validation(report.clone())?;
    Ok(report)
}

/// Suggestions for an existing key, by name
#[must_use = "this function returns a Result that should be handled"]
pub fn run_suggest(
    dict: &Dictionary,
    config: &EngineConfig,
    key: &str,
    target_culture: &str,
) -> Result<Vec<Suggestion>> {
    let node = dict.require_key(key)?;
    SuggestionEngine::new(config).suggest(dict, node, target_culture)
}
