use crate::error::{DictError, Result};
use crate::tree::Dictionary;
use log::{debug, info, warn};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use walkdir::WalkDir;

use super::translation::ParsedDocument;
use super::xml_reader::XmlReader;
use super::xml_writer::XmlWriter;

/// File extensions picked up by [`load_dir`]
pub const DICTIONARY_EXTENSIONS: &[&str] = &["txd", "xml"];

/// Documents read from a directory, plus the files that could not be read
#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub documents: Vec<ParsedDocument>,
    pub failures: Vec<(PathBuf, DictError)>,
}

fn culture_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z]{2}([-_][A-Za-z0-9]{2,8})?$").expect("culture pattern is valid")
    })
}

/// Culture encoded in a v1 file name: the last dotted component of the stem
/// (`app.de-CH.txd` is `de-CH`, `fr.xml` is `fr`)
pub fn culture_from_file_name(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let candidate = stem.rsplit('.').next()?;
    culture_pattern()
        .is_match(candidate)
        .then(|| candidate.to_string())
}

/// Read one dictionary file of either format
pub fn load_file(path: &Path) -> Result<ParsedDocument> {
    let content = fs::read_to_string(path)?;
    let source_name = path.display().to_string();
    let culture = culture_from_file_name(path);
    let doc = XmlReader::parse(&content, &source_name, culture.as_deref())?;
    info!(
        "loaded {} ({:?}, {} entries)",
        source_name,
        doc.format,
        doc.entry_count()
    );
    Ok(doc)
}

/// Read all dictionary files below `dir`.
///
/// Hidden entries are not visited. A file that fails to load is recorded in
/// [`LoadOutcome::failures`] and does not stop the walk.
pub fn load_dir(dir: &Path) -> Result<LoadOutcome> {
    if !dir.is_dir() {
        return Err(DictError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} is not a directory", dir.display()),
        )));
    }
    let mut outcome = LoadOutcome::default();

    let walker = WalkDir::new(dir).sort_by_file_name().into_iter();
    for entry in walker
        .filter_entry(|e| !is_hidden(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        let wanted = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| DICTIONARY_EXTENSIONS.contains(&ext));
        if !wanted {
            continue;
        }
        match load_file(path) {
            Ok(doc) => outcome.documents.push(doc),
            Err(e) => {
                warn!("failed to load {}: {}", path.display(), e);
                outcome.failures.push((path.to_path_buf(), e));
            }
        }
    }

    debug!(
        "{}: {} documents, {} failures",
        dir.display(),
        outcome.documents.len(),
        outcome.failures.len()
    );
    Ok(outcome)
}

/// Write the dictionary as a single v2 document and clear its modified flag
pub fn save_v2(dict: &mut Dictionary, path: &Path) -> Result<()> {
    let xml = XmlWriter::new(dict).write_v2()?;
    fs::write(path, xml)?;
    dict.mark_saved();
    info!("saved {}", path.display());
    Ok(())
}

/// Write one v1 document per culture into `dir`, named `<stem>.<culture>.txd`
pub fn save_v1(dict: &mut Dictionary, dir: &Path, stem: &str) -> Result<Vec<PathBuf>> {
    let writer = XmlWriter::new(dict);
    let mut written = Vec::new();
    for culture in dict.cultures() {
        let path = dir.join(format!("{}.{}.txd", stem, culture));
        fs::write(&path, writer.write_v1(culture)?)?;
        written.push(path);
    }
    dict.mark_saved();
    info!("saved {} v1 documents to {}", written.len(), dir.display());
    Ok(written)
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|s| s.starts_with('.'))
}
