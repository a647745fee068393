use keydict::parse::{load_dir, load_file, save_v1, save_v2};
use keydict::{load_dictionary, Dictionary, DictionaryBuilder, QuantifiedText, XmlReader, XmlWriter};
use std::path::PathBuf;
use tempfile::TempDir;

#[derive(Debug, PartialEq)]
struct Entry {
    key: String,
    comment: Option<String>,
    texts: Vec<(String, String, Vec<QuantifiedText>, [bool; 3])>,
}

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

/// Content of every full key, cultures in name order
fn entries(dict: &Dictionary) -> Vec<Entry> {
    let mut cultures: Vec<&String> = dict.cultures().iter().collect();
    cultures.sort();
    dict.full_keys()
        .into_iter()
        .map(|id| {
            let node = dict.get(id).unwrap();
            let texts = cultures
                .iter()
                .map(|culture| {
                    let (quantified, flags) = match node.culture_text(culture) {
                        Some(t) => (
                            t.quantified().to_vec(),
                            [t.accept_missing, t.accept_placeholders, t.accept_punctuation],
                        ),
                        None => (Vec::new(), [false; 3]),
                    };
                    (culture.to_string(), node.text(culture).to_string(), quantified, flags)
                })
                .collect();
            Entry {
                key: node.full_key().to_string(),
                comment: node.comment().map(str::to_string),
                texts,
            }
        })
        .collect()
}

fn rebuild(xml: &str) -> Dictionary {
    let doc = XmlReader::parse(xml, "written.txd", None).unwrap();
    let outcome = DictionaryBuilder::from_documents([doc]).build().unwrap();
    assert!(outcome.skipped.is_empty());
    outcome.dictionary
}

#[test]
fn test_v2_write_and_reload() {
    let dict = load_dictionary(&[fixtures().join("v2/app.txd")]).unwrap().dictionary;
    let xml = XmlWriter::new(&dict).write_v2().unwrap();
    let reloaded = rebuild(&xml);

    assert_eq!(reloaded.cultures(), dict.cultures());
    assert_eq!(reloaded.primary_culture(), Some("en"));
    assert_eq!(entries(&reloaded), entries(&dict));
    assert!(reloaded.find_key("app:window.title").is_some());

    // Writing the reloaded dictionary gives the same document
    assert_eq!(XmlWriter::new(&reloaded).write_v2().unwrap(), xml);
}

#[test]
fn test_v1_directory_to_v2_file() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("merged.txd");

    let mut dict = load_dictionary(&[fixtures().join("v1")]).unwrap().dictionary;
    save_v2(&mut dict, &target).unwrap();
    assert!(!dict.is_modified());

    let doc = load_file(&target).unwrap();
    assert_eq!(doc.format, keydict::FormatVersion::V2);
    let reloaded = DictionaryBuilder::from_documents([doc]).build().unwrap().dictionary;
    assert_eq!(entries(&reloaded), entries(&dict));

    let cancel = reloaded.find_key("dialog.cancel").unwrap();
    assert!(reloaded.get(cancel).unwrap().culture_text("de").unwrap().accept_punctuation);
    let save = reloaded.find_key("dialog.save").unwrap();
    assert_eq!(reloaded.get(save).unwrap().comment(), Some("Save dialog caption"));
}

#[test]
fn test_v2_file_to_v1_directory() {
    let temp = TempDir::new().unwrap();
    let mut dict = load_dictionary(&[fixtures().join("v2/app.txd")]).unwrap().dictionary;

    let written = save_v1(&mut dict, temp.path(), "app").unwrap();
    let names: Vec<String> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["app.en.txd", "app.de.txd"]);

    let outcome = load_dir(temp.path()).unwrap();
    assert!(outcome.failures.is_empty());
    let reloaded = DictionaryBuilder::from_documents(outcome.documents)
        .build()
        .unwrap()
        .dictionary;
    // v1 files carry no primary culture
    assert_eq!(reloaded.primary_culture(), None);
    assert_eq!(entries(&reloaded), entries(&dict));
}

#[test]
fn test_namespace_full_key_needs_a_namespaced_sibling() {
    let mut dict = Dictionary::new();
    dict.add_culture("en").unwrap();
    for key in ["lonely", "shared"] {
        let id = dict.resolve(key, true, true).unwrap().unwrap();
        assert!(dict.get(id).unwrap().is_namespace());
        dict.set_text(id, "en", format!("{} text", key)).unwrap();
    }
    let child = dict.resolve("shared:label", true, false).unwrap().unwrap();
    dict.set_text(child, "en", "Label").unwrap();

    let reloaded = rebuild(&XmlWriter::new(&dict).write_v2().unwrap());

    // A <text> key carries no namespace marker; only other keys reveal it
    let shared = reloaded.get(reloaded.find_key("shared").unwrap()).unwrap();
    assert!(shared.is_namespace());
    assert_eq!(shared.text("en"), "shared text");

    let lonely = reloaded.get(reloaded.find_key("lonely").unwrap()).unwrap();
    assert!(!lonely.is_namespace());
    assert_eq!(lonely.text("en"), "lonely text");
}
