use keydict::{CultureText, DictError, Dictionary, DictionaryEvent};
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;
use std::collections::BTreeMap;

type Snapshot = Vec<(String, Option<String>, BTreeMap<String, CultureText>)>;

/// Keys below `prefix` with their content, keys rewritten relative to it
fn snapshot(dict: &Dictionary, prefix: &str) -> Snapshot {
    let mut out: Snapshot = dict
        .full_keys()
        .into_iter()
        .map(|id| dict.get(id).unwrap())
        .filter_map(|node| {
            let rest = node.full_key().strip_prefix(prefix)?;
            Some((
                rest.to_string(),
                node.comment().map(str::to_string),
                node.culture_texts().clone(),
            ))
        })
        .collect();
    out.sort_by(|a, b| a.0.cmp(&b.0));
    out
}

fn sample() -> Dictionary {
    let mut dict = Dictionary::new();
    dict.add_culture("en").unwrap();
    dict.add_culture("de").unwrap();
    dict.set_primary_culture(Some("en")).unwrap();
    for (key, en, de) in [
        ("invoice.labels", "Labels", "Beschriftungen"),
        ("invoice.labels.add_new", "Add new", "Neu"),
        ("invoice.labels.delete", "Delete", "Löschen"),
        ("invoice.title", "Invoice", "Rechnung"),
        ("app:window.title", "My App", "Meine App"),
    ] {
        let id = dict.resolve(key, true, false).unwrap().unwrap();
        dict.set_text(id, "en", en).unwrap();
        dict.set_text(id, "de", de).unwrap();
    }
    let add = dict.find_key("invoice.labels.add_new").unwrap();
    dict.set_comment(add, Some("Toolbar button".to_string())).unwrap();
    dict.set_quantified_text(add, "en", 2, 0, "Add two").unwrap();
    dict
}

fn assert_index_consistent(dict: &Dictionary) {
    for id in dict.full_keys() {
        let node = dict.get(id).unwrap();
        assert_eq!(dict.find_key(node.full_key()), Some(id), "{}", node.full_key());
    }
    assert_eq!(dict.full_keys().len(), dict.len());
}

#[test]
fn test_delete_childless_key_prunes() {
    let mut dict = sample();
    dict.delete_key("app:window.title", false).unwrap();
    assert!(dict.lookup("app", true).unwrap().is_none());
    assert_index_consistent(&dict);
}

#[test]
fn test_delete_key_with_children_keeps_node() {
    let mut dict = sample();
    let labels = dict.find_key("invoice.labels").unwrap();
    dict.delete(labels, false).unwrap();

    let node = dict.get(labels).unwrap();
    assert!(!node.is_full_key());
    assert_eq!(node.text("en"), "");
    assert!(dict.contains_key("invoice.labels.add_new"));
    assert_index_consistent(&dict);
}

#[test]
fn test_rename_round_trip() {
    let mut dict = sample();
    let before = snapshot(&dict, "invoice.labels");

    let labels = dict.find_key("invoice.labels").unwrap();
    let moved = dict.rename(labels, "billing.captions", true).unwrap();
    assert!(dict.contains_key("billing.captions.add_new"));
    assert!(!dict.contains_key("invoice.labels.delete"));
    assert_index_consistent(&dict);

    dict.rename(moved, "invoice.labels", true).unwrap();
    assert_eq!(snapshot(&dict, "invoice.labels"), before);
    assert!(dict.lookup("billing", false).unwrap().is_none());
    assert_index_consistent(&dict);
}

#[test]
fn test_rename_without_children_moves_own_text() {
    let mut dict = sample();
    let labels = dict.find_key("invoice.labels").unwrap();
    let dest = dict.rename(labels, "invoice.caption", false).unwrap();

    assert_eq!(dict.get(dest).unwrap().text("de"), "Beschriftungen");
    assert!(!dict.get(labels).unwrap().is_full_key());
    assert!(dict.contains_key("invoice.labels.add_new"));
    assert_index_consistent(&dict);
}

#[test]
fn test_rename_merges_into_existing_key() {
    let mut dict = sample();
    let title = dict.find_key("invoice.title").unwrap();
    let add = dict.find_key("invoice.labels.add_new").unwrap();
    dict.set_text(title, "de", "").unwrap();

    let dest = dict.rename(title, "invoice.labels.add_new", false).unwrap();
    assert_eq!(dest, add);
    let node = dict.get(dest).unwrap();
    assert_eq!(node.text("en"), "Invoice");
    // Empty source text leaves the destination alone
    assert_eq!(node.text("de"), "Neu");
    assert!(!dict.contains_key("invoice.title"));
}

#[test]
fn test_duplicate_leaves_source_unchanged() {
    let mut dict = sample();
    let before = snapshot(&dict, "invoice.labels");

    let labels = dict.find_key("invoice.labels").unwrap();
    let copy = dict.duplicate(labels, "archive:labels", true).unwrap();
    assert_eq!(snapshot(&dict, "archive:labels"), before);

    let copied_add = dict.find_key("archive:labels.add_new").unwrap();
    dict.set_text(copied_add, "en", "changed").unwrap();
    dict.delete(copy, true).unwrap();

    assert_eq!(snapshot(&dict, "invoice.labels"), before);
    assert_index_consistent(&dict);
}

#[test]
fn test_convert_namespace_round_trip() {
    let mut dict = sample();
    let invoice = dict.lookup("invoice", false).unwrap().unwrap();
    dict.convert_to_namespace(invoice).unwrap();
    assert!(dict.contains_key("invoice:labels.add_new"));
    assert_index_consistent(&dict);

    dict.convert_to_key(invoice).unwrap();
    assert!(dict.contains_key("invoice.labels.add_new"));
    assert_index_consistent(&dict);
}

#[test]
fn test_conflicts_are_reported() {
    let mut dict = sample();
    let err = dict.resolve("invoice:x", true, false).unwrap_err();
    assert!(matches!(err, DictError::NamespaceConflict { .. }));
    let err = dict.resolve("app.x", true, false).unwrap_err();
    assert!(matches!(err, DictError::NonNamespaceConflict { .. }));
    assert!(err.is_conflict());
}

#[test]
fn test_mutations_emit_events() {
    let mut dict = sample();
    dict.take_events();
    dict.mark_saved();

    let title = dict.find_key("invoice.title").unwrap();
    dict.rename(title, "invoice.heading", false).unwrap();

    assert!(dict.is_modified());
    let events = dict.take_events();
    assert!(events.contains(&DictionaryEvent::KeyRemoved("invoice.title".to_string())));
    assert!(events.contains(&DictionaryEvent::KeyAdded("invoice.heading".to_string())));
}

fn key_strategy() -> impl Strategy<Value = String> {
    (
        proptest::option::of("[a-d]{1,3}"),
        proptest::collection::vec("[a-d0-9_]{1,4}", 1..4),
    )
        .prop_map(|(ns, segments)| match ns {
            Some(ns) => format!("{}:{}", ns, segments.join(".")),
            None => segments.join("."),
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_resolve_then_lookup(keys in proptest::collection::vec(key_strategy(), 1..20)) {
        let mut dict = Dictionary::new();
        for key in &keys {
            match dict.resolve(key, true, false) {
                Ok(Some(id)) => {
                    prop_assert_eq!(dict.resolve(key, false, false).unwrap(), Some(id));
                    prop_assert_eq!(dict.find_key(key), Some(id));
                    prop_assert_eq!(dict.get(id).unwrap().full_key(), key.as_str());
                }
                Ok(None) => prop_assert!(false, "resolve with create returned nothing"),
                Err(e) => prop_assert!(e.is_conflict(), "unexpected error {}", e),
            }
        }
        assert_index_consistent(&dict);
    }

    #[test]
    fn test_delete_all_empties_tree(keys in proptest::collection::vec(key_strategy(), 1..12)) {
        let mut dict = Dictionary::new();
        for key in &keys {
            let _ = dict.resolve(key, true, false);
        }
        for key in &keys {
            if dict.contains_key(key) {
                dict.delete_key(key, false).unwrap();
            }
        }
        prop_assert!(dict.is_empty());
        prop_assert!(dict.get(dict.root()).unwrap().children().is_empty());
    }
}
