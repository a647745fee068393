use keydict::{load_dictionary, run_check, validate, AcceptFlags, Dictionary, EngineConfig};
use std::path::PathBuf;

fn fixture_path(subdir: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(subdir)
}

fn load_v2() -> Dictionary {
    load_dictionary(&[fixture_path("v2/app.txd")])
        .expect("fixture should load")
        .dictionary
}

#[test]
fn test_missing_placeholder_flagged_then_accepted() {
    let mut dict = load_v2();
    let config = EngineConfig::default();

    let report = run_check(&mut dict, &config).unwrap();
    let keys: Vec<&str> = report.problems().iter().map(|p| p.key.as_str()).collect();
    assert_eq!(keys, vec!["greeting"]);
    assert!(report.problems()[0].remark.contains("{name}"));

    let greeting = dict.find_key("greeting").unwrap();
    assert!(dict.node_status(greeting).unwrap().has_own_problem);

    dict.set_accept_flags(
        greeting,
        "de",
        AcceptFlags {
            placeholders: true,
            ..Default::default()
        },
    )
    .unwrap();
    // Any edit drops the stored flags until the next pass
    assert!(dict.node_status(greeting).is_none());

    let report = run_check(&mut dict, &config).unwrap();
    assert!(!report.has_problems());
    assert!(!dict.node_status(dict.root()).unwrap().has_problem);
}

#[test]
fn test_validation_is_repeatable() {
    let dict = load_v2();
    let config = EngineConfig::default();
    let first = validate(&dict, &config);
    let second = validate(&dict, &config);
    assert_eq!(first.problems(), second.problems());
    assert_eq!(first.generation(), second.generation());
}

#[test]
fn test_system_namespace_configurable() {
    let mut dict = load_v2();
    let month = dict.find_key("Tx:month.1").unwrap();
    dict.set_text(month, "de", "").unwrap();

    let report = validate(&dict, &EngineConfig::default());
    assert!(report.problems().iter().all(|p| p.key != "Tx:month.1"));

    let config = EngineConfig {
        system_namespace: "Sys".to_string(),
        ..EngineConfig::default()
    };
    let report = validate(&dict, &config);
    assert!(report.problems().iter().any(|p| p.key == "Tx:month.1"));
}

#[test]
fn test_quantified_duplicates_from_file() {
    let xml = r#"<translation><culture name="en" primary="true">
        <text key="n">{#} items</text>
        <text key="n" count="1">one</text>
        <text key="n" count="1">uno</text>
    </culture></translation>"#;
    let doc = keydict::XmlReader::parse(xml, "dup.txd", None).unwrap();
    let mut builder = keydict::DictionaryBuilder::new();
    builder.add_document(doc);
    let dict = builder.build().unwrap().dictionary;

    let report = validate(&dict, &EngineConfig::default());
    assert_eq!(report.problems().len(), 1);
    assert!(report.problems()[0].remark.contains("duplicate"));
}
