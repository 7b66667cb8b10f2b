use tempfile::tempdir;

use crate::kernel::error::Error;
use crate::metadata::entry::MessageSeverity;
use crate::storage::config::ConfigFormat;
use crate::storage::error::StorageSystemError;
use crate::storage::metadata_list::{FileMetadataSource, MetadataList, MetadataSource, load_all};

const LIST_JSON: &str = r#"{
    "plugins": [
        {
            "name": "Patch.esp",
            "priority": 5,
            "load_after": [ { "name": "Base.esp" } ],
            "requirements": [ { "name": "Lib.esm", "condition": "file(\"Lib.esm\")" } ],
            "tags": [ { "name": "Delev" }, { "name": "-Relev" } ],
            "messages": [ { "severity": "warning", "text": "Clean me", "language": "en" } ]
        },
        { "name": "Off.esp", "enabled": false }
    ]
}"#;

#[test]
fn test_parse_json_list() {
    let list = MetadataList::parse(LIST_JSON, ConfigFormat::Json).unwrap();
    assert_eq!(list.plugins.len(), 2);

    let patch = &list.plugins[0];
    assert!(patch.enabled);
    assert_eq!(patch.priority, 5);
    assert!(patch.load_after.contains("base.esp"));
    let requirement = patch.requirements.get("Lib.esm").unwrap();
    assert_eq!(requirement.condition, "file(\"Lib.esm\")");
    assert!(patch.tags.get("Delev").unwrap().is_addition());
    assert!(!patch.tags.get("Relev").unwrap().is_addition());
    assert_eq!(patch.messages[0].severity(), MessageSeverity::Warning);

    assert!(!list.plugins[1].enabled);
}

#[test]
fn test_json_round_trip_keeps_tag_prefix() {
    let list = MetadataList::parse(LIST_JSON, ConfigFormat::Json).unwrap();
    let text = list.to_string(ConfigFormat::Json).unwrap();
    assert!(text.contains("\"-Relev\""));
    assert_eq!(MetadataList::parse(&text, ConfigFormat::Json).unwrap(), list);
}

#[cfg(feature = "yaml-config")]
#[test]
fn test_parse_yaml_list() {
    let data = "plugins:\n  - name: A.esp\n    load_after:\n      - name: B.esp\n";
    let list = MetadataList::parse(data, ConfigFormat::Yaml).unwrap();
    assert!(list.plugins[0].load_after.contains("B.esp"));
}

#[tokio::test]
async fn test_file_source_loads_list() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("masterlist.json");
    std::fs::write(&path, LIST_JSON).unwrap();

    let source = FileMetadataSource::new(&path);
    let records = source.load().await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].name, "Patch.esp");
}

#[tokio::test]
async fn test_file_source_missing_file() {
    let dir = tempdir().unwrap();
    let source = FileMetadataSource::new(dir.path().join("userlist.json"));
    assert!(matches!(
        source.load().await,
        Err(Error::StorageSystem(StorageSystemError::FileNotFound(_)))
    ));
}

#[tokio::test]
async fn test_load_all_keeps_source_order() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("masterlist.json");
    let second = dir.path().join("userlist.json");
    std::fs::write(&first, r#"{"plugins":[{"name":"A.esp"}]}"#).unwrap();
    std::fs::write(&second, r#"{"plugins":[{"name":"B.esp"},{"name":"C.esp"}]}"#).unwrap();

    let sources: Vec<Box<dyn MetadataSource>> = vec![
        Box::new(FileMetadataSource::new(&first)),
        Box::new(FileMetadataSource::new(&second)),
    ];
    let lists = load_all(&sources).await.unwrap();
    assert_eq!(lists.len(), 2);
    assert_eq!(lists[0][0].name, "A.esp");
    assert_eq!(lists[1].len(), 2);
}
