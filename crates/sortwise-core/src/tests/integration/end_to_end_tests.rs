use std::fs;
use std::path::Path;
use std::sync::Arc;

use tempfile::tempdir;

use crate::condition::{BasicConditionEvaluator, GameState};
use crate::storage::config::SortConfig;
use crate::storage::metadata_list::{FileMetadataSource, MetadataSource, load_all};
use crate::storage::scan::{ScanList, ScanListExtractor};
use crate::sorting::pipeline::LoadOrderPipeline;

const SCAN: &str = r#"{
    "plugins": [
        { "name": "Skyrim.esm", "is_master": true, "records": [1, 2, 3, 4] },
        { "name": "Weapons.esp", "masters": ["Skyrim.esm"], "records": [1, 2, 16777217],
          "description": "Adds weapons {{BASH:Delev, Names}}" },
        { "name": "Armor.esp", "masters": ["Skyrim.esm"], "records": [1] },
        { "name": "Weapons Patch.esp", "masters": ["Skyrim.esm", "Weapons.esp"], "records": [33554433] }
    ]
}"#;

const MASTERLIST: &str = r#"
plugins:
  - name: Weapons Patch.esp
    load_after:
      - name: Armor.esp
        condition: 'active("Armor.esp")'
    incompatibilities:
      - name: Old Weapons.esp
  - name: Armor.esp
    messages:
      - severity: warning
        text: Needs cleaning
        language: en
      - severity: warning
        text: Muss bereinigt werden
        language: de
"#;

const USERLIST: &str = r#"{
    "plugins": [
        { "name": "armor.esp", "priority": -2 }
    ]
}"#;

fn write_data_dir(dir: &Path) {
    fs::create_dir_all(dir).unwrap();
    for name in ["Skyrim.esm", "Weapons.esp", "Armor.esp", "Weapons Patch.esp", "Old Weapons.esp"] {
        fs::write(dir.join(name), b"").unwrap();
    }
}

#[cfg(feature = "yaml-config")]
#[tokio::test]
async fn test_sort_from_files() {
    let dir = tempdir().unwrap();
    let data_dir = dir.path().join("Data");
    write_data_dir(&data_dir);

    let scan_path = dir.path().join("scan.json");
    let masterlist_path = dir.path().join("masterlist.yaml");
    let userlist_path = dir.path().join("userlist.json");
    fs::write(&scan_path, SCAN).unwrap();
    fs::write(&masterlist_path, MASTERLIST).unwrap();
    fs::write(&userlist_path, USERLIST).unwrap();

    let sources: Vec<Box<dyn MetadataSource>> = vec![
        Box::new(FileMetadataSource::new(&masterlist_path)),
        Box::new(FileMetadataSource::new(&userlist_path)),
    ];
    let lists = load_all(&sources).await.unwrap();

    let extractor = ScanListExtractor::new(ScanList::load(&scan_path).await.unwrap());
    let names = extractor.plugin_names().to_vec();

    let state = GameState::from_data_dir(&data_dir)
        .unwrap()
        .with_active(["Skyrim.esm", "Weapons.esp", "Armor.esp", "Weapons Patch.esp"]);
    let pipeline = LoadOrderPipeline::new(Arc::new(BasicConditionEvaluator::new()), state)
        .with_config(SortConfig::default());

    let report = pipeline.run_with_extractor(&extractor, &names, lists).await.unwrap();
    assert_eq!(
        report.load_order(),
        Some(vec!["Skyrim.esm", "Armor.esp", "Weapons.esp", "Weapons Patch.esp"])
    );

    let plugins = report.plugins();
    assert!(plugins[2].has_tag("Delev"));
    assert!(plugins[2].has_tag("Names"));
    assert_eq!(plugins[1].priority, -2);

    let german: Vec<&str> = plugins[1].messages_for_language("de").map(|m| m.text()).collect();
    assert_eq!(german, vec!["Muss bereinigt werden"]);

    assert_eq!(report.problems.len(), 1);
    assert_eq!(report.problems["Weapons Patch.esp"].get("Old Weapons.esp"), Some(&true));
}
