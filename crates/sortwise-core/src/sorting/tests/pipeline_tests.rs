use std::sync::Arc;

use crate::condition::filter::{EvaluationFailurePolicy, FailurePolicies};
use crate::condition::{BasicConditionEvaluator, GameState};
use crate::kernel::error::Error;
use crate::metadata::content::ExtractedContent;
use crate::metadata::entry::{FileReference, Message, MessageSeverity};
use crate::metadata::plugin::{PluginMetadata, PluginMetadataBuilder};
use crate::sorting::comparator::Strictness;
use crate::sorting::pipeline::{LoadOrderPipeline, SortOutcome};
use crate::storage::config::SortConfig;
use crate::storage::scan::{ScanList, ScanListExtractor, ScanRecord};

fn state() -> GameState {
    GameState::new()
        .with_files(["Base.esm", "Patch.esp", "Extra.esp"])
        .with_active(["Base.esm", "Patch.esp", "Extra.esp"])
}

fn pipeline(config: SortConfig) -> LoadOrderPipeline {
    LoadOrderPipeline::new(Arc::new(BasicConditionEvaluator::new()), state()).with_config(config)
}

fn scans() -> Vec<(String, ExtractedContent)> {
    vec![
        (
            "Extra.esp".to_string(),
            ExtractedContent::from_raw_records("Extra.esp", false, vec![], &[1], None).unwrap(),
        ),
        (
            "Patch.esp".to_string(),
            ExtractedContent::from_raw_records(
                "Patch.esp",
                false,
                vec!["Base.esm".to_string()],
                &[0x0000_0001, 0x0100_0001],
                Some("{{BASH:Delev}}".to_string()),
            )
            .unwrap(),
        ),
        (
            "Base.esm".to_string(),
            ExtractedContent::from_raw_records("Base.esm", true, vec![], &[1, 2, 3], None).unwrap(),
        ),
    ]
}

fn masterlist() -> Vec<PluginMetadata> {
    vec![
        PluginMetadataBuilder::new("extra.esp")
            .load_after(FileReference::file("Patch.esp").with_condition("file(\"Patch.esp\")"))
            .message(Message::note("Only with Absent").with_condition("file(\"Absent.esp\")"))
            .build(),
        PluginMetadataBuilder::new("Patch.esp")
            .requirement(FileReference::file("Missing.esp"))
            .build(),
    ]
}

#[tokio::test]
async fn test_full_run() {
    for parallel in [true, false] {
        let config = SortConfig {
            parallel,
            ..SortConfig::default()
        };
        let report = pipeline(config).run(scans(), vec![masterlist()]).await.unwrap();

        assert!(report.is_sorted());
        assert_eq!(
            report.load_order(),
            Some(vec!["Base.esm", "Patch.esp", "Extra.esp"])
        );

        let patch = &report.plugins()[1];
        assert!(patch.has_tag("Delev"));
        assert!(patch
            .messages
            .iter()
            .any(|m| m.severity() == MessageSeverity::Error && m.text().contains("Missing")));

        let extra = &report.plugins()[2];
        assert!(extra.messages.is_empty());
        assert!(extra.load_after.contains("Patch.esp"));

        assert_eq!(report.problems.len(), 1);
        assert_eq!(report.problems["Patch.esp"].get("Missing.esp"), Some(&false));
    }
}

#[test]
fn test_list_records_cannot_erase_scan_data() {
    let list = vec![
        PluginMetadataBuilder::new("Patch.esp").priority(3).build(),
        PluginMetadata::new("NotInstalled.esp"),
    ];
    let plugins = pipeline(SortConfig::default()).assemble(scans(), vec![list]);

    assert_eq!(plugins.len(), 3);
    let patch = plugins.iter().find(|p| p.is_named("Patch.esp")).unwrap();
    assert_eq!(patch.priority, 3);
    assert_eq!(patch.master_plugins, vec!["Base.esm"]);
    assert_eq!(patch.content_ids().len(), 2);
}

#[test]
fn test_later_list_wins_and_disabled_records_are_skipped() {
    let masterlist = vec![PluginMetadataBuilder::new("Extra.esp").priority(1).build()];
    let userlist = vec![
        PluginMetadataBuilder::new("Extra.esp").priority(7).build(),
        PluginMetadataBuilder::new("Base.esm").priority(9).enabled(false).build(),
    ];
    let plugins = pipeline(SortConfig::default()).assemble(scans(), vec![masterlist, userlist]);

    let extra = plugins.iter().find(|p| p.is_named("Extra.esp")).unwrap();
    let base = plugins.iter().find(|p| p.is_named("Base.esm")).unwrap();
    assert_eq!(extra.priority, 7);
    assert_eq!(base.priority, 0);
}

#[tokio::test]
async fn test_cycle_is_reported_not_raised() {
    let list = vec![
        PluginMetadataBuilder::new("Patch.esp")
            .load_after(FileReference::file("Extra.esp"))
            .build(),
        PluginMetadataBuilder::new("Extra.esp")
            .load_after(FileReference::file("Patch.esp"))
            .build(),
    ];
    let report = pipeline(SortConfig::default()).run(scans(), vec![list]).await.unwrap();

    assert!(!report.is_sorted());
    assert_eq!(report.load_order(), None);
    assert!(report.cycle().is_some_and(|e| e.is_cycle()));

    match &report.outcome {
        SortOutcome::Cycle { plugins, .. } => {
            for plugin in plugins.iter().filter(|p| !p.is_named("Base.esm")) {
                assert!(plugin.messages.iter().any(|m| m.text().contains("Cyclic interaction")));
            }
        }
        SortOutcome::Sorted(_) => panic!("expected a cycle"),
    }
}

#[tokio::test]
async fn test_lenient_run_sorts_through_cycle() {
    let list = vec![
        PluginMetadataBuilder::new("Patch.esp")
            .load_after(FileReference::file("Extra.esp"))
            .build(),
        PluginMetadataBuilder::new("Extra.esp")
            .load_after(FileReference::file("Patch.esp"))
            .build(),
    ];
    let config = SortConfig {
        strictness: Strictness::Lenient,
        ..SortConfig::default()
    };
    let report = pipeline(config).run(scans(), vec![list]).await.unwrap();
    assert_eq!(
        report.load_order(),
        Some(vec!["Base.esm", "Extra.esp", "Patch.esp"])
    );
}

#[tokio::test]
async fn test_condition_failures() {
    let list = vec![
        PluginMetadataBuilder::new("Extra.esp")
            .requirement(FileReference::file("Other.esp").with_condition("bogus(\"x\")"))
            .build(),
    ];

    // Substituted by default
    let report = pipeline(SortConfig::default())
        .run(scans(), vec![list.clone()])
        .await
        .unwrap();
    let extra = report.plugins().iter().find(|p| p.is_named("Extra.esp")).unwrap();
    assert!(extra.requirements.is_empty());
    assert!(extra.messages.iter().any(|m| m.severity() == MessageSeverity::Error));

    for parallel in [true, false] {
        let config = SortConfig {
            parallel,
            condition_failures: FailurePolicies::all(EvaluationFailurePolicy::Propagate),
            ..SortConfig::default()
        };
        let result = pipeline(config).run(scans(), vec![list.clone()]).await;
        assert!(matches!(result, Err(Error::Condition(_))));
    }
}

#[tokio::test]
async fn test_run_with_extractor() {
    let extractor = ScanListExtractor::new(ScanList {
        plugins: vec![
            ScanRecord {
                name: "Patch.esp".to_string(),
                masters: vec!["Base.esm".to_string()],
                records: vec![1],
                ..ScanRecord::default()
            },
            ScanRecord {
                name: "Base.esm".to_string(),
                is_master: true,
                records: vec![1],
                ..ScanRecord::default()
            },
        ],
    });
    let names = extractor.plugin_names().to_vec();
    let report = pipeline(SortConfig::default())
        .run_with_extractor(&extractor, &names, Vec::new())
        .await
        .unwrap();
    assert_eq!(report.load_order(), Some(vec!["Base.esm", "Patch.esp"]));

    let missing = vec!["Nope.esp".to_string()];
    assert!(pipeline(SortConfig::default())
        .run_with_extractor(&extractor, &missing, Vec::new())
        .await
        .is_err());
}
