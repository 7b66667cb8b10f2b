use crate::metadata::entry::FileReference;
use crate::metadata::plugin::{PluginMetadata, PluginMetadataBuilder};
use crate::sorting::error::SortError;
use crate::sorting::graph::DependencyGraph;
use crate::sorting::sorter::check_cycles;

fn after(name: &str, target: &str) -> PluginMetadata {
    PluginMetadataBuilder::new(name)
        .load_after(FileReference::file(target))
        .build()
}

#[test]
fn test_edges_from_plugins() {
    let plugins = vec![
        PluginMetadata::new("A.esp"),
        after("B.esp", "A.esp"),
        // Relations to plugins outside the batch are ignored
        after("C.esp", "Missing.esp"),
    ];
    let graph = DependencyGraph::from_plugins(&plugins);

    assert_eq!(graph.dependencies_of("b.esp"), vec!["A.esp"]);
    assert!(graph.dependencies_of("C.esp").is_empty());
    assert!(graph.dependencies_of("Missing.esp").is_empty());
    assert_eq!(graph.find_cycle(), None);
}

#[test]
fn test_master_rule_overrides_edge() {
    let master = PluginMetadataBuilder::new("M.esm")
        .master_file(true)
        .load_after(FileReference::file("P.esp"))
        .build();
    let plugin = after("P.esp", "M.esm");
    let graph = DependencyGraph::from_plugins(&[master, plugin]);
    assert!(graph.dependencies_of("M.esm").is_empty());
    assert_eq!(graph.find_cycle(), None);
}

#[test]
fn test_three_plugin_cycle() {
    let plugins = vec![
        after("A.esp", "B.esp"),
        after("B.esp", "C.esp"),
        after("C.esp", "A.esp"),
    ];
    let graph = DependencyGraph::from_plugins(&plugins);
    assert_eq!(
        graph.find_cycle(),
        Some(vec![
            "A.esp".to_string(),
            "B.esp".to_string(),
            "C.esp".to_string(),
            "A.esp".to_string(),
        ])
    );

    let err = check_cycles(&plugins).unwrap_err();
    assert_eq!(err.plugins(), vec!["A.esp", "B.esp", "C.esp"]);
    assert_eq!(
        err.to_string(),
        "Cyclic interaction detected: A.esp --> B.esp --> C.esp --> A.esp"
    );
}

#[test]
fn test_two_plugin_cycle_is_an_ordering_cycle() {
    let plugins = vec![after("A.esp", "B.esp"), after("B.esp", "A.esp")];
    assert_eq!(
        check_cycles(&plugins),
        Err(SortError::OrderingCycle {
            first: "A.esp".to_string(),
            second: "B.esp".to_string(),
        })
    );
}

#[test]
fn test_manual_graph() {
    let mut graph = DependencyGraph::default();
    graph.add_edge("X.esp", "Y.esp");
    graph.add_edge("x.esp", "Y.ESP");
    assert_eq!(graph.dependencies_of("X.esp"), vec!["Y.esp"]);

    graph.add_edge("Y.esp", "X.esp");
    assert!(graph.find_cycle().is_some());
}
