use crate::metadata::entry::{
    CategoryTag, EntrySet, FileReference, Message, MessageSeverity, TagSpec,
};

#[test]
fn test_tag_parse_handles_removal_marker() {
    let add = TagSpec::parse("Delev");
    assert_eq!(add.name, "Delev");
    assert!(add.is_addition);
    assert_eq!(add.prefixed_name(), "Delev");

    let remove = TagSpec::parse("-Relev");
    assert_eq!(remove.name, "Relev");
    assert!(!remove.is_addition);
    assert_eq!(remove.prefixed_name(), "-Relev");
}

#[test]
fn test_identity_ignores_condition() {
    let a = FileReference::file("Dep.esp");
    let b = FileReference::conditional_file("DEP.ESP", "Dependency", "file(\"x.esp\")");
    assert!(a.same_identity(&b));
    assert_ne!(a, b);
    assert!(!a.is_conditional());
    assert!(b.is_conditional());
}

#[test]
fn test_display_name_falls_back_to_name() {
    assert_eq!(FileReference::file("a.esp").display_name(), "a.esp");
    assert_eq!(
        FileReference::conditional_file("a.esp", "Mod A", "").display_name(),
        "Mod A"
    );
}

#[test]
fn test_entry_set_insert_replaces_same_identity() {
    let mut set = EntrySet::new();
    assert!(set.insert(FileReference::file("a.esp")).is_none());
    let old = set.insert(FileReference::conditional_file("A.ESP", "", "true"));

    assert_eq!(old, Some(FileReference::file("a.esp")));
    assert_eq!(set.len(), 1);
    assert_eq!(set.get("a.esp").unwrap().condition, "true");
}

#[test]
fn test_entry_set_insert_if_absent_keeps_existing() {
    let mut set = EntrySet::new();
    set.insert(FileReference::conditional_file("a.esp", "Original", ""));

    assert!(!set.insert_if_absent(FileReference::conditional_file("A.esp", "Other", "false")));
    assert!(set.insert_if_absent(FileReference::file("b.esp")));

    assert_eq!(set.len(), 2);
    assert_eq!(set.get("a.esp").unwrap().display_name(), "Original");
}

#[test]
fn test_entry_set_iterates_in_key_order() {
    let set: EntrySet<_> = ["c.esp", "A.esp", "b.esp"]
        .into_iter()
        .map(FileReference::file)
        .collect();
    let names: Vec<&str> = set.names().collect();
    assert_eq!(names, vec!["A.esp", "b.esp", "c.esp"]);
}

#[test]
fn test_tag_removal_and_addition_share_identity() {
    let mut tags = EntrySet::new();
    tags.insert(CategoryTag::tag("Delev"));
    tags.insert(CategoryTag::tag("-delev"));
    assert_eq!(tags.len(), 1);
    assert!(!tags.get("Delev").unwrap().is_addition());
}

#[test]
fn test_message_language_selection() {
    let universal = Message::note("Always shown");
    let german = Message::warning("Nur auf Deutsch").with_language("de");

    assert!(universal.is_for_language("en"));
    assert!(german.is_for_language("DE"));
    assert!(!german.is_for_language("en"));
    assert_eq!(german.severity(), MessageSeverity::Warning);
}

#[test]
fn test_message_text_is_stored_verbatim() {
    let msg = Message::error("my_mod.esp is *broken*");
    assert_eq!(msg.text(), "my_mod.esp is *broken*");
    assert_eq!(msg.severity(), MessageSeverity::Error);
}

#[test]
fn test_entry_set_serializes_as_list() {
    let set: EntrySet<_> = vec![
        CategoryTag::tag("-Relev"),
        CategoryTag::tag("Delev").with_condition("file(\"x.esp\")"),
    ]
    .into_iter()
    .collect();

    let json = serde_json::to_value(&set).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            { "condition": "file(\"x.esp\")", "name": "Delev" },
            { "name": "-Relev" }
        ])
    );

    let back: EntrySet<TagSpec> = serde_json::from_value(json).unwrap();
    assert_eq!(back, set);
}
