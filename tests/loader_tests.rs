mod common;

use serde_json::json;
use tokenforge::tokens::loader::{collect_source_files, load_documents, load_str, SourceDocument};
use tokenforge::{ErrorType, TokenKind};

#[test]
fn leaves_are_ordered_depth_first_in_authored_order() {
    let tree = load_str("t.json", common::SAMPLE_TOKENS).unwrap();
    let paths: Vec<String> = tree.tokens.iter().map(|t| t.path.to_string()).collect();
    assert_eq!(
        paths,
        vec![
            "base.spacing.1",
            "base.spacing.2",
            "base.spacing.4",
            "base.spacing.0.5",
            "base.color.red.500",
            "base.color.overlay",
            "base.color.primary",
            "base.borderRadius.md",
            "base.boxShadow.card",
            "base.fontSizes.lg",
            "base.fontWeights.bold",
            "typography.heading.h1",
        ]
    );
}

#[test]
fn metadata_keys_are_skipped_and_descriptions_kept() {
    let tree = load_str("t.json", common::SAMPLE_TOKENS).unwrap();
    assert!(tree.tokens.iter().all(|t| !t.path.to_string().contains('$')));
    let primary = tree
        .tokens
        .iter()
        .find(|t| t.path.last() == Some("primary"))
        .unwrap();
    assert_eq!(primary.original.description.as_deref(), Some("brand colour"));
    assert_eq!(primary.kind, TokenKind::Color);
}

#[test]
fn unknown_types_load_as_other() {
    let tree = load_str("t.json", r#"{"z": {"value": 1, "type": "zIndex"}}"#).unwrap();
    assert_eq!(tree.tokens[0].kind, TokenKind::Other("zIndex".to_string()));
}

#[test]
fn type_without_value_is_a_structural_error() {
    let err = load_str("t.json", r#"{"a": {"b": {"type": "sizing"}}}"#).unwrap_err();
    assert_eq!(err.error_type(), ErrorType::Structure);
    assert_eq!(err.token().map(|p| p.to_string()).as_deref(), Some("a.b"));
    assert!(err.message().contains("a.b"));
}

#[test]
fn value_without_type_is_a_structural_error() {
    let err = load_str("t.json", r#"{"a": {"value": "4px"}}"#).unwrap_err();
    assert_eq!(err.error_type(), ErrorType::Structure);
    assert!(err.message().contains("no type"));
}

#[test]
fn invalid_json_is_a_parse_error_with_a_span() {
    let err = load_str("broken.json", "{\n  \"a\": \n}").unwrap_err();
    assert_eq!(err.error_type(), ErrorType::Parse);
    assert!(err.context().span.is_some());
    assert!(err.message().contains("broken.json"));
}

#[test]
fn later_documents_override_earlier_ones() {
    let base = SourceDocument::parse(
        "base.json",
        r##"{"color": {"a": {"value": "#111111", "type": "color"}, "b": {"value": "#222222", "type": "color"}}}"##,
    )
    .unwrap();
    let theme = SourceDocument::parse(
        "theme.json",
        r##"{"color": {"b": {"value": "#333333", "type": "color"}}}"##,
    )
    .unwrap();
    let tree = load_documents(&[base, theme]).unwrap();
    assert_eq!(tree.len(), 2);
    assert_eq!(tree.tokens[0].value, json!("#111111"));
    assert_eq!(tree.tokens[1].value, json!("#333333"));
}

#[test]
fn references_are_resolved_before_transforms() {
    let tree = load_str(
        "t.json",
        r#"{
          "size": {"base": {"value": "8px", "type": "sizing"}},
          "gap": {"value": "{size.base} * 2", "type": "spacing"},
          "alias": {"value": "{size.base}", "type": "sizing"}
        }"#,
    )
    .unwrap();
    assert_eq!(tree.tokens[1].original.value, json!("{size.base} * 2"));
    assert_eq!(tree.tokens[1].original.resolved, json!("8px * 2"));
    assert_eq!(tree.tokens[2].value, json!("8px"));
}

#[test]
fn reference_failures_name_the_referring_token() {
    let unknown = load_str("t.json", r#"{"a": {"value": "{nope}", "type": "color"}}"#).unwrap_err();
    assert_eq!(unknown.error_type(), ErrorType::Reference);
    assert_eq!(unknown.token().map(|p| p.to_string()).as_deref(), Some("a"));

    let cycle = load_str(
        "t.json",
        r#"{"a": {"value": "{b}", "type": "color"}, "b": {"value": "{a}", "type": "color"}}"#,
    )
    .unwrap_err();
    assert_eq!(cycle.error_type(), ErrorType::Reference);
    assert!(cycle.message().contains("circular"));
}

#[cfg(unix)]
#[test]
fn unreadable_directory_entries_fail_the_load() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.json"), "{}").unwrap();
    std::os::unix::fs::symlink(dir.path().join("gone.json"), dir.path().join("b.json")).unwrap();

    let err = collect_source_files(&[dir.path().to_path_buf()]).unwrap_err();
    assert_eq!(err.error_type(), ErrorType::Io);
    assert!(err.message().contains("failed to scan"), "{}", err.message());
}

#[test]
fn directories_expand_to_sorted_json_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("nested")).unwrap();
    std::fs::write(dir.path().join("nested/b.json"), "{}").unwrap();
    std::fs::write(dir.path().join("a.json"), "{}").unwrap();
    std::fs::write(dir.path().join("readme.md"), "").unwrap();

    let files = collect_source_files(&[dir.path().to_path_buf()]).unwrap();
    assert_eq!(files, vec![dir.path().join("a.json"), dir.path().join("nested/b.json")]);
}
