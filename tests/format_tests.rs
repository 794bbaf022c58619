mod common;

use serde_json::json;
use tokenforge::formats::css::SPACING_UTILITIES;
use tokenforge::formats::{FormatOptions, FormatRegistry};
use tokenforge::registry::build_default_format_registry;
use tokenforge::tokens::Accessor;
use tokenforge::{ErrorType, TokenValue};

fn render(format: &str) -> String {
    let dict = common::compile(common::SAMPLE_TOKENS);
    common::pipeline().render(format, &dict).unwrap()
}

// ============================================================================
// css/utilities
// ============================================================================

#[test]
fn every_spacing_key_gets_each_utility_exactly_once() {
    let css = render("css/utilities");
    for key in ["1", "2", "4", "0\\.5"] {
        for (prefix, _) in SPACING_UTILITIES {
            let selector = format!(".{prefix}-{key} {{");
            assert_eq!(
                css.lines().filter(|l| l.starts_with(&selector)).count(),
                1,
                "{selector}"
            );
        }
    }
    let spacing_rules = css
        .lines()
        .filter(|l| SPACING_UTILITIES.iter().any(|(p, _)| l.starts_with(&format!(".{p}-"))))
        .count();
    assert_eq!(spacing_rules, 4 * 13);
}

#[test]
fn nested_spacing_groups_keep_keys_distinct() {
    let dict = common::compile(
        r#"{"base": {"spacing": {
            "inset": {"sm": {"value": "4px", "type": "spacing"}},
            "stack": {"sm": {"value": "8px", "type": "spacing"}}
        }}}"#,
    );
    let css = common::pipeline().render("css/utilities", &dict).unwrap();
    assert!(css.contains(".m-inset-sm { margin: 0.25rem; }"));
    assert!(css.contains(".m-stack-sm { margin: 0.5rem; }"));
    assert!(!css.contains(".m-sm "));
    for (prefix, _) in SPACING_UTILITIES {
        for key in ["inset-sm", "stack-sm"] {
            let selector = format!(".{prefix}-{key} {{");
            assert_eq!(css.lines().filter(|l| l.starts_with(&selector)).count(), 1);
        }
    }
}

#[test]
fn spacing_rules_use_resolved_values() {
    let css = render("css/utilities");
    assert!(css.contains(".p-4 { padding: 1rem; }"));
    assert!(css.contains(".mx-2 { margin-left: 0.5rem; margin-right: 0.5rem; }"));
    assert!(css.contains(".py-1 { padding-top: 0.25rem; padding-bottom: 0.25rem; }"));
    assert!(css.contains(".m-0\\.5 { margin: 0.125rem; }"));
}

#[test]
fn color_rules_use_the_path_below_the_color_group() {
    let css = render("css/utilities");
    assert!(css.contains(".text-red-500 { color: #ef4444; }"));
    assert!(css.contains(".bg-red-500 { background-color: #ef4444; }"));
    assert!(css.contains(".border-red-500 { border-color: #ef4444; }"));
    assert!(css.contains(".bg-overlay { background-color: rgba(0,0,0,0.5); }"));
    assert!(!css.contains("font-weight"));
}

#[test]
fn generated_files_carry_the_banner_unless_disabled() {
    let dict = common::compile(common::SAMPLE_TOKENS);
    let mut pipeline = common::pipeline();
    let with = pipeline.render("css/utilities", &dict).unwrap();
    assert!(with.starts_with("/**\n * Do not edit directly"));

    pipeline.format_options.file_header = false;
    let without = pipeline.render("css/utilities", &dict).unwrap();
    assert!(without.starts_with(".m-1 {"));
}

// ============================================================================
// css/variables, json/flat
// ============================================================================

#[test]
fn variables_declare_every_token_on_root() {
    let css = render("css/variables");
    assert!(css.contains(":root {\n"));
    assert!(css.contains("  --base-spacing-4: 1rem;\n"));
    assert!(css.contains("  --base-color-primary: #ef4444; /* brand colour */\n"));
    assert_eq!(css.lines().filter(|l| l.starts_with("  --")).count(), 12);
}

#[test]
fn flat_json_maps_names_to_values() {
    let flat: TokenValue = serde_json::from_str(&render("json/flat")).unwrap();
    assert_eq!(flat["base-spacing-4"], json!("1rem"));
    assert_eq!(flat["base-border-radius-md"], json!("0.5rem"));
    assert_eq!(flat.as_object().unwrap().len(), 12);
}

// ============================================================================
// javascript/styled-components
// ============================================================================

#[test]
fn javascript_module_exports_values_and_accessors() {
    let js = render("javascript/styled-components");
    assert!(js.contains("export const tokens = {"));
    assert!(js.contains("\"4\": \"1rem\""));
    assert!(!js.contains("\"type\""));
    assert!(!js.contains("\"original\""));
    for accessor in Accessor::defaults() {
        assert!(
            js.contains(&format!("export const {} = (", accessor.name)),
            "{}",
            accessor.name
        );
    }
    assert!(js.contains(
        r#"export const spacing = (key) => resolve(["base", "spacing", String(key)], key);"#
    ));
    assert!(js.trim_end().ends_with("export default tokens;"));
}

#[test]
fn accessors_fall_back_to_the_key() {
    let dict = common::compile(common::SAMPLE_TOKENS);
    let [spacing, color, radius, shadow, font_size, font_weight, typography] =
        <[Accessor; 7]>::try_from(Accessor::defaults()).unwrap();

    assert_eq!(dict.access(&spacing, "4"), json!("1rem"));
    assert_eq!(dict.access(&color, "red.500"), json!("#ef4444"));
    assert_eq!(dict.access(&radius, "md"), json!("0.5rem"));
    assert_eq!(dict.access(&font_weight, "bold"), json!("700"));

    assert_eq!(dict.access(&spacing, "doesNotExist"), json!("doesNotExist"));
    assert_eq!(dict.access(&color, "red.900"), json!("red.900"));
    assert_eq!(dict.access(&color, "nope"), json!("nope"));
    assert_eq!(dict.access(&radius, "xl"), json!("xl"));
    assert_eq!(dict.access(&shadow, "huge"), json!("huge"));
    assert_eq!(dict.access(&font_size, "4xl"), json!("4xl"));
    assert_eq!(dict.access(&typography, "body.small"), json!("body.small"));
}

// ============================================================================
// typescript/nested-interface
// ============================================================================

fn count_objects(value: &TokenValue) -> usize {
    match value {
        TokenValue::Object(map) => 1 + map.values().map(count_objects).sum::<usize>(),
        _ => 0,
    }
}

#[test]
fn every_shape_is_declared_once_and_every_leaf_is_a_string() {
    let dict = common::compile(common::SAMPLE_TOKENS);
    let ts = common::pipeline()
        .render("typescript/nested-interface", &dict)
        .unwrap();

    assert_eq!(
        ts.matches("export interface ").count(),
        count_objects(dict.values())
    );
    assert_eq!(
        ts.lines().filter(|l| l.ends_with(": string;")).count(),
        dict.len()
    );
    assert!(ts.contains("  '0.5': string;"));
    assert!(ts.contains("  spacing: DesignTokensBaseSpacing;"));
    assert!(ts.contains("export declare const tokens: DesignTokens;"));
}

#[test]
fn declarations_precede_their_users() {
    let ts = render("typescript/nested-interface");
    let child = ts.find("export interface DesignTokensBaseSpacing {").unwrap();
    let parent = ts.find("export interface DesignTokensBase {").unwrap();
    let root = ts.find("export interface DesignTokens {").unwrap();
    assert!(child < parent);
    assert!(parent < root);
}

#[test]
fn type_root_is_configurable() {
    let dict = common::compile(common::SAMPLE_TOKENS);
    let mut pipeline = common::pipeline();
    pipeline.format_options.type_root = "Theme".to_string();
    let ts = pipeline.render("typescript/nested-interface", &dict).unwrap();
    assert!(ts.contains("export interface ThemeBaseSpacing {"));
    assert!(ts.contains("export declare const tokens: Theme;"));
}

// ============================================================================
// registry
// ============================================================================

#[test]
fn run_all_renders_every_formatter() {
    let dict = common::compile(common::SAMPLE_TOKENS);
    let registry = build_default_format_registry().unwrap();
    let outputs = registry.run_all(&dict, &FormatOptions::default()).unwrap();
    let names: Vec<_> = outputs.keys().cloned().collect();
    let mut expected = registry.names();
    expected.sort();
    assert_eq!(names, expected);
    assert_eq!(
        outputs["css/utilities"],
        registry.render("css/utilities", &dict, &FormatOptions::default()).unwrap()
    );
}

#[test]
fn formatter_names_are_unique() {
    let mut registry = FormatRegistry::new();
    registry.register(tokenforge::formats::json::flat()).unwrap();
    let err = registry.register(tokenforge::formats::json::flat()).unwrap_err();
    assert_eq!(err.error_type(), ErrorType::Registration);
}

#[test]
fn unknown_format_is_a_config_error() {
    let dict = common::compile(common::SAMPLE_TOKENS);
    let err = common::pipeline().render("css/nope", &dict).unwrap_err();
    assert_eq!(err.error_type(), ErrorType::Config);
}
