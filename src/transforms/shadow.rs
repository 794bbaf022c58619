//! `shadow/css`: structured box-shadow descriptions → CSS shorthand.
//!
//! A shadow object lists `x`, `y`, `blur`, `spread` and `color` (the keys
//! `offsetX`/`offset-x` and `offsetY`/`offset-y` are accepted for the
//! offsets). Bare numbers get `rem`; colours never do. An array of shadows is
//! joined with `, `. The shadow is inset when the token's name mentions
//! `inset`, when `type` is `innerShadow`, or when `inset` is `true`.

use super::{describe, Transform, TransformError, TransformOptions};
use crate::transforms::color::is_color;
use crate::tokens::value::parse_number;
use crate::tokens::{css_value, TokenKind, TokenNode, TokenValue};

const OFFSET_X: &[&str] = &["x", "offsetX", "offset-x"];
const OFFSET_Y: &[&str] = &["y", "offsetY", "offset-y"];

pub fn compose() -> Transform {
    Transform::value(
        "shadow/css",
        |node| node.kind == TokenKind::BoxShadow,
        compose_value,
    )
}

fn compose_value(node: &TokenNode, _: &TransformOptions) -> Result<TokenValue, TransformError> {
    let inset_by_name = node.current_name().contains("inset");
    match &node.value {
        TokenValue::Object(map) => Ok(TokenValue::String(shadow(map, inset_by_name))),
        TokenValue::Array(layers) => {
            let mut parts = Vec::with_capacity(layers.len());
            for layer in layers {
                match layer {
                    TokenValue::Object(map) => parts.push(shadow(map, inset_by_name)),
                    TokenValue::String(text) => parts.push(text.clone()),
                    other => {
                        return Err(TransformError::UnexpectedValue {
                            expected: "a shadow object",
                            found: describe(other),
                        })
                    }
                }
            }
            Ok(TokenValue::String(parts.join(", ")))
        }
        other => Ok(other.clone()),
    }
}

fn shadow(map: &serde_json::Map<String, TokenValue>, inset_by_name: bool) -> String {
    let inset = inset_by_name
        || map.get("type").and_then(TokenValue::as_str) == Some("innerShadow")
        || map.get("inset").and_then(TokenValue::as_bool) == Some(true);

    let mut parts = Vec::new();
    if inset {
        parts.push("inset".to_string());
    }
    let components = [
        pick(map, OFFSET_X),
        pick(map, OFFSET_Y),
        pick(map, &["blur"]),
        pick(map, &["spread"]),
        pick(map, &["color"]),
    ];
    parts.extend(components.into_iter().flatten().map(component));
    parts.join(" ")
}

fn pick<'a>(map: &'a serde_json::Map<String, TokenValue>, keys: &[&str]) -> Option<&'a TokenValue> {
    keys.iter().find_map(|key| map.get(*key))
}

fn component(value: &TokenValue) -> String {
    match value {
        TokenValue::Number(n) => format!("{n}rem"),
        TokenValue::String(text) if is_color(text) => text.trim().to_string(),
        TokenValue::String(text) if parse_number(text).is_some() => format!("{}rem", text.trim()),
        other => css_value(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::{SourceToken, TokenPath};
    use serde_json::json;

    fn node(path: &str, value: TokenValue) -> TokenNode {
        TokenNode::new(
            TokenPath::parse_dotted(path),
            SourceToken {
                value: value.clone(),
                resolved: value,
                type_name: "boxShadow".to_string(),
                description: None,
            },
        )
    }

    #[test]
    fn composes_single_shadow() {
        let n = node(
            "base.boxShadow.sm",
            json!({"x": 0, "y": "1", "blur": "2", "spread": 0, "color": "rgba(0,0,0,0.2)"}),
        );
        let out = compose_value(&n, &TransformOptions::default()).unwrap();
        assert_eq!(out, json!("0rem 1rem 2rem 0rem rgba(0,0,0,0.2)"));
    }

    #[test]
    fn layers_are_comma_separated_after_the_color() {
        let n = node(
            "base.boxShadow.md",
            json!([
                {"x": 0, "y": 1, "blur": 2, "color": "#000"},
                {"x": 0, "y": 4, "blur": 8, "color": "#0000001a"}
            ]),
        );
        let out = compose_value(&n, &TransformOptions::default()).unwrap();
        assert_eq!(out, json!("0rem 1rem 2rem #000, 0rem 4rem 8rem #0000001a"));
    }

    #[test]
    fn inset_comes_from_the_name_or_the_type() {
        let by_name = node("base.boxShadow.inset", json!({"x": 0, "y": 2, "color": "#000"}));
        assert_eq!(
            compose_value(&by_name, &TransformOptions::default()).unwrap(),
            json!("inset 0rem 2rem #000")
        );
        let by_type = node("base.boxShadow.inner", json!({"x": "4px", "y": 2, "type": "innerShadow"}));
        assert_eq!(
            compose_value(&by_type, &TransformOptions::default()).unwrap(),
            json!("inset 4px 2rem")
        );
    }
}
