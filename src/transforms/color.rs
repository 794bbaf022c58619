//! `color/normalize`: lowercase hex strings; `{hex, opacity}` → `rgba(r,g,b,a)`.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{describe, Transform, TransformError, TransformOptions};
use crate::tokens::value::parse_number;
use crate::tokens::{format_number, TokenKind, TokenNode, TokenValue};

static HEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3,4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").expect("hex pattern is valid")
});

/// True for values that are colours and must not get a length unit: hex,
/// `rgb()`/`rgba()`/`hsl()`/`hsla()`, or anything mentioning `color`.
pub fn is_color(text: &str) -> bool {
    let text = text.trim();
    let lower = text.to_ascii_lowercase();
    HEX.is_match(text)
        || ["rgb(", "rgba(", "hsl(", "hsla("]
            .iter()
            .any(|prefix| lower.starts_with(prefix))
        || lower.contains("color")
}

pub fn normalize() -> Transform {
    Transform::value(
        "color/normalize",
        |node| node.kind == TokenKind::Color,
        normalize_value,
    )
}

fn normalize_value(node: &TokenNode, _: &TransformOptions) -> Result<TokenValue, TransformError> {
    match &node.value {
        TokenValue::String(text) if HEX.is_match(text.trim()) => {
            Ok(TokenValue::String(text.trim().to_ascii_lowercase()))
        }
        TokenValue::Object(map) => {
            let Some(hex) = map.get("hex") else {
                return Ok(node.value.clone());
            };
            let hex = hex.as_str().ok_or_else(|| TransformError::UnexpectedValue {
                expected: "a hex string",
                found: describe(hex),
            })?;
            let (r, g, b) = parse_hex(hex)?;
            let alpha = match map.get("opacity") {
                None | Some(TokenValue::Null) => 1.0,
                Some(TokenValue::Number(n)) => n.as_f64().unwrap_or(1.0),
                Some(TokenValue::String(s)) => parse_opacity(s).ok_or_else(|| {
                    TransformError::UnexpectedValue {
                        expected: "a numeric opacity",
                        found: format!("string '{s}'"),
                    }
                })?,
                Some(other) => {
                    return Err(TransformError::UnexpectedValue {
                        expected: "a numeric opacity",
                        found: describe(other),
                    })
                }
            };
            Ok(TokenValue::String(format!(
                "rgba({r},{g},{b},{})",
                format_number(alpha)
            )))
        }
        other => Ok(other.clone()),
    }
}

fn parse_opacity(text: &str) -> Option<f64> {
    match text.trim().strip_suffix('%') {
        Some(percent) => parse_number(percent).map(|p| p / 100.0),
        None => parse_number(text),
    }
}

/// Parses `#rgb` or `#rrggbb` (the `#` is optional) into channels.
pub fn parse_hex(hex: &str) -> Result<(u8, u8, u8), TransformError> {
    let invalid = || TransformError::InvalidHexColor(hex.to_string());
    let digits = hex.trim().trim_start_matches('#');
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return Err(invalid()),
    };
    let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).map_err(|_| invalid());
    Ok((channel(0)?, channel(2)?, channel(4)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!(parse_hex("#ff8000"), Ok((255, 128, 0)));
        assert_eq!(parse_hex("0af"), Ok((0, 170, 255)));
        assert!(parse_hex("#ff80").is_err());
        assert!(parse_hex("#gg0000").is_err());
    }

    #[test]
    fn recognises_colors() {
        assert!(is_color("#FFF"));
        assert!(is_color("rgba(0, 0, 0, 0.2)"));
        assert!(is_color("HSL(10, 50%, 50%)"));
        assert!(is_color("var(--shadow-color)"));
        assert!(!is_color("4px"));
        assert!(!is_color("#12"));
    }
}
