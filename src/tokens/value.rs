//! Rendering token values as CSS text.

use super::TokenValue;

/// Prints a number without float noise or trailing zeros (`1.0` → `1`,
/// `0.30000000000000004` → `0.3`). Rounds to six decimals.
pub fn format_number(n: f64) -> String {
    let rounded = (n * 1_000_000.0).round() / 1_000_000.0;
    if rounded == 0.0 {
        // Avoids "-0".
        return "0".to_string();
    }
    format!("{rounded}")
}

/// Renders a value as it should appear on the right-hand side of a CSS
/// declaration. Arrays join with `, ` (font stacks, layered values); objects
/// fall back to compact JSON.
pub fn css_value(value: &TokenValue) -> String {
    match value {
        TokenValue::String(s) => s.clone(),
        TokenValue::Number(n) => n.to_string(),
        TokenValue::Bool(b) => b.to_string(),
        TokenValue::Null => String::new(),
        TokenValue::Array(items) => items.iter().map(css_value).collect::<Vec<_>>().join(", "),
        TokenValue::Object(_) => value.to_string(),
    }
}

/// Parses a bare number, accepting surrounding whitespace.
pub fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|n| n.is_finite())
}
