//! `size/px-to-rem`: `"16px"` → `"1rem"` for sizing tokens.

use super::{Transform, TransformError, TransformOptions};
use crate::tokens::value::parse_number;
use crate::tokens::{format_number, TokenKind, TokenNode, TokenValue};

pub fn px_to_rem() -> Transform {
    Transform::value(
        "size/px-to-rem",
        |node| node.kind == TokenKind::Sizing,
        convert,
    )
}

fn convert(node: &TokenNode, options: &TransformOptions) -> Result<TokenValue, TransformError> {
    Ok(match &node.value {
        TokenValue::String(text) => match px_to_rem_text(text, options.base_font_size) {
            Some(rem) => TokenValue::String(rem),
            None => node.value.clone(),
        },
        other => other.clone(),
    })
}

/// Converts a `{n}px` string; anything else is not a pixel length.
pub fn px_to_rem_text(text: &str, base_font_size: f64) -> Option<String> {
    let magnitude = parse_number(text.trim().strip_suffix("px")?)?;
    Some(format!("{}rem", format_number(magnitude / base_font_size)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_pixel_lengths() {
        assert_eq!(px_to_rem_text("16px", 16.0).as_deref(), Some("1rem"));
        assert_eq!(px_to_rem_text("8px", 16.0).as_deref(), Some("0.5rem"));
        assert_eq!(px_to_rem_text("3px", 16.0).as_deref(), Some("0.1875rem"));
        assert_eq!(px_to_rem_text("-4px", 16.0).as_deref(), Some("-0.25rem"));
        assert_eq!(px_to_rem_text("20px", 10.0).as_deref(), Some("2rem"));
    }

    #[test]
    fn leaves_other_units_alone() {
        assert_eq!(px_to_rem_text("2rem", 16.0), None);
        assert_eq!(px_to_rem_text("100%", 16.0), None);
        assert_eq!(px_to_rem_text("8px * 2", 16.0), None);
        assert_eq!(px_to_rem_text("px", 16.0), None);
    }
}
