//! `responsive/css`: breakpoint maps → a default rule plus `@media` blocks.
//!
//! `{"default": "font-size: 1rem;", "768px": "font-size: 1.25rem;"}` becomes
//!
//! ```text
//! font-size: 1rem;
//! @media (min-width: 768px) { font-size: 1.25rem; }
//! ```
//!
//! `base` is accepted in place of `default`. Breakpoints keep authored order.

use super::{Transform, TransformError, TransformOptions};
use crate::tokens::{css_value, TokenKind, TokenNode, TokenValue};

const DEFAULT_KEYS: &[&str] = &["default", "base"];

pub fn media_queries() -> Transform {
    Transform::value(
        "responsive/css",
        |node| node.kind == TokenKind::Responsive,
        media_value,
    )
}

fn media_value(node: &TokenNode, _: &TransformOptions) -> Result<TokenValue, TransformError> {
    let TokenValue::Object(map) = &node.value else {
        return Ok(node.value.clone());
    };
    let mut rules = Vec::with_capacity(map.len());
    if let Some(default) = DEFAULT_KEYS.iter().find_map(|key| map.get(*key)) {
        rules.push(css_value(default));
    }
    for (breakpoint, fragment) in map {
        if DEFAULT_KEYS.contains(&breakpoint.as_str()) {
            continue;
        }
        rules.push(format!(
            "@media (min-width: {}) {{ {} }}",
            breakpoint,
            css_value(fragment)
        ));
    }
    Ok(TokenValue::String(rules.join("\n")))
}
