//! `typography/css`: flattens a composite typography token.
//!
//! The first sub-property is the `font:` shorthand value; every remaining one
//! becomes a `--{name}-{sub-property}` custom property. Declarations are
//! joined with `; ` and the last one has no trailing semicolon:
//!
//! ```text
//! 700; --heading-h1-font-weight-font-size: 2rem; --heading-h1-font-weight-line-height: 2.5rem
//! ```

use super::{Transform, TransformError, TransformOptions};
use crate::tokens::{css_value, kebab_case, TokenKind, TokenNode, TokenValue};

pub fn flatten() -> Transform {
    Transform::value(
        "typography/css",
        |node| node.kind == TokenKind::Typography,
        flatten_value,
    )
}

fn flatten_value(node: &TokenNode, _: &TransformOptions) -> Result<TokenValue, TransformError> {
    let TokenValue::Object(map) = &node.value else {
        return Ok(node.value.clone());
    };
    let mut entries = map.iter();
    let Some((_, shorthand)) = entries.next() else {
        return Ok(node.value.clone());
    };
    let name = node.current_name();
    let mut declarations = vec![css_value(shorthand)];
    declarations.extend(
        entries.map(|(key, value)| format!("--{}-{}: {}", name, kebab_case(key), css_value(value))),
    );
    Ok(TokenValue::String(declarations.join("; ")))
}
