//! Name transforms.

use super::{any_token, Transform, TransformError, TransformOptions};
use crate::tokens::{kebab_case, TokenKind, TokenNode, TokenValue};

/// `name/kebab`: `["base", "fontSizes", "lg"]` → `base-font-sizes-lg`.
pub fn kebab() -> Transform {
    Transform::name("name/kebab", any_token, |node, _| Ok(node.path.kebab()))
}

/// `name/typography`: a typography token expands into several declarations,
/// so its name carries the first sub-property (`heading-h1` →
/// `heading-h1-font-weight`).
pub fn typography() -> Transform {
    Transform::name("name/typography", is_composite_typography, typography_name)
}

fn is_composite_typography(node: &TokenNode) -> bool {
    node.kind == TokenKind::Typography
        && matches!(&node.value, TokenValue::Object(map) if !map.is_empty())
}

fn typography_name(node: &TokenNode, _: &TransformOptions) -> Result<String, TransformError> {
    let base = node.current_name();
    match &node.value {
        TokenValue::Object(map) => match map.keys().next() {
            Some(first) => Ok(format!("{base}-{}", kebab_case(first))),
            None => Ok(base.into_owned()),
        },
        _ => Ok(base.into_owned()),
    }
}
