//! `json/flat`: every token's emitted name mapped to its final value.

use serde_json::Map;

use super::{Format, FormatError, FormatOptions};
use crate::tokens::{Dictionary, TokenValue};

pub fn flat() -> Format {
    Format::new("json/flat", "Flat name → value map", render)
}

fn render(dictionary: &Dictionary, _: &FormatOptions) -> Result<String, FormatError> {
    let mut map = Map::with_capacity(dictionary.len());
    for token in dictionary.all_tokens() {
        map.insert(token.name.clone(), token.value.clone());
    }
    let mut out = serde_json::to_string_pretty(&TokenValue::Object(map))?;
    out.push('\n');
    Ok(out)
}
