//! # `typescript/nested-interface`
//!
//! One `export interface` per nested object in the value tree. A
//! declaration's name is its parent's name followed by the PascalCased key,
//! so names are qualified by their full path. Children are declared before
//! the declarations that reference them. Every non-object value is typed
//! `string`.
//!
//! Distinct keys can still PascalCase to the same name (`font-size` and
//! `fontSize`). Each declaration's shape is digested; a repeated name with the
//! same shape is emitted once, a repeated name with a different shape gets a
//! numeric suffix.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Map;
use sha2::{Digest, Sha256};

use super::{banner, Format, FormatError, FormatOptions};
use crate::tokens::{pascal_case, Dictionary, TokenValue};

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("identifier pattern is valid"));

pub fn nested_interface() -> Format {
    Format::new(
        "typescript/nested-interface",
        "Interfaces describing the token tree",
        render,
    )
}

fn render(dictionary: &Dictionary, options: &FormatOptions) -> Result<String, FormatError> {
    let mut declarations = Declarations::default();
    let root = match dictionary.values() {
        TokenValue::Object(map) => declarations.declare(&options.type_root, map),
        _ => declarations.declare(&options.type_root, &Map::new()),
    };

    let mut out = banner(options);
    out.push_str(&declarations.emitted.join("\n"));
    out.push_str(&format!(
        "\nexport declare const tokens: {root};\nexport default tokens;\n"
    ));
    Ok(out)
}

#[derive(Default)]
struct Declarations {
    /// Declaration name → shape digest.
    seen: HashMap<String, [u8; 32]>,
    emitted: Vec<String>,
}

impl Declarations {
    /// Declares `map` (children first) and returns the name it was emitted
    /// under.
    fn declare(&mut self, name: &str, map: &Map<String, TokenValue>) -> String {
        let fields: Vec<(String, String)> = map
            .iter()
            .map(|(key, value)| {
                let ty = match value {
                    TokenValue::Object(child) => {
                        self.declare(&format!("{name}{}", pascal_case(key)), child)
                    }
                    _ => "string".to_string(),
                };
                (key.clone(), ty)
            })
            .collect();

        let digest = shape_digest(&fields);
        let mut candidate = name.to_string();
        let mut suffix = 1;
        loop {
            match self.seen.get(&candidate) {
                Some(existing) if *existing == digest => return candidate,
                Some(_) => {
                    suffix += 1;
                    candidate = format!("{name}{suffix}");
                }
                None => break,
            }
        }

        self.seen.insert(candidate.clone(), digest);
        let body: String = fields
            .iter()
            .map(|(key, ty)| format!("  {}: {};\n", property_key(key), ty))
            .collect();
        self.emitted
            .push(format!("export interface {candidate} {{\n{body}}}\n"));
        candidate
    }
}

fn shape_digest(fields: &[(String, String)]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for (key, ty) in fields {
        hasher.update(key.as_bytes());
        hasher.update([0u8]);
        hasher.update(ty.as_bytes());
        hasher.update([0u8]);
    }
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&hasher.finalize());
    digest
}

fn property_key(key: &str) -> String {
    if IDENTIFIER.is_match(key) {
        key.to_string()
    } else {
        format!("'{}'", key.replace('\\', "\\\\").replace('\'', "\\'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn declare(value: TokenValue) -> Declarations {
        let mut declarations = Declarations::default();
        if let TokenValue::Object(map) = value {
            declarations.declare("T", &map);
        }
        declarations
    }

    #[test]
    fn children_are_declared_before_parents() {
        let d = declare(json!({"base": {"spacing": {"4": "1rem"}}}));
        assert_eq!(d.emitted.len(), 3);
        assert!(d.emitted[0].starts_with("export interface TBaseSpacing {"));
        assert!(d.emitted[0].contains("  '4': string;"));
        assert!(d.emitted[1].contains("  spacing: TBaseSpacing;"));
        assert!(d.emitted[2].contains("  base: TBase;"));
    }

    #[test]
    fn colliding_names_with_different_shapes_are_disambiguated() {
        let d = declare(json!({"font-size": {"a": "1"}, "fontSize": {"b": "2"}}));
        assert!(d.emitted[0].starts_with("export interface TFontSize {"));
        assert!(d.emitted[1].starts_with("export interface TFontSize2 {"));
        assert!(d.emitted[2].contains("'font-size': TFontSize;"));
        assert!(d.emitted[2].contains("fontSize: TFontSize2;"));
    }

    #[test]
    fn colliding_names_with_the_same_shape_are_shared() {
        let d = declare(json!({"font-size": {"a": "1"}, "fontSize": {"a": "2"}}));
        assert_eq!(d.emitted.len(), 2);
        assert!(d.emitted[1].contains("'font-size': TFontSize;"));
        assert!(d.emitted[1].contains("fontSize: TFontSize;"));
    }
}
