//! CSS formatters: `css/utilities` and `css/variables`.

use super::{banner, Format, FormatError, FormatOptions};
use crate::tokens::{css_value, kebab_case, Dictionary, ResolvedToken};

/// Spacing utility classes, in emission order: class prefix and the
/// properties it sets.
pub const SPACING_UTILITIES: [(&str, &[&str]); 13] = [
    ("m", &["margin"]),
    ("mt", &["margin-top"]),
    ("mr", &["margin-right"]),
    ("mb", &["margin-bottom"]),
    ("ml", &["margin-left"]),
    ("mx", &["margin-left", "margin-right"]),
    ("p", &["padding"]),
    ("pt", &["padding-top"]),
    ("pr", &["padding-right"]),
    ("pb", &["padding-bottom"]),
    ("pl", &["padding-left"]),
    ("px", &["padding-left", "padding-right"]),
    ("py", &["padding-top", "padding-bottom"]),
];

/// Colour utility classes: class prefix and property.
pub const COLOR_UTILITIES: [(&str, &str); 3] = [
    ("text", "color"),
    ("bg", "background-color"),
    ("border", "border-color"),
];

pub fn utilities() -> Format {
    Format::new(
        "css/utilities",
        "Margin, padding and colour utility classes",
        render_utilities,
    )
}

pub fn variables() -> Format {
    Format::new(
        "css/variables",
        "Custom properties on :root",
        render_variables,
    )
}

fn render_utilities(dictionary: &Dictionary, options: &FormatOptions) -> Result<String, FormatError> {
    let mut rules = Vec::new();
    for token in dictionary.all_tokens() {
        match token.path.get(1) {
            Some("spacing") if token.path.len() > 2 => {
                let key = escape_class(&spacing_key(token));
                let value = css_value(&token.value);
                for (prefix, properties) in SPACING_UTILITIES {
                    rules.push(rule(&format!("{prefix}-{key}"), properties, &value));
                }
            }
            Some("color") if token.path.len() > 2 => {
                let suffix = escape_class(&color_suffix(token));
                let value = css_value(&token.value);
                for (prefix, property) in COLOR_UTILITIES {
                    rules.push(rule(&format!("{prefix}-{suffix}"), &[property], &value));
                }
            }
            _ => {}
        }
    }
    let mut out = banner(options);
    out.push_str(&rules.join("\n"));
    out.push('\n');
    Ok(out)
}

fn rule(class: &str, properties: &[&str], value: &str) -> String {
    let body: String = properties
        .iter()
        .map(|property| format!("{property}: {value}; "))
        .collect();
    format!(".{class} {{ {body}}}")
}

/// `base.spacing.inset.sm` → `inset-sm`; keys are kept as written (`0.5`).
fn spacing_key(token: &ResolvedToken) -> String {
    token.path.segments()[2..].join("-")
}

/// `base.color.red.500` → `red-500`.
fn color_suffix(token: &ResolvedToken) -> String {
    token.path.segments()[2..]
        .iter()
        .map(|segment| kebab_case(segment))
        .collect::<Vec<_>>()
        .join("-")
}

/// Escapes characters that are not allowed verbatim in a class selector.
fn escape_class(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for c in key.chars() {
        if matches!(c, '.' | '/' | ':' | '%') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn render_variables(dictionary: &Dictionary, options: &FormatOptions) -> Result<String, FormatError> {
    let mut out = banner(options);
    out.push_str(":root {\n");
    for token in dictionary.all_tokens() {
        out.push_str(&format!("  --{}: {};", token.name, css_value(&token.value)));
        if let Some(description) = &token.original.description {
            out.push_str(&format!(" /* {description} */"));
        }
        out.push('\n');
    }
    out.push_str("}\n");
    Ok(out)
}
