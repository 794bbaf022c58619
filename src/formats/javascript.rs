//! `javascript/styled-components`: the runtime token module.
//!
//! Emits the metadata-free value tree as `tokens`, one accessor function per
//! configured [`Accessor`], and `tokens` again as the default export. An
//! accessor never throws: when the path does not resolve it returns the key
//! it was called with, so a missing token shows up as its own name.
//! [`Dictionary::access`] implements the same lookup on the Rust side.

use super::{banner, Format, FormatError, FormatOptions};
use crate::tokens::{Accessor, Dictionary};

const RESOLVE_HELPER: &str = "\
const resolve = (path, fallback) => {
  let node = tokens;
  for (const key of path) {
    if (node === null || typeof node !== 'object' || !Object.prototype.hasOwnProperty.call(node, key)) {
      return fallback;
    }
    node = node[key];
  }
  return node === undefined || node === null ? fallback : node;
};
";

pub fn styled_components() -> Format {
    Format::new(
        "javascript/styled-components",
        "Token object with lenient accessor functions",
        render,
    )
}

fn render(dictionary: &Dictionary, options: &FormatOptions) -> Result<String, FormatError> {
    let mut out = banner(options);
    let tokens = serde_json::to_string_pretty(dictionary.values())?;
    out.push_str(&format!("export const tokens = {tokens};\n\n"));
    out.push_str(RESOLVE_HELPER);
    out.push('\n');
    for accessor in &options.accessors {
        out.push_str(&accessor_function(accessor)?);
        out.push('\n');
    }
    out.push_str("\nexport default tokens;\n");
    Ok(out)
}

/// `export const spacing = (key) => resolve(["base", "spacing", String(key)], key);`
fn accessor_function(accessor: &Accessor) -> Result<String, FormatError> {
    let mut path = accessor
        .root_segments()
        .iter()
        .map(serde_json::to_string)
        .collect::<Result<Vec<_>, _>>()?;
    let param = if accessor.dotted { "path" } else { "key" };
    if accessor.dotted {
        path.push(format!("...String({param}).split('.')"));
    } else {
        path.push(format!("String({param})"));
    }
    Ok(format!(
        "export const {} = ({param}) => resolve([{}], {param});",
        accessor.name,
        path.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_accessor_appends_the_key() {
        let line = accessor_function(&Accessor::new("spacing", "base.spacing", false)).unwrap();
        assert_eq!(
            line,
            r#"export const spacing = (key) => resolve(["base", "spacing", String(key)], key);"#
        );
    }

    #[test]
    fn dotted_accessor_splits_the_path() {
        let line = accessor_function(&Accessor::new("color", "base.color", true)).unwrap();
        assert_eq!(
            line,
            r#"export const color = (path) => resolve(["base", "color", ...String(path).split('.')], path);"#
        );
    }
}
