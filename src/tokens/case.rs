//! Identifier case conversion for emitted names.

/// Splits an identifier into words at non-alphanumeric characters and at
/// camel-case boundaries (`fontSize` → `font`, `Size`; `XMLHttp` → `XML`, `Http`).
/// Digits stay attached to the preceding word (`h1`, `red500`).
fn words(input: &str) -> Vec<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_numeric() || (prev.is_uppercase() && next_is_lower) {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// `fontSize` → `font-size`, `Base Spacing` → `base-spacing`, `0.5` → `0-5`.
pub fn kebab_case(input: &str) -> String {
    words(input)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

/// `fontSize` → `FontSize`, `line-height` → `LineHeight`.
pub fn pascal_case(input: &str) -> String {
    words(input)
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kebab_splits_camel_case_and_separators() {
        assert_eq!(kebab_case("fontSize"), "font-size");
        assert_eq!(kebab_case("Base Spacing"), "base-spacing");
        assert_eq!(kebab_case("line_height"), "line-height");
        assert_eq!(kebab_case("XMLHttpRequest"), "xml-http-request");
        assert_eq!(kebab_case("0.5"), "0-5");
        assert_eq!(kebab_case("4"), "4");
        assert_eq!(kebab_case("h1"), "h1");
    }

    #[test]
    fn kebab_is_idempotent() {
        for input in ["base-spacing-4", "font-size", "red-500"] {
            assert_eq!(kebab_case(input), input);
        }
    }

    #[test]
    fn pascal_capitalises_each_word() {
        assert_eq!(pascal_case("base"), "Base");
        assert_eq!(pascal_case("fontSize"), "FontSize");
        assert_eq!(pascal_case("border-radius"), "BorderRadius");
        assert_eq!(pascal_case("100"), "100");
    }
}
