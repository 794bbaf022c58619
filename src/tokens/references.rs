//! `{dotted.path}` reference substitution.
//!
//! A value that is exactly one reference takes the referenced token's value
//! verbatim (it may be a number or a composite). References embedded in a
//! longer string are interpolated as CSS text. Referenced tokens are resolved
//! first, so chains of references work; cycles are rejected.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use super::{css_value, SourceToken, TokenPath, TokenValue};
use crate::{err_msg, TokenError};

static REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^{}]+)\}").expect("reference pattern is valid"));

static WHOLE_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\{([^{}]+)\}\s*$").expect("reference pattern is valid"));

/// Fills `resolved` for every entry.
pub fn resolve_all(entries: &mut [(TokenPath, SourceToken)]) -> Result<(), TokenError> {
    let resolved = {
        let mut resolver = Resolver::new(entries);
        (0..entries.len())
            .map(|index| resolver.token(index))
            .collect::<Result<Vec<_>, _>>()?
    };
    for ((_, original), value) in entries.iter_mut().zip(resolved) {
        original.resolved = value;
    }
    Ok(())
}

enum State {
    Pending,
    Visiting,
    Done(TokenValue),
}

struct Resolver<'a> {
    entries: &'a [(TokenPath, SourceToken)],
    index: HashMap<String, usize>,
    groups: HashSet<String>,
    states: Vec<State>,
    stack: Vec<usize>,
}

impl<'a> Resolver<'a> {
    fn new(entries: &'a [(TokenPath, SourceToken)]) -> Self {
        let mut index = HashMap::new();
        let mut groups = HashSet::new();
        for (i, (path, _)) in entries.iter().enumerate() {
            index.insert(path.to_string(), i);
            let segments = path.segments();
            for end in 1..segments.len() {
                groups.insert(segments[..end].join("."));
            }
        }
        Self {
            entries,
            index,
            groups,
            states: entries.iter().map(|_| State::Pending).collect(),
            stack: Vec::new(),
        }
    }

    fn token(&mut self, index: usize) -> Result<TokenValue, TokenError> {
        match &self.states[index] {
            State::Done(value) => return Ok(value.clone()),
            State::Visiting => {
                let mut cycle: Vec<String> = self
                    .stack
                    .iter()
                    .skip_while(|&&i| i != index)
                    .map(|&i| self.entries[i].0.to_string())
                    .collect();
                cycle.push(self.entries[index].0.to_string());
                let referrer = self.entries[index].0.clone();
                return Err(err_msg!(Reference, "circular reference: {}", cycle.join(" -> "))
                    .with_token(referrer));
            }
            State::Pending => {}
        }

        self.states[index] = State::Visiting;
        self.stack.push(index);
        let entries = self.entries;
        let value = self.value(&entries[index].1.value, index)?;
        self.stack.pop();
        self.states[index] = State::Done(value.clone());
        Ok(value)
    }

    fn value(&mut self, value: &TokenValue, owner: usize) -> Result<TokenValue, TokenError> {
        match value {
            TokenValue::String(text) => self.text(text, owner),
            TokenValue::Array(items) => items
                .iter()
                .map(|item| self.value(item, owner))
                .collect::<Result<Vec<_>, _>>()
                .map(TokenValue::Array),
            TokenValue::Object(map) => {
                let mut resolved = serde_json::Map::with_capacity(map.len());
                for (key, item) in map {
                    resolved.insert(key.clone(), self.value(item, owner)?);
                }
                Ok(TokenValue::Object(resolved))
            }
            other => Ok(other.clone()),
        }
    }

    fn text(&mut self, text: &str, owner: usize) -> Result<TokenValue, TokenError> {
        if let Some(captures) = WHOLE_REFERENCE.captures(text) {
            let target = self.lookup(&captures[1], owner)?;
            return self.token(target);
        }

        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for captures in REFERENCE.captures_iter(text) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            out.push_str(&text[last..whole.start()]);
            let target = self.lookup(&captures[1], owner)?;
            let value = self.token(target)?;
            if value.is_object() {
                let referrer = self.entries[owner].0.clone();
                return Err(err_msg!(
                    Reference,
                    "'{}' refers to composite token '{}' inside a larger value",
                    referrer,
                    &captures[1]
                )
                .with_token(referrer)
                .with_help("composite tokens can only be referenced as the whole value"));
            }
            out.push_str(&css_value(&value));
            last = whole.end();
        }
        out.push_str(&text[last..]);
        Ok(TokenValue::String(out))
    }

    fn lookup(&self, reference: &str, owner: usize) -> Result<usize, TokenError> {
        let reference = reference.trim();
        if let Some(&target) = self.index.get(reference) {
            return Ok(target);
        }
        let referrer = self.entries[owner].0.clone();
        let reason = if self.groups.contains(reference) {
            "is a group, not a token"
        } else {
            "does not exist"
        };
        Err(
            err_msg!(Reference, "'{}' references '{}', which {}", referrer, reference, reason)
                .with_token(referrer),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(path: &str, value: TokenValue) -> (TokenPath, SourceToken) {
        (
            TokenPath::parse_dotted(path),
            SourceToken {
                value,
                resolved: TokenValue::Null,
                type_name: "sizing".to_string(),
                description: None,
            },
        )
    }

    #[test]
    fn whole_and_embedded_references_resolve() {
        let mut entries = vec![
            entry("base.unit", json!(8)),
            entry("base.double", json!("{base.unit}")),
            entry("base.expr", json!("{base.double}px * 2")),
        ];
        resolve_all(&mut entries).unwrap();
        assert_eq!(entries[1].1.resolved, json!(8));
        assert_eq!(entries[2].1.resolved, json!("8px * 2"));
        assert_eq!(entries[2].1.value, json!("{base.double}px * 2"));
    }

    #[test]
    fn cycles_are_reported() {
        let mut entries = vec![entry("a", json!("{b}")), entry("b", json!("{a}"))];
        let err = resolve_all(&mut entries).unwrap_err();
        assert!(err.message().contains("circular reference"), "{}", err.message());
        assert!(err.message().contains("a -> b -> a"), "{}", err.message());
    }

    #[test]
    fn group_references_are_rejected() {
        let mut entries = vec![entry("base.spacing.1", json!("4px")), entry("x", json!("{base.spacing}"))];
        let err = resolve_all(&mut entries).unwrap_err();
        assert!(err.message().contains("is a group"));
        assert_eq!(err.token().map(|t| t.to_string()), Some("x".to_string()));
    }
}
