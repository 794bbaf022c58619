//! The fully transformed, immutable token dictionary handed to formatters.

use serde::{Deserialize, Serialize};
use serde_json::Map;

use super::{ResolvedToken, TokenPath, TokenTree, TokenValue};

/// Resolved tokens in two views: the nested group tree and the flat,
/// traversal-ordered list. Built once per pipeline run; never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Dictionary {
    root: TokenTree,
    all_tokens: Vec<ResolvedToken>,
    values: TokenValue,
}

impl Dictionary {
    pub fn new(root: TokenTree, all_tokens: Vec<ResolvedToken>) -> Self {
        let values = clean(&root, &all_tokens);
        Self {
            root,
            all_tokens,
            values,
        }
    }

    /// Nested view. Leaves index into [`all_tokens`](Self::all_tokens).
    pub fn tokens(&self) -> &TokenTree {
        &self.root
    }

    /// Every leaf in depth-first, authored order.
    pub fn all_tokens(&self) -> &[ResolvedToken] {
        &self.all_tokens
    }

    pub fn len(&self) -> usize {
        self.all_tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all_tokens.is_empty()
    }

    pub fn token(&self, index: usize) -> Option<&ResolvedToken> {
        self.all_tokens.get(index)
    }

    /// Looks up a token by its exact path.
    pub fn get(&self, path: &TokenPath) -> Option<&ResolvedToken> {
        match self.root.descend(path.segments())? {
            TokenTree::Token(index) => self.all_tokens.get(*index),
            TokenTree::Group(_) => None,
        }
    }

    /// The tree with all metadata stripped: groups become objects and every
    /// token becomes its resolved value.
    pub fn values(&self) -> &TokenValue {
        &self.values
    }

    /// Lenient lookup used by the generated accessor functions: walks
    /// `accessor.root` and then `key` (split on `.` for dotted accessors)
    /// through [`values`](Self::values). A miss, or a `null` hit, yields the
    /// key itself as a string.
    pub fn access(&self, accessor: &Accessor, key: &str) -> TokenValue {
        let mut node = &self.values;
        for segment in accessor.lookup_path(key) {
            match node {
                TokenValue::Object(map) => match map.get(segment.as_str()) {
                    Some(next) => node = next,
                    None => return TokenValue::String(key.to_string()),
                },
                _ => return TokenValue::String(key.to_string()),
            }
        }
        if node.is_null() {
            TokenValue::String(key.to_string())
        } else {
            node.clone()
        }
    }
}

fn clean(node: &TokenTree, tokens: &[ResolvedToken]) -> TokenValue {
    match node {
        TokenTree::Token(index) => tokens
            .get(*index)
            .map(|t| t.value.clone())
            .unwrap_or(TokenValue::Null),
        TokenTree::Group(entries) => {
            let mut map = Map::with_capacity(entries.len());
            for (key, child) in entries {
                map.insert(key.clone(), clean(child, tokens));
            }
            TokenValue::Object(map)
        }
    }
}

/// A named lookup helper exported by the JavaScript token module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accessor {
    /// Function name, e.g. `spacing`.
    pub name: String,
    /// Dotted path of the subtree the accessor reads from.
    pub root: String,
    /// Whether the key itself is a dotted path (`color('red.500')`).
    #[serde(default)]
    pub dotted: bool,
}

impl Accessor {
    pub fn new(name: &str, root: &str, dotted: bool) -> Self {
        Self {
            name: name.to_string(),
            root: root.to_string(),
            dotted,
        }
    }

    pub fn root_segments(&self) -> Vec<String> {
        self.root
            .split('.')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Full path from the document root for `key`.
    pub fn lookup_path(&self, key: &str) -> Vec<String> {
        let mut path = self.root_segments();
        if self.dotted {
            path.extend(key.split('.').map(str::to_string));
        } else {
            path.push(key.to_string());
        }
        path
    }

    /// The accessors every token module exports unless configured otherwise.
    pub fn defaults() -> Vec<Accessor> {
        vec![
            Accessor::new("spacing", "base.spacing", false),
            Accessor::new("color", "base.color", true),
            Accessor::new("borderRadius", "base.borderRadius", false),
            Accessor::new("shadow", "base.boxShadow", false),
            Accessor::new("fontSize", "base.fontSizes", false),
            Accessor::new("fontWeight", "base.fontWeights", false),
            Accessor::new("typography", "typography", true),
        ]
    }
}
