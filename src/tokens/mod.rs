//! # Token Data Model
//!
//! The source tree is a nested document of groups terminating in leaf tokens
//! (`{ "value": ..., "type": ... }`). Loading produces a [`SourceTree`]: the
//! group structure as a [`TokenTree`] whose leaves index into a flat, ordered
//! list of [`TokenNode`]s. The transform phase replaces every node with a new
//! one (nodes are never mutated in place) and yields a
//! [`Dictionary`](dictionary::Dictionary) of [`ResolvedToken`]s sharing the
//! same tree.
//!
//! ## Invariants
//!
//! - `path` is assigned once at load time and never changes.
//! - `original` is shared, immutable, and reflects the authored token.
//! - Leaf order in the flat list is depth-first, authored key order.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

pub mod case;
pub mod dictionary;
pub mod loader;
pub mod references;
pub mod value;

pub use case::{kebab_case, pascal_case};
pub use dictionary::{Accessor, Dictionary};
pub use value::{css_value, format_number};

/// A token value: string, number, or a composite object/array.
pub type TokenValue = serde_json::Value;

// ============================================================================
// TOKEN KIND - closed set of token categories
// ============================================================================

/// Category tag of a token. Matchers dispatch on this.
///
/// Unrecognised `type` strings are kept as [`TokenKind::Other`] so custom
/// token categories still load; no built-in transform matches them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Color,
    Sizing,
    Spacing,
    BorderRadius,
    BorderWidth,
    FontSizes,
    FontWeights,
    FontFamilies,
    LineHeights,
    LetterSpacing,
    Opacity,
    BoxShadow,
    Typography,
    Responsive,
    Other(String),
}

impl TokenKind {
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "color" => TokenKind::Color,
            "sizing" => TokenKind::Sizing,
            "spacing" => TokenKind::Spacing,
            "borderRadius" => TokenKind::BorderRadius,
            "borderWidth" => TokenKind::BorderWidth,
            "fontSizes" => TokenKind::FontSizes,
            "fontWeights" => TokenKind::FontWeights,
            "fontFamilies" => TokenKind::FontFamilies,
            "lineHeights" => TokenKind::LineHeights,
            "letterSpacing" => TokenKind::LetterSpacing,
            "opacity" => TokenKind::Opacity,
            "boxShadow" => TokenKind::BoxShadow,
            "typography" => TokenKind::Typography,
            "responsive" => TokenKind::Responsive,
            other => TokenKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TokenKind::Color => "color",
            TokenKind::Sizing => "sizing",
            TokenKind::Spacing => "spacing",
            TokenKind::BorderRadius => "borderRadius",
            TokenKind::BorderWidth => "borderWidth",
            TokenKind::FontSizes => "fontSizes",
            TokenKind::FontWeights => "fontWeights",
            TokenKind::FontFamilies => "fontFamilies",
            TokenKind::LineHeights => "lineHeights",
            TokenKind::LetterSpacing => "letterSpacing",
            TokenKind::Opacity => "opacity",
            TokenKind::BoxShadow => "boxShadow",
            TokenKind::Typography => "typography",
            TokenKind::Responsive => "responsive",
            TokenKind::Other(name) => name,
        }
    }

    /// Kinds whose values are lengths that may be written as arithmetic.
    pub fn is_dimension(&self) -> bool {
        matches!(
            self,
            TokenKind::FontSizes
                | TokenKind::BorderRadius
                | TokenKind::BorderWidth
                | TokenKind::Spacing
                | TokenKind::LineHeights
                | TokenKind::Sizing
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// TOKEN PATH
// ============================================================================

/// Ordered key segments locating a token in the tree. Cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenPath(Arc<[String]>);

impl TokenPath {
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// The empty path of the document root.
    pub fn root() -> Self {
        Self(Arc::from(Vec::<String>::new()))
    }

    /// Parses `a.b.c` into a path.
    pub fn parse_dotted(dotted: &str) -> Self {
        Self::from_segments(dotted.split('.').map(str::trim))
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn child(&self, segment: &str) -> Self {
        Self(self.0.iter().cloned().chain([segment.to_string()]).collect())
    }

    /// Default emitted identifier: every segment kebab-cased, joined by `-`.
    pub fn kebab(&self) -> String {
        self.0
            .iter()
            .map(|s| kebab_case(s))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }
}

impl fmt::Display for TokenPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

// ============================================================================
// NODES
// ============================================================================

/// Immutable snapshot of a token as it was authored.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceToken {
    /// The value exactly as written, references included.
    pub value: TokenValue,
    /// The value with every `{reference}` substituted.
    pub resolved: TokenValue,
    /// The authored `type` string.
    pub type_name: String,
    pub description: Option<String>,
}

/// A token during the transform phase.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenNode {
    pub path: TokenPath,
    pub kind: TokenKind,
    pub value: TokenValue,
    pub name: Option<String>,
    pub original: Arc<SourceToken>,
}

impl TokenNode {
    /// Builds a node as loaded: value is the reference-resolved authored value
    /// and no name has been computed yet.
    pub fn new(path: TokenPath, original: SourceToken) -> Self {
        Self {
            kind: TokenKind::from_type_name(&original.type_name),
            value: original.resolved.clone(),
            name: None,
            path,
            original: Arc::new(original),
        }
    }

    /// The name computed so far, or the default kebab join of the path.
    pub fn current_name(&self) -> Cow<'_, str> {
        match &self.name {
            Some(name) => Cow::Borrowed(name),
            None => Cow::Owned(self.path.kebab()),
        }
    }

    pub fn with_value(&self, value: TokenValue) -> Self {
        Self {
            value,
            ..self.clone()
        }
    }

    pub fn with_name(&self, name: String) -> Self {
        Self {
            name: Some(name),
            ..self.clone()
        }
    }

    /// Node state before any transform ran.
    pub fn initial(&self) -> Self {
        Self {
            value: self.original.resolved.clone(),
            name: None,
            ..self.clone()
        }
    }

    pub(crate) fn resolve(self) -> ResolvedToken {
        ResolvedToken {
            name: self.current_name().into_owned(),
            path: self.path,
            kind: self.kind,
            value: self.value,
            original: self.original,
        }
    }
}

/// A fully transformed token as seen by formatters.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedToken {
    pub path: TokenPath,
    pub kind: TokenKind,
    pub value: TokenValue,
    pub name: String,
    pub original: Arc<SourceToken>,
}

// ============================================================================
// TREE
// ============================================================================

/// Group structure of the source document. Leaves index into the flat token
/// list owned by [`SourceTree`] / [`Dictionary`].
#[derive(Debug, Clone, PartialEq)]
pub enum TokenTree {
    Group(Vec<(String, TokenTree)>),
    Token(usize),
}

impl TokenTree {
    pub fn child(&self, key: &str) -> Option<&TokenTree> {
        match self {
            TokenTree::Group(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, t)| t),
            TokenTree::Token(_) => None,
        }
    }

    /// Follows `segments` down from this node.
    pub fn descend<S: AsRef<str>>(&self, segments: &[S]) -> Option<&TokenTree> {
        segments
            .iter()
            .try_fold(self, |node, segment| node.child(segment.as_ref()))
    }
}

/// The loaded, not yet transformed token set.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceTree {
    pub root: TokenTree,
    pub tokens: Vec<TokenNode>,
}

impl SourceTree {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
