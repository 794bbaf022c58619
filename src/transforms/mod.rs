//! # Transforms
//!
//! A transform is a named rule with a *matcher* (which tokens it applies to)
//! and a *transformer* that computes either a token's emitted name or its
//! value. The [`TransformRegistry`] keeps name and value transforms in
//! registration order and applies them to every token:
//!
//! 1. all matching name transforms, in order;
//! 2. all matching value transforms, in order.
//!
//! Transforms are transitive: each sees the name/value produced by the ones
//! before it, and can still read `original` for the authored token. Nodes are
//! never mutated; every step produces a new node.
//!
//! ## Transforms Provided
//!
//! | Name                 | Kind  | Applies to                      |
//! |----------------------|-------|---------------------------------|
//! | `name/kebab`         | name  | every token                     |
//! | `name/typography`    | name  | typography with object values   |
//! | `color/normalize`    | value | color                           |
//! | `size/px-to-rem`     | value | sizing                          |
//! | `math/evaluate`      | value | dimension kinds                 |
//! | `math/calc`          | value | dimension kinds, boxShadow      |
//! | `shadow/css`         | value | boxShadow                       |
//! | `typography/css`     | value | typography                      |
//! | `responsive/css`     | value | responsive                      |

use log::debug;
use thiserror::Error;

use crate::tokens::{Dictionary, SourceTree, TokenNode, TokenValue};
use crate::{err_ctx, err_msg, ErrorContext, TokenError};

pub mod color;
pub mod math;
pub mod name;
pub mod responsive;
pub mod shadow;
pub mod size;
pub mod typography;

// ============================================================================
// TYPES
// ============================================================================

/// Failure reported by a single transformer. The registry wraps it into a
/// [`TokenError::Transform`] naming the token and the transform.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    #[error("operand '{segment}' in expression '{expression}' is not a number")]
    NonNumericOperand { expression: String, segment: String },
    #[error("expression '{0}' ends with an operator")]
    DanglingOperator(String),
    #[error("division by zero in expression '{0}'")]
    DivisionByZero(String),
    #[error("'{0}' is not a valid hex color")]
    InvalidHexColor(String),
    #[error("expected {expected}, found {found}")]
    UnexpectedValue { expected: &'static str, found: String },
}

/// Settings shared by all transformers of one pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformOptions {
    /// Pixel size of `1rem`.
    pub base_font_size: f64,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            base_font_size: 16.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformKind {
    Name,
    Value,
}

impl TransformKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransformKind::Name => "name",
            TransformKind::Value => "value",
        }
    }
}

pub type Matcher = fn(&TokenNode) -> bool;
pub type NameTransformFn = fn(&TokenNode, &TransformOptions) -> Result<String, TransformError>;
pub type ValueTransformFn = fn(&TokenNode, &TransformOptions) -> Result<TokenValue, TransformError>;

#[derive(Clone, Copy)]
pub enum Transformer {
    Name(NameTransformFn),
    Value(ValueTransformFn),
}

/// A registered transform.
#[derive(Clone)]
pub struct Transform {
    pub name: String,
    /// When false, the transformer sees the node as loaded instead of the
    /// output of earlier transforms.
    pub transitive: bool,
    pub matcher: Matcher,
    pub transformer: Transformer,
}

impl Transform {
    pub fn name(name: &str, matcher: Matcher, f: NameTransformFn) -> Self {
        Self {
            name: name.to_string(),
            transitive: true,
            matcher,
            transformer: Transformer::Name(f),
        }
    }

    pub fn value(name: &str, matcher: Matcher, f: ValueTransformFn) -> Self {
        Self {
            name: name.to_string(),
            transitive: true,
            matcher,
            transformer: Transformer::Value(f),
        }
    }

    pub fn non_transitive(mut self) -> Self {
        self.transitive = false;
        self
    }

    pub fn kind(&self) -> TransformKind {
        match self.transformer {
            Transformer::Name(_) => TransformKind::Name,
            Transformer::Value(_) => TransformKind::Value,
        }
    }

    pub fn matches(&self, node: &TokenNode) -> bool {
        (self.matcher)(node)
    }

    /// Applies this transform to `node`, returning the replacement node.
    pub fn apply(&self, node: &TokenNode, options: &TransformOptions) -> Result<TokenNode, TokenError> {
        let initial;
        let input = if self.transitive {
            node
        } else {
            initial = node.initial();
            &initial
        };
        let outcome = match self.transformer {
            Transformer::Name(f) => f(input, options).map(|name| node.with_name(name)),
            Transformer::Value(f) => f(input, options).map(|value| node.with_value(value)),
        };
        outcome.map_err(|cause| {
            err_ctx!(
                Transform,
                format!("transform '{}' failed on token '{}': {}", self.name, node.path, cause),
                ErrorContext::for_token(node.path.clone())
            )
            .with_cause(cause)
        })
    }
}

impl std::fmt::Debug for Transform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transform")
            .field("name", &self.name)
            .field("kind", &self.kind())
            .field("transitive", &self.transitive)
            .finish()
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Ordered name and value transforms. Names are unique across both kinds.
#[derive(Debug, Clone, Default)]
pub struct TransformRegistry {
    name_transforms: Vec<Transform>,
    value_transforms: Vec<Transform>,
}

impl TransformRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `transform` to the list for its kind.
    ///
    /// # Errors
    /// `Registration` if a transform with the same name is already present.
    pub fn register(&mut self, transform: Transform) -> Result<(), TokenError> {
        if self.contains(&transform.name) {
            return Err(err_msg!(
                Registration,
                "transform '{}' is already registered",
                transform.name
            ));
        }
        match transform.kind() {
            TransformKind::Name => self.name_transforms.push(transform),
            TransformKind::Value => self.value_transforms.push(transform),
        }
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&Transform> {
        self.iter().find(|t| t.name == name)
    }

    /// Name transforms first, then value transforms, each in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Transform> {
        self.name_transforms.iter().chain(self.value_transforms.iter())
    }

    pub fn names(&self) -> Vec<String> {
        self.iter().map(|t| t.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.name_transforms.len() + self.value_transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Builds a registry holding only `names`, in the given order.
    ///
    /// # Errors
    /// `Config` for an unknown name, `Registration` for a repeated one.
    pub fn select(&self, names: &[String]) -> Result<Self, TokenError> {
        let mut selected = Self::new();
        for name in names {
            let transform = self
                .get(name)
                .ok_or_else(|| err_msg!(Config, "unknown transform '{}'", name))?;
            selected.register(transform.clone())?;
        }
        Ok(selected)
    }

    /// Transforms a single node through both phases.
    pub fn transform_node(&self, node: TokenNode, options: &TransformOptions) -> Result<TokenNode, TokenError> {
        let mut node = node;
        let mut applied = 0usize;
        for transform in self.name_transforms.iter().chain(self.value_transforms.iter()) {
            if transform.matches(&node) {
                node = transform.apply(&node, options)?;
                applied += 1;
            }
        }
        debug!("'{}': {} transform(s) applied", node.path, applied);
        Ok(node)
    }

    /// Runs every transform over every token, in traversal order, and freezes
    /// the result. The first failure aborts the run.
    pub fn run(&self, source: SourceTree, options: &TransformOptions) -> Result<Dictionary, TokenError> {
        let SourceTree { root, tokens } = source;
        let resolved = tokens
            .into_iter()
            .map(|node| self.transform_node(node, options).map(TokenNode::resolve))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Dictionary::new(root, resolved))
    }
}

// ============================================================================
// SHARED MATCHERS
// ============================================================================

pub fn any_token(_: &TokenNode) -> bool {
    true
}

pub fn is_dimension(node: &TokenNode) -> bool {
    node.kind.is_dimension()
}

/// Short human description of a value for error messages.
pub(crate) fn describe(value: &TokenValue) -> String {
    match value {
        TokenValue::String(s) => format!("string '{s}'"),
        TokenValue::Number(n) => format!("number {n}"),
        TokenValue::Bool(b) => format!("boolean {b}"),
        TokenValue::Null => "null".to_string(),
        TokenValue::Array(_) => "an array".to_string(),
        TokenValue::Object(_) => "an object".to_string(),
    }
}
