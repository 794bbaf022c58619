//! Unified, `miette`-based diagnostics for the token compiler.
//!
//! Every failure produced by any stage of the build (loading, reference
//! resolution, transforms, formatters, configuration) is a [`TokenError`].
//! Construct errors with [`err_msg!`](crate::err_msg) for message-only errors
//! and [`err_ctx!`](crate::err_ctx) when an [`ErrorContext`] is already at hand;
//! attach source snippets, help text and token paths with the `with_*`
//! builders.
//!
//! A build either fully succeeds or fails with exactly one `TokenError`; there
//! are no warnings in this type. Non-fatal conditions are logged instead.

use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode};
use thiserror::Error;

use crate::tokens::TokenPath;

pub type SourceArc = Arc<NamedSource<String>>;

/// Byte range into a source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    fn len(&self) -> usize {
        if self.end > self.start {
            self.end - self.start
        } else {
            1
        }
    }
}

/// Type-safe error classification that corresponds to `TokenError` variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// Reading sources, configs or writing artifacts failed.
    Io,
    /// A source or config document is not well-formed JSON/YAML.
    Parse,
    /// A token node violates the leaf/group shape.
    Structure,
    /// A `{reference}` is unknown, points at a group, or is circular.
    Reference,
    /// A transform rejected a token value.
    Transform,
    /// A formatter failed to render.
    Format,
    /// A transform or formatter name was registered twice.
    Registration,
    /// The build configuration is invalid.
    Config,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Io => "Io",
            ErrorType::Parse => "Parse",
            ErrorType::Structure => "Structure",
            ErrorType::Reference => "Reference",
            ErrorType::Transform => "Transform",
            ErrorType::Format => "Format",
            ErrorType::Registration => "Registration",
            ErrorType::Config => "Config",
        }
    }
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Minimal, composable error context for diagnostics.
#[derive(Debug, Default)]
pub struct ErrorContext {
    /// The document the error points into (if any).
    pub source: Option<SourceArc>,
    /// The primary span inside `source` (if any).
    pub span: Option<Span>,
    /// An optional help message.
    pub help: Option<String>,
    /// The token the error is about (if any).
    pub token: Option<TokenPath>,
}

impl ErrorContext {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn for_token(token: TokenPath) -> Self {
        Self {
            token: Some(token),
            ..Self::default()
        }
    }
}

type Cause = Option<Box<dyn std::error::Error + Send + Sync + 'static>>;

/// Unified error type for every failure mode of a build.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("I/O error: {message}")]
    Io {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("Parse error: {message}")]
    Parse {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("Structure error: {message}")]
    Structure {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("Reference error: {message}")]
    Reference {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("Transform error: {message}")]
    Transform {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("Format error: {message}")]
    Format {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("Registration error: {message}")]
    Registration {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("Config error: {message}")]
    Config {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
}

impl TokenError {
    fn parts(&self) -> (&String, &ErrorContext) {
        match self {
            TokenError::Io { message, ctx, .. }
            | TokenError::Parse { message, ctx, .. }
            | TokenError::Structure { message, ctx, .. }
            | TokenError::Reference { message, ctx, .. }
            | TokenError::Transform { message, ctx, .. }
            | TokenError::Format { message, ctx, .. }
            | TokenError::Registration { message, ctx, .. }
            | TokenError::Config { message, ctx, .. } => (message, ctx),
        }
    }

    fn parts_mut(&mut self) -> (&mut ErrorContext, &mut Cause) {
        match self {
            TokenError::Io { ctx, source, .. }
            | TokenError::Parse { ctx, source, .. }
            | TokenError::Structure { ctx, source, .. }
            | TokenError::Reference { ctx, source, .. }
            | TokenError::Transform { ctx, source, .. }
            | TokenError::Format { ctx, source, .. }
            | TokenError::Registration { ctx, source, .. }
            | TokenError::Config { ctx, source, .. } => (ctx, source),
        }
    }

    pub fn error_type(&self) -> ErrorType {
        match self {
            TokenError::Io { .. } => ErrorType::Io,
            TokenError::Parse { .. } => ErrorType::Parse,
            TokenError::Structure { .. } => ErrorType::Structure,
            TokenError::Reference { .. } => ErrorType::Reference,
            TokenError::Transform { .. } => ErrorType::Transform,
            TokenError::Format { .. } => ErrorType::Format,
            TokenError::Registration { .. } => ErrorType::Registration,
            TokenError::Config { .. } => ErrorType::Config,
        }
    }

    pub fn message(&self) -> &str {
        self.parts().0
    }

    pub fn context(&self) -> &ErrorContext {
        self.parts().1
    }

    /// The token path this error is about, if it concerns a single token.
    pub fn token(&self) -> Option<&TokenPath> {
        self.context().token.as_ref()
    }

    pub fn with_token(mut self, token: TokenPath) -> Self {
        self.parts_mut().0.token = Some(token);
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.parts_mut().0.help = Some(help.into());
        self
    }

    pub fn with_source_span(mut self, source: SourceArc, span: Span) -> Self {
        let ctx = self.parts_mut().0;
        ctx.source = Some(source);
        ctx.span = Some(span);
        self
    }

    pub fn with_cause<E>(mut self, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        *self.parts_mut().1 = Some(Box::new(cause));
        self
    }

    fn code_suffix(&self) -> &'static str {
        match self {
            TokenError::Io { .. } => "io",
            TokenError::Parse { .. } => "parse",
            TokenError::Structure { .. } => "structure",
            TokenError::Reference { .. } => "reference",
            TokenError::Transform { .. } => "transform",
            TokenError::Format { .. } => "format",
            TokenError::Registration { .. } => "registration",
            TokenError::Config { .. } => "config",
        }
    }
}

impl Diagnostic for TokenError {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        Some(Box::new(format!("tokenforge::{}", self.code_suffix())))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        self.context()
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn std::fmt::Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.context()
            .source
            .as_ref()
            .map(|s| s.as_ref() as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let ctx = self.context();
        // A span without a source would point into nothing.
        ctx.source.as_ref()?;
        let span = ctx.span?;
        let label = match &ctx.token {
            Some(token) => format!("token '{token}'"),
            None => self.message().to_string(),
        };
        let labels = vec![LabeledSpan::new(Some(label), span.start, span.len())];
        Some(Box::new(labels.into_iter()))
    }
}

/// Wraps document text into a shareable named source for error reporting.
pub fn to_error_source(name: impl AsRef<str>, content: impl AsRef<str>) -> SourceArc {
    Arc::new(NamedSource::new(
        name.as_ref().to_string(),
        content.as_ref().to_string(),
    ))
}

/// Converts a 1-based line/column position (as reported by serde_json) into a
/// byte offset in `content`.
pub fn offset_of(content: &str, line: usize, column: usize) -> usize {
    let mut offset = 0;
    for (index, text) in content.split_inclusive('\n').enumerate() {
        if index + 1 == line {
            let column = column.saturating_sub(1).min(text.len());
            return offset + column;
        }
        offset += text.len();
    }
    content.len()
}

/// Finds the span of the key that introduces `path` inside a JSON document by
/// locating each quoted segment after the previous one.
///
/// This is a textual search, so it can land on an earlier sibling with the
/// same key name in unusual documents; it is only used to decorate errors.
pub fn locate_path(content: &str, path: &TokenPath) -> Option<Span> {
    let mut cursor = 0;
    let mut found = None;
    for segment in path.segments() {
        let needle = format!("\"{segment}\"");
        let at = content[cursor..].find(&needle)? + cursor;
        found = Some(Span::new(at, at + needle.len()));
        cursor = at + needle.len();
    }
    found
}

/// Constructs a `TokenError` variant with a formatted message and no context.
///
/// ```
/// use tokenforge::{err_msg, ErrorType};
/// let err = err_msg!(Config, "unknown format '{}'", "css/nope");
/// assert_eq!(err.error_type(), ErrorType::Config);
/// assert_eq!(err.message(), "unknown format 'css/nope'");
/// ```
#[macro_export]
macro_rules! err_msg {
    ($variant:ident, $($arg:tt)+) => {
        $crate::TokenError::$variant {
            message: format!($($arg)+),
            ctx: $crate::ErrorContext::none(),
            source: None,
        }
    };
}

/// Constructs a `TokenError` variant with a message and a pre-built `ErrorContext`.
#[macro_export]
macro_rules! err_ctx {
    ($variant:ident, $msg:expr, $ctx:expr) => {
        $crate::TokenError::$variant {
            message: $msg.to_string(),
            ctx: $ctx,
            source: None,
        }
    };
}

/// Prints a `TokenError` with full miette diagnostics.
pub fn print_error(error: TokenError) {
    let report = miette::Report::new(error);
    eprintln!("{report:?}");
}
