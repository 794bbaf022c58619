//! # tokenforge
//!
//! Compiles a tree of design tokens into platform artifacts.
//!
//! ```text
//! token JSON ─ load ─▶ SourceTree ─ transform ─▶ Dictionary ─ format ─▶ artifacts
//! ```
//!
//! - [`tokens::loader`] parses and merges the sources and resolves
//!   `{references}`.
//! - [`transforms`] computes each token's name and value.
//! - [`formats`] renders the immutable [`Dictionary`] into files.
//! - [`engine::BuildPipeline`] runs the stages for a [`config::BuildConfig`].

pub use crate::diagnostics::{ErrorContext, ErrorType, Span, TokenError};
pub use crate::engine::{Artifact, BuildPipeline, StaleArtifact};
pub use crate::registry::PipelineConfig;
pub use crate::tokens::{Dictionary, ResolvedToken, TokenKind, TokenNode, TokenPath, TokenValue};

pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod formats;
pub mod registry;
pub mod tokens;
pub mod transforms;
