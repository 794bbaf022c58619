//! # Token Source Loader
//!
//! Parses token documents into a [`SourceTree`].
//!
//! - Several documents are deep-merged in order. Groups merge key by key; a
//!   token defined twice is replaced by the later definition (logged).
//! - A leaf is an object carrying both `value` and a string `type`. An object
//!   carrying only one of them is a structural error; the build fails closed.
//! - Group keys starting with `$` are metadata and are skipped.
//! - `{references}` are substituted once the whole tree is known.

use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde_json::Map;
use walkdir::WalkDir;

use super::{references, SourceToken, SourceTree, TokenNode, TokenPath, TokenTree, TokenValue};
use crate::diagnostics::{locate_path, offset_of, to_error_source, SourceArc, Span};
use crate::{err_ctx, err_msg, ErrorContext, TokenError};

/// One parsed source file, kept for error reporting.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub name: String,
    pub source: SourceArc,
    content: String,
    pub value: TokenValue,
}

impl SourceDocument {
    /// Parses `content` as JSON. Syntax errors point at the offending line.
    pub fn parse(name: impl Into<String>, content: impl Into<String>) -> Result<Self, TokenError> {
        let name = name.into();
        let content = content.into();
        let source = to_error_source(&name, &content);
        let value: TokenValue = serde_json::from_str(&content).map_err(|e| {
            let at = offset_of(&content, e.line(), e.column());
            err_msg!(Parse, "'{}' is not valid JSON: {}", name, e)
                .with_source_span(source.clone(), Span::new(at, at + 1))
        })?;
        Ok(Self {
            name,
            source,
            content,
            value,
        })
    }

    pub fn read(path: &Path) -> Result<Self, TokenError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            err_msg!(Io, "failed to read token source '{}'", path.display()).with_cause(e)
        })?;
        Self::parse(path.display().to_string(), content)
    }

    fn locate(&self, path: &TokenPath) -> Option<Span> {
        locate_path(&self.content, path)
    }
}

/// Expands directories into the `*.json` files below them, sorted by path.
/// Plain file entries are kept as given. Symlinks are followed; a broken link
/// or an unreadable entry fails the load.
pub fn collect_source_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>, TokenError> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut found = Vec::new();
            for entry in WalkDir::new(path).follow_links(true) {
                let entry = entry.map_err(|e| {
                    err_msg!(Io, "failed to scan token directory '{}'", path.display())
                        .with_cause(e)
                })?;
                let is_json = entry.path().extension().is_some_and(|ext| ext == "json");
                if entry.file_type().is_file() && is_json {
                    found.push(entry.into_path());
                }
            }
            found.sort();
            files.extend(found);
        } else if path.is_file() {
            files.push(path.clone());
        } else {
            return Err(err_msg!(Io, "token source '{}' does not exist", path.display())
                .with_help("check the `source` entries of the build configuration"));
        }
    }
    Ok(files)
}

/// Reads every source file and loads the merged tree.
pub fn load_files(paths: &[PathBuf]) -> Result<(SourceTree, Vec<SourceDocument>), TokenError> {
    let files = collect_source_files(paths)?;
    if files.is_empty() {
        return Err(err_msg!(Io, "no token source files found"));
    }
    let documents = files
        .iter()
        .map(|path| SourceDocument::read(path))
        .collect::<Result<Vec<_>, _>>()?;
    let tree = load_documents(&documents)?;
    Ok((tree, documents))
}

/// Loads a single in-memory JSON document.
pub fn load_str(name: &str, content: &str) -> Result<SourceTree, TokenError> {
    let document = SourceDocument::parse(name, content)?;
    load_documents(std::slice::from_ref(&document))
}

/// Merges `documents` in order and builds the token tree.
pub fn load_documents(documents: &[SourceDocument]) -> Result<SourceTree, TokenError> {
    let mut merged = Map::new();
    for document in documents {
        let TokenValue::Object(map) = &document.value else {
            return Err(err_msg!(
                Structure,
                "'{}' must contain a JSON object at the top level",
                document.name
            ));
        };
        merge_group(&mut merged, map, &TokenPath::root(), &document.name);
    }

    let mut entries = Vec::new();
    let root = build_group(&merged, &TokenPath::root(), &mut entries)
        .map_err(|e| decorate(e, documents))?;
    references::resolve_all(&mut entries).map_err(|e| decorate(e, documents))?;

    let tokens: Vec<TokenNode> = entries
        .into_iter()
        .map(|(path, original)| TokenNode::new(path, original))
        .collect();
    debug!("loaded {} token(s) from {} document(s)", tokens.len(), documents.len());
    Ok(SourceTree { root, tokens })
}

/// Attaches a source snippet to an error that names a token, when the token
/// can be found in one of the documents.
pub fn decorate(error: TokenError, documents: &[SourceDocument]) -> TokenError {
    if error.context().source.is_some() {
        return error;
    }
    let Some(token) = error.token().cloned() else {
        return error;
    };
    // Later documents override earlier ones, so search them first.
    match documents
        .iter()
        .rev()
        .find_map(|doc| doc.locate(&token).map(|span| (doc.source.clone(), span)))
    {
        Some((source, span)) => error.with_source_span(source, span),
        None => error,
    }
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

enum Shape<'a> {
    Leaf(&'a Map<String, TokenValue>),
    Group(&'a Map<String, TokenValue>),
    Invalid(String),
}

fn classify(value: &TokenValue) -> Shape<'_> {
    let TokenValue::Object(map) = value else {
        return Shape::Invalid(format!(
            "expected a token or a group, found {}",
            describe(value)
        ));
    };
    let has_value = map.contains_key("value");
    match (has_value, map.get("type")) {
        (true, Some(TokenValue::String(_))) => Shape::Leaf(map),
        (true, Some(other)) => Shape::Invalid(format!(
            "token type must be a string, found {}",
            describe(other)
        )),
        (true, None) => Shape::Invalid("token has a value but no type".to_string()),
        (false, Some(TokenValue::String(_))) => {
            Shape::Invalid("token has a type but no value".to_string())
        }
        (false, _) => Shape::Group(map),
    }
}

fn describe(value: &TokenValue) -> &'static str {
    match value {
        TokenValue::Null => "null",
        TokenValue::Bool(_) => "a boolean",
        TokenValue::Number(_) => "a number",
        TokenValue::String(_) => "a string",
        TokenValue::Array(_) => "an array",
        TokenValue::Object(_) => "an object",
    }
}

fn merge_group(
    target: &mut Map<String, TokenValue>,
    incoming: &Map<String, TokenValue>,
    path: &TokenPath,
    document: &str,
) {
    for (key, value) in incoming {
        let child_path = path.child(key);
        match target.get_mut(key) {
            Some(current) if is_group(&*current) && is_group(value) => {
                if let (TokenValue::Object(current), TokenValue::Object(group)) = (current, value) {
                    merge_group(current, group, &child_path, document);
                }
            }
            Some(slot) => {
                warn!("token collision at '{child_path}': definition from '{document}' wins");
                *slot = value.clone();
            }
            None => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

fn is_group(value: &TokenValue) -> bool {
    matches!(classify(value), Shape::Group(_))
}

fn build_group(
    map: &Map<String, TokenValue>,
    path: &TokenPath,
    entries: &mut Vec<(TokenPath, SourceToken)>,
) -> Result<TokenTree, TokenError> {
    let mut children = Vec::with_capacity(map.len());
    for (key, value) in map {
        if key.starts_with('$') {
            continue;
        }
        let child_path = path.child(key);
        let child = match classify(value) {
            Shape::Leaf(leaf) => {
                let original = SourceToken {
                    value: leaf.get("value").cloned().unwrap_or(TokenValue::Null),
                    resolved: TokenValue::Null,
                    type_name: leaf
                        .get("type")
                        .and_then(TokenValue::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    description: leaf
                        .get("description")
                        .and_then(TokenValue::as_str)
                        .map(str::to_string),
                };
                entries.push((child_path, original));
                TokenTree::Token(entries.len() - 1)
            }
            Shape::Group(group) => build_group(group, &child_path, entries)?,
            Shape::Invalid(reason) => {
                let message = format!("malformed token '{child_path}': {reason}");
                return Err(err_ctx!(Structure, message, ErrorContext::for_token(child_path))
                    .with_help("a token needs both `value` and `type`; a group needs neither"));
            }
        };
        children.push((key.clone(), child));
    }
    Ok(TokenTree::Group(children))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merge_keeps_sibling_groups_and_overrides_tokens() {
        let first = SourceDocument::parse(
            "a.json",
            r#"{"base": {"spacing": {"1": {"value": "4px", "type": "sizing"}}}}"#,
        )
        .unwrap();
        let second = SourceDocument::parse(
            "b.json",
            r#"{"base": {"spacing": {"1": {"value": "5px", "type": "sizing"}, "2": {"value": "8px", "type": "sizing"}}}}"#,
        )
        .unwrap();
        let tree = load_documents(&[first, second]).unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.tokens[0].value, json!("5px"));
        assert_eq!(tree.tokens[1].path.to_string(), "base.spacing.2");
    }

    #[test]
    fn decorate_points_at_the_token_key() {
        let doc = SourceDocument::parse("t.json", r#"{"a": {"b": {"type": "color"}}}"#).unwrap();
        let err = load_documents(std::slice::from_ref(&doc)).unwrap_err();
        let span = err.context().span.unwrap();
        assert_eq!(&r#"{"a": {"b": {"type": "color"}}}"#[span.start..span.end], "\"b\"");
    }
}
