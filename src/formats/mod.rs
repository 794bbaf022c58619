//! # Formatters
//!
//! A formatter renders the resolved [`Dictionary`] into the full text of one
//! artifact. Formatters only read the dictionary, so [`FormatRegistry::run_all`]
//! renders them concurrently; results are keyed by formatter name and do not
//! depend on scheduling.
//!
//! | Name                           | Output                                   |
//! |--------------------------------|------------------------------------------|
//! | `css/utilities`                | margin/padding/colour utility classes    |
//! | `css/variables`                | `:root` custom properties                |
//! | `javascript/styled-components` | token object plus accessor functions     |
//! | `typescript/nested-interface`  | one interface per nested shape           |
//! | `json/flat`                    | name → value map                         |

use std::collections::BTreeMap;

use thiserror::Error;

use crate::tokens::{Accessor, Dictionary};
use crate::{err_msg, TokenError};

pub mod css;
pub mod javascript;
pub mod json;
pub mod typescript;

/// Failure reported by a single formatter.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Settings shared by all formatters of one pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatOptions {
    /// Prepend the "do not edit" banner.
    pub file_header: bool,
    /// Functions exported by the JavaScript module.
    pub accessors: Vec<Accessor>,
    /// Name of the top-level type declaration.
    pub type_root: String,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            file_header: true,
            accessors: Accessor::defaults(),
            type_root: "DesignTokens".to_string(),
        }
    }
}

pub type FormatFn = fn(&Dictionary, &FormatOptions) -> Result<String, FormatError>;

/// A registered formatter.
#[derive(Clone)]
pub struct Format {
    pub name: String,
    pub description: String,
    pub formatter: FormatFn,
}

impl Format {
    pub fn new(name: &str, description: &str, formatter: FormatFn) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            formatter,
        }
    }

    pub fn render(&self, dictionary: &Dictionary, options: &FormatOptions) -> Result<String, TokenError> {
        (self.formatter)(dictionary, options).map_err(|cause| {
            err_msg!(Format, "formatter '{}' failed: {}", self.name, cause).with_cause(cause)
        })
    }
}

impl std::fmt::Debug for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Format").field("name", &self.name).finish()
    }
}

/// Formatters in registration order, unique by name.
#[derive(Debug, Clone, Default)]
pub struct FormatRegistry {
    formats: Vec<Format>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    /// `Registration` if a formatter with the same name is already present.
    pub fn register(&mut self, format: Format) -> Result<(), TokenError> {
        if self.contains(&format.name) {
            return Err(err_msg!(
                Registration,
                "formatter '{}' is already registered",
                format.name
            ));
        }
        self.formats.push(format);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Format> {
        self.formats.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Format> {
        self.formats.iter()
    }

    pub fn names(&self) -> Vec<String> {
        self.formats.iter().map(|f| f.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }

    /// Renders one formatter by name.
    pub fn render(&self, name: &str, dictionary: &Dictionary, options: &FormatOptions) -> Result<String, TokenError> {
        self.get(name)
            .ok_or_else(|| err_msg!(Config, "unknown format '{}'", name))?
            .render(dictionary, options)
    }

    /// Renders every registered formatter against the same dictionary.
    pub fn run_all(
        &self,
        dictionary: &Dictionary,
        options: &FormatOptions,
    ) -> Result<BTreeMap<String, String>, TokenError> {
        let rendered: Vec<(String, Result<String, TokenError>)> = std::thread::scope(|scope| {
            let handles: Vec<_> = self
                .formats
                .iter()
                .map(|format| {
                    let handle = scope.spawn(move || format.render(dictionary, options));
                    (format.name.clone(), handle)
                })
                .collect();
            handles
                .into_iter()
                .map(|(name, handle)| {
                    let result = handle.join().unwrap_or_else(|_| {
                        Err(err_msg!(Format, "formatter '{}' panicked", name))
                    });
                    (name, result)
                })
                .collect()
        });

        let mut outputs = BTreeMap::new();
        // Report the first failure in registration order.
        for (name, result) in rendered {
            outputs.insert(name, result?);
        }
        Ok(outputs)
    }
}

/// The banner placed at the top of generated source files.
pub(crate) fn banner(options: &FormatOptions) -> String {
    if options.file_header {
        "/**\n * Do not edit directly, this file was generated from design tokens.\n */\n\n".to_string()
    } else {
        String::new()
    }
}
