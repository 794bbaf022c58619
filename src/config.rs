//! # Build Configuration
//!
//! `BuildConfig` is read from `.json` or `.yaml`/`.yml`. Every key is
//! optional; omitted keys take the defaults below.
//!
//! ```yaml
//! source: [tokens]
//! buildPath: build
//! arithmetic: evaluate      # or calc
//! baseFontSize: 16
//! files:
//!   - { destination: utilities.css, format: css/utilities }
//! ```
//!
//! Relative `source` and `buildPath` entries are resolved against the
//! directory containing the configuration file.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::formats::FormatRegistry;
use crate::tokens::Accessor;
use crate::transforms::TransformRegistry;
use crate::{err_msg, TokenError};

/// Which arithmetic transform the pipeline registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArithmeticStrategy {
    /// Compute plain arithmetic at build time (`math/evaluate`).
    #[default]
    Evaluate,
    /// Leave arithmetic to the browser inside `calc()` (`math/calc`).
    Calc,
}

/// One artifact to write: a formatter and the file it renders into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileConfig {
    /// Path relative to `buildPath`.
    pub destination: String,
    pub format: String,
}

impl FileConfig {
    pub fn new(destination: &str, format: &str) -> Self {
        Self {
            destination: destination.to_string(),
            format: format.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Token files or directories, merged in order.
    pub source: Vec<PathBuf>,
    pub build_path: PathBuf,
    pub arithmetic: ArithmeticStrategy,
    pub base_font_size: f64,
    /// Explicit ordered transform list; `None` uses the built-in order.
    pub transforms: Option<Vec<String>>,
    pub type_root: String,
    pub file_header: bool,
    pub files: Vec<FileConfig>,
    pub accessors: Vec<Accessor>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            source: vec![PathBuf::from("tokens.json")],
            build_path: PathBuf::from("build"),
            arithmetic: ArithmeticStrategy::default(),
            base_font_size: 16.0,
            transforms: None,
            type_root: "DesignTokens".to_string(),
            file_header: true,
            files: vec![
                FileConfig::new("utilities.css", "css/utilities"),
                FileConfig::new("tokens.js", "javascript/styled-components"),
                FileConfig::new("tokens.d.ts", "typescript/nested-interface"),
            ],
            accessors: Accessor::defaults(),
        }
    }
}

impl BuildConfig {
    /// Reads a configuration file. The format follows the extension: YAML for
    /// `.yaml`/`.yml`, JSON otherwise.
    pub fn load(path: &Path) -> Result<Self, TokenError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            err_msg!(Io, "failed to read configuration '{}'", path.display()).with_cause(e)
        })?;
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == "yaml" || ext == "yml");
        let config = if is_yaml {
            Self::from_yaml(&content)
        } else {
            Self::from_json(&content)
        }
        .map_err(|e| err_msg!(Parse, "in '{}': {}", path.display(), e.message()).with_cause(e))?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(config.relative_to(base))
    }

    pub fn from_json(content: &str) -> Result<Self, TokenError> {
        serde_json::from_str(content)
            .map_err(|e| err_msg!(Parse, "invalid configuration: {}", e).with_cause(e))
    }

    pub fn from_yaml(content: &str) -> Result<Self, TokenError> {
        serde_yaml::from_str(content)
            .map_err(|e| err_msg!(Parse, "invalid configuration: {}", e).with_cause(e))
    }

    /// Resolves relative paths against `base`.
    pub fn relative_to(mut self, base: &Path) -> Self {
        let join = |p: &PathBuf| {
            if p.is_absolute() {
                p.clone()
            } else {
                base.join(p)
            }
        };
        self.source = self.source.iter().map(join).collect();
        self.build_path = join(&self.build_path);
        self
    }

    /// Checks the configuration against the registries it will run with.
    pub fn validate(
        &self,
        formats: &FormatRegistry,
        transforms: &TransformRegistry,
    ) -> Result<(), TokenError> {
        if !(self.base_font_size > 0.0 && self.base_font_size.is_finite()) {
            return Err(err_msg!(
                Config,
                "baseFontSize must be a positive number, got {}",
                self.base_font_size
            ));
        }

        let mut destinations = HashSet::new();
        for file in &self.files {
            if !formats.contains(&file.format) {
                return Err(err_msg!(
                    Config,
                    "unknown format '{}' for '{}'",
                    file.format,
                    file.destination
                )
                .with_help(format!("available formats: {}", formats.names().join(", "))));
            }
            if !destinations.insert(file.destination.as_str()) {
                return Err(err_msg!(
                    Config,
                    "destination '{}' is listed more than once",
                    file.destination
                ));
            }
        }

        if let Some(names) = &self.transforms {
            for name in names {
                if !transforms.contains(name) {
                    return Err(err_msg!(Config, "unknown transform '{}'", name).with_help(
                        format!("available transforms: {}", transforms.names().join(", ")),
                    ));
                }
            }
        }

        for accessor in &self.accessors {
            if accessor.name.trim().is_empty() {
                return Err(err_msg!(
                    Config,
                    "accessor rooted at '{}' has an empty name",
                    accessor.root
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_takes_defaults() {
        let config = BuildConfig::from_json("{}").unwrap();
        assert_eq!(config, BuildConfig::default());
        assert_eq!(config.files.len(), 3);
        assert_eq!(config.accessors.len(), 7);
    }

    #[test]
    fn yaml_keys_are_camel_case() {
        let config = BuildConfig::from_yaml(
            "buildPath: out\narithmetic: calc\nbaseFontSize: 10\nfileHeader: false\n",
        )
        .unwrap();
        assert_eq!(config.build_path, PathBuf::from("out"));
        assert_eq!(config.arithmetic, ArithmeticStrategy::Calc);
        assert_eq!(config.base_font_size, 10.0);
        assert!(!config.file_header);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = BuildConfig::from_json(r#"{"buildpath": "x"}"#).unwrap_err();
        assert_eq!(err.error_type(), crate::ErrorType::Parse);
    }

    #[test]
    fn relative_paths_follow_the_config_directory() {
        let config = BuildConfig::default().relative_to(Path::new("/work/design"));
        assert_eq!(config.source, vec![PathBuf::from("/work/design/tokens.json")]);
        assert_eq!(config.build_path, PathBuf::from("/work/design/build"));
    }
}
