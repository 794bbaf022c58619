//! # Canonical Registry Builder
//!
//! The single place the built-in transforms and formatters are registered.
//! Production code and tests build their registries here so every path runs
//! the same transforms in the same order.
//!
//! Registry invariant: a pipeline owns its registries. They are built once
//! from the configuration and passed by reference to the transform and
//! format phases; nothing registers into a shared global.

use std::collections::BTreeMap;

use crate::config::{ArithmeticStrategy, BuildConfig};
use crate::formats::{self, FormatOptions, FormatRegistry};
use crate::tokens::{Dictionary, SourceTree};
use crate::transforms::{self, TransformOptions, TransformRegistry};
use crate::TokenError;

/// Registers the built-in transforms in their canonical order. Exactly one of
/// `math/evaluate` and `math/calc` is registered, chosen by `arithmetic`.
pub fn build_default_transform_registry(
    arithmetic: ArithmeticStrategy,
) -> Result<TransformRegistry, TokenError> {
    let mut registry = TransformRegistry::new();
    registry.register(transforms::name::kebab())?;
    registry.register(transforms::name::typography())?;
    registry.register(transforms::color::normalize())?;
    registry.register(transforms::size::px_to_rem())?;
    registry.register(match arithmetic {
        ArithmeticStrategy::Evaluate => transforms::math::evaluate(),
        ArithmeticStrategy::Calc => transforms::math::calc(),
    })?;
    registry.register(transforms::shadow::compose())?;
    registry.register(transforms::typography::flatten())?;
    registry.register(transforms::responsive::media_queries())?;
    Ok(registry)
}

/// Every transform a configuration may name, regardless of strategy.
pub fn build_available_transform_registry() -> Result<TransformRegistry, TokenError> {
    let mut registry = build_default_transform_registry(ArithmeticStrategy::Evaluate)?;
    registry.register(transforms::math::calc())?;
    Ok(registry)
}

pub fn build_default_format_registry() -> Result<FormatRegistry, TokenError> {
    let mut registry = FormatRegistry::new();
    registry.register(formats::css::utilities())?;
    registry.register(formats::css::variables())?;
    registry.register(formats::javascript::styled_components())?;
    registry.register(formats::typescript::nested_interface())?;
    registry.register(formats::json::flat())?;
    Ok(registry)
}

/// Registries and options for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub transforms: TransformRegistry,
    pub formats: FormatRegistry,
    pub transform_options: TransformOptions,
    pub format_options: FormatOptions,
}

impl PipelineConfig {
    /// Built-in registries with default options.
    pub fn new() -> Result<Self, TokenError> {
        Ok(Self {
            transforms: build_default_transform_registry(ArithmeticStrategy::default())?,
            formats: build_default_format_registry()?,
            transform_options: TransformOptions::default(),
            format_options: FormatOptions::default(),
        })
    }

    /// Validates `config` and builds the pipeline it describes.
    pub fn from_build_config(config: &BuildConfig) -> Result<Self, TokenError> {
        let formats = build_default_format_registry()?;
        let available = build_available_transform_registry()?;
        config.validate(&formats, &available)?;

        let transforms = match &config.transforms {
            Some(names) => available.select(names)?,
            None => build_default_transform_registry(config.arithmetic)?,
        };
        Ok(Self {
            transforms,
            formats,
            transform_options: TransformOptions {
                base_font_size: config.base_font_size,
            },
            format_options: FormatOptions {
                file_header: config.file_header,
                accessors: config.accessors.clone(),
                type_root: config.type_root.clone(),
            },
        })
    }

    /// Transform phase.
    pub fn run(&self, source: SourceTree) -> Result<Dictionary, TokenError> {
        self.transforms.run(source, &self.transform_options)
    }

    /// Format phase: every registered formatter, keyed by name.
    pub fn run_all(&self, dictionary: &Dictionary) -> Result<BTreeMap<String, String>, TokenError> {
        self.formats.run_all(dictionary, &self.format_options)
    }

    pub fn render(&self, format: &str, dictionary: &Dictionary) -> Result<String, TokenError> {
        self.formats.render(format, dictionary, &self.format_options)
    }
}
