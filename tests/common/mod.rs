//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::Path;

use tokenforge::config::BuildConfig;
use tokenforge::tokens::loader::load_str;
use tokenforge::{Dictionary, PipelineConfig, ResolvedToken, TokenError, TokenPath};

/// A small but representative token set.
pub const SAMPLE_TOKENS: &str = r##"{
  "base": {
    "$description": "core scale",
    "spacing": {
      "1": { "value": "4px", "type": "sizing" },
      "2": { "value": "8px", "type": "sizing" },
      "4": { "value": "16px", "type": "sizing" },
      "0.5": { "value": "2px", "type": "sizing" }
    },
    "color": {
      "red": {
        "500": { "value": "#EF4444", "type": "color" }
      },
      "overlay": { "value": { "hex": "#000000", "opacity": 0.5 }, "type": "color" },
      "primary": { "value": "{base.color.red.500}", "type": "color", "description": "brand colour" }
    },
    "borderRadius": {
      "md": { "value": "0.25 * 2", "type": "borderRadius" }
    },
    "boxShadow": {
      "card": {
        "value": { "x": 0, "y": 1, "blur": 2, "spread": 0, "color": "rgba(0,0,0,0.1)" },
        "type": "boxShadow"
      }
    },
    "fontSizes": {
      "lg": { "value": "1.125", "type": "fontSizes" }
    },
    "fontWeights": {
      "bold": { "value": "700", "type": "fontWeights" }
    }
  },
  "typography": {
    "heading": {
      "h1": {
        "value": {
          "fontWeight": 700,
          "fontSize": "2rem",
          "lineHeight": "2.5rem",
          "fontFamily": "'Inter', sans-serif"
        },
        "type": "typography"
      }
    }
  }
}"##;

pub fn pipeline() -> PipelineConfig {
    PipelineConfig::new().expect("built-in registries are valid")
}

pub fn compile_with(pipeline: &PipelineConfig, json: &str) -> Result<Dictionary, TokenError> {
    pipeline.run(load_str("tokens.json", json)?)
}

pub fn try_compile(json: &str) -> Result<Dictionary, TokenError> {
    compile_with(&pipeline(), json)
}

pub fn compile(json: &str) -> Dictionary {
    try_compile(json).expect("tokens compile")
}

pub fn token<'a>(dictionary: &'a Dictionary, dotted: &str) -> &'a ResolvedToken {
    dictionary
        .get(&TokenPath::parse_dotted(dotted))
        .unwrap_or_else(|| panic!("no token at '{dotted}'"))
}

/// Writes `tokens.json` and a `tokenforge.json` pointing at it into `dir`.
pub fn write_project(dir: &Path, tokens: &str, config: &BuildConfig) {
    fs::write(dir.join("tokens.json"), tokens).unwrap();
    fs::write(
        dir.join("tokenforge.json"),
        serde_json::to_string_pretty(config).unwrap(),
    )
    .unwrap();
}
