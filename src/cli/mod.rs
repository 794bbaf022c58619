//! The tokenforge command-line interface.
//!
//! Each subcommand is a thin wrapper over [`BuildPipeline`]; all rendering of
//! results lives in [`output`].

use std::path::{Path, PathBuf};
use std::process;

use serde_json::json;

use crate::cli::args::{Command, TokenforgeArgs};
use crate::config::BuildConfig;
use crate::diagnostics::print_error;
use crate::engine::BuildPipeline;
use crate::registry::build_default_format_registry;
use crate::tokens::TokenValue;
use crate::{err_msg, TokenError};

pub mod args;
pub mod output;

/// Configuration files picked up from the working directory when `--config`
/// is not given.
const DEFAULT_CONFIG_FILES: &[&str] = &["tokenforge.json", "tokenforge.yaml", "tokenforge.yml"];

/// Runs one command and exits non-zero on failure or stale artifacts.
pub fn run(args: TokenforgeArgs) {
    match dispatch(args.command) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            print_error(e);
            process::exit(1);
        }
    }
}

/// Returns `Ok(false)` when the command ran but the outcome is a failure.
fn dispatch(command: Command) -> Result<bool, TokenError> {
    match command {
        Command::Build { config } => {
            let pipeline = pipeline(config.as_deref())?;
            let artifacts = pipeline.build()?;
            output::print_written(&artifacts);
            Ok(true)
        }

        Command::Check { config } => {
            let stale = pipeline(config.as_deref())?.check()?;
            output::print_stale(&stale);
            Ok(stale.is_empty())
        }

        Command::Tokens {
            config,
            filter,
            json,
        } => {
            let dictionary = pipeline(config.as_deref())?.compile()?;
            let tokens: Vec<_> = dictionary
                .all_tokens()
                .iter()
                .filter(|t| match &filter {
                    Some(prefix) => {
                        t.path.to_string().starts_with(prefix.as_str())
                            || t.name.starts_with(prefix.as_str())
                    }
                    None => true,
                })
                .collect();
            if json {
                let listing: Vec<_> = tokens
                    .iter()
                    .map(|t| {
                        json!({
                            "path": t.path.to_string(),
                            "name": t.name,
                            "type": t.kind.as_str(),
                            "value": t.value,
                        })
                    })
                    .collect();
                println!("{}", to_pretty(&TokenValue::Array(listing))?);
            } else {
                output::print_tokens(&tokens);
            }
            Ok(true)
        }

        Command::Get {
            accessor,
            key,
            config,
        } => {
            let pipeline = pipeline(config.as_deref())?;
            let found = pipeline
                .config
                .accessors
                .iter()
                .find(|a| a.name == accessor)
                .ok_or_else(|| {
                    let names: Vec<_> =
                        pipeline.config.accessors.iter().map(|a| a.name.as_str()).collect();
                    err_msg!(Config, "unknown accessor '{}'", accessor)
                        .with_help(format!("configured accessors: {}", names.join(", ")))
                })?;
            let value = pipeline.compile()?.access(found, &key);
            match value {
                TokenValue::String(text) => println!("{text}"),
                other => println!("{}", to_pretty(&other)?),
            }
            Ok(true)
        }

        Command::ListTransforms { config } => {
            let pipeline = pipeline(config.as_deref())?;
            let items: Vec<_> = pipeline
                .pipeline
                .transforms
                .iter()
                .map(|t| {
                    let mut detail = t.kind().as_str().to_string();
                    if !t.transitive {
                        detail.push_str(" (non-transitive)");
                    }
                    (t.name.clone(), detail)
                })
                .collect();
            output::print_registry(&items);
            Ok(true)
        }

        Command::ListFormats => {
            let items: Vec<_> = build_default_format_registry()?
                .iter()
                .map(|f| (f.name.clone(), f.description.clone()))
                .collect();
            output::print_registry(&items);
            Ok(true)
        }
    }
}

// ============================================================================
// HELPERS
// ============================================================================

fn pipeline(config: Option<&Path>) -> Result<BuildPipeline, TokenError> {
    BuildPipeline::new(load_config(config)?)
}

/// An explicit `--config` must exist. Without one, the first default file in
/// the working directory is used, and failing that the built-in defaults.
fn load_config(explicit: Option<&Path>) -> Result<BuildConfig, TokenError> {
    if let Some(path) = explicit {
        return BuildConfig::load(path);
    }
    match DEFAULT_CONFIG_FILES
        .iter()
        .map(PathBuf::from)
        .find(|path| path.is_file())
    {
        Some(path) => BuildConfig::load(&path),
        None => Ok(BuildConfig::default()),
    }
}

fn to_pretty(value: &TokenValue) -> Result<String, TokenError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| err_msg!(Format, "failed to serialize output: {}", e).with_cause(e))
}
