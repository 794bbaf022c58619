//! Command-line arguments and subcommands, derived with `clap`.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "tokenforge",
    version,
    about = "Compiles design tokens into CSS, JavaScript and TypeScript."
)]
pub struct TokenforgeArgs {
    /// Increase log output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load, transform and format the tokens, then write every artifact.
    Build {
        /// Build configuration (.json, .yaml or .yml).
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Render every artifact and report those that differ from disk.
    Check {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// List resolved tokens with their names, types and values.
    Tokens {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Only show tokens whose dotted path or name starts with this prefix.
        #[arg(short, long)]
        filter: Option<String>,
        /// Print the listing as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Look up a key through an accessor, as the generated module would.
    Get {
        /// Accessor name, e.g. `spacing`.
        accessor: String,
        /// Key passed to the accessor, e.g. `4` or `red.500`.
        key: String,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// List the transforms a build runs, in order.
    ListTransforms {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// List all available formatters.
    ListFormats,
}

impl TokenforgeArgs {
    /// `env_logger` filter for the requested verbosity.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
