//! Handles all user-facing output for the CLI.
//!
//! Colour is used only when stdout is a terminal.

use std::io::Write;

use difference::{Changeset, Difference};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::engine::{Artifact, StaleArtifact};
use crate::tokens::{css_value, ResolvedToken};

fn stdout() -> StandardStream {
    let choice = if atty::is(atty::Stream::Stdout) {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    StandardStream::stdout(choice)
}

fn colored(stream: &mut StandardStream, color: Color, bold: bool, text: &str) {
    let _ = stream.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(bold));
    let _ = write!(stream, "{text}");
    let _ = stream.reset();
}

// ============================================================================
// BUILD / CHECK
// ============================================================================

pub fn print_written(artifacts: &[Artifact]) {
    let mut out = stdout();
    for artifact in artifacts {
        colored(&mut out, Color::Green, true, "✔ ");
        let _ = writeln!(out, "{} ({})", artifact.path.display(), artifact.format);
    }
}

pub fn print_stale(stale: &[StaleArtifact]) {
    let mut out = stdout();
    if stale.is_empty() {
        colored(&mut out, Color::Green, true, "all artifacts are up to date\n");
        return;
    }
    for item in stale {
        let path = item.artifact.path.display();
        match &item.on_disk {
            None => {
                colored(&mut out, Color::Red, true, "missing ");
                let _ = writeln!(out, "{path}");
            }
            Some(current) => {
                colored(&mut out, Color::Yellow, true, "stale ");
                let _ = writeln!(out, "{path}");
                let changeset = Changeset::new(current, &item.artifact.contents, "\n");
                print_diff(&mut out, &changeset.diffs);
            }
        }
    }
}

fn print_diff(out: &mut StandardStream, diffs: &[Difference]) {
    for diff in diffs {
        match diff {
            // Unchanged runs are left out; only the edits matter here.
            Difference::Same(_) => {}
            Difference::Add(text) => {
                for line in text.lines() {
                    colored(out, Color::Green, false, &format!("+{line}\n"));
                }
            }
            Difference::Rem(text) => {
                for line in text.lines() {
                    colored(out, Color::Red, false, &format!("-{line}\n"));
                }
            }
        }
    }
}

// ============================================================================
// INTROSPECTION
// ============================================================================

pub fn print_tokens(tokens: &[&ResolvedToken]) {
    let mut out = stdout();
    if tokens.is_empty() {
        let _ = writeln!(out, "  No tokens found.");
        return;
    }
    let width = tokens.iter().map(|t| t.name.len()).max().unwrap_or(0);
    for token in tokens {
        colored(&mut out, Color::Cyan, true, &format!("{:<width$}", token.name));
        let _ = write!(out, "  ");
        colored(&mut out, Color::Magenta, false, &format!("{:<14}", token.kind.as_str()));
        let _ = writeln!(out, "  {}", css_value(&token.value).replace('\n', "\n    "));
    }
}

pub fn print_registry(items: &[(String, String)]) {
    let mut out = stdout();
    if items.is_empty() {
        let _ = writeln!(out, "  No items found.");
        return;
    }
    let width = items.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, detail) in items {
        colored(&mut out, Color::Cyan, true, &format!("  {name:<width$}"));
        let _ = writeln!(out, "  {detail}");
    }
}
