use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, info};
use tempfile::NamedTempFile;

use crate::config::BuildConfig;
use crate::registry::PipelineConfig;
use crate::tokens::loader::{self, SourceDocument};
use crate::tokens::{Dictionary, SourceTree};
use crate::{err_msg, TokenError};

// ============================================================================
// ARTIFACTS
// ============================================================================

/// One rendered output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub format: String,
    pub contents: String,
}

/// An artifact whose file on disk does not match what a build would write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleArtifact {
    pub artifact: Artifact,
    /// Current file contents; `None` when the file is missing.
    pub on_disk: Option<String>,
}

// ============================================================================
// BUILD PIPELINE
// ============================================================================

/// The build pipeline: Load → Transform → Format → Write.
///
/// Every stage completes before the next begins. Nothing is written until
/// every formatter has produced its output, so a failing build leaves the
/// build directory untouched.
#[derive(Debug, Clone)]
pub struct BuildPipeline {
    pub config: BuildConfig,
    pub pipeline: PipelineConfig,
}

impl BuildPipeline {
    /// Validates `config` and assembles its registries.
    pub fn new(config: BuildConfig) -> Result<Self, TokenError> {
        let pipeline = PipelineConfig::from_build_config(&config)?;
        Ok(Self { config, pipeline })
    }

    /// Reads and merges every configured source.
    pub fn load(&self) -> Result<(SourceTree, Vec<SourceDocument>), TokenError> {
        loader::load_files(&self.config.source)
    }

    /// Loads the sources and runs the transform phase.
    pub fn compile(&self) -> Result<Dictionary, TokenError> {
        let (tree, documents) = self.load()?;
        self.pipeline
            .run(tree)
            .map_err(|e| loader::decorate(e, &documents))
    }

    /// Renders every configured file without touching the disk.
    pub fn render(&self) -> Result<Vec<Artifact>, TokenError> {
        let dictionary = self.compile()?;
        self.render_dictionary(&dictionary)
    }

    pub fn render_dictionary(&self, dictionary: &Dictionary) -> Result<Vec<Artifact>, TokenError> {
        let outputs = self.pipeline.run_all(dictionary)?;
        self.config
            .files
            .iter()
            .map(|file| {
                let contents = match outputs.get(&file.format) {
                    Some(contents) => contents.clone(),
                    None => return Err(err_msg!(Config, "unknown format '{}'", file.format)),
                };
                Ok(Artifact {
                    path: self.config.build_path.join(&file.destination),
                    format: file.format.clone(),
                    contents,
                })
            })
            .collect()
    }

    /// Renders all artifacts, then writes them.
    ///
    /// Every artifact is first staged in a temporary file next to its
    /// destination; the staged files are renamed into place only once all of
    /// them exist. A staging failure leaves every destination untouched.
    pub fn build(&self) -> Result<Vec<Artifact>, TokenError> {
        let artifacts = self.render()?;
        let staged = artifacts
            .iter()
            .map(stage_artifact)
            .collect::<Result<Vec<_>, _>>()?;
        for (artifact, file) in artifacts.iter().zip(staged) {
            file.persist(&artifact.path).map_err(|e| {
                err_msg!(Io, "failed to write '{}'", artifact.path.display()).with_cause(e.error)
            })?;
            info!("wrote {} ({})", artifact.path.display(), artifact.format);
        }
        Ok(artifacts)
    }

    /// Renders all artifacts and reports those whose files differ.
    pub fn check(&self) -> Result<Vec<StaleArtifact>, TokenError> {
        let mut stale = Vec::new();
        for artifact in self.render()? {
            let on_disk = read_existing(&artifact.path)?;
            if on_disk.as_deref() == Some(artifact.contents.as_str()) {
                debug!("{} is up to date", artifact.path.display());
                continue;
            }
            stale.push(StaleArtifact { artifact, on_disk });
        }
        Ok(stale)
    }
}

// ============================================================================
// FILE SYSTEM
// ============================================================================

fn stage_artifact(artifact: &Artifact) -> Result<NamedTempFile, TokenError> {
    let parent = match artifact.path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(|e| {
        err_msg!(Io, "failed to create directory '{}'", parent.display()).with_cause(e)
    })?;
    let stage_error = |e: std::io::Error| {
        err_msg!(Io, "failed to stage '{}'", artifact.path.display()).with_cause(e)
    };
    let mut file = tempfile::Builder::new()
        .prefix(".tokenforge-")
        .tempfile_in(parent)
        .map_err(stage_error)?;
    file.write_all(artifact.contents.as_bytes()).map_err(stage_error)?;
    let permissions = match std::fs::metadata(&artifact.path) {
        Ok(existing) => Some(existing.permissions()),
        Err(_) => default_permissions(),
    };
    if let Some(permissions) = permissions {
        file.as_file().set_permissions(permissions).map_err(stage_error)?;
    }
    Ok(file)
}

/// Temporary files are created owner-only; artifacts are world-readable.
#[cfg(unix)]
fn default_permissions() -> Option<std::fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(std::fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<std::fs::Permissions> {
    None
}

fn read_existing(path: &Path) -> Result<Option<String>, TokenError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(err_msg!(Io, "failed to read '{}'", path.display()).with_cause(e)),
    }
}
