//! CLI command implementations.

use crate::output::{self, AliasTable, OutputFormat};
use anyhow::{Context, Result, bail};
use issuekit_manifest::ManifestProject;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Initialize a new project.
pub fn init(path: &Path, format: OutputFormat) -> Result<()> {
    ManifestProject::init(path).context("Failed to initialize project")?;
    output::print_success(
        &format!("Initialized project at {}", path.display()),
        format,
    );
    Ok(())
}

/// Compose the request body described by one manifest.
pub fn compose(path: &Path, manifest: &Path, format: OutputFormat) -> Result<()> {
    let project = ManifestProject::open_or_default(path).context("Failed to open project")?;

    let manifest_doc = project
        .load(manifest)
        .with_context(|| format!("Failed to load manifest {}", manifest.display()))?;

    let composed = project
        .compose(&manifest_doc)
        .with_context(|| format!("Failed to compose {}", manifest.display()))?;

    output::print_body(&composed, format)
}

/// Compose several single-issue manifests into one bulk-create body.
///
/// Each input may be a manifest file or a directory to search.
pub fn bulk(path: &Path, inputs: &[PathBuf], format: OutputFormat) -> Result<()> {
    let project = ManifestProject::open_or_default(path).context("Failed to open project")?;

    let mut files = Vec::new();
    for input in inputs {
        let resolved = if input.is_absolute() {
            input.clone()
        } else {
            project.root().join(input)
        };
        if resolved.is_dir() {
            files.extend(
                project
                    .discover(&resolved)
                    .with_context(|| format!("Failed to search {}", resolved.display()))?,
            );
        } else {
            files.push(resolved);
        }
    }

    if files.is_empty() {
        bail!("No manifests found");
    }
    debug!(count = files.len(), "Composing bulk request");

    let manifests = files
        .iter()
        .map(|file| {
            project
                .load(file)
                .with_context(|| format!("Failed to load manifest {}", file.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    let composed = project
        .compose_bulk(&manifests)
        .context("Failed to compose bulk request")?;

    output::print_body(&composed, format)
}

/// Show configured field aliases.
pub fn aliases(path: &Path, format: OutputFormat) -> Result<()> {
    let project = ManifestProject::open(path).context("Failed to open project")?;
    output::print(&AliasTable(&project.config().aliases), format)
}
