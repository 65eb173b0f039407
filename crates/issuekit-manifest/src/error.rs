//! Error types for manifest handling.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for manifest operations.
pub type Result<T> = std::result::Result<T, ManifestError>;

/// Errors that can occur while loading or composing manifests.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Project configuration not found at the specified path.
    #[error("project not found at '{0}'")]
    ProjectNotFound(PathBuf),

    /// Project configuration already exists.
    #[error("project already exists at '{0}'")]
    ProjectExists(PathBuf),

    /// Manifest is structurally valid but cannot be composed.
    #[error("invalid manifest: {0}")]
    Invalid(String),

    /// Bulk composition over manifests written in different dialects.
    #[error("manifests mix dialects '{0}' and '{1}'")]
    MixedDialects(issuekit_core::Dialect, issuekit_core::Dialect),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal error.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// YAML parsing error.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Composition error.
    #[error("compose error: {0}")]
    Compose(#[from] issuekit_core::ComposeError),
}
