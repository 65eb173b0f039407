//! Project configuration and request manifests for issuekit.
//!
//! A project directory holds:
//! - `.issuekit/config.yml`: default dialect and field aliases
//! - any number of request manifests (`*.yml`, `*.yaml`, `*.json`)

pub mod config;
pub mod error;
pub mod manifest;
pub mod project;

pub use config::ProjectConfig;
pub use error::{ManifestError, Result};
pub use manifest::{ManifestItem, RequestManifest};
pub use project::{ComposedBody, ManifestProject, RequestKind};
