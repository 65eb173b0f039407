//! Request manifests: on-disk descriptions of a request body.

use crate::error::Result;
use issuekit_core::{Dialect, FieldValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// A single request described in YAML or JSON.
///
/// ```yaml
/// dialect: plain
/// issue:
///   fields:
///     summary: Fix login
/// custom_fields:
///   story_points: { type: number, value: 3 }
/// operations:
///   labels: { triaged: remove }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequestManifest {
    /// Payload dialect; falls back to the project default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialect: Option<Dialect>,

    /// Transition identifier; present for transition requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition: Option<String>,

    /// Base payload in the dialect's shape.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue: Option<Value>,

    /// Custom field values keyed by field identifier or alias.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_fields: BTreeMap<String, FieldValue>,

    /// Array operations keyed by field, each mapping operand to verb.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub operations: BTreeMap<String, BTreeMap<String, String>>,

    /// Bulk entries; a non-empty list makes this a bulk request.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ManifestItem>,
}

/// One entry of a bulk manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue: Option<Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_fields: BTreeMap<String, FieldValue>,
}

impl RequestManifest {
    /// Parse a manifest, choosing JSON or YAML by file extension.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        if is_json(path) {
            Ok(serde_json::from_str(&content)?)
        } else {
            Self::from_yaml(&content)
        }
    }

    /// Parse a YAML manifest.
    ///
    /// # Errors
    /// Returns error if the content is not a valid manifest.
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// True when this manifest describes a bulk request.
    #[must_use]
    pub const fn is_bulk(&self) -> bool {
        !self.items.is_empty()
    }
}

/// Whether a path has one of the recognised manifest extensions.
#[must_use]
pub fn is_manifest(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yml" | "yaml" | "json")
    )
}

fn is_json(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("json")
}
