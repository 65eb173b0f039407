//! Project management and manifest composition.

use crate::config::ProjectConfig;
use crate::error::{ManifestError, Result};
use crate::manifest::{self, ManifestItem, RequestManifest};
use issuekit_core::{
    BulkItem, CustomFields, Dialect, Document, FieldValue, IssueScheme, UpdateOperations,
    compose, compose_many, compose_transition,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Directory name for issuekit configuration.
const ISSUEKIT_DIR: &str = ".issuekit";
/// Configuration file name.
const CONFIG_FILE: &str = "config.yml";

/// Kind of request a manifest produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    /// Create or edit a single issue.
    Issue,
    /// Transition an issue, optionally editing fields.
    Transition,
    /// Create many issues at once.
    Bulk,
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Issue => write!(f, "issue"),
            Self::Transition => write!(f, "transition"),
            Self::Bulk => write!(f, "bulk"),
        }
    }
}

/// A composed request body plus what produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComposedBody {
    pub kind: RequestKind,
    pub dialect: Dialect,
    pub body: Value,
}

/// A project directory holding configuration and manifests.
#[derive(Debug)]
pub struct ManifestProject {
    /// Root path of the project.
    root: PathBuf,
    /// Project configuration.
    config: ProjectConfig,
}

impl ManifestProject {
    /// Initialize a new project at the given path.
    ///
    /// # Errors
    /// Returns error if a project already exists or IO fails.
    pub fn init(path: impl AsRef<Path>) -> Result<Self> {
        let root = path.as_ref().to_path_buf();
        let issuekit_dir = root.join(ISSUEKIT_DIR);

        if issuekit_dir.exists() {
            return Err(ManifestError::ProjectExists(root));
        }

        fs::create_dir_all(&issuekit_dir)?;

        let config = ProjectConfig::default();
        let config_content = serde_yaml::to_string(&config)?;
        fs::write(issuekit_dir.join(CONFIG_FILE), config_content)?;

        info!(path = %root.display(), "Initialized project");

        Ok(Self { root, config })
    }

    /// Open an existing project at the given path.
    ///
    /// # Errors
    /// Returns error if the project doesn't exist or config is invalid.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let root = path.as_ref().to_path_buf();
        let config_path = root.join(ISSUEKIT_DIR).join(CONFIG_FILE);

        if !config_path.exists() {
            return Err(ManifestError::ProjectNotFound(root));
        }

        let config_content = fs::read_to_string(&config_path)?;
        let config: ProjectConfig = serde_yaml::from_str(&config_content)?;

        debug!(path = %root.display(), aliases = config.aliases.len(), "Opened project");

        Ok(Self { root, config })
    }

    /// Open a project, falling back to default configuration when none exists.
    ///
    /// # Errors
    /// Returns error if an existing config cannot be read.
    pub fn open_or_default(path: impl AsRef<Path>) -> Result<Self> {
        match Self::open(&path) {
            Err(ManifestError::ProjectNotFound(root)) => {
                debug!(path = %root.display(), "No project config, using defaults");
                Ok(Self::with_config(root, ProjectConfig::default()))
            }
            other => other,
        }
    }

    /// Build a project from an in-memory configuration.
    #[must_use]
    pub fn with_config(root: impl Into<PathBuf>, config: ProjectConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Get the project root path.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the project configuration.
    #[must_use]
    pub const fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// Resolve a path relative to the project root.
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Load a manifest file.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<RequestManifest> {
        let path = self.resolve_path(path.as_ref());
        debug!(path = %path.display(), "Loading manifest");
        RequestManifest::from_path(&path)
    }

    /// Find manifest files under a directory, sorted by path.
    ///
    /// The `.issuekit` configuration directory is skipped.
    ///
    /// # Errors
    /// Returns error if the directory cannot be traversed.
    pub fn discover(&self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let dir = self.resolve_path(dir.as_ref());
        let mut found = Vec::new();

        for entry in WalkDir::new(&dir)
            .into_iter()
            .filter_entry(|e| e.file_name() != ISSUEKIT_DIR)
        {
            let entry = entry?;
            if entry.file_type().is_file() && manifest::is_manifest(entry.path()) {
                found.push(entry.into_path());
            }
        }

        found.sort();
        debug!(dir = %dir.display(), count = found.len(), "Discovered manifests");
        Ok(found)
    }

    /// Dialect a manifest is written in, after applying project defaults.
    #[must_use]
    pub fn dialect_of(&self, manifest: &RequestManifest) -> Dialect {
        manifest.dialect.unwrap_or(self.config.defaults.dialect)
    }

    /// Compose the request body a manifest describes.
    ///
    /// # Errors
    /// Returns error if the manifest is inconsistent or composition fails.
    pub fn compose(&self, manifest: &RequestManifest) -> Result<ComposedBody> {
        let dialect = self.dialect_of(manifest);
        let (kind, body) = match dialect {
            Dialect::Rich => self.compose_in::<Document>(manifest)?,
            Dialect::Plain => self.compose_in::<String>(manifest)?,
        };
        info!(%kind, %dialect, "Composed request body");
        Ok(ComposedBody {
            kind,
            dialect,
            body,
        })
    }

    /// Compose the issues of several single-issue manifests into one bulk body.
    ///
    /// # Errors
    /// Returns error if manifests mix dialects, any of them is not a plain
    /// issue manifest, or composition fails.
    pub fn compose_bulk(&self, manifests: &[RequestManifest]) -> Result<ComposedBody> {
        let dialect = manifests
            .first()
            .map_or(self.config.defaults.dialect, |m| self.dialect_of(m));

        let mut items = Vec::with_capacity(manifests.len());
        for manifest in manifests {
            let other = self.dialect_of(manifest);
            if other != dialect {
                return Err(ManifestError::MixedDialects(dialect, other));
            }
            if manifest.is_bulk() || manifest.transition.is_some() || !manifest.operations.is_empty()
            {
                return Err(ManifestError::Invalid(
                    "only single-issue manifests without operations can be bulk composed"
                        .to_string(),
                ));
            }
            items.push(ManifestItem {
                issue: manifest.issue.clone(),
                custom_fields: manifest.custom_fields.clone(),
            });
        }

        let body = match dialect {
            Dialect::Rich => self.compose_items::<Document>(&items)?,
            Dialect::Plain => self.compose_items::<String>(&items)?,
        };
        info!(%dialect, manifests = manifests.len(), "Composed bulk request body");
        Ok(ComposedBody {
            kind: RequestKind::Bulk,
            dialect,
            body,
        })
    }

    fn compose_in<T>(&self, manifest: &RequestManifest) -> Result<(RequestKind, Value)>
    where
        T: Serialize + DeserializeOwned,
    {
        let custom_fields = self.custom_fields(&manifest.custom_fields)?;
        let operations = self.operations(&manifest.operations)?;

        if manifest.is_bulk() {
            if manifest.issue.is_some()
                || manifest.transition.is_some()
                || !custom_fields.is_empty()
                || !operations.is_empty()
            {
                return Err(ManifestError::Invalid(
                    "bulk manifests carry issues and custom fields per item only".to_string(),
                ));
            }
            return Ok((RequestKind::Bulk, self.compose_items::<T>(&manifest.items)?));
        }

        let base = parse_issue::<T>(manifest.issue.as_ref())?;

        if let Some(transition_id) = &manifest.transition {
            let merged = compose_transition(
                transition_id,
                base.as_ref(),
                Some(&custom_fields),
                Some(&operations),
            )?;
            return Ok((RequestKind::Transition, merged.into_value()));
        }

        let merged = compose(
            &base.unwrap_or_default(),
            Some(&custom_fields),
            Some(&operations),
        )?;
        Ok((RequestKind::Issue, merged.into_value()))
    }

    fn compose_items<T>(&self, items: &[ManifestItem]) -> Result<Value>
    where
        T: Serialize + DeserializeOwned,
    {
        let items = items
            .iter()
            .map(|item| {
                Ok(BulkItem {
                    base: parse_issue::<T>(item.issue.as_ref())?,
                    custom_fields: Some(self.custom_fields(&item.custom_fields)?),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(serde_json::to_value(compose_many(&items)?)?)
    }

    /// Build the custom field registry, resolving aliases.
    fn custom_fields(&self, values: &BTreeMap<String, FieldValue>) -> Result<CustomFields> {
        let mut custom_fields = CustomFields::new();
        for (name, value) in values {
            let field = self.config.resolve(name);
            if custom_fields.get(&field).is_some() {
                debug!(field = %field, name = %name, "custom field set twice, keeping later entry");
            }
            custom_fields.insert(field, value.clone())?;
        }
        Ok(custom_fields)
    }

    /// Build update operations, resolving aliases.
    fn operations(
        &self,
        values: &BTreeMap<String, BTreeMap<String, String>>,
    ) -> Result<UpdateOperations> {
        let mut operations = UpdateOperations::new();
        for (name, operand_to_verb) in values {
            operations.add_array_operation(self.config.resolve(name), operand_to_verb)?;
        }
        Ok(operations)
    }
}

fn parse_issue<T: DeserializeOwned>(issue: Option<&Value>) -> Result<Option<IssueScheme<T>>> {
    issue
        .map(|value| serde_json::from_value(value.clone()))
        .transpose()
        .map_err(Into::into)
}
