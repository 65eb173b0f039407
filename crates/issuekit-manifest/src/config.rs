//! Project configuration.

use issuekit_core::Dialect;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Project configuration stored in `.issuekit/config.yml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Configuration version.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Defaults applied to manifests that leave a setting out.
    #[serde(default)]
    pub defaults: ComposeDefaults,

    /// Friendly names for field identifiers (e.g. `story_points: customfield_10042`).
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

const fn default_version() -> u32 {
    1
}

/// Defaults for manifests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComposeDefaults {
    /// Dialect used when a manifest does not name one.
    #[serde(default)]
    pub dialect: Dialect,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            version: 1,
            defaults: ComposeDefaults::default(),
            aliases: BTreeMap::new(),
        }
    }
}

impl ProjectConfig {
    /// Resolve an alias to its field identifier; unknown names pass through.
    #[must_use]
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map_or(name, String::as_str)
    }

    /// Add an alias.
    #[must_use]
    pub fn with_alias(mut self, name: impl Into<String>, field: impl Into<String>) -> Self {
        self.aliases.insert(name.into(), field.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_alias() {
        let config = ProjectConfig::default().with_alias("story_points", "customfield_10042");

        assert_eq!(config.resolve("story_points"), "customfield_10042");
        assert_eq!(config.resolve("customfield_1"), "customfield_1");
    }

    #[test]
    fn test_parse_partial_config() {
        let config: ProjectConfig = serde_yaml::from_str("defaults:\n  dialect: plain\n").unwrap();

        assert_eq!(config.version, 1);
        assert_eq!(config.defaults.dialect, Dialect::Plain);
        assert!(config.aliases.is_empty());
    }
}
