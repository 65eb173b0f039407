//! Typed base payloads for the two request dialects.
//!
//! The rich dialect carries long-text fields (description, environment) as
//! document trees; the plain dialect carries them as strings. Both share one
//! generic shape, [`IssueScheme<T>`], parameterized over the long-text type.

use crate::error::{ComposeError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Capability every base payload provides to the merge engine.
pub trait BasePayload {
    /// Convert into a generic JSON object, omitting absent fields.
    ///
    /// # Errors
    /// Returns an error if the payload does not serialize into an object.
    fn to_map(&self) -> Result<Map<String, Value>>;

    /// True when the payload carries no data at all.
    ///
    /// # Errors
    /// Propagates any `to_map` failure.
    fn is_empty(&self) -> Result<bool> {
        Ok(self.to_map()?.is_empty())
    }
}

/// Serialize any value and require the result to be a JSON object.
///
/// # Errors
/// Returns `ComposeError::Json` on serialization failure and
/// `ComposeError::InvalidBasePayload` when the result is not an object.
pub fn serialize_to_map<T: Serialize + ?Sized>(value: &T) -> Result<Map<String, Value>> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        Value::Null => Err(ComposeError::InvalidBasePayload("null")),
        Value::Bool(_) => Err(ComposeError::InvalidBasePayload("boolean")),
        Value::Number(_) => Err(ComposeError::InvalidBasePayload("number")),
        Value::String(_) => Err(ComposeError::InvalidBasePayload("string")),
        Value::Array(_) => Err(ComposeError::InvalidBasePayload("array")),
    }
}

impl BasePayload for Map<String, Value> {
    fn to_map(&self) -> Result<Map<String, Value>> {
        Ok(self.clone())
    }
}

impl BasePayload for Value {
    fn to_map(&self) -> Result<Map<String, Value>> {
        serialize_to_map(self)
    }
}

/// Reference to a project by id or key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

/// Reference to a named resource (issue type, priority, resolution,
/// component, version, security level) by id or name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl NamedRef {
    /// Reference by id.
    #[must_use]
    pub fn id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: None,
        }
    }

    /// Reference by name.
    #[must_use]
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
        }
    }
}

/// Reference to a user by account id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    #[serde(rename = "accountId")]
    pub account_id: String,
}

/// Reference to a parent issue by id or key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

/// A node in a rich-text document tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentNode {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<Self>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<Value>,
}

impl DocumentNode {
    /// A text leaf.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            text: Some(text.into()),
            content: Vec::new(),
            attrs: None,
            marks: Vec::new(),
        }
    }

    /// A paragraph wrapping the given text.
    #[must_use]
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self {
            kind: "paragraph".to_string(),
            text: None,
            content: vec![Self::text(text)],
            attrs: None,
            marks: Vec::new(),
        }
    }
}

/// Rich-text document root (`{"type": "doc", "version": 1, "content": [...]}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "type")]
    pub kind: String,
    pub version: u32,
    #[serde(default)]
    pub content: Vec<DocumentNode>,
}

impl Document {
    /// A document made of one paragraph per input line.
    #[must_use]
    pub fn from_paragraphs<I>(paragraphs: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            kind: "doc".to_string(),
            version: 1,
            content: paragraphs.into_iter().map(DocumentNode::paragraph).collect(),
        }
    }
}

/// Well-known issue fields, generic over the long-text content type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueFields<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectRef>,
    #[serde(
        default,
        rename = "issuetype",
        skip_serializing_if = "Option::is_none"
    )]
    pub issue_type: Option<NamedRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<IssueRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<UserRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporter: Option<UserRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<NamedRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<NamedRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<NamedRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fix_versions: Vec<NamedRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub versions: Vec<NamedRef>,
    #[serde(default, rename = "duedate", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<NamedRef>,
}

impl<T> Default for IssueFields<T> {
    fn default() -> Self {
        Self {
            summary: None,
            description: None,
            environment: None,
            project: None,
            issue_type: None,
            parent: None,
            assignee: None,
            reporter: None,
            priority: None,
            resolution: None,
            labels: Vec::new(),
            components: Vec::new(),
            fix_versions: Vec::new(),
            versions: Vec::new(),
            due_date: None,
            security: None,
        }
    }
}

impl<T> IssueFields<T> {
    /// Set the summary.
    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Set the project by id.
    #[must_use]
    pub fn with_project_id(mut self, id: impl Into<String>) -> Self {
        self.project = Some(ProjectRef {
            id: Some(id.into()),
            key: None,
        });
        self
    }

    /// Set the project by key.
    #[must_use]
    pub fn with_project_key(mut self, key: impl Into<String>) -> Self {
        self.project = Some(ProjectRef {
            id: None,
            key: Some(key.into()),
        });
        self
    }

    /// Set the issue type by name.
    #[must_use]
    pub fn with_issue_type(mut self, name: impl Into<String>) -> Self {
        self.issue_type = Some(NamedRef::name(name));
        self
    }

    /// Set the long-text description.
    #[must_use]
    pub fn with_description(mut self, description: T) -> Self {
        self.description = Some(description);
        self
    }

    /// Set the resolution by name.
    #[must_use]
    pub fn with_resolution(mut self, name: impl Into<String>) -> Self {
        self.resolution = Some(NamedRef::name(name));
        self
    }

    /// Set the labels.
    #[must_use]
    pub fn with_labels<I>(mut self, labels: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }
}

/// Issue payload: optional identity plus well-known fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueScheme<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<IssueFields<T>>,
}

impl<T> Default for IssueScheme<T> {
    fn default() -> Self {
        Self {
            id: None,
            key: None,
            fields: None,
        }
    }
}

impl<T> IssueScheme<T> {
    /// Payload with the given fields and no identity.
    #[must_use]
    pub const fn with_fields(fields: IssueFields<T>) -> Self {
        Self {
            id: None,
            key: None,
            fields: Some(fields),
        }
    }
}

impl<T: Serialize> BasePayload for IssueScheme<T> {
    fn to_map(&self) -> Result<Map<String, Value>> {
        serialize_to_map(self)
    }
}

/// Rich dialect: long-text fields are document trees.
pub type RichIssue = IssueScheme<Document>;
/// Rich dialect fields.
pub type RichIssueFields = IssueFields<Document>;
/// Plain dialect: long-text fields are strings.
pub type PlainIssue = IssueScheme<String>;
/// Plain dialect fields.
pub type PlainIssueFields = IssueFields<String>;

/// The payload dialect a request is expressed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// Document-tree long-text fields.
    #[default]
    Rich,
    /// Plain string long-text fields.
    Plain,
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rich => write!(f, "rich"),
            Self::Plain => write!(f, "plain"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_plain_issue_omits_absent_fields() {
        let issue = PlainIssue::with_fields(
            PlainIssueFields::default()
                .with_summary("New summary test")
                .with_project_id("10000")
                .with_issue_type("Story"),
        );

        assert_eq!(
            Value::Object(issue.to_map().unwrap()),
            json!({
                "fields": {
                    "summary": "New summary test",
                    "project": {"id": "10000"},
                    "issuetype": {"name": "Story"}
                }
            })
        );
    }

    #[test]
    fn test_rich_issue_nests_document() {
        let issue = RichIssue::with_fields(
            RichIssueFields::default()
                .with_summary("Rich")
                .with_description(Document::from_paragraphs(["Line one"])),
        );

        assert_eq!(
            Value::Object(issue.to_map().unwrap()),
            json!({
                "fields": {
                    "summary": "Rich",
                    "description": {
                        "type": "doc",
                        "version": 1,
                        "content": [{
                            "type": "paragraph",
                            "content": [{"type": "text", "text": "Line one"}]
                        }]
                    }
                }
            })
        );
    }

    #[test]
    fn test_dialects_share_field_names() {
        let plain = PlainIssueFields::default()
            .with_labels(["a"])
            .with_resolution("Done");
        let plain = PlainIssue::with_fields(plain).to_map().unwrap();

        assert_eq!(
            Value::Object(plain),
            json!({"fields": {"labels": ["a"], "resolution": {"name": "Done"}}})
        );
    }

    #[test]
    fn test_empty_payload() {
        assert!(PlainIssue::default().is_empty().unwrap());
        assert!(!PlainIssue::with_fields(PlainIssueFields::default()).is_empty().unwrap());
    }

    #[test]
    fn test_non_object_value_rejected() {
        let err = json!(["not", "an", "object"]).to_map().unwrap_err();
        assert!(matches!(err, ComposeError::InvalidBasePayload("array")));
    }

    #[test]
    fn test_deserialize_plain_issue() {
        let issue: PlainIssue = serde_json::from_value(json!({
            "fields": {
                "summary": "From json",
                "description": "plain text",
                "issuetype": {"name": "Bug"},
                "fixVersions": [{"name": "1.0"}]
            }
        }))
        .unwrap();

        let fields = issue.fields.unwrap();
        assert_eq!(fields.description.as_deref(), Some("plain text"));
        assert_eq!(fields.issue_type, Some(NamedRef::name("Bug")));
        assert_eq!(fields.fix_versions, vec![NamedRef::name("1.0")]);
    }
}
