//! Bulk composition: many issues in one create request.

use crate::error::{ComposeError, Result};
use crate::field::CustomFields;
use crate::merge::{MergedRequest, compose};
use crate::payload::BasePayload;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One candidate issue for a bulk request.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkItem<P> {
    /// Base payload; `None` or an empty payload drops the item.
    pub base: Option<P>,
    /// Custom fields merged into this item only.
    pub custom_fields: Option<CustomFields>,
}

impl<P> BulkItem<P> {
    /// Item with a base payload and no custom fields.
    #[must_use]
    pub const fn new(base: P) -> Self {
        Self {
            base: Some(base),
            custom_fields: None,
        }
    }

    /// Attach custom fields.
    #[must_use]
    pub fn with_custom_fields(mut self, custom_fields: CustomFields) -> Self {
        self.custom_fields = Some(custom_fields);
        self
    }
}

impl<P> Default for BulkItem<P> {
    fn default() -> Self {
        Self {
            base: None,
            custom_fields: None,
        }
    }
}

/// Request body for the bulk-create endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkEnvelope {
    #[serde(rename = "issueUpdates")]
    pub issue_updates: Vec<MergedRequest>,
}

impl BulkEnvelope {
    /// Number of composed issues.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.issue_updates.len()
    }

    /// True when no issue survived composition.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.issue_updates.is_empty()
    }
}

/// Compose every item with a base payload into one bulk envelope.
///
/// Items without a base payload are skipped; the relative order of the
/// remaining items is kept.
///
/// # Errors
/// Returns `ComposeError::NoItemsToCompose` for an empty input, or the first
/// error [`compose`] reports for a surviving item.
pub fn compose_many<P: BasePayload>(items: &[BulkItem<P>]) -> Result<BulkEnvelope> {
    if items.is_empty() {
        return Err(ComposeError::NoItemsToCompose);
    }

    let mut issue_updates = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let Some(base) = &item.base else {
            warn!(index, "Skipping bulk item without base payload");
            continue;
        };
        if base.is_empty()? {
            warn!(index, "Skipping bulk item with empty base payload");
            continue;
        }
        issue_updates.push(compose(base, item.custom_fields.as_ref(), None)?);
    }

    debug!(
        supplied = items.len(),
        composed = issue_updates.len(),
        "Composed bulk request"
    );
    Ok(BulkEnvelope { issue_updates })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{RichIssue, RichIssueFields};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn issue(summary: &str) -> RichIssue {
        RichIssue::with_fields(
            RichIssueFields::default()
                .with_summary(summary)
                .with_project_key("KP")
                .with_issue_type("Task"),
        )
    }

    #[test]
    fn test_skips_items_without_base() {
        let mut custom = CustomFields::new();
        custom.labels("customfield_5", ["x"]).unwrap();

        let item1 = BulkItem::new(issue("one")).with_custom_fields(custom.clone());
        let item2 = BulkItem::new(issue("two"));
        let items = vec![item1, BulkItem::default(), item2];

        let envelope = compose_many(&items).unwrap();

        assert_eq!(envelope.len(), 2);
        assert_eq!(
            envelope.issue_updates,
            vec![
                compose(&issue("one"), Some(&custom), None).unwrap(),
                compose(&issue("two"), None, None).unwrap(),
            ]
        );
    }

    #[test]
    fn test_skips_empty_base() {
        let items = vec![BulkItem::new(RichIssue::default()), BulkItem::new(issue("kept"))];
        let envelope = compose_many(&items).unwrap();
        assert_eq!(envelope.len(), 1);
    }

    #[test]
    fn test_all_items_skipped_is_ok() {
        let items: Vec<BulkItem<RichIssue>> = vec![BulkItem::default()];
        let envelope = compose_many(&items).unwrap();
        assert!(envelope.is_empty());
    }

    #[test]
    fn test_empty_input_fails() {
        let items: Vec<BulkItem<RichIssue>> = Vec::new();
        let err = compose_many(&items).unwrap_err();
        assert!(matches!(err, ComposeError::NoItemsToCompose));
    }

    #[test]
    fn test_envelope_serialization() {
        let envelope = compose_many(&[BulkItem::new(issue("one"))]).unwrap();
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({
                "issueUpdates": [{
                    "fields": {
                        "summary": "one",
                        "project": {"key": "KP"},
                        "issuetype": {"name": "Task"}
                    }
                }]
            })
        );
    }
}
