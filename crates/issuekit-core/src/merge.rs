//! Merge engine: combines a typed base payload with custom fields and update
//! operations into a single request body.
//!
//! Precedence rules:
//! - Custom field values are merged key-wise into the base's `fields` object
//!   and win on collision; other base fields are kept.
//! - Update operations go under a top-level `update` object, a sibling of
//!   `fields`. Operations for a field the base already updates are appended
//!   after the base's entries.
//! - With no custom fields and no operations the base map is returned as is.

use crate::error::{ComposeError, Result};
use crate::field::CustomFields;
use crate::operation::UpdateOperations;
use crate::payload::BasePayload;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// Key holding issue field values.
pub const FIELDS_KEY: &str = "fields";
/// Key holding incremental update operations.
pub const UPDATE_KEY: &str = "update";
/// Key holding the transition reference.
pub const TRANSITION_KEY: &str = "transition";

/// A fully composed request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MergedRequest(Map<String, Value>);

impl MergedRequest {
    /// Wrap an already generic map.
    #[must_use]
    pub const fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Borrow the underlying map.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Top-level value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Consume into the underlying map.
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Consume into a JSON value.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<MergedRequest> for Value {
    fn from(request: MergedRequest) -> Self {
        request.into_value()
    }
}

/// Compose a request body from a base payload plus optional custom fields and
/// update operations.
///
/// # Errors
/// Returns an error if the base does not convert into a JSON object or a
/// custom field value fails to encode.
pub fn compose<P: BasePayload + ?Sized>(
    base: &P,
    custom_fields: Option<&CustomFields>,
    operations: Option<&UpdateOperations>,
) -> Result<MergedRequest> {
    let mut map = base.to_map()?;
    apply_extras(&mut map, custom_fields, operations)?;
    Ok(MergedRequest(map))
}

/// Compose a transition request body.
///
/// The `transition` entry is added first, then custom fields and operations
/// compose on top exactly as for [`compose`]. A transition without a base
/// payload, or with one that carries no data, is allowed only when no field
/// edits are requested.
///
/// # Errors
/// Returns `ComposeError::MissingTransitionIdentifier` for an empty id,
/// `ComposeError::MissingIssuePayload` when edits are requested without a
/// base, or any error [`compose`] can return.
pub fn compose_transition<P: BasePayload + ?Sized>(
    transition_id: &str,
    base: Option<&P>,
    custom_fields: Option<&CustomFields>,
    operations: Option<&UpdateOperations>,
) -> Result<MergedRequest> {
    if transition_id.is_empty() {
        return Err(ComposeError::MissingTransitionIdentifier);
    }

    let has_edits = has_entries(custom_fields, CustomFields::is_empty)
        || has_entries(operations, UpdateOperations::is_empty);

    let mut map = match base {
        Some(base) => base.to_map()?,
        None => Map::new(),
    };
    if has_edits && map.is_empty() {
        return Err(ComposeError::MissingIssuePayload);
    }

    let mut transition = Map::new();
    transition.insert("id".to_string(), Value::String(transition_id.to_string()));
    map.insert(TRANSITION_KEY.to_string(), Value::Object(transition));

    apply_extras(&mut map, custom_fields, operations)?;
    debug!(transition_id, "Composed transition request");
    Ok(MergedRequest(map))
}

fn has_entries<T>(value: Option<&T>, is_empty: fn(&T) -> bool) -> bool {
    value.is_some_and(|v| !is_empty(v))
}

/// Overlay custom fields and operations onto an already generic base map.
fn apply_extras(
    map: &mut Map<String, Value>,
    custom_fields: Option<&CustomFields>,
    operations: Option<&UpdateOperations>,
) -> Result<()> {
    if let Some(custom_fields) = custom_fields.filter(|c| !c.is_empty()) {
        let encoded = custom_fields.encode()?;
        debug!(count = encoded.len(), "Merging custom fields");
        merge_fields(map, encoded);
    }

    if let Some(operations) = operations.filter(|o| !o.is_empty()) {
        debug!(count = operations.len(), "Merging update operations");
        merge_update(map, operations.encode());
    }

    Ok(())
}

/// Key-wise merge into `fields`; incoming values win.
fn merge_fields(map: &mut Map<String, Value>, incoming: Map<String, Value>) {
    let target = map
        .entry(FIELDS_KEY)
        .or_insert_with(|| Value::Object(Map::new()));

    if let Value::Object(fields) = target {
        fields.extend(incoming);
    } else {
        *target = Value::Object(incoming);
    }
}

/// Key-wise merge into `update`; lists for the same field are concatenated.
fn merge_update(map: &mut Map<String, Value>, incoming: Map<String, Value>) {
    let target = map
        .entry(UPDATE_KEY)
        .or_insert_with(|| Value::Object(Map::new()));

    let Value::Object(update) = target else {
        *target = Value::Object(incoming);
        return;
    };

    for (field, ops) in incoming {
        let Value::Array(new_ops) = ops else {
            update.insert(field, ops);
            continue;
        };
        match update.get_mut(&field) {
            Some(Value::Array(existing)) => existing.extend(new_ops),
            _ => {
                update.insert(field, Value::Array(new_ops));
            }
        }
    }
}
