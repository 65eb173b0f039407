//! Incremental update operations against issue fields.
//!
//! Array-valued fields (labels, components, ...) are often edited with
//! `add`/`remove`/`set` directives instead of whole-value replacement. Each
//! directive is encoded as a single-key object, e.g. `{"remove": "triaged"}`.

use crate::error::{ComposeError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A single (verb, operand) directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationEntry {
    /// Directive such as `add`, `remove` or `set`.
    pub verb: String,
    /// Value the directive applies to.
    pub operand: String,
}

impl OperationEntry {
    /// Create a new entry.
    #[must_use]
    pub fn new(verb: impl Into<String>, operand: impl Into<String>) -> Self {
        Self {
            verb: verb.into(),
            operand: operand.into(),
        }
    }

    /// Encode as `{verb: operand}`.
    #[must_use]
    pub fn encode(&self) -> Value {
        let mut obj = Map::new();
        obj.insert(self.verb.clone(), Value::String(self.operand.clone()));
        Value::Object(obj)
    }
}

/// Ordered update operations grouped by field identifier.
///
/// Repeated calls for the same field accumulate in call order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateOperations {
    fields: BTreeMap<String, Vec<OperationEntry>>,
}

impl UpdateOperations {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append array operations for a field.
    ///
    /// The input is keyed by operand with the verb as its value, so
    /// `[("triaged", "remove")]` encodes to `{"remove": "triaged"}`.
    ///
    /// # Errors
    /// Returns `ComposeError::MissingFieldIdentifier` if `field` is empty and
    /// `ComposeError::MissingOperationValues` if no pairs are supplied.
    pub fn add_array_operation<I, O, V>(
        &mut self,
        field: impl Into<String>,
        operand_to_verb: I,
    ) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (O, V)>,
        O: Into<String>,
        V: Into<String>,
    {
        let field = field.into();
        if field.is_empty() {
            return Err(ComposeError::MissingFieldIdentifier);
        }

        let entries: Vec<OperationEntry> = operand_to_verb
            .into_iter()
            .map(|(operand, verb)| OperationEntry::new(verb, operand))
            .collect();

        if entries.is_empty() {
            return Err(ComposeError::MissingOperationValues(field));
        }

        self.fields.entry(field).or_default().extend(entries);
        Ok(self)
    }

    /// Append a single `{verb: operand}` operation for a field, e.g.
    /// `("summary", "set", "New title")`.
    ///
    /// # Errors
    /// Returns `ComposeError::MissingFieldIdentifier` if `field` is empty.
    pub fn add_string_operation(
        &mut self,
        field: impl Into<String>,
        verb: impl Into<String>,
        operand: impl Into<String>,
    ) -> Result<&mut Self> {
        let field = field.into();
        if field.is_empty() {
            return Err(ComposeError::MissingFieldIdentifier);
        }
        self.fields
            .entry(field)
            .or_default()
            .push(OperationEntry::new(verb, operand));
        Ok(self)
    }

    /// Operations recorded for a field, in call order.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[OperationEntry]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    /// Number of fields with at least one operation.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when no operation has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Encode as `{field: [{verb: operand}, ...], ...}`.
    #[must_use]
    pub fn encode(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|(field, entries)| {
                let list = entries.iter().map(OperationEntry::encode).collect();
                (field.clone(), Value::Array(list))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_operand_verb_inversion() {
        let mut ops = UpdateOperations::new();
        ops.add_array_operation("labels", [("triaged", "remove")])
            .unwrap();

        assert_eq!(
            Value::Object(ops.encode()),
            json!({"labels": [{"remove": "triaged"}]})
        );
    }

    #[test]
    fn test_calls_accumulate_in_order() {
        let mut ops = UpdateOperations::new();
        ops.add_array_operation("labels", [("triaged", "remove")])
            .unwrap()
            .add_array_operation("labels", [("blocker", "add")])
            .unwrap();

        assert_eq!(
            ops.get("labels").unwrap(),
            &[
                OperationEntry::new("remove", "triaged"),
                OperationEntry::new("add", "blocker"),
            ]
        );
        assert_eq!(ops.len(), 1);
    }

    #[test]
    fn test_string_operation() {
        let mut ops = UpdateOperations::new();
        ops.add_string_operation("summary", "set", "New title").unwrap();

        assert_eq!(
            Value::Object(ops.encode()),
            json!({"summary": [{"set": "New title"}]})
        );
    }

    #[test]
    fn test_validation() {
        let mut ops = UpdateOperations::new();

        let err = ops.add_array_operation("", [("a", "add")]).unwrap_err();
        assert!(matches!(err, ComposeError::MissingFieldIdentifier));

        let empty: Vec<(String, String)> = Vec::new();
        let err = ops.add_array_operation("labels", empty).unwrap_err();
        assert!(matches!(err, ComposeError::MissingOperationValues(f) if f == "labels"));

        let err = ops.add_string_operation("", "set", "x").unwrap_err();
        assert!(matches!(err, ComposeError::MissingFieldIdentifier));

        assert!(ops.is_empty());
    }

    #[test]
    fn test_accepts_map_input() {
        let mut mapping = BTreeMap::new();
        mapping.insert("triaged", "remove");
        mapping.insert("ready", "add");

        let mut ops = UpdateOperations::new();
        ops.add_array_operation("labels", mapping).unwrap();

        // BTreeMap iterates by operand.
        assert_eq!(
            Value::Object(ops.encode()),
            json!({"labels": [{"add": "ready"}, {"remove": "triaged"}]})
        );
    }
}
