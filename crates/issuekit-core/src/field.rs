//! Custom field values and the registry that collects them.
//!
//! Every supported custom-field category is a variant of [`FieldValue`] and
//! knows how to encode itself into the JSON shape the remote API expects.
//! [`CustomFields`] maps field identifiers (e.g. `customfield_10042`) to
//! values and exposes one typed setter per category.

use crate::error::{ComposeError, Result};
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use thiserror::Error;

/// Format used for date-only custom fields.
const DATE_FORMAT: &str = "%Y-%m-%d";
/// Format used for date-time custom fields (millisecond precision, numeric offset).
const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// Reasons a single field value can fail to encode.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    /// JSON has no representation for NaN or infinities.
    #[error("number {0} is not finite")]
    NonFiniteNumber(f64),
}

/// A typed custom field value.
///
/// Serialized form is `{"type": <category>, "value": <payload>}`, which is what
/// request manifests use to describe a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    /// Single or multi-line plain text.
    Text(String),
    /// URL field, sent as a plain string.
    Url(String),
    /// Numeric field, sent unchanged.
    Number(f64),
    /// Single group picker.
    Group(String),
    /// Multi group picker.
    Groups(Vec<String>),
    /// Single user picker (account id).
    User(String),
    /// Multi user picker (account ids).
    Users(Vec<String>),
    /// Single select list.
    Select(String),
    /// Radio buttons.
    RadioButton(String),
    /// Multi select list.
    MultiSelect(Vec<String>),
    /// Checkboxes.
    CheckBox(Vec<String>),
    /// Cascading select (parent option plus child option).
    Cascading { parent: String, child: String },
    /// Date picker.
    Date(NaiveDate),
    /// Date-time picker.
    DateTime(DateTime<FixedOffset>),
    /// Label set.
    Labels(Vec<String>),
}

impl FieldValue {
    /// Short category name, matching the serialized `type` tag.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Url(_) => "url",
            Self::Number(_) => "number",
            Self::Group(_) => "group",
            Self::Groups(_) => "groups",
            Self::User(_) => "user",
            Self::Users(_) => "users",
            Self::Select(_) => "select",
            Self::RadioButton(_) => "radio_button",
            Self::MultiSelect(_) => "multi_select",
            Self::CheckBox(_) => "check_box",
            Self::Cascading { .. } => "cascading",
            Self::Date(_) => "date",
            Self::DateTime(_) => "date_time",
            Self::Labels(_) => "labels",
        }
    }

    /// Encode the value into the JSON shape the remote API expects.
    ///
    /// List-valued categories keep the caller's element order.
    ///
    /// # Errors
    /// Returns `EncodeError::NonFiniteNumber` for NaN or infinite numbers.
    pub fn encode(&self) -> std::result::Result<Value, EncodeError> {
        let encoded = match self {
            Self::Text(s) | Self::Url(s) => Value::String(s.clone()),
            Self::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .ok_or(EncodeError::NonFiniteNumber(*n))?,
            Self::Group(name) => wrap("name", name),
            Self::Groups(names) => wrap_all("name", names),
            Self::User(account_id) => wrap("accountId", account_id),
            Self::Users(account_ids) => wrap_all("accountId", account_ids),
            Self::Select(option) | Self::RadioButton(option) => wrap("value", option),
            Self::MultiSelect(options) | Self::CheckBox(options) => wrap_all("value", options),
            Self::Cascading { parent, child } => json!({
                "value": parent,
                "child": { "value": child }
            }),
            Self::Date(date) => Value::String(date.format(DATE_FORMAT).to_string()),
            Self::DateTime(at) => Value::String(at.format(DATE_TIME_FORMAT).to_string()),
            Self::Labels(labels) => {
                Value::Array(labels.iter().cloned().map(Value::String).collect())
            }
        };
        Ok(encoded)
    }
}

fn wrap(key: &str, value: &str) -> Value {
    let mut obj = Map::new();
    obj.insert(key.to_string(), Value::String(value.to_string()));
    Value::Object(obj)
}

fn wrap_all(key: &str, values: &[String]) -> Value {
    Value::Array(values.iter().map(|v| wrap(key, v)).collect())
}

fn collect<I>(values: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    values.into_iter().map(Into::into).collect()
}

/// Registry of custom field values keyed by field identifier.
///
/// Setting the same identifier twice keeps only the last value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomFields {
    values: BTreeMap<String, FieldValue>,
}

impl CustomFields {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value for a field identifier, replacing any previous value.
    ///
    /// # Errors
    /// Returns `ComposeError::MissingFieldIdentifier` if `field` is empty.
    pub fn insert(&mut self, field: impl Into<String>, value: FieldValue) -> Result<&mut Self> {
        let field = field.into();
        if field.is_empty() {
            return Err(ComposeError::MissingFieldIdentifier);
        }
        self.values.insert(field, value);
        Ok(self)
    }

    /// Set a plain text field.
    ///
    /// # Errors
    /// Returns `ComposeError::MissingFieldIdentifier` if `field` is empty.
    pub fn text(&mut self, field: impl Into<String>, text: impl Into<String>) -> Result<&mut Self> {
        self.insert(field, FieldValue::Text(text.into()))
    }

    /// Set a URL field.
    ///
    /// # Errors
    /// Returns `ComposeError::MissingFieldIdentifier` if `field` is empty.
    pub fn url(&mut self, field: impl Into<String>, url: impl Into<String>) -> Result<&mut Self> {
        self.insert(field, FieldValue::Url(url.into()))
    }

    /// Set a number field.
    ///
    /// # Errors
    /// Returns `ComposeError::MissingFieldIdentifier` if `field` is empty.
    pub fn number(&mut self, field: impl Into<String>, number: f64) -> Result<&mut Self> {
        self.insert(field, FieldValue::Number(number))
    }

    /// Set a single group picker.
    ///
    /// # Errors
    /// Returns `ComposeError::MissingFieldIdentifier` if `field` is empty.
    pub fn group(&mut self, field: impl Into<String>, group: impl Into<String>) -> Result<&mut Self> {
        self.insert(field, FieldValue::Group(group.into()))
    }

    /// Set a multi group picker.
    ///
    /// # Errors
    /// Returns `ComposeError::MissingFieldIdentifier` if `field` is empty.
    pub fn groups<I>(&mut self, field: impl Into<String>, groups: I) -> Result<&mut Self>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.insert(field, FieldValue::Groups(collect(groups)))
    }

    /// Set a single user picker.
    ///
    /// # Errors
    /// Returns `ComposeError::MissingFieldIdentifier` if `field` is empty.
    pub fn user(
        &mut self,
        field: impl Into<String>,
        account_id: impl Into<String>,
    ) -> Result<&mut Self> {
        self.insert(field, FieldValue::User(account_id.into()))
    }

    /// Set a multi user picker.
    ///
    /// # Errors
    /// Returns `ComposeError::MissingFieldIdentifier` if `field` is empty.
    pub fn users<I>(&mut self, field: impl Into<String>, account_ids: I) -> Result<&mut Self>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.insert(field, FieldValue::Users(collect(account_ids)))
    }

    /// Set a single select list.
    ///
    /// # Errors
    /// Returns `ComposeError::MissingFieldIdentifier` if `field` is empty.
    pub fn select(
        &mut self,
        field: impl Into<String>,
        option: impl Into<String>,
    ) -> Result<&mut Self> {
        self.insert(field, FieldValue::Select(option.into()))
    }

    /// Set a radio button field.
    ///
    /// # Errors
    /// Returns `ComposeError::MissingFieldIdentifier` if `field` is empty.
    pub fn radio_button(
        &mut self,
        field: impl Into<String>,
        option: impl Into<String>,
    ) -> Result<&mut Self> {
        self.insert(field, FieldValue::RadioButton(option.into()))
    }

    /// Set a multi select list.
    ///
    /// # Errors
    /// Returns `ComposeError::MissingFieldIdentifier` if `field` is empty.
    pub fn multi_select<I>(&mut self, field: impl Into<String>, options: I) -> Result<&mut Self>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.insert(field, FieldValue::MultiSelect(collect(options)))
    }

    /// Set a checkbox field.
    ///
    /// # Errors
    /// Returns `ComposeError::MissingFieldIdentifier` if `field` is empty.
    pub fn check_box<I>(&mut self, field: impl Into<String>, options: I) -> Result<&mut Self>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.insert(field, FieldValue::CheckBox(collect(options)))
    }

    /// Set a cascading select field.
    ///
    /// # Errors
    /// Returns `ComposeError::MissingFieldIdentifier` if `field` is empty.
    pub fn cascading(
        &mut self,
        field: impl Into<String>,
        parent: impl Into<String>,
        child: impl Into<String>,
    ) -> Result<&mut Self> {
        self.insert(
            field,
            FieldValue::Cascading {
                parent: parent.into(),
                child: child.into(),
            },
        )
    }

    /// Set a date picker.
    ///
    /// # Errors
    /// Returns `ComposeError::MissingFieldIdentifier` if `field` is empty.
    pub fn date(&mut self, field: impl Into<String>, date: NaiveDate) -> Result<&mut Self> {
        self.insert(field, FieldValue::Date(date))
    }

    /// Set a date-time picker.
    ///
    /// # Errors
    /// Returns `ComposeError::MissingFieldIdentifier` if `field` is empty.
    pub fn date_time(
        &mut self,
        field: impl Into<String>,
        at: DateTime<FixedOffset>,
    ) -> Result<&mut Self> {
        self.insert(field, FieldValue::DateTime(at))
    }

    /// Set a label set.
    ///
    /// # Errors
    /// Returns `ComposeError::MissingFieldIdentifier` if `field` is empty.
    pub fn labels<I>(&mut self, field: impl Into<String>, labels: I) -> Result<&mut Self>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.insert(field, FieldValue::Labels(collect(labels)))
    }

    /// Value currently set for a field identifier.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    /// Number of fields set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no field has been set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over (field identifier, value) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Encode every value, keyed by field identifier.
    ///
    /// # Errors
    /// Returns `ComposeError::FieldEncoding` naming the first field that fails.
    pub fn encode(&self) -> Result<Map<String, Value>> {
        self.values
            .iter()
            .map(|(field, value)| {
                value
                    .encode()
                    .map(|encoded| (field.clone(), encoded))
                    .map_err(|e| ComposeError::FieldEncoding {
                        field: field.clone(),
                        reason: e.to_string(),
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_encode_list_categories_keep_order() {
        let groups = FieldValue::Groups(vec![
            "jira-administrators".to_string(),
            "jira-administrators-system".to_string(),
        ]);
        assert_eq!(
            groups.encode().unwrap(),
            json!([
                {"name": "jira-administrators"},
                {"name": "jira-administrators-system"}
            ])
        );

        let users = FieldValue::Users(vec!["5b10a2844c20165700ede21g".into(), "abc".into()]);
        assert_eq!(
            users.encode().unwrap(),
            json!([{"accountId": "5b10a2844c20165700ede21g"}, {"accountId": "abc"}])
        );

        let options = FieldValue::MultiSelect(vec!["Option 2".into(), "Option 1".into()]);
        assert_eq!(
            options.encode().unwrap(),
            json!([{"value": "Option 2"}, {"value": "Option 1"}])
        );

        let labels = FieldValue::Labels(vec!["backend".into(), "api".into()]);
        assert_eq!(labels.encode().unwrap(), json!(["backend", "api"]));
    }

    #[test]
    fn test_encode_scalar_categories() {
        assert_eq!(FieldValue::Number(1000.2222).encode().unwrap(), json!(1000.2222));
        assert_eq!(FieldValue::Text("hello".into()).encode().unwrap(), json!("hello"));
        assert_eq!(
            FieldValue::Url("https://example.com".into()).encode().unwrap(),
            json!("https://example.com")
        );
        assert_eq!(
            FieldValue::Group("jira-users".into()).encode().unwrap(),
            json!({"name": "jira-users"})
        );
        assert_eq!(
            FieldValue::Select("Option 1".into()).encode().unwrap(),
            json!({"value": "Option 1"})
        );
        assert_eq!(
            FieldValue::RadioButton("Yes".into()).encode().unwrap(),
            json!({"value": "Yes"})
        );
        assert_eq!(
            FieldValue::User("acc-1".into()).encode().unwrap(),
            json!({"accountId": "acc-1"})
        );
    }

    #[test]
    fn test_encode_cascading() {
        let value = FieldValue::Cascading {
            parent: "America".into(),
            child: "Costa Rica".into(),
        };
        assert_eq!(
            value.encode().unwrap(),
            json!({"value": "America", "child": {"value": "Costa Rica"}})
        );
    }

    #[test]
    fn test_encode_dates() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(FieldValue::Date(date).encode().unwrap(), json!("2024-03-09"));

        let at = DateTime::parse_from_rfc3339("2024-03-09T14:05:07+02:00").unwrap();
        assert_eq!(
            FieldValue::DateTime(at).encode().unwrap(),
            json!("2024-03-09T14:05:07.000+0200")
        );
    }

    #[test]
    fn test_encode_is_deterministic() {
        let values = vec![
            FieldValue::Text("text".into()),
            FieldValue::Url("https://example.com".into()),
            FieldValue::Number(1000.2222),
            FieldValue::Group("jira-users".into()),
            FieldValue::Groups(vec!["a".into(), "b".into()]),
            FieldValue::User("acc-1".into()),
            FieldValue::Users(vec!["acc-1".into(), "acc-2".into()]),
            FieldValue::Select("Option 1".into()),
            FieldValue::RadioButton("Yes".into()),
            FieldValue::MultiSelect(vec!["x".into(), "y".into()]),
            FieldValue::CheckBox(vec!["a".into(), "b".into()]),
            FieldValue::Cascading {
                parent: "America".into(),
                child: "Peru".into(),
            },
            FieldValue::Date(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()),
            FieldValue::DateTime(DateTime::parse_from_rfc3339("2024-01-31T08:00:00Z").unwrap()),
            FieldValue::Labels(vec!["backend".into(), "api".into()]),
        ];

        let categories: std::collections::BTreeSet<_> =
            values.iter().map(FieldValue::category).collect();
        assert_eq!(categories.len(), 15);

        for value in &values {
            let first = value.encode().unwrap();
            let second = value.clone().encode().unwrap();
            assert_eq!(first, second, "category {}", value.category());
        }
    }

    #[test]
    fn test_non_finite_number_fails() {
        let err = FieldValue::Number(f64::NAN).encode().unwrap_err();
        assert!(matches!(err, EncodeError::NonFiniteNumber(n) if n.is_nan()));

        let err = FieldValue::Number(f64::NEG_INFINITY).encode().unwrap_err();
        assert_eq!(err, EncodeError::NonFiniteNumber(f64::NEG_INFINITY));
    }

    #[test]
    fn test_registry_rejects_empty_identifier() {
        let mut fields = CustomFields::new();
        let err = fields.text("", "value").unwrap_err();
        assert!(matches!(err, ComposeError::MissingFieldIdentifier));
        assert!(fields.is_empty());
    }

    #[test]
    fn test_registry_overwrites_duplicate() {
        let mut fields = CustomFields::new();
        fields
            .number("customfield_10042", 1.0)
            .unwrap()
            .number("customfield_10042", 2.0)
            .unwrap();

        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("customfield_10042"), Some(&FieldValue::Number(2.0)));
    }

    #[test]
    fn test_registry_encode_reports_field() {
        let mut fields = CustomFields::new();
        fields.number("customfield_1", f64::INFINITY).unwrap();

        let err = fields.encode().unwrap_err();
        match err {
            ComposeError::FieldEncoding { field, .. } => assert_eq!(field, "customfield_1"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_field_value_deserialize() {
        let value: FieldValue =
            serde_json::from_value(json!({"type": "groups", "value": ["a", "b"]})).unwrap();
        assert_eq!(value, FieldValue::Groups(vec!["a".into(), "b".into()]));

        let value: FieldValue = serde_json::from_value(json!({
            "type": "cascading",
            "value": {"parent": "America", "child": "Peru"}
        }))
        .unwrap();
        assert_eq!(value.category(), "cascading");

        let value: FieldValue =
            serde_json::from_value(json!({"type": "date", "value": "2024-01-31"})).unwrap();
        assert_eq!(
            value,
            FieldValue::Date(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap())
        );
    }
}
