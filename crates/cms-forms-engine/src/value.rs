//! Field values.
//!
//! Every field type stores a plain string except checkbox groups, which
//! store an [`OptionMap`] from option value to checked state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Checked state per checkbox option value.
pub type OptionMap = BTreeMap<String, bool>;

/// Current values keyed by effective field key.
pub type FormValues = BTreeMap<String, FieldValue>;

/// The value of one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Raw text entered or selected.
    Text(String),
    /// The whole option map of a checkbox group.
    Options(OptionMap),
}

impl FieldValue {
    /// Shorthand for [`FieldValue::Text`].
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Builds an option map value from `(option, checked)` pairs.
    pub fn options<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, bool)>,
        K: Into<String>,
    {
        Self::Options(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// The text, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Options(_) => None,
        }
    }

    /// The option map, if this is an option map value.
    pub const fn as_options(&self) -> Option<&OptionMap> {
        match self {
            Self::Options(map) => Some(map),
            Self::Text(_) => None,
        }
    }

    /// Whether this value counts as "nothing entered".
    ///
    /// Only the empty string is blank; an option map always counts as
    /// provided, even when empty or all unchecked.
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }

    /// Converts to the JSON sent to the backend.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Text(s) => serde_json::Value::String(s.clone()),
            Self::Options(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::Bool(*v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<OptionMap> for FieldValue {
    fn from(map: OptionMap) -> Self {
        Self::Options(map)
    }
}

/// Returns `true` if `value` is absent or blank.
pub fn is_missing(value: Option<&FieldValue>) -> bool {
    value.map_or(true, FieldValue::is_blank)
}
