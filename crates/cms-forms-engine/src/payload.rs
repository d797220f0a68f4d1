//! Submission payload construction.
//!
//! The payload starts as a copy of every current value. Each checkbox field
//! that has options is then flattened: every option becomes a top-level
//! boolean keyed by the option value, and then the field's own key is
//! dropped. Fields are processed in schema order.

use crate::schema::{FieldKind, FormConfig};
use crate::value::FormValues;

/// The flattened JSON object sent to the backend.
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// Builds the submission payload for `config` from `values`.
///
/// An option's state is the user's choice if one was recorded, else its
/// `defaultChecked`, else `false`. Checkbox fields without options pass
/// through unchanged.
///
/// ```
/// use cms_forms_engine::payload::build_payload;
/// use cms_forms_engine::schema::{FieldOption, FieldSpec, FormConfig};
/// use cms_forms_engine::value::FormValues;
///
/// let config = FormConfig::new("Prefs", vec![
///     FieldSpec::new("prefs", "checkbox", "Prefs").options(vec![
///         FieldOption::new("A", "a"),
///         FieldOption::new("B", "b").default_checked(true),
///     ]),
/// ]);
/// let payload = build_payload(&config, &FormValues::new());
/// assert_eq!(serde_json::Value::Object(payload), serde_json::json!({"a": false, "b": true}));
/// ```
pub fn build_payload(config: &FormConfig, values: &FormValues) -> Payload {
    let mut payload: Payload = values
        .iter()
        .map(|(key, value)| (key.clone(), value.to_json()))
        .collect();

    for field in &config.fields {
        if field.kind != FieldKind::Checkbox {
            continue;
        }
        let Some(options) = field.options.as_deref() else {
            continue;
        };

        let key = field.effective_key();
        let chosen = values.get(key).and_then(|v| v.as_options());

        for option in options {
            let checked = chosen
                .and_then(|map| map.get(&option.value).copied())
                .or(option.default_checked)
                .unwrap_or(false);
            payload.insert(option.value.clone(), serde_json::Value::Bool(checked));
        }
        // Removed last, so an option sharing the field's key is dropped too.
        payload.remove(key);
    }

    payload
}
