//! Reading form schemas and field values from JSON files.

use std::path::Path;

use cms_forms_core::{FormsError, FormsResult};
use cms_forms_engine::{FieldValue, FormConfig, FormData, FormEngine};

/// Loads a form from `path`.
///
/// The file is either the CMS envelope (`formId` plus `formConfig`) or a
/// bare form configuration, in which case the file stem is used as form id.
pub fn load_form(path: &Path) -> FormsResult<FormEngine> {
    let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(path)?)?;

    let data = if raw.get("formConfig").is_some() || raw.get("formId").is_some() {
        serde_json::from_value::<FormData>(raw)?
    } else {
        let config: FormConfig = serde_json::from_value(raw)?;
        FormData {
            form_id: path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            form_name: config.name.clone(),
            form_description: config.description.clone(),
            form_config: Some(config),
        }
    };
    tracing::debug!(path = %path.display(), form_id = %data.form_id, "loaded form");
    FormEngine::from_form_data(data)
}

/// Reads a values file: a JSON object keyed by field id.
///
/// Strings are taken as-is, numbers and booleans are stringified, and
/// objects of booleans become checkbox option maps.
pub fn load_values(path: &Path) -> FormsResult<Vec<(String, FieldValue)>> {
    let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(path)?)?;
    let serde_json::Value::Object(entries) = raw else {
        return Err(FormsError::InvalidSchema(format!(
            "{}: values must be a JSON object keyed by field id",
            path.display()
        )));
    };

    entries
        .into_iter()
        .map(|(field_id, value)| {
            let value = field_value(&field_id, value)?;
            Ok((field_id, value))
        })
        .collect()
}

fn field_value(field_id: &str, value: serde_json::Value) -> FormsResult<FieldValue> {
    use serde_json::Value;

    match value {
        Value::String(s) => Ok(FieldValue::Text(s)),
        Value::Number(n) => Ok(FieldValue::Text(n.to_string())),
        Value::Bool(b) => Ok(FieldValue::Text(b.to_string())),
        Value::Null => Ok(FieldValue::Text(String::new())),
        Value::Object(map) => map
            .into_iter()
            .map(|(option, checked)| match checked {
                Value::Bool(b) => Ok((option, b)),
                other => Err(FormsError::InvalidSchema(format!(
                    "{field_id}.{option}: expected true or false, got {other}"
                ))),
            })
            .collect::<FormsResult<Vec<_>>>()
            .map(FieldValue::options),
        Value::Array(_) => Err(FormsError::InvalidSchema(format!(
            "{field_id}: arrays are not valid field values"
        ))),
    }
}

/// Loads `path` and stores every value into `engine`.
pub fn apply_values(engine: &FormEngine, path: &Path) -> FormsResult<()> {
    for (field_id, value) in load_values(path)? {
        engine.set_field_value(&field_id, value)?;
    }
    Ok(())
}
