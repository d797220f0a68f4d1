//! Form schema model.
//!
//! A [`FormConfig`] is authored in the CMS form builder and arrives as JSON
//! wrapped in a [`FormData`] envelope. It is read-only at render time. Field
//! order is authoring order; layout is derived from each field's
//! `visualRow` and `columnSpan`.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed set of field types a schema can use.
///
/// Unknown type strings are kept as [`FieldKind::Other`] and behave like a
/// plain text input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldKind {
    /// Single-line text.
    Text,
    /// Email address, checked against a simple `local@domain.tld` shape.
    Email,
    /// Telephone number: digits, whitespace, `-`, `+`, `(`, `)`.
    Tel,
    /// Numeric input, bounds compare the numeric value.
    Number,
    /// Multi-line text.
    Textarea,
    /// Drop-down with one selected option.
    Select,
    /// Radio group with one selected option.
    Radio,
    /// Checkbox group; its value is an option map.
    Checkbox,
    /// Date typed as plain text in `dateFormat`.
    Date,
    /// Display-only heading and text; collects nothing.
    Info,
    /// Any type string outside the known set.
    Other(String),
}

impl FieldKind {
    /// The schema spelling of this type.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Tel => "tel",
            Self::Number => "number",
            Self::Textarea => "textarea",
            Self::Select => "select",
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
            Self::Date => "date",
            Self::Info => "info",
            Self::Other(raw) => raw,
        }
    }

    /// Returns `true` for types whose controls are built from `options`.
    pub const fn uses_options(&self) -> bool {
        matches!(self, Self::Select | Self::Radio | Self::Checkbox)
    }

    /// Returns `true` for types whose length bounds count characters.
    pub const fn is_text_like(&self) -> bool {
        matches!(self, Self::Text | Self::Textarea)
    }
}

impl From<String> for FieldKind {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "text" => Self::Text,
            "email" => Self::Email,
            "tel" => Self::Tel,
            "number" => Self::Number,
            "textarea" => Self::Textarea,
            "select" => Self::Select,
            "radio" => Self::Radio,
            "checkbox" => Self::Checkbox,
            "date" => Self::Date,
            "info" => Self::Info,
            _ => Self::Other(raw),
        }
    }
}

impl From<&str> for FieldKind {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<FieldKind> for String {
    fn from(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One choice of a select, radio or checkbox field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldOption {
    /// Text shown to the user.
    pub label: String,
    /// Submitted value. For checkbox fields this becomes a payload key.
    pub value: String,
    /// Initial checked state of a checkbox option.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_checked: Option<bool>,
}

impl FieldOption {
    /// Creates an option with no default checked state.
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            default_checked: None,
        }
    }

    /// Sets the initial checked state.
    #[must_use]
    pub const fn default_checked(mut self, checked: bool) -> Self {
        self.default_checked = Some(checked);
        self
    }
}

/// Optional bounds and pattern for a field.
///
/// `min`/`max` count characters for text and textarea fields and compare the
/// numeric value for number fields. `pattern` applies to any textual value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationRules {
    /// Lower bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Upper bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Regular expression the value must match somewhere (no anchors added).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// One schema entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    /// Stable identifier, unique within a schema.
    pub id: String,
    /// The field type.
    #[serde(rename = "type")]
    pub kind: FieldKind,
    /// Optional alias used as submission key when `mapped_field` is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Column name in the receiving web service; preferred submission key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapped_field: Option<String>,
    /// Label text (heading for info fields).
    #[serde(default)]
    pub label: String,
    /// Placeholder text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Whether a value must be provided.
    #[serde(default)]
    pub required: bool,
    /// Width on a 12-column grid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_span: Option<u8>,
    /// Layout row; absent or zero means row 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_row: Option<i64>,
    /// Choices for select, radio and checkbox fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,
    /// Bounds and pattern.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationRules>,
    /// Display format hint for date fields, e.g. "MM/DD/YYYY".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
    /// Whether to show the date format under the input.
    #[serde(default)]
    pub show_date_format_helper: bool,
    /// Body text of an info field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info_text: Option<String>,
}

impl FieldSpec {
    /// Creates a field with only an id, a type and a label.
    pub fn new(id: impl Into<String>, kind: impl Into<FieldKind>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            name: None,
            mapped_field: None,
            label: label.into(),
            placeholder: None,
            required: false,
            column_span: None,
            visual_row: None,
            options: None,
            validation: None,
            date_format: None,
            show_date_format_helper: false,
            info_text: None,
        }
    }

    /// Sets the `name` alias.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the mapped web-service field.
    #[must_use]
    pub fn mapped_field(mut self, mapped: impl Into<String>) -> Self {
        self.mapped_field = Some(mapped.into());
        self
    }

    /// Sets whether the field is required.
    #[must_use]
    pub const fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets the layout row.
    #[must_use]
    pub const fn row(mut self, row: i64) -> Self {
        self.visual_row = Some(row);
        self
    }

    /// Sets the column span.
    #[must_use]
    pub const fn span(mut self, span: u8) -> Self {
        self.column_span = Some(span);
        self
    }

    /// Sets the placeholder.
    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Sets the choices.
    #[must_use]
    pub fn options(mut self, options: Vec<FieldOption>) -> Self {
        self.options = Some(options);
        self
    }

    /// Sets the validation rules.
    #[must_use]
    pub fn validation(mut self, rules: ValidationRules) -> Self {
        self.validation = Some(rules);
        self
    }

    /// Sets the info text.
    #[must_use]
    pub fn info_text(mut self, text: impl Into<String>) -> Self {
        self.info_text = Some(text.into());
        self
    }

    /// Sets the date format and whether to show it as a helper.
    #[must_use]
    pub fn date_format(mut self, format: impl Into<String>, show_helper: bool) -> Self {
        self.date_format = Some(format.into());
        self.show_date_format_helper = show_helper;
        self
    }

    /// The key under which this field's value and error are stored and
    /// submitted: `mapped_field`, else `name`, else `id`. Empty aliases are
    /// skipped.
    ///
    /// ```
    /// use cms_forms_engine::schema::FieldSpec;
    ///
    /// let field = FieldSpec::new("f1", "text", "First name").name("first");
    /// assert_eq!(field.effective_key(), "first");
    /// let field = field.mapped_field("FirstName");
    /// assert_eq!(field.effective_key(), "FirstName");
    /// ```
    pub fn effective_key(&self) -> &str {
        [self.mapped_field.as_deref(), self.name.as_deref()]
            .into_iter()
            .flatten()
            .find(|alias| !alias.is_empty())
            .unwrap_or(&self.id)
    }

    /// The layout row, treating absent and zero as row 1.
    pub fn layout_row(&self) -> i64 {
        match self.visual_row {
            Some(row) if row != 0 => row,
            _ => 1,
        }
    }

    /// Returns `true` for display-only fields.
    pub const fn is_info(&self) -> bool {
        matches!(self.kind, FieldKind::Info)
    }

    /// The options list, empty if none was authored.
    pub fn option_list(&self) -> &[FieldOption] {
        self.options.as_deref().unwrap_or(&[])
    }
}

/// Where and how a form is submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitConfig {
    /// Identifier of the receiving web service in the backend.
    #[serde(default)]
    pub web_service_id: String,
    /// Display name of the receiving web service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_service_name: Option<String>,
    /// Banner text after a successful submit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_message: Option<String>,
    /// Banner text after a failed submit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Submit button label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_text: Option<String>,
}

/// A complete form schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormConfig {
    /// Form title.
    pub name: String,
    /// Optional intro text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Fields in authoring order.
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
    /// Submission settings.
    #[serde(default)]
    pub submit_config: SubmitConfig,
    /// Authoring timestamp, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last-edit timestamp, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl FormConfig {
    /// Creates a schema with a name and fields and a default submit config.
    pub fn new(name: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields,
            submit_config: SubmitConfig::default(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Looks up a field by id.
    pub fn field(&self, id: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Reports authoring problems. Never blocks rendering or submission.
    pub fn check(&self) -> Vec<SchemaWarning> {
        let mut warnings = Vec::new();
        let mut seen_ids = HashSet::new();

        for field in &self.fields {
            if !seen_ids.insert(field.id.as_str()) {
                warnings.push(SchemaWarning::field(&field.id, "duplicate field id"));
            }
            if let Some(span) = field.column_span {
                if !(1..=12).contains(&span) {
                    warnings.push(SchemaWarning::field(
                        &field.id,
                        format!("columnSpan {span} is outside 1..=12"),
                    ));
                }
            }
            if field.kind.uses_options() && field.option_list().is_empty() {
                warnings.push(SchemaWarning::field(
                    &field.id,
                    format!("{} field has no options", field.kind),
                ));
            }
            if let FieldKind::Other(raw) = &field.kind {
                warnings.push(SchemaWarning::field(
                    &field.id,
                    format!("unknown field type '{raw}' is rendered as a text input"),
                ));
            }
            let pattern = field.validation.as_ref().and_then(|v| v.pattern.as_deref());
            if let Some(pattern) = pattern.filter(|p| !p.is_empty()) {
                if let Err(e) = crate::validation::compile_pattern(pattern) {
                    warnings.push(SchemaWarning::field(
                        &field.id,
                        format!("pattern does not compile: {e}"),
                    ));
                }
            }
        }

        let mut keys = HashSet::new();
        for field in self.fields.iter().filter(|f| !f.is_info()) {
            if !keys.insert(field.effective_key()) {
                warnings.push(SchemaWarning::field(
                    &field.id,
                    format!("submission key '{}' is shared with another field", field.effective_key()),
                ));
            }
        }

        if self.submit_config.web_service_id.is_empty() {
            warnings.push(SchemaWarning {
                field_id: None,
                message: "submitConfig.webServiceId is empty".to_string(),
            });
        }

        warnings
    }
}

/// An authoring problem found by [`FormConfig::check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaWarning {
    /// The offending field, or `None` for form-level problems.
    pub field_id: Option<String>,
    /// Description of the problem.
    pub message: String,
}

impl SchemaWarning {
    fn field(id: &str, message: impl Into<String>) -> Self {
        Self {
            field_id: Some(id.to_string()),
            message: message.into(),
        }
    }
}

impl fmt::Display for SchemaWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field_id {
            Some(id) => write!(f, "field '{id}': {}", self.message),
            None => write!(f, "form: {}", self.message),
        }
    }
}

/// The envelope the CMS stores for a form-builder entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormData {
    /// Backend identifier of the form; part of the submit URL.
    #[serde(default)]
    pub form_id: String,
    /// Editor-facing form name.
    #[serde(default)]
    pub form_name: String,
    /// Editor-facing description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_description: Option<String>,
    /// The schema itself. Absent means there is nothing to render.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_config: Option<FormConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_kind_round_trip_known() {
        let kind: FieldKind = serde_json::from_str("\"textarea\"").unwrap();
        assert_eq!(kind, FieldKind::Textarea);
        assert_eq!(serde_json::to_string(&kind).unwrap(), "\"textarea\"");
    }

    #[test]
    fn test_field_kind_unknown_kept() {
        let kind: FieldKind = serde_json::from_str("\"url\"").unwrap();
        assert_eq!(kind, FieldKind::Other("url".into()));
        assert_eq!(kind.as_str(), "url");
    }

    #[test]
    fn test_effective_key_falls_back_to_id() {
        let field = FieldSpec::new("f1", "text", "Name");
        assert_eq!(field.effective_key(), "f1");
    }

    #[test]
    fn test_effective_key_skips_empty_aliases() {
        let field = FieldSpec::new("f1", "text", "Name").mapped_field("").name("full_name");
        assert_eq!(field.effective_key(), "full_name");
        let field = FieldSpec::new("f2", "text", "Name").name("");
        assert_eq!(field.effective_key(), "f2");
    }

    #[test]
    fn test_layout_row_defaults() {
        assert_eq!(FieldSpec::new("a", "text", "A").layout_row(), 1);
        assert_eq!(FieldSpec::new("a", "text", "A").row(0).layout_row(), 1);
        assert_eq!(FieldSpec::new("a", "text", "A").row(3).layout_row(), 3);
    }

    #[test]
    fn test_deserialize_field_camel_case() {
        let field: FieldSpec = serde_json::from_value(serde_json::json!({
            "id": "dob",
            "type": "date",
            "label": "Date of birth",
            "columnSpan": 6,
            "visualRow": 2,
            "mappedField": "DOB",
            "dateFormat": "DD/MM/YYYY",
            "showDateFormatHelper": true
        }))
        .unwrap();
        assert_eq!(field.kind, FieldKind::Date);
        assert_eq!(field.column_span, Some(6));
        assert_eq!(field.effective_key(), "DOB");
        assert!(field.show_date_format_helper);
        assert!(!field.required);
    }

    #[test]
    fn test_deserialize_form_data_without_config() {
        let data: FormData = serde_json::from_value(serde_json::json!({
            "formId": "f-1",
            "formName": "Empty"
        }))
        .unwrap();
        assert!(data.form_config.is_none());
    }

    #[test]
    fn test_check_reports_problems() {
        let mut config = FormConfig::new(
            "Broken",
            vec![
                FieldSpec::new("a", "select", "A"),
                FieldSpec::new("a", "text", "Dup").span(13),
                FieldSpec::new("c", "text", "C").validation(ValidationRules {
                    pattern: Some("(".into()),
                    ..ValidationRules::default()
                }),
                FieldSpec::new("d", "color", "D"),
            ],
        );
        config.submit_config.web_service_id = "ws".into();
        let messages: Vec<String> = config.check().iter().map(ToString::to_string).collect();
        assert!(messages.iter().any(|m| m.contains("duplicate field id")));
        assert!(messages.iter().any(|m| m.contains("columnSpan 13")));
        assert!(messages.iter().any(|m| m.contains("select field has no options")));
        assert!(messages.iter().any(|m| m.contains("pattern does not compile")));
        assert!(messages.iter().any(|m| m.contains("unknown field type 'color'")));
        assert!(messages.iter().any(|m| m.contains("submission key 'a'")));
    }

    #[test]
    fn test_check_clean_schema() {
        let mut config = FormConfig::new(
            "Contact",
            vec![
                FieldSpec::new("name", "text", "Name").span(6),
                FieldSpec::new("pw", "text", "Password").validation(ValidationRules {
                    pattern: Some(r"^(?=.*\d)(?!.*\s).{8,}$".into()),
                    ..ValidationRules::default()
                }),
                FieldSpec::new("intro", "info", "About"),
            ],
        );
        config.submit_config.web_service_id = "ws".into();
        assert!(config.check().is_empty());
    }

    #[test]
    fn test_check_missing_web_service() {
        let config = FormConfig::new("Contact", vec![]);
        let warnings = config.check();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].to_string(), "form: submitConfig.webServiceId is empty");
    }
}
