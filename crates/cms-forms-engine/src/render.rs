//! Bound fields and whole-form rendering.
//!
//! A [`BoundField`] pairs a field definition with its current value, error
//! and widget. [`render_form`] lays bound fields out in rows and adds the
//! header, the outcome banner and the submit button.

use crate::engine::FormEngine;
use crate::schema::{FieldSpec, SubmitConfig};
use crate::state::{FormState, SubmissionPhase};
use crate::value::FieldValue;
use crate::widgets::{create_widget, escape_html, RenderContext, Widget};

/// Banner shown after a successful submission without a configured message.
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Form submitted successfully!";
/// Banner shown after a failed submission without a configured message.
pub const DEFAULT_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";
/// Banner shown after a rate-limited submission.
pub const RATE_LIMIT_MESSAGE: &str =
    "Too many form submissions. Please wait a few minutes before trying again.";
/// Submit button label without a configured one.
pub const DEFAULT_BUTTON_TEXT: &str = "Submit";
/// Submit button label while a submission is in flight.
pub const SUBMITTING_BUTTON_TEXT: &str = "Submitting...";

/// A form field bound to its current value and error.
pub struct BoundField<'a> {
    /// The field definition.
    pub field: &'a FieldSpec,
    /// The effective key.
    pub key: &'a str,
    /// The current value.
    pub value: Option<&'a FieldValue>,
    /// The current error.
    pub error: Option<&'a str>,
    /// The widget used for rendering.
    pub widget: Box<dyn Widget>,
}

impl<'a> BoundField<'a> {
    /// Binds `field` to `state`.
    pub fn new(field: &'a FieldSpec, state: &'a FormState) -> Self {
        let key = field.effective_key();
        Self {
            field,
            key,
            value: state.values.get(key),
            error: state.errors.get(key),
            widget: create_widget(&field.kind),
        }
    }

    const fn context(&self) -> RenderContext<'a> {
        RenderContext {
            field: self.field,
            key: self.key,
            value: self.value,
            error: self.error,
        }
    }

    /// Renders the control.
    pub fn render(&self) -> String {
        self.widget.render(&self.context())
    }

    /// Renders the label: a heading for info fields, otherwise a `<label>`
    /// with a required marker. Empty labels render nothing.
    pub fn label_tag(&self) -> String {
        let label = &self.field.label;
        if label.is_empty() {
            return String::new();
        }
        if self.field.is_info() {
            return format!(r#"<h3 class="form-heading">{}</h3>"#, escape_html(label));
        }
        let marker = if self.field.required {
            r#"<span class="required">*</span>"#
        } else {
            ""
        };
        format!(
            r#"<label for="{}" class="field-label">{}{marker}</label>"#,
            escape_html(&self.field.id),
            escape_html(label)
        )
    }

    /// Renders the inline error, or nothing when the field is valid.
    pub fn error_tag(&self) -> String {
        self.error.map_or_else(String::new, |message| {
            format!(
                r#"<span id="{}-error" class="field-error" role="alert">{}</span>"#,
                escape_html(&self.field.id),
                escape_html(message)
            )
        })
    }

    /// Renders the grid cell: label, control and error.
    pub fn render_cell(&self) -> String {
        let style = self
            .field
            .column_span
            .map(|span| format!(r#" style="grid-column: span {span}""#))
            .unwrap_or_default();
        format!(
            r#"<div class="form-field"{style}>{}{}{}</div>"#,
            self.label_tag(),
            self.render(),
            self.error_tag()
        )
    }
}

/// The banner for `phase`, as `(css class, message)`.
pub fn banner(phase: SubmissionPhase, submit: &SubmitConfig) -> Option<(&'static str, &str)> {
    match phase {
        SubmissionPhase::Success => Some((
            "alert alert-success",
            submit
                .success_message
                .as_deref()
                .filter(|m| !m.is_empty())
                .unwrap_or(DEFAULT_SUCCESS_MESSAGE),
        )),
        SubmissionPhase::Error => Some((
            "alert alert-error",
            submit
                .error_message
                .as_deref()
                .filter(|m| !m.is_empty())
                .unwrap_or(DEFAULT_ERROR_MESSAGE),
        )),
        SubmissionPhase::RateLimited => Some(("alert alert-error", RATE_LIMIT_MESSAGE)),
        SubmissionPhase::Idle | SubmissionPhase::Submitting => None,
    }
}

fn button_text(phase: SubmissionPhase, submit: &SubmitConfig) -> &str {
    if phase == SubmissionPhase::Submitting {
        SUBMITTING_BUTTON_TEXT
    } else {
        submit
            .button_text
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_BUTTON_TEXT)
    }
}

/// Renders the whole form from the engine's current state.
pub fn render_form(engine: &FormEngine) -> String {
    let state = engine.snapshot();
    let config = engine.config();
    let mut html = String::from(r#"<div class="dynamic-form-container"><div class="form-header">"#);
    html.push_str(&format!("<h2>{}</h2>", escape_html(&config.name)));
    if let Some(description) = config.description.as_deref().filter(|d| !d.is_empty()) {
        html.push_str(&format!("<p>{}</p>", escape_html(description)));
    }
    html.push_str("</div>");

    html.push_str(&format!(
        r#"<form class="dynamic-form" data-form-id="{}">"#,
        escape_html(engine.form_id())
    ));
    for row in engine.rows() {
        html.push_str(&format!(r#"<div class="form-row" data-row="{}">"#, row.row));
        for field in row.fields {
            html.push_str(&BoundField::new(field, &state).render_cell());
        }
        html.push_str("</div>");
    }

    if let Some((class, message)) = banner(state.phase, &config.submit_config) {
        html.push_str(&format!(
            r#"<div class="{class}" role="alert">{}</div>"#,
            escape_html(message)
        ));
    }

    let disabled = if state.phase == SubmissionPhase::Submitting {
        " disabled"
    } else {
        ""
    };
    html.push_str(&format!(
        r#"<div class="form-actions"><button type="submit" class="submit-button"{disabled}>{}</button></div>"#,
        escape_html(button_text(state.phase, &config.submit_config))
    ));
    html.push_str("</form></div>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FormConfig;

    #[test]
    fn test_label_tag_required_marker() {
        let field = FieldSpec::new("n", "text", "Name").required(true);
        let state = FormState::default();
        let bound = BoundField::new(&field, &state);
        assert_eq!(
            bound.label_tag(),
            r#"<label for="n" class="field-label">Name<span class="required">*</span></label>"#
        );
    }

    #[test]
    fn test_label_tag_info_heading() {
        let field = FieldSpec::new("i", "info", "About you");
        let state = FormState::default();
        assert_eq!(
            BoundField::new(&field, &state).label_tag(),
            r#"<h3 class="form-heading">About you</h3>"#
        );
    }

    #[test]
    fn test_empty_label_renders_nothing() {
        let field = FieldSpec::new("n", "text", "");
        let state = FormState::default();
        assert_eq!(BoundField::new(&field, &state).label_tag(), "");
    }

    #[test]
    fn test_error_tag_uses_effective_key() {
        let field = FieldSpec::new("f9", "text", "Name").name("full_name");
        let mut state = FormState::default();
        state.errors.insert("full_name", "Name is required");
        let bound = BoundField::new(&field, &state);
        assert_eq!(
            bound.error_tag(),
            r#"<span id="f9-error" class="field-error" role="alert">Name is required</span>"#
        );
        assert!(bound.render_cell().contains(r#"aria-describedby="f9-error""#));
    }

    #[test]
    fn test_cell_span_style() {
        let field = FieldSpec::new("n", "text", "Name").span(6);
        let state = FormState::default();
        assert!(BoundField::new(&field, &state)
            .render_cell()
            .starts_with(r#"<div class="form-field" style="grid-column: span 6">"#));
    }

    #[test]
    fn test_banner_messages() {
        let mut submit = SubmitConfig::default();
        assert_eq!(banner(SubmissionPhase::Idle, &submit), None);
        assert_eq!(
            banner(SubmissionPhase::Success, &submit),
            Some(("alert alert-success", DEFAULT_SUCCESS_MESSAGE))
        );
        submit.error_message = Some("Nope".into());
        assert_eq!(
            banner(SubmissionPhase::Error, &submit),
            Some(("alert alert-error", "Nope"))
        );
        assert_eq!(
            banner(SubmissionPhase::RateLimited, &submit).map(|b| b.1),
            Some(RATE_LIMIT_MESSAGE)
        );
    }

    #[test]
    fn test_render_form_rows_and_button() {
        let mut config = FormConfig::new(
            "Contact <us>",
            vec![
                FieldSpec::new("b", "text", "B").row(2),
                FieldSpec::new("a", "text", "A").row(1),
            ],
        );
        config.description = Some("We reply fast".into());
        config.submit_config.button_text = Some("Send".into());
        let engine = FormEngine::new("contact", Some(config)).unwrap();
        let html = render_form(&engine);

        assert!(html.contains("<h2>Contact &lt;us&gt;</h2><p>We reply fast</p>"));
        let a = html.find(r#"id="a""#).unwrap();
        let b = html.find(r#"id="b""#).unwrap();
        assert!(a < b);
        assert!(html.contains(r#"<button type="submit" class="submit-button">Send</button>"#));
        assert!(!html.contains("role=\"alert\""));
    }
}
