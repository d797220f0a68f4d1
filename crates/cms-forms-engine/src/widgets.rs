//! Widgets: HTML controls for form fields.
//!
//! Each [`FieldKind`] maps to exactly one widget through [`create_widget`].
//! Widgets render a control from a [`RenderContext`] holding the field, its
//! effective key, its current value and its current error. Labels, error
//! messages and layout are added by [`render`](crate::render).

use std::fmt;

use crate::schema::{FieldKind, FieldSpec};
use crate::value::FieldValue;

/// Placeholder shown by date inputs that have no `dateFormat`.
pub const DEFAULT_DATE_FORMAT: &str = "MM/DD/YYYY";

/// Rows of a textarea.
const TEXTAREA_ROWS: u8 = 4;

/// Enumerates the built-in widgets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetType {
    /// `<div class="info-text">` with no input.
    InfoText,
    /// `<textarea>`.
    Textarea,
    /// `<select>` with a blank first option.
    Select,
    /// A set of `<input type="radio">` elements.
    RadioGroup,
    /// A set of `<input type="checkbox">` elements, one per option.
    CheckboxGroup,
    /// `<input type="text">` with a date-format placeholder.
    DateInput,
    /// `<input>` whose `type` is the field type.
    Input,
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InfoText => "InfoText",
            Self::Textarea => "Textarea",
            Self::Select => "Select",
            Self::RadioGroup => "RadioGroup",
            Self::CheckboxGroup => "CheckboxGroup",
            Self::DateInput => "DateInput",
            Self::Input => "Input",
        };
        write!(f, "{name}")
    }
}

/// Everything a widget needs to render one field.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// The field definition.
    pub field: &'a FieldSpec,
    /// The field's effective key, used as the HTML `name`.
    pub key: &'a str,
    /// The field's current value.
    pub value: Option<&'a FieldValue>,
    /// The field's current error.
    pub error: Option<&'a str>,
}

impl<'a> RenderContext<'a> {
    /// The current value as text; empty for absent or option-map values.
    pub fn text(&self) -> &'a str {
        self.value.and_then(FieldValue::as_text).unwrap_or("")
    }

    /// Whether checkbox option `option` is shown checked: the recorded
    /// choice, else its `defaultChecked`, else unchecked.
    pub fn option_checked(&self, option: &str, default_checked: Option<bool>) -> bool {
        self.value
            .and_then(FieldValue::as_options)
            .and_then(|map| map.get(option).copied())
            .or(default_checked)
            .unwrap_or(false)
    }
}

/// A trait for HTML form widgets.
pub trait Widget: Send + Sync + fmt::Debug {
    /// Returns the widget type enum variant.
    fn widget_type(&self) -> WidgetType;

    /// Renders the control as an HTML string.
    fn render(&self, ctx: &RenderContext<'_>) -> String;
}

/// Creates the widget for a field type.
pub fn create_widget(kind: &FieldKind) -> Box<dyn Widget> {
    match kind {
        FieldKind::Info => Box::new(InfoText),
        FieldKind::Textarea => Box::new(Textarea),
        FieldKind::Select => Box::new(Select),
        FieldKind::Radio => Box::new(RadioGroup),
        FieldKind::Checkbox => Box::new(CheckboxGroup),
        FieldKind::Date => Box::new(DateInput),
        FieldKind::Text | FieldKind::Email | FieldKind::Tel | FieldKind::Number => Box::new(Input {
            input_type: kind.as_str().to_string(),
        }),
        FieldKind::Other(raw) => Box::new(Input {
            input_type: raw.clone(),
        }),
    }
}

/// Escapes text for use in HTML content and attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// HTML attributes in output order. `None` marks a boolean attribute.
type Attrs = Vec<(&'static str, Option<String>)>;

/// Formats attributes as ` key="value"` pairs in order.
fn render_attrs(attrs: &Attrs) -> String {
    attrs
        .iter()
        .map(|(name, value)| match value {
            Some(v) => format!(r#" {name}="{}""#, escape_html(v)),
            None => format!(" {name}"),
        })
        .collect()
}

/// The attributes shared by single-element controls.
fn common_attrs(ctx: &RenderContext<'_>) -> Attrs {
    let mut attrs: Attrs = vec![
        ("id", Some(ctx.field.id.clone())),
        ("name", Some(ctx.key.to_string())),
    ];
    if ctx.field.required {
        attrs.push(("required", None));
    }
    if let Some(placeholder) = &ctx.field.placeholder {
        attrs.push(("placeholder", Some(placeholder.clone())));
    }
    let class = if ctx.error.is_some() {
        "form-input error"
    } else {
        "form-input"
    };
    attrs.push(("class", Some(class.to_string())));
    attrs.push(("aria-invalid", Some(ctx.error.is_some().to_string())));
    if ctx.error.is_some() {
        attrs.push(("aria-describedby", Some(format!("{}-error", ctx.field.id))));
    }
    attrs
}

// ---------------------------------------------------------------------------
// Built-in widgets
// ---------------------------------------------------------------------------

/// Display-only text of an info field.
#[derive(Debug, Clone)]
pub struct InfoText;

impl Widget for InfoText {
    fn widget_type(&self) -> WidgetType {
        WidgetType::InfoText
    }

    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let text = ctx.field.info_text.as_deref().unwrap_or("");
        format!(r#"<div class="info-text">{}</div>"#, escape_html(text))
    }
}

/// A multi-line `<textarea>`.
#[derive(Debug, Clone)]
pub struct Textarea;

impl Widget for Textarea {
    fn widget_type(&self) -> WidgetType {
        WidgetType::Textarea
    }

    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let mut attrs = common_attrs(ctx);
        attrs.push(("rows", Some(TEXTAREA_ROWS.to_string())));
        format!(
            "<textarea{}>{}</textarea>",
            render_attrs(&attrs),
            escape_html(ctx.text())
        )
    }
}

/// A `<select>` with a blank "-- Select --" first option.
#[derive(Debug, Clone)]
pub struct Select;

impl Widget for Select {
    fn widget_type(&self) -> WidgetType {
        WidgetType::Select
    }

    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let current = ctx.text();
        let mut html = format!(
            r#"<select{}><option value="">-- Select --</option>"#,
            render_attrs(&common_attrs(ctx))
        );
        for option in ctx.field.option_list() {
            let selected = if option.value == current { " selected" } else { "" };
            html.push_str(&format!(
                r#"<option value="{}"{selected}>{}</option>"#,
                escape_html(&option.value),
                escape_html(&option.label)
            ));
        }
        html.push_str("</select>");
        html
    }
}

/// One `<input type="radio">` per option, sharing the field's key as name.
#[derive(Debug, Clone)]
pub struct RadioGroup;

impl Widget for RadioGroup {
    fn widget_type(&self) -> WidgetType {
        WidgetType::RadioGroup
    }

    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let current = ctx.text();
        let mut html = String::from(r#"<div class="radio-group">"#);
        for option in ctx.field.option_list() {
            let mut attrs: Attrs = vec![
                ("type", Some("radio".to_string())),
                ("name", Some(ctx.key.to_string())),
                ("value", Some(option.value.clone())),
            ];
            if option.value == current {
                attrs.push(("checked", None));
            }
            if ctx.field.required {
                attrs.push(("required", None));
            }
            html.push_str(&format!(
                r#"<label class="radio-label"><input{} /><span>{}</span></label>"#,
                render_attrs(&attrs),
                escape_html(&option.label)
            ));
        }
        html.push_str("</div>");
        html
    }
}

/// One `<input type="checkbox">` per option, named `{key}.{option}`.
#[derive(Debug, Clone)]
pub struct CheckboxGroup;

impl Widget for CheckboxGroup {
    fn widget_type(&self) -> WidgetType {
        WidgetType::CheckboxGroup
    }

    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let mut html = String::from(r#"<div class="checkbox-group">"#);
        for option in ctx.field.option_list() {
            let mut attrs: Attrs = vec![
                ("type", Some("checkbox".to_string())),
                ("name", Some(format!("{}.{}", ctx.key, option.value))),
            ];
            if ctx.option_checked(&option.value, option.default_checked) {
                attrs.push(("checked", None));
            }
            html.push_str(&format!(
                r#"<label class="checkbox-label"><input{} /><span>{}</span></label>"#,
                render_attrs(&attrs),
                escape_html(&option.label)
            ));
        }
        html.push_str("</div>");
        html
    }
}

/// A text input for dates, with the expected format as placeholder and an
/// optional helper line.
#[derive(Debug, Clone)]
pub struct DateInput;

impl Widget for DateInput {
    fn widget_type(&self) -> WidgetType {
        WidgetType::DateInput
    }

    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let format = ctx.field.date_format.as_deref();
        let mut attrs = common_attrs(ctx);
        attrs.retain(|(name, _)| *name != "placeholder");
        attrs.push(("type", Some("text".to_string())));
        attrs.push(("value", Some(ctx.text().to_string())));
        attrs.push((
            "placeholder",
            Some(format.unwrap_or(DEFAULT_DATE_FORMAT).to_string()),
        ));

        let helper = match format {
            Some(format) if ctx.field.show_date_format_helper => format!(
                r#"<span class="field-helper">Format: {}</span>"#,
                escape_html(format)
            ),
            _ => String::new(),
        };
        format!("<div><input{} />{helper}</div>", render_attrs(&attrs))
    }
}

/// A single `<input>` typed after the field: text, email, tel, number, or
/// an unrecognized type string.
#[derive(Debug, Clone)]
pub struct Input {
    /// The `type` attribute.
    pub input_type: String,
}

impl Widget for Input {
    fn widget_type(&self) -> WidgetType {
        WidgetType::Input
    }

    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let mut attrs = common_attrs(ctx);
        attrs.push(("type", Some(self.input_type.clone())));
        attrs.push(("value", Some(ctx.text().to_string())));
        format!("<input{} />", render_attrs(&attrs))
    }
}
