//! Field validation.
//!
//! Rules run in a fixed order and the first failure wins:
//!
//! 1. required: a missing or blank value on a required field
//! 2. format: email and tel shape, for any non-blank value
//! 3. bounds: `min`/`max` from the field's validation rules
//! 4. pattern: the field's regular expression
//!
//! A blank optional value is always valid. Info fields are never validated.
//! Validation is a pure function of `(field, value)`.

use std::sync::OnceLock;

use regex::Regex;

use cms_forms_core::error::ValidationErrors;

use crate::schema::{FieldKind, FieldSpec, ValidationRules};
use crate::value::{is_missing, FieldValue, FormValues};

/// Message for a malformed email address.
pub const INVALID_EMAIL: &str = "Please enter a valid email address";
/// Message for a malformed phone number.
pub const INVALID_PHONE: &str = "Please enter a valid phone number";
/// Message for a pattern mismatch.
pub const INVALID_FORMAT: &str = "Invalid format";

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex compiles"))
}

fn phone_regex() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(r"^[0-9\s\-+()]+$").expect("phone regex compiles"))
}

/// Validates one value against its field, returning the first failing
/// rule's message.
///
/// ```
/// use cms_forms_engine::schema::FieldSpec;
/// use cms_forms_engine::validation::validate_field;
/// use cms_forms_engine::value::FieldValue;
///
/// let field = FieldSpec::new("email", "email", "Email").required(true);
/// assert_eq!(validate_field(&field, None).as_deref(), Some("Email is required"));
/// assert_eq!(validate_field(&field, Some(&FieldValue::text("user@example.com"))), None);
/// ```
pub fn validate_field(field: &FieldSpec, value: Option<&FieldValue>) -> Option<String> {
    if field.is_info() {
        return None;
    }

    if field.required && is_missing(value) {
        return Some(format!("{} is required", field.label));
    }

    // Rules beyond "required" only look at entered text.
    let text = value.and_then(FieldValue::as_text).filter(|s| !s.is_empty())?;

    if let Some(message) = check_format(&field.kind, text) {
        return Some(message.to_string());
    }

    let rules = field.validation.as_ref()?;
    check_bounds(&field.kind, rules, text).or_else(|| check_pattern(field, rules, text))
}

/// Validates every non-info field against `values`.
///
/// The result is a fresh error map keyed by effective field key.
pub fn validate_fields(fields: &[FieldSpec], values: &FormValues) -> ValidationErrors {
    fields
        .iter()
        .filter(|field| !field.is_info())
        .filter_map(|field| {
            let key = field.effective_key();
            validate_field(field, values.get(key)).map(|message| (key.to_string(), message))
        })
        .collect()
}

fn check_format(kind: &FieldKind, text: &str) -> Option<&'static str> {
    match kind {
        FieldKind::Email if !email_regex().is_match(text) => Some(INVALID_EMAIL),
        FieldKind::Tel if !phone_regex().is_match(text) => Some(INVALID_PHONE),
        _ => None,
    }
}

fn check_bounds(kind: &FieldKind, rules: &ValidationRules, text: &str) -> Option<String> {
    if kind.is_text_like() {
        // Lengths count UTF-16 code units, as browsers report them.
        #[allow(clippy::cast_precision_loss)]
        let length = text.encode_utf16().count() as f64;
        if let Some(min) = rules.min.filter(|min| length < *min) {
            return Some(format!("Minimum {} characters required", format_bound(min)));
        }
        if let Some(max) = rules.max.filter(|max| length > *max) {
            return Some(format!("Maximum {} characters allowed", format_bound(max)));
        }
    } else if matches!(kind, FieldKind::Number) {
        // NaN never compares below min or above max, so unparsable input
        // passes both bounds.
        let number = coerce_number(text);
        if let Some(min) = rules.min.filter(|min| number < *min) {
            return Some(format!("Minimum value is {}", format_bound(min)));
        }
        if let Some(max) = rules.max.filter(|max| number > *max) {
            return Some(format!("Maximum value is {}", format_bound(max)));
        }
    }
    None
}

/// Compiles an author-supplied pattern.
///
/// Patterns are written for browser regular expressions, so lookaround and
/// backreferences must be accepted alongside the usual syntax.
pub fn compile_pattern(pattern: &str) -> Result<fancy_regex::Regex, fancy_regex::Error> {
    fancy_regex::Regex::new(pattern)
}

fn check_pattern(field: &FieldSpec, rules: &ValidationRules, text: &str) -> Option<String> {
    let pattern = rules.pattern.as_deref().filter(|p| !p.is_empty())?;
    let matched = compile_pattern(pattern).and_then(|re| re.is_match(text));
    match matched {
        Ok(true) => None,
        Ok(false) => Some(INVALID_FORMAT.to_string()),
        Err(e) => {
            tracing::warn!(field = %field.id, error = %e, "validation pattern failed");
            Some(INVALID_FORMAT.to_string())
        }
    }
}

/// Converts entered text to a number the way a browser's `Number()` does.
///
/// Surrounding whitespace is ignored, the empty string is zero, `Infinity`
/// and `0x`/`0o`/`0b` prefixes are understood, and anything else that is not
/// a plain decimal literal is NaN.
pub fn coerce_number(raw: &str) -> f64 {
    let s = raw.trim();
    if s.is_empty() {
        return 0.0;
    }
    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    let radix = match s.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        #[allow(clippy::cast_precision_loss)]
        return u64::from_str_radix(&s[2..], radix).map_or(f64::NAN, |n| n as f64);
    }

    let decimal_literal = s
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
    if decimal_literal {
        s.parse::<f64>().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}

/// Formats a bound the way it is written in the schema: `5`, not `5.0`.
fn format_bound(bound: f64) -> String {
    if bound.is_finite() && bound.fract() == 0.0 && bound.abs() < 1e15 {
        #[allow(clippy::cast_possible_truncation)]
        let whole = bound as i64;
        whole.to_string()
    } else {
        bound.to_string()
    }
}
