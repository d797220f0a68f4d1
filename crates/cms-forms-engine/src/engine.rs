//! The form engine.
//!
//! A [`FormEngine`] owns one rendered instance of a form: the read-only
//! schema plus mutable [`FormState`]. Value updates clear the field's error
//! without re-validating; [`FormEngine::handle_submit`] validates every
//! field, builds the payload and drives the [`SubmissionPhase`] machine.
//!
//! The engine is `Sync` and all methods take `&self`, so one instance can be
//! shared between the task handling input events and the task submitting.
//! At most one submission runs at a time; a second call made while one is
//! in flight fails with [`FormsError::SubmissionInFlight`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::Instrument;

use cms_forms_core::error::{FormsError, FormsResult, ValidationErrors};
use cms_forms_core::logging::submission_span;

use crate::layout::{group_rows, LayoutRow};
use crate::payload::{build_payload, Payload};
use crate::schema::{FieldKind, FieldSpec, FormConfig, FormData};
use crate::state::{FormState, SubmissionPhase};
use crate::submitter::FormSubmitter;
use crate::validation::validate_fields;
use crate::value::{FieldValue, FormValues, OptionMap};

/// One live form: schema, values, errors and submission phase.
#[derive(Debug)]
pub struct FormEngine {
    form_id: String,
    config: FormConfig,
    state: Mutex<FormState>,
    in_flight: AtomicBool,
}

impl FormEngine {
    /// Creates an engine for `form_id`.
    ///
    /// Returns [`FormsError::SchemaMissing`] if the id is empty or the
    /// configuration is absent; callers treat that as "render nothing".
    pub fn new(form_id: impl Into<String>, config: Option<FormConfig>) -> FormsResult<Self> {
        let form_id = form_id.into();
        let config = match config {
            Some(config) if !form_id.is_empty() => config,
            _ => return Err(FormsError::SchemaMissing),
        };
        for warning in config.check() {
            tracing::debug!(form_id = %form_id, %warning, "form schema warning");
        }
        Ok(Self {
            form_id,
            config,
            state: Mutex::new(FormState::default()),
            in_flight: AtomicBool::new(false),
        })
    }

    /// Creates an engine from the envelope stored in the CMS.
    pub fn from_form_data(data: FormData) -> FormsResult<Self> {
        Self::new(data.form_id, data.form_config)
    }

    fn state(&self) -> MutexGuard<'_, FormState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The backend id of this form.
    pub fn form_id(&self) -> &str {
        &self.form_id
    }

    /// The schema.
    pub const fn config(&self) -> &FormConfig {
        &self.config
    }

    /// The schema's fields grouped into layout rows.
    pub fn rows(&self) -> Vec<LayoutRow<'_>> {
        group_rows(&self.config.fields)
    }

    /// Looks up a field by id.
    pub fn field(&self, field_id: &str) -> Option<&FieldSpec> {
        self.config.field(field_id)
    }

    fn input_field(&self, field_id: &str) -> FormsResult<&FieldSpec> {
        let field = self
            .field(field_id)
            .ok_or_else(|| FormsError::InvalidSchema(format!("unknown field '{field_id}'")))?;
        if field.is_info() {
            return Err(FormsError::InvalidSchema(format!(
                "field '{field_id}' is display-only"
            )));
        }
        Ok(field)
    }

    /// Stores `value` under the field's effective key and clears that key's
    /// error, if any. The value is not validated.
    ///
    /// For a checkbox group `value` must be the complete option map; use
    /// [`FormEngine::set_option`] to change a single option.
    pub fn set_field_value(&self, field_id: &str, value: FieldValue) -> FormsResult<()> {
        let key = self.input_field(field_id)?.effective_key().to_string();
        let mut state = self.state();
        state.values.insert(key.clone(), value);
        if state.errors.remove(&key).is_some() {
            tracing::trace!(form_id = %self.form_id, key = %key, "cleared field error on edit");
        }
        Ok(())
    }

    /// Returns the field's current option map with `option` set to `checked`.
    ///
    /// Options never toggled stay absent so that their `defaultChecked`
    /// still applies at submit time.
    pub fn merged_options(&self, field_id: &str, option: &str, checked: bool) -> FormsResult<OptionMap> {
        let field = self.input_field(field_id)?;
        if field.kind != FieldKind::Checkbox {
            return Err(FormsError::InvalidSchema(format!(
                "field '{field_id}' is not a checkbox group"
            )));
        }
        let mut map = self
            .state()
            .values
            .get(field.effective_key())
            .and_then(FieldValue::as_options)
            .cloned()
            .unwrap_or_default();
        map.insert(option.to_string(), checked);
        Ok(map)
    }

    /// Toggles one checkbox option by merging it into the current option
    /// map and storing the whole map.
    pub fn set_option(&self, field_id: &str, option: &str, checked: bool) -> FormsResult<()> {
        let merged = self.merged_options(field_id, option, checked)?;
        self.set_field_value(field_id, FieldValue::Options(merged))
    }

    /// The current value stored under `key`.
    pub fn value(&self, key: &str) -> Option<FieldValue> {
        self.state().values.get(key).cloned()
    }

    /// A copy of all current values.
    pub fn values(&self) -> FormValues {
        self.state().values.clone()
    }

    /// The current error for `key`.
    pub fn error(&self, key: &str) -> Option<String> {
        self.state().errors.get(key).map(String::from)
    }

    /// A copy of all current errors.
    pub fn errors(&self) -> ValidationErrors {
        self.state().errors.clone()
    }

    /// The current submission phase.
    pub fn phase(&self) -> SubmissionPhase {
        self.state().phase
    }

    /// Returns `true` while a submission is in flight.
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// A copy of the whole state.
    pub fn snapshot(&self) -> FormState {
        self.state().clone()
    }

    /// Validates the current values without touching the stored errors.
    pub fn validate(&self) -> ValidationErrors {
        validate_fields(&self.config.fields, &self.state().values)
    }

    /// Validates the current values and replaces the stored errors with the
    /// result, as a blocked submit would. The phase is not touched.
    pub fn validate_all(&self) -> ValidationErrors {
        let mut state = self.state();
        state.errors = validate_fields(&self.config.fields, &state.values);
        state.errors.clone()
    }

    /// The payload the current values would submit.
    pub fn payload(&self) -> Payload {
        build_payload(&self.config, &self.state().values)
    }

    /// Clears values and errors and returns to [`SubmissionPhase::Idle`].
    pub fn reset(&self) {
        *self.state() = FormState::default();
    }

    /// Validates, builds the payload and submits it.
    ///
    /// - Any invalid field: the error map is replaced by the fresh one, the
    ///   phase is left unchanged, nothing is sent, and
    ///   [`FormsError::Validation`] is returned.
    /// - Otherwise the phase becomes [`SubmissionPhase::Submitting`] and the
    ///   payload goes to `submitter`. Success clears all values and sets
    ///   [`SubmissionPhase::Success`]; a rate-limit failure sets
    ///   [`SubmissionPhase::RateLimited`]; any other failure sets
    ///   [`SubmissionPhase::Error`].
    ///
    /// The phase leaves `Submitting` on every exit path, including a panic
    /// in the submitter or the returned future being dropped.
    pub async fn handle_submit<S>(&self, submitter: &S) -> FormsResult<serde_json::Value>
    where
        S: FormSubmitter + ?Sized,
    {
        let _in_flight = InFlightGuard::acquire(self).ok_or(FormsError::SubmissionInFlight)?;

        let payload = {
            let mut state = self.state();
            let errors = validate_fields(&self.config.fields, &state.values);
            if !errors.is_empty() {
                tracing::debug!(
                    form_id = %self.form_id,
                    invalid_fields = errors.len(),
                    "submit blocked by validation"
                );
                state.errors = errors.clone();
                return Err(FormsError::Validation(errors));
            }
            state.errors.clear();
            state.phase = SubmissionPhase::Submitting;
            build_payload(&self.config, &state.values)
        };

        let span = submission_span(&self.form_id);
        tracing::info!(parent: &span, fields = payload.len(), "submitting form");
        let result = submitter
            .submit(&self.form_id, &payload)
            .instrument(span.clone())
            .await;

        let mut state = self.state();
        match result {
            Ok(reply) => {
                state.phase = SubmissionPhase::Success;
                state.values.clear();
                tracing::info!(parent: &span, "form submitted");
                Ok(reply)
            }
            Err(error) => {
                state.phase = if error.is_rate_limited() {
                    SubmissionPhase::RateLimited
                } else {
                    SubmissionPhase::Error
                };
                tracing::warn!(parent: &span, %error, phase = %state.phase, "form submission failed");
                Err(error.into())
            }
        }
    }
}

/// Holds the single submission slot of an engine.
///
/// Dropping the guard frees the slot and, if no outcome was recorded,
/// moves the phase from `Submitting` to `Error`.
struct InFlightGuard<'a> {
    engine: &'a FormEngine,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(engine: &'a FormEngine) -> Option<Self> {
        engine
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { engine })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        {
            let mut state = self.engine.state();
            if state.phase == SubmissionPhase::Submitting {
                tracing::error!(form_id = %self.engine.form_id, "submission ended without an outcome");
                state.phase = SubmissionPhase::Error;
            }
        }
        self.engine.in_flight.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldOption;
    use crate::submitter::InMemorySubmitter;
    use cms_forms_core::error::SubmissionError;

    fn contact_engine() -> FormEngine {
        let config = FormConfig::new(
            "Contact",
            vec![
                FieldSpec::new("name", "text", "Name").required(true),
                FieldSpec::new("email", "email", "Email").mapped_field("Email"),
                FieldSpec::new("intro", "info", "Hello").info_text("Tell us about you"),
                FieldSpec::new("prefs", "checkbox", "Prefs").options(vec![
                    FieldOption::new("A", "a"),
                    FieldOption::new("B", "b").default_checked(true),
                ]),
            ],
        );
        FormEngine::new("contact", Some(config)).unwrap()
    }

    #[test]
    fn test_missing_schema() {
        assert!(matches!(
            FormEngine::new("x", None),
            Err(FormsError::SchemaMissing)
        ));
        assert!(matches!(
            FormEngine::new("", Some(FormConfig::new("F", vec![]))),
            Err(FormsError::SchemaMissing)
        ));
    }

    #[test]
    fn test_set_value_uses_effective_key() {
        let engine = contact_engine();
        engine.set_field_value("email", FieldValue::text("a@b.co")).unwrap();
        assert_eq!(engine.value("Email"), Some(FieldValue::text("a@b.co")));
        assert_eq!(engine.value("email"), None);
    }

    #[test]
    fn test_set_value_rejects_unknown_and_info() {
        let engine = contact_engine();
        assert!(engine.set_field_value("nope", FieldValue::text("x")).is_err());
        assert!(engine.set_field_value("intro", FieldValue::text("x")).is_err());
        assert!(engine.values().is_empty());
    }

    #[test]
    fn test_set_option_merges() {
        let engine = contact_engine();
        engine.set_option("prefs", "a", true).unwrap();
        engine.set_option("prefs", "b", false).unwrap();
        assert_eq!(
            engine.value("prefs"),
            Some(FieldValue::options([("a", true), ("b", false)]))
        );
        assert!(engine.set_option("name", "a", true).is_err());
    }

    #[tokio::test]
    async fn test_edit_clears_error_without_revalidating() {
        let engine = contact_engine();
        let submitter = InMemorySubmitter::new();
        let err = engine.handle_submit(&submitter).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(engine.error("name").as_deref(), Some("Name is required"));

        // Still invalid (empty), but the error is cleared until next submit.
        engine.set_field_value("name", FieldValue::text("")).unwrap();
        assert_eq!(engine.error("name"), None);
        assert!(submitter.sent().is_empty());
        assert_eq!(engine.phase(), SubmissionPhase::Idle);
    }

    #[tokio::test]
    async fn test_submit_success_resets_values() {
        let engine = contact_engine();
        engine.set_field_value("name", FieldValue::text("Ada")).unwrap();
        let submitter = InMemorySubmitter::new();
        engine.handle_submit(&submitter).await.unwrap();

        assert_eq!(engine.phase(), SubmissionPhase::Success);
        assert!(engine.values().is_empty());
        assert!(!engine.is_submitting());
        let sent = submitter.sent();
        assert_eq!(sent[0].0, "contact");
        assert_eq!(
            serde_json::Value::Object(sent[0].1.clone()),
            serde_json::json!({"name": "Ada", "a": false, "b": true})
        );
    }

    #[tokio::test]
    async fn test_submit_failure_phases() {
        let engine = contact_engine();
        let submitter = InMemorySubmitter::new()
            .then(Err(SubmissionError::from_response(400, "Too many requests")))
            .then(Err(SubmissionError::from_response(500, "boom")));

        engine.set_field_value("name", FieldValue::text("Ada")).unwrap();
        let err = engine.handle_submit(&submitter).await.unwrap_err();
        assert!(err.is_rate_limited());
        assert_eq!(engine.phase(), SubmissionPhase::RateLimited);
        // Values survive a failed submission.
        assert_eq!(engine.value("name"), Some(FieldValue::text("Ada")));

        engine.handle_submit(&submitter).await.unwrap_err();
        assert_eq!(engine.phase(), SubmissionPhase::Error);
    }

    #[tokio::test]
    async fn test_validation_failure_keeps_previous_phase() {
        let engine = contact_engine();
        let submitter = InMemorySubmitter::new().then(Err(SubmissionError::Transport {
            message: "offline".into(),
        }));
        engine.set_field_value("name", FieldValue::text("Ada")).unwrap();
        engine.handle_submit(&submitter).await.unwrap_err();
        assert_eq!(engine.phase(), SubmissionPhase::Error);

        engine.set_field_value("name", FieldValue::text("")).unwrap();
        engine.handle_submit(&submitter).await.unwrap_err();
        assert_eq!(engine.phase(), SubmissionPhase::Error);
        assert_eq!(submitter.sent().len(), 1);
    }

    #[test]
    fn test_validate_all_stores_errors() {
        let engine = contact_engine();
        assert!(engine.errors().is_empty());
        let errors = engine.validate_all();
        assert_eq!(errors.get("name"), Some("Name is required"));
        assert_eq!(engine.errors(), errors);
        assert_eq!(engine.phase(), SubmissionPhase::Idle);
    }

    #[test]
    fn test_reset() {
        let engine = contact_engine();
        engine.set_field_value("name", FieldValue::text("Ada")).unwrap();
        engine.reset();
        assert_eq!(engine.snapshot(), FormState::default());
    }
}
