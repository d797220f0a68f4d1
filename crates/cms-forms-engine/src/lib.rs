//! # cms-forms-engine
//!
//! Interprets CMS-authored form schemas. Provides the schema model, per-field
//! values, row layout, field validation, checkbox payload expansion, the
//! [`FormEngine`] submission state machine and HTML rendering of a form.
//!
//! The network side of a submission is delegated to a [`FormSubmitter`]
//! implementation (see the `cms-forms-client` crate for the HTTP one).
//!
//! ## Quick Start
//!
//! ```
//! use cms_forms_engine::{FieldValue, FormEngine};
//!
//! let data = serde_json::json!({
//!     "formId": "contact",
//!     "formName": "Contact",
//!     "formConfig": {
//!         "name": "Contact us",
//!         "fields": [
//!             {"id": "email", "type": "email", "label": "Email", "required": true,
//!              "columnSpan": 12, "visualRow": 1}
//!         ],
//!         "submitConfig": {"webServiceId": "ws-1"}
//!     }
//! });
//! let engine = FormEngine::from_form_data(serde_json::from_value(data).unwrap()).unwrap();
//! assert_eq!(engine.validate().get("email"), Some("Email is required"));
//!
//! engine.set_field_value("email", FieldValue::text("a@b.co")).unwrap();
//! assert!(engine.validate().is_empty());
//! ```

pub mod engine;
pub mod layout;
pub mod payload;
pub mod render;
pub mod schema;
pub mod state;
pub mod submitter;
pub mod validation;
pub mod value;
pub mod widgets;

pub use engine::FormEngine;
pub use layout::{group_rows, LayoutRow};
pub use payload::{build_payload, Payload};
pub use render::{render_form, BoundField};
pub use schema::{
    FieldKind, FieldOption, FieldSpec, FormConfig, FormData, SchemaWarning, SubmitConfig,
    ValidationRules,
};
pub use state::{FormState, SubmissionPhase};
pub use submitter::{FormSubmitter, InMemorySubmitter};
pub use validation::{validate_field, validate_fields};
pub use value::{FieldValue, FormValues, OptionMap};
