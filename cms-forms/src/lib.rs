//! # cms-forms
//!
//! Renders, validates and submits forms whose schema is authored in a
//! headless CMS.
//!
//! This is the meta-crate that re-exports the sub-crates. Depend on
//! `cms-forms` for everything, or on individual crates for finer-grained
//! control. The HTTP client and the CLI sit behind the `client` and `cli`
//! features, both on by default.
//!
//! ```
//! use cms_forms::prelude::*;
//!
//! # async fn demo() -> FormsResult<()> {
//! let config = FormConfig::new(
//!     "Newsletter",
//!     vec![FieldSpec::new("email", "email", "Email").required(true)],
//! );
//! let engine = FormEngine::new("newsletter", Some(config))?;
//! engine.set_field_value("email", FieldValue::text("ada@example.com"))?;
//!
//! let submitter = InMemorySubmitter::new();
//! engine.handle_submit(&submitter).await?;
//! assert_eq!(engine.phase(), SubmissionPhase::Success);
//! # Ok(())
//! # }
//! ```

/// Error types, settings and logging setup.
pub use cms_forms_core as core;

/// Schema model, validation, payloads, submission state and rendering.
pub use cms_forms_engine as engine;

/// HTTP client for the form backend.
#[cfg(feature = "client")]
pub use cms_forms_client as client;

/// The `cms-forms` command-line tool.
#[cfg(feature = "cli")]
pub use cms_forms_cli as cli;

// Third-party re-exports
pub use serde_json;
pub use tracing;

/// Commonly used types in one import.
pub mod prelude {
    pub use cms_forms_core::{FormsError, FormsResult, Settings, SubmissionError, ValidationErrors};
    pub use cms_forms_engine::{
        render_form, FieldKind, FieldOption, FieldSpec, FieldValue, FormConfig, FormData,
        FormEngine, FormSubmitter, InMemorySubmitter, SubmissionPhase, ValidationRules,
    };

    #[cfg(feature = "client")]
    pub use cms_forms_client::BackendClient;
}
