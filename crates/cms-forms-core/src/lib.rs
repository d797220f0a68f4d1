//! # cms-forms-core
//!
//! Foundation types for the cms-forms crates. This crate has no dependency on
//! the other workspace members.
//!
//! ## Modules
//!
//! - [`error`] - Error taxonomy, submission failure kinds and result aliases
//! - [`settings`] - Backend location and runtime configuration
//! - [`settings_loader`] - Loading settings from TOML, JSON and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{FormsError, FormsResult, SubmissionError, ValidationErrors};
pub use settings::Settings;
