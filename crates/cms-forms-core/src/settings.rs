//! Runtime configuration for form submission.
//!
//! [`Settings`] locates the form backend and controls logging. Values come
//! from defaults, then a TOML or JSON file, then environment variables (see
//! [`settings_loader`](crate::settings_loader)).

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Base URL of the form backend used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "https://web-production-e8736.up.railway.app";

/// The complete set of runtime settings.
///
/// # Examples
///
/// ```
/// use cms_forms_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(settings.debug);
/// assert_eq!(settings.log_level, "info");
/// assert!(settings.request_timeout().is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the form backend (no trailing path).
    pub api_url: String,
    /// Whether debug mode is enabled. Selects human-readable log output.
    pub debug: bool,
    /// Tracing filter directive, e.g. "info" or `cms_forms_engine=debug`.
    pub log_level: String,
    /// Optional per-request timeout. Requests run to completion when unset.
    pub request_timeout_secs: Option<u64>,
    /// Value of the `User-Agent` header sent to the backend.
    pub user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            debug: true,
            log_level: "info".to_string(),
            request_timeout_secs: None,
            user_agent: concat!("cms-forms/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Settings {
    /// Joins `path` onto [`Settings::api_url`] with exactly one slash between them.
    ///
    /// ```
    /// use cms_forms_core::settings::Settings;
    ///
    /// let settings = Settings {
    ///     api_url: "http://localhost:8000/".into(),
    ///     ..Settings::default()
    /// };
    /// assert_eq!(settings.api_endpoint("/health"), "http://localhost:8000/health");
    /// ```
    pub fn api_endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// The configured request timeout, if any.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
