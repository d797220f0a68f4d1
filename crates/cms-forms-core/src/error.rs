//! Error types for the cms-forms crates.
//!
//! [`FormsError`] covers every failure category a form can hit between
//! loading its schema and receiving the backend's answer. Field validation
//! failures are carried as [`ValidationErrors`]; failures of the submission
//! collaborator are carried as the structured [`SubmissionError`] so callers
//! never have to inspect message text to tell a rate limit from a rejection.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Marker the backend puts in its `error` string when it throttles a client.
pub const RATE_LIMIT_MARKER: &str = "Too many";

/// Per-field validation messages keyed by effective field key.
///
/// Presence of a key means the field is currently invalid. Iteration is in
/// key order so that rendered output and logs are deterministic.
///
/// # Examples
///
/// ```
/// use cms_forms_core::error::ValidationErrors;
///
/// let mut errors = ValidationErrors::new();
/// errors.insert("email", "Please enter a valid email address");
/// assert!(errors.contains("email"));
/// assert_eq!(errors.to_string(), "email: Please enter a valid email address");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    messages: BTreeMap<String, String>,
}

impl ValidationErrors {
    /// Creates an empty error map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` for `key`, replacing any previous message.
    pub fn insert(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.messages.insert(key.into(), message.into());
    }

    /// Removes the message for `key`, returning it if one was present.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.messages.remove(key)
    }

    /// Returns the message recorded for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.messages.get(key).map(String::as_str)
    }

    /// Returns `true` if `key` currently has an error.
    pub fn contains(&self, key: &str) -> bool {
        self.messages.contains_key(key)
    }

    /// Returns `true` if no field has an error.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Returns the number of errored fields.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Drops every message.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Iterates `(key, message)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.messages.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, message) in &self.messages {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{key}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            messages: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Why the submission collaborator did not accept a payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    /// The backend is throttling this client.
    #[error("Rate limited: {message}")]
    RateLimited {
        /// The backend's explanation.
        message: String,
    },

    /// The backend answered with a non-success status.
    #[error("Rejected with status {status}: {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// The backend's `error` text, or a generic fallback.
        message: String,
    },

    /// The request never produced a response.
    #[error("Transport failure: {message}")]
    Transport {
        /// Description of the connection or I/O failure.
        message: String,
    },

    /// A success response whose body could not be read.
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// Description of the decoding failure.
        message: String,
    },
}

impl SubmissionError {
    /// Classifies a non-success backend response.
    ///
    /// A response is a rate limit exactly when the backend's message carries
    /// [`RATE_LIMIT_MARKER`]. The status code plays no part, so a 429 with
    /// any other message is an ordinary rejection.
    ///
    /// ```
    /// use cms_forms_core::error::SubmissionError;
    ///
    /// let err = SubmissionError::from_response(400, "Too many requests");
    /// assert!(err.is_rate_limited());
    /// let err = SubmissionError::from_response(429, "Slow down");
    /// assert!(!err.is_rate_limited());
    /// ```
    pub fn from_response(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        if message.contains(RATE_LIMIT_MARKER) {
            Self::RateLimited { message }
        } else {
            Self::Rejected { status, message }
        }
    }

    /// Returns `true` for [`SubmissionError::RateLimited`].
    pub const fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    /// The human-readable detail carried by this error.
    pub fn message(&self) -> &str {
        match self {
            Self::RateLimited { message }
            | Self::Rejected { message, .. }
            | Self::Transport { message }
            | Self::InvalidResponse { message } => message,
        }
    }
}

/// The primary error type for the cms-forms crates.
#[derive(Error, Debug)]
pub enum FormsError {
    // ── Schema ───────────────────────────────────────────────────────

    /// The form id or form configuration is absent. Callers render nothing.
    #[error("Form schema is missing")]
    SchemaMissing,

    /// The schema could not be interpreted.
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    // ── Validation ───────────────────────────────────────────────────

    /// One or more fields failed validation; nothing was sent.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    // ── Submission ───────────────────────────────────────────────────

    /// A submit was attempted while another one is still in flight.
    #[error("A submission is already in progress")]
    SubmissionInFlight,

    /// The submission collaborator failed.
    #[error("Submission failed: {0}")]
    Submission(#[from] SubmissionError),

    /// An auxiliary backend request (health check, web-service fetch) failed.
    #[error("{0}")]
    Backend(String),

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ── Serialization ────────────────────────────────────────────────

    /// JSON could not be parsed or produced.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FormsError {
    /// Returns `true` if the failure is the user's to fix locally.
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns `true` if the backend throttled the submission.
    pub const fn is_rate_limited(&self) -> bool {
        matches!(self, Self::Submission(SubmissionError::RateLimited { .. }))
    }
}

/// A convenience type alias for `Result<T, FormsError>`.
pub type FormsResult<T> = Result<T, FormsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_display_sorted() {
        let mut errors = ValidationErrors::new();
        errors.insert("phone", "Please enter a valid phone number");
        errors.insert("email", "Email is required");
        assert_eq!(
            errors.to_string(),
            "email: Email is required; phone: Please enter a valid phone number"
        );
    }

    #[test]
    fn test_validation_errors_remove() {
        let mut errors: ValidationErrors = [("name", "Name is required")].into_iter().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.remove("name").as_deref(), Some("Name is required"));
        assert!(errors.is_empty());
        assert!(errors.remove("name").is_none());
    }

    #[test]
    fn test_from_response_status_alone_is_not_rate_limit() {
        let err = SubmissionError::from_response(429, "Slow down");
        assert_eq!(
            err,
            SubmissionError::Rejected {
                status: 429,
                message: "Slow down".into()
            }
        );
        assert!(!err.is_rate_limited());
    }

    #[test]
    fn test_from_response_rate_limit_by_marker() {
        let err = SubmissionError::from_response(400, "Too many submissions from this IP");
        assert!(err.is_rate_limited());
    }

    #[test]
    fn test_from_response_marker_is_case_sensitive() {
        let err = SubmissionError::from_response(400, "too many requests");
        assert_eq!(
            err,
            SubmissionError::Rejected {
                status: 400,
                message: "too many requests".into()
            }
        );
    }

    #[test]
    fn test_forms_error_display() {
        let err = FormsError::from(SubmissionError::Transport {
            message: "connection refused".into(),
        });
        assert_eq!(
            err.to_string(),
            "Submission failed: Transport failure: connection refused"
        );
        assert!(!err.is_rate_limited());
    }

    #[test]
    fn test_forms_error_rate_limited() {
        let err = FormsError::from(SubmissionError::from_response(429, "Too many requests"));
        assert!(err.is_rate_limited());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: FormsError = io_err.into();
        assert!(err.to_string().contains("file missing"));
    }
}
