//! Response bodies returned by the form backend.

use serde::{Deserialize, Serialize};

/// Body of `GET /health`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthStatus {
    /// Reported status, usually "ok".
    pub status: String,
    /// Server time of the check.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Error body of a failed backend call. Either key may be used.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
    pub message: Option<String>,
}

impl ErrorBody {
    /// The `error` text, ignoring empty strings.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref().filter(|s| !s.is_empty())
    }

    /// The `error` text, else the `message` text.
    pub fn error_or_message(&self) -> Option<&str> {
        self.error()
            .or_else(|| self.message.as_deref().filter(|s| !s.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_precedence() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"error": "", "message": "Service missing"}"#).unwrap();
        assert_eq!(body.error(), None);
        assert_eq!(body.error_or_message(), Some("Service missing"));
    }

    #[test]
    fn test_health_status_tolerates_missing_keys() {
        let status: HealthStatus = serde_json::from_str(r#"{"status": "ok"}"#).unwrap();
        assert_eq!(status.status, "ok");
        assert!(status.timestamp.is_none());
    }
}
