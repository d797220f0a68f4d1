//! The backend HTTP client.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::StatusCode;

use cms_forms_core::error::{FormsError, FormsResult, SubmissionError};
use cms_forms_core::settings::Settings;
use cms_forms_engine::{FormSubmitter, Payload};

use crate::responses::{ErrorBody, HealthStatus};

/// Characters escaped when an id is placed in a URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Error text when a failed submission's body is not JSON.
const SUBMISSION_FAILED: &str = "Submission failed";
/// Error text when a failed submission's body has no `error`.
const FAILED_TO_SUBMIT: &str = "Failed to submit form";
/// Error text when a failed web-service fetch explains nothing.
const FETCH_FAILED: &str = "Failed to fetch web service data";
/// Error text when the backend cannot be reached.
const UNREACHABLE: &str = "Unable to connect to the server. Please check your connection.";

/// Client for the form backend.
///
/// # Examples
///
/// ```rust,no_run
/// use cms_forms_client::BackendClient;
/// use cms_forms_core::Settings;
///
/// # async fn run() -> cms_forms_core::FormsResult<()> {
/// let client = BackendClient::new(Settings::default())?;
/// let health = client.check_health().await?;
/// println!("backend is {}", health.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    settings: Settings,
}

impl BackendClient {
    /// Creates a client for the backend at `settings.api_url`.
    pub fn new(settings: Settings) -> FormsResult<Self> {
        let mut builder = reqwest::Client::builder().user_agent(settings.user_agent.clone());
        if let Some(timeout) = settings.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| FormsError::ConfigurationError(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { http, settings })
    }

    /// The settings this client was built from.
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    fn endpoint(&self, path: &str) -> String {
        self.settings.api_endpoint(path)
    }

    /// Posts `payload` to `/api/forms/{form_id}/submit`.
    ///
    /// A 2xx answer yields its JSON body (`null` when empty). Any other
    /// status is classified by [`SubmissionError::from_response`] using the
    /// body's `error` text.
    pub async fn submit_form(
        &self,
        form_id: &str,
        payload: &Payload,
    ) -> Result<serde_json::Value, SubmissionError> {
        let url = self.endpoint(&format!("api/forms/{}/submit", encode_segment(form_id)));
        tracing::debug!(%url, "posting form submission");

        let response = self
            .http
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(%url, error = %e, "form submission request failed");
                SubmissionError::Transport {
                    message: e.to_string(),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorBody>().await {
                Ok(body) => body.error().unwrap_or(FAILED_TO_SUBMIT).to_string(),
                Err(_) => SUBMISSION_FAILED.to_string(),
            };
            tracing::warn!(%url, status = status.as_u16(), %message, "form submission rejected");
            return Err(SubmissionError::from_response(status.as_u16(), message));
        }

        let body = response.bytes().await.map_err(|e| SubmissionError::Transport {
            message: e.to_string(),
        })?;
        if body.is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_slice(&body).map_err(|e| SubmissionError::InvalidResponse {
            message: e.to_string(),
        })
    }

    /// Calls `GET /health`.
    pub async fn check_health(&self) -> FormsResult<HealthStatus> {
        let url = self.endpoint("health");
        let response = self.http.get(&url).send().await.map_err(|e| {
            tracing::error!(%url, error = %e, "health check request failed");
            FormsError::Backend(UNREACHABLE.to_string())
        })?;
        if !response.status().is_success() {
            tracing::warn!(%url, status = response.status().as_u16(), "health check failed");
            return Err(FormsError::Backend("API health check failed".to_string()));
        }
        response
            .json::<HealthStatus>()
            .await
            .map_err(|e| FormsError::Backend(format!("Invalid health check response: {e}")))
    }

    /// Fetches data from a web service through the backend proxy,
    /// `GET /api/web-services/{web_service_id}/fetch`.
    ///
    /// Failures carry a message meant for end users: 404, 400 and 5xx get
    /// fixed wording, other statuses use the backend's own explanation.
    pub async fn fetch_web_service_data(&self, web_service_id: &str) -> FormsResult<serde_json::Value> {
        if web_service_id.is_empty() {
            return Err(FormsError::Backend("Web service ID is required".to_string()));
        }
        let url = self.endpoint(&format!(
            "api/web-services/{}/fetch",
            encode_segment(web_service_id)
        ));

        let response = self.http.get(&url).send().await.map_err(|e| {
            tracing::error!(%url, error = %e, "web service fetch request failed");
            FormsError::Backend(UNREACHABLE.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let detail = match response.json::<ErrorBody>().await {
                Ok(body) => body.error_or_message().unwrap_or(FETCH_FAILED).to_string(),
                Err(_) => status
                    .canonical_reason()
                    .map_or_else(|| format!("HTTP {}", status.as_u16()), String::from),
            };
            let message = fetch_failure_message(status, detail);
            tracing::warn!(%url, status = status.as_u16(), %message, "web service fetch failed");
            return Err(FormsError::Backend(message));
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| FormsError::Backend(format!("Invalid web service response: {e}")))
    }
}

#[async_trait]
impl FormSubmitter for BackendClient {
    async fn submit(
        &self,
        form_id: &str,
        payload: &Payload,
    ) -> Result<serde_json::Value, SubmissionError> {
        self.submit_form(form_id, payload).await
    }
}

fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

/// Replaces the backend's detail with fixed wording for common statuses.
fn fetch_failure_message(status: StatusCode, detail: String) -> String {
    match status {
        StatusCode::NOT_FOUND => {
            "Web service not found. Please check your configuration.".to_string()
        }
        StatusCode::BAD_REQUEST => "Invalid web service configuration.".to_string(),
        s if s.is_server_error() => {
            "Service temporarily unavailable. Please try again later.".to_string()
        }
        _ => detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_segment() {
        assert_eq!(encode_segment("contact-us_2"), "contact-us_2");
        assert_eq!(encode_segment("a/b c"), "a%2Fb%20c");
    }

    #[test]
    fn test_fetch_failure_message() {
        assert_eq!(
            fetch_failure_message(StatusCode::NOT_FOUND, "x".into()),
            "Web service not found. Please check your configuration."
        );
        assert_eq!(
            fetch_failure_message(StatusCode::BAD_GATEWAY, "x".into()),
            "Service temporarily unavailable. Please try again later."
        );
        assert_eq!(
            fetch_failure_message(StatusCode::UNAUTHORIZED, "Missing key".into()),
            "Missing key"
        );
    }

    #[test]
    fn test_new_with_timeout() {
        let client = BackendClient::new(Settings {
            request_timeout_secs: Some(3),
            ..Settings::default()
        })
        .unwrap();
        assert_eq!(client.settings().request_timeout_secs, Some(3));
    }
}
