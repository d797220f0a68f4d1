//! The submission collaborator seam.
//!
//! [`FormSubmitter`] sends a finished payload somewhere and reports a
//! structured [`SubmissionError`] on failure. The HTTP implementation lives
//! in `cms-forms-client`; [`InMemorySubmitter`] records payloads for tests
//! and dry runs.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use cms_forms_core::error::SubmissionError;

use crate::payload::Payload;

/// Delivers submission payloads to a backend.
///
/// Implementations must be `Send + Sync` so one submitter can serve many
/// forms across tasks.
#[async_trait]
pub trait FormSubmitter: Send + Sync {
    /// Submits `payload` for `form_id`, returning the backend's JSON reply.
    async fn submit(
        &self,
        form_id: &str,
        payload: &Payload,
    ) -> Result<serde_json::Value, SubmissionError>;
}

/// A submitter that records every payload and replays scripted outcomes.
///
/// Each call pops the next scripted result; once the script is exhausted
/// every call succeeds with `{"success": true}`.
#[derive(Debug, Default)]
pub struct InMemorySubmitter {
    sent: Mutex<Vec<(String, Payload)>>,
    script: Mutex<VecDeque<Result<serde_json::Value, SubmissionError>>>,
}

impl InMemorySubmitter {
    /// Creates a submitter that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the outcome of a future call.
    #[must_use]
    pub fn then(self, outcome: Result<serde_json::Value, SubmissionError>) -> Self {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(outcome);
        self
    }

    /// Returns every `(form_id, payload)` received so far.
    pub fn sent(&self) -> Vec<(String, Payload)> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl FormSubmitter for InMemorySubmitter {
    async fn submit(
        &self,
        form_id: &str,
        payload: &Payload,
    ) -> Result<serde_json::Value, SubmissionError> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((form_id.to_string(), payload.clone()));
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| Ok(serde_json::json!({"success": true})))
    }
}
