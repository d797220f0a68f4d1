//! # cms-forms-client
//!
//! HTTP access to the form backend. [`BackendClient`] implements the
//! engine's [`FormSubmitter`](cms_forms_engine::FormSubmitter) seam and
//! also exposes the backend's health check and web-service proxy.
//!
//! Backend endpoints:
//!
//! | Method | Path | Purpose |
//! |---|---|---|
//! | `POST` | `/api/forms/{formId}/submit` | store a submission |
//! | `GET` | `/health` | liveness check |
//! | `GET` | `/api/web-services/{webServiceId}/fetch` | proxied web-service data |

pub mod client;
pub mod responses;

pub use client::BackendClient;
pub use responses::HealthStatus;
