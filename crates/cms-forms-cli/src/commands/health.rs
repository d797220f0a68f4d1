//! The `health` command.

use async_trait::async_trait;
use cms_forms_client::BackendClient;
use cms_forms_core::{FormsError, Settings};

use crate::command::ManagementCommand;

/// Calls the backend's health endpoint.
pub struct HealthCommand;

#[async_trait]
impl ManagementCommand for HealthCommand {
    fn name(&self) -> &'static str {
        "health"
    }

    fn help(&self) -> &'static str {
        "Check that the form backend is reachable"
    }

    async fn handle(
        &self,
        _matches: &clap::ArgMatches,
        settings: &Settings,
    ) -> Result<(), FormsError> {
        let client = BackendClient::new(settings.clone())?;
        let health = client.check_health().await?;
        match &health.timestamp {
            Some(ts) => println!("{} ({}) at {ts}", health.status, settings.api_url),
            None => println!("{} ({})", health.status, settings.api_url),
        }
        Ok(())
    }
}
