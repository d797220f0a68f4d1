//! The `fetch` command.

use async_trait::async_trait;
use cms_forms_client::BackendClient;
use cms_forms_core::{FormsError, Settings};

use super::validate::missing;
use crate::command::ManagementCommand;

/// Fetches web-service data through the backend proxy and prints it.
pub struct FetchCommand;

#[async_trait]
impl ManagementCommand for FetchCommand {
    fn name(&self) -> &'static str {
        "fetch"
    }

    fn help(&self) -> &'static str {
        "Fetch data from a configured web service"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("web_service_id")
                .value_name("WEB_SERVICE_ID")
                .required(true)
                .help("Backend id of the web service"),
        )
    }

    async fn handle(
        &self,
        matches: &clap::ArgMatches,
        settings: &Settings,
    ) -> Result<(), FormsError> {
        let id = matches
            .get_one::<String>("web_service_id")
            .ok_or_else(|| missing("WEB_SERVICE_ID"))?;
        let client = BackendClient::new(settings.clone())?;
        let data = client.fetch_web_service_data(id).await?;
        println!("{}", serde_json::to_string_pretty(&data)?);
        Ok(())
    }
}
