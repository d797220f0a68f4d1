//! The `submit` command.
//!
//! Validates a values file against a form, expands the payload and posts it
//! to the configured backend. The resulting phase is printed either way.

use async_trait::async_trait;
use cms_forms_client::BackendClient;
use cms_forms_core::{FormsError, Settings};
use cms_forms_engine::render::banner;

use super::validate::missing;
use super::{form_arg, path_arg, values_arg};
use crate::command::ManagementCommand;
use crate::input::{apply_values, load_form};

/// Submits values for a form to the backend.
pub struct SubmitCommand;

#[async_trait]
impl ManagementCommand for SubmitCommand {
    fn name(&self) -> &'static str {
        "submit"
    }

    fn help(&self) -> &'static str {
        "Validate and submit field values to the form backend"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(form_arg()).arg(values_arg().required(true))
    }

    async fn handle(
        &self,
        matches: &clap::ArgMatches,
        settings: &Settings,
    ) -> Result<(), FormsError> {
        let form = path_arg(matches, "form").ok_or_else(|| missing("FORM"))?;
        let values = path_arg(matches, "values").ok_or_else(|| missing("VALUES"))?;

        let engine = load_form(form)?;
        apply_values(&engine, values)?;
        let client = BackendClient::new(settings.clone())?;

        let result = engine.handle_submit(&client).await;
        let phase = engine.phase();
        println!("phase: {phase}");
        if let Some((_, message)) = banner(phase, &engine.config().submit_config) {
            println!("{message}");
        }

        match result {
            Ok(reply) => {
                if !reply.is_null() {
                    println!("{}", serde_json::to_string_pretty(&reply)?);
                }
                Ok(())
            }
            Err(FormsError::Validation(errors)) => {
                for (key, message) in errors.iter() {
                    println!("{key}: {message}");
                }
                Err(FormsError::Validation(errors))
            }
            Err(e) => Err(e),
        }
    }
}
