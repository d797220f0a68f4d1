//! The `validate` command.
//!
//! Applies a values file to a form and runs submit-time validation without
//! contacting the backend. Prints the errors, or the payload that would be
//! sent.

use async_trait::async_trait;
use cms_forms_core::{FormsError, Settings};

use super::{form_arg, path_arg, values_arg};
use crate::command::ManagementCommand;
use crate::input::{apply_values, load_form};

/// Validates values against a form schema.
pub struct ValidateCommand;

#[async_trait]
impl ManagementCommand for ValidateCommand {
    fn name(&self) -> &'static str {
        "validate"
    }

    fn help(&self) -> &'static str {
        "Validate field values and print errors or the submission payload"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(form_arg()).arg(values_arg().required(true))
    }

    async fn handle(
        &self,
        matches: &clap::ArgMatches,
        _settings: &Settings,
    ) -> Result<(), FormsError> {
        let form = path_arg(matches, "form").ok_or_else(|| missing("FORM"))?;
        let values = path_arg(matches, "values").ok_or_else(|| missing("VALUES"))?;

        let engine = load_form(form)?;
        apply_values(&engine, values)?;

        let errors = engine.validate();
        if errors.is_empty() {
            println!("{}", serde_json::to_string_pretty(&engine.payload())?);
            return Ok(());
        }

        for (key, message) in errors.iter() {
            println!("{key}: {message}");
        }
        Err(FormsError::Validation(errors))
    }
}

pub(super) fn missing(arg: &str) -> FormsError {
    FormsError::ConfigurationError(format!("missing argument {arg}"))
}
