//! The `check` command.
//!
//! Reports authoring problems in a form schema: duplicate ids, column spans
//! out of range, option fields without options, patterns that do not
//! compile and similar. Warnings never stop a form from rendering, so the
//! command succeeds unless `--strict` is given.

use async_trait::async_trait;
use cms_forms_core::{FormsError, Settings};

use super::validate::missing;
use super::{form_arg, path_arg};
use crate::command::ManagementCommand;
use crate::input::load_form;

/// Prints schema authoring warnings.
pub struct CheckCommand;

#[async_trait]
impl ManagementCommand for CheckCommand {
    fn name(&self) -> &'static str {
        "check"
    }

    fn help(&self) -> &'static str {
        "Check a form schema for authoring problems"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(form_arg()).arg(
            clap::Arg::new("strict")
                .long("strict")
                .action(clap::ArgAction::SetTrue)
                .help("Fail when any warning is reported"),
        )
    }

    async fn handle(
        &self,
        matches: &clap::ArgMatches,
        _settings: &Settings,
    ) -> Result<(), FormsError> {
        let form = path_arg(matches, "form").ok_or_else(|| missing("FORM"))?;
        let engine = load_form(form)?;
        let warnings = engine.config().check();

        if warnings.is_empty() {
            println!("Form '{}' has no issues", engine.form_id());
            return Ok(());
        }

        for warning in &warnings {
            println!("WARNING: {warning}");
        }
        println!(
            "Form '{}' has {} issue(s)",
            engine.form_id(),
            warnings.len()
        );

        if matches.get_flag("strict") {
            return Err(FormsError::InvalidSchema(format!(
                "{} schema warning(s)",
                warnings.len()
            )));
        }
        Ok(())
    }
}
