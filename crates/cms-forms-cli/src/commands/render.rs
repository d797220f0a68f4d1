//! The `render` command.

use async_trait::async_trait;
use cms_forms_core::{FormsError, Settings};
use cms_forms_engine::render_form;

use super::validate::missing;
use super::{form_arg, path_arg, values_arg};
use crate::command::ManagementCommand;
use crate::input::{apply_values, load_form};

/// Prints a form as HTML, optionally prefilled with values.
pub struct RenderCommand;

#[async_trait]
impl ManagementCommand for RenderCommand {
    fn name(&self) -> &'static str {
        "render"
    }

    fn help(&self) -> &'static str {
        "Render a form to HTML"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(form_arg())
            .arg(values_arg().long("values").short('v'))
            .arg(
                clap::Arg::new("validate")
                    .long("validate")
                    .action(clap::ArgAction::SetTrue)
                    .help("Validate first so field errors appear in the output"),
            )
    }

    async fn handle(
        &self,
        matches: &clap::ArgMatches,
        _settings: &Settings,
    ) -> Result<(), FormsError> {
        let form = path_arg(matches, "form").ok_or_else(|| missing("FORM"))?;
        let engine = load_form(form)?;
        if let Some(values) = path_arg(matches, "values") {
            apply_values(&engine, values)?;
        }
        if matches.get_flag("validate") {
            engine.validate_all();
        }
        println!("{}", render_form(&engine));
        Ok(())
    }
}
