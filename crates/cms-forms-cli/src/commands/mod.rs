//! Built-in commands of the `cms-forms` binary.

pub mod check;
pub mod fetch;
pub mod health;
pub mod render;
pub mod submit;
pub mod validate;

pub use check::CheckCommand;
pub use fetch::FetchCommand;
pub use health::HealthCommand;
pub use render::RenderCommand;
pub use submit::SubmitCommand;
pub use validate::ValidateCommand;

use std::path::PathBuf;

use crate::command::CommandRegistry;

/// Registers every built-in command into `registry`.
pub fn register_builtin_commands(registry: &mut CommandRegistry) {
    registry.register(Box::new(ValidateCommand));
    registry.register(Box::new(RenderCommand));
    registry.register(Box::new(SubmitCommand));
    registry.register(Box::new(HealthCommand));
    registry.register(Box::new(FetchCommand));
    registry.register(Box::new(CheckCommand));
}

/// The positional `FORM` argument shared by the form-level commands.
fn form_arg() -> clap::Arg {
    clap::Arg::new("form")
        .value_name("FORM")
        .required(true)
        .value_parser(clap::value_parser!(PathBuf))
        .help("Form JSON: the CMS envelope or a bare form configuration")
}

/// The `VALUES` argument, a JSON object keyed by field id.
fn values_arg() -> clap::Arg {
    clap::Arg::new("values")
        .value_name("VALUES")
        .value_parser(clap::value_parser!(PathBuf))
        .help("Field values JSON keyed by field id")
}

fn path_arg<'a>(matches: &'a clap::ArgMatches, id: &str) -> Option<&'a PathBuf> {
    matches.get_one::<PathBuf>(id)
}
