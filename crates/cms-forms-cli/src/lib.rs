//! # cms-forms-cli
//!
//! The `cms-forms` command-line tool. Each subcommand is a
//! [`ManagementCommand`] registered in a [`CommandRegistry`]:
//!
//! | Command | Purpose |
//! |---|---|
//! | `validate FORM VALUES` | print validation errors or the payload |
//! | `render FORM [--values VALUES]` | print the form as HTML |
//! | `submit FORM VALUES` | validate and post to the backend |
//! | `health` | call the backend health check |
//! | `fetch WEB_SERVICE_ID` | fetch data through the web-service proxy |
//! | `check FORM` | list schema authoring warnings |
//!
//! ## Quick Start
//!
//! ```rust
//! use cms_forms_cli::command::CommandRegistry;
//! use cms_forms_cli::commands::register_builtin_commands;
//!
//! let mut registry = CommandRegistry::new();
//! register_builtin_commands(&mut registry);
//!
//! let names = registry.list_commands();
//! assert!(names.contains(&"submit"));
//! assert!(names.contains(&"check"));
//! ```

pub mod command;
pub mod commands;
pub mod input;

use std::path::PathBuf;

use cms_forms_core::{settings_loader, FormsResult, Settings};

pub use command::{CommandRegistry, ManagementCommand};

/// A registry holding every built-in command.
pub fn builtin_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    commands::register_builtin_commands(&mut registry);
    registry
}

/// Settings for one invocation: the `--settings` file if given, else the
/// defaults, with environment overrides applied in both cases.
pub fn load_settings(matches: &clap::ArgMatches) -> FormsResult<Settings> {
    match matches.get_one::<String>(command::SETTINGS_ARG) {
        Some(path) => settings_loader::from_file_with_env(PathBuf::from(path)),
        None => Ok(settings_loader::from_env()),
    }
}
