//! Command framework for the `cms-forms` binary.
//!
//! [`ManagementCommand`] defines one subcommand; [`CommandRegistry`] collects
//! them, builds the clap parser and dispatches to the matching handler.
//!
//! ## Defining a Custom Command
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use cms_forms_cli::command::ManagementCommand;
//! use cms_forms_core::{FormsError, Settings};
//!
//! struct WhereCommand;
//!
//! #[async_trait]
//! impl ManagementCommand for WhereCommand {
//!     fn name(&self) -> &'static str { "where" }
//!     fn help(&self) -> &'static str { "Print the backend URL" }
//!
//!     async fn handle(
//!         &self,
//!         _matches: &clap::ArgMatches,
//!         settings: &Settings,
//!     ) -> Result<(), FormsError> {
//!         println!("{}", settings.api_url);
//!         Ok(())
//!     }
//! }
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use cms_forms_core::{FormsError, Settings};

/// Name of the global option that points at a settings file.
pub const SETTINGS_ARG: &str = "settings";

/// A subcommand that can be registered and invoked through the CLI.
#[async_trait]
pub trait ManagementCommand: Send + Sync {
    /// Name used to invoke the command.
    fn name(&self) -> &'static str;

    /// One-line help text.
    fn help(&self) -> &'static str;

    /// Adds the command's arguments. The default adds none.
    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd
    }

    /// Runs the command.
    async fn handle(&self, matches: &clap::ArgMatches, settings: &Settings)
        -> Result<(), FormsError>;
}

/// A registry of commands keyed by name.
pub struct CommandRegistry {
    commands: HashMap<&'static str, Box<dyn ManagementCommand>>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Registers a command, replacing any command with the same name.
    pub fn register(&mut self, command: Box<dyn ManagementCommand>) {
        self.commands.insert(command.name(), command);
    }

    /// Returns the command registered under `name`.
    pub fn get(&self, name: &str) -> Option<&dyn ManagementCommand> {
        self.commands.get(name).map(AsRef::as_ref)
    }

    /// Registered command names, sorted.
    pub fn list_commands(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Builds the top-level clap `Command` with every registered subcommand
    /// and the global `--settings` option.
    pub fn build_cli(&self) -> clap::Command {
        let mut app = clap::Command::new("cms-forms")
            .about("Validate, render and submit CMS-driven forms")
            .version(env!("CARGO_PKG_VERSION"))
            .subcommand_required(true)
            .arg_required_else_help(true)
            .arg(
                clap::Arg::new(SETTINGS_ARG)
                    .long(SETTINGS_ARG)
                    .short('s')
                    .value_name("FILE")
                    .help("Settings file (.toml or .json), environment variables still apply")
                    .global(true),
            );

        let mut entries: Vec<_> = self.commands.values().collect();
        entries.sort_by_key(|cmd| cmd.name());

        for cmd in entries {
            let subcmd = clap::Command::new(cmd.name()).about(cmd.help());
            app = app.subcommand(cmd.add_arguments(subcmd));
        }

        app
    }

    /// Dispatches to the subcommand selected in `matches`.
    pub async fn execute(
        &self,
        matches: &clap::ArgMatches,
        settings: &Settings,
    ) -> Result<(), FormsError> {
        let (name, sub_matches) = matches.subcommand().ok_or_else(|| {
            FormsError::ConfigurationError("No subcommand specified".to_string())
        })?;

        let cmd = self
            .get(name)
            .ok_or_else(|| FormsError::ConfigurationError(format!("Unknown command: {name}")))?;

        tracing::debug!(command = name, "running command");
        cmd.handle(sub_matches, settings).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoCommand(&'static str);

    #[async_trait]
    impl ManagementCommand for EchoCommand {
        fn name(&self) -> &'static str {
            self.0
        }

        fn help(&self) -> &'static str {
            "Echo"
        }

        fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
            cmd.arg(
                clap::Arg::new("loud")
                    .long("loud")
                    .action(clap::ArgAction::SetTrue),
            )
        }

        async fn handle(
            &self,
            _matches: &clap::ArgMatches,
            _settings: &Settings,
        ) -> Result<(), FormsError> {
            Ok(())
        }
    }

    struct FailingCommand;

    #[async_trait]
    impl ManagementCommand for FailingCommand {
        fn name(&self) -> &'static str {
            "fail"
        }

        fn help(&self) -> &'static str {
            "Always fails"
        }

        async fn handle(
            &self,
            _matches: &clap::ArgMatches,
            _settings: &Settings,
        ) -> Result<(), FormsError> {
            Err(FormsError::ConfigurationError("deliberate failure".to_string()))
        }
    }

    #[test]
    fn test_registry_new_is_empty() {
        let registry = CommandRegistry::default();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_register_replaces_existing() {
        let mut registry = CommandRegistry::new();
        registry.register(Box::new(EchoCommand("echo")));
        registry.register(Box::new(EchoCommand("echo")));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("echo").map(|c| c.help()), Some("Echo"));
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_list_commands_sorted() {
        let mut registry = CommandRegistry::new();
        registry.register(Box::new(EchoCommand("zulu")));
        registry.register(Box::new(EchoCommand("alpha")));
        assert_eq!(registry.list_commands(), vec!["alpha", "zulu"]);
    }

    #[test]
    fn test_global_settings_option_after_subcommand() {
        let mut registry = CommandRegistry::new();
        registry.register(Box::new(EchoCommand("echo")));

        let matches = registry
            .build_cli()
            .try_get_matches_from(["cms-forms", "echo", "--loud", "--settings", "forms.toml"])
            .unwrap();
        assert_eq!(
            matches.get_one::<String>(SETTINGS_ARG).map(String::as_str),
            Some("forms.toml")
        );
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "echo");
        assert!(sub.get_flag("loud"));
    }

    #[tokio::test]
    async fn test_execute_dispatches() {
        let mut registry = CommandRegistry::new();
        registry.register(Box::new(EchoCommand("echo")));
        registry.register(Box::new(FailingCommand));
        let cli = registry.build_cli();
        let settings = Settings::default();

        let ok = cli.clone().try_get_matches_from(["cms-forms", "echo"]).unwrap();
        assert!(registry.execute(&ok, &settings).await.is_ok());

        let fail = cli.try_get_matches_from(["cms-forms", "fail"]).unwrap();
        let err = registry.execute(&fail, &settings).await.unwrap_err();
        assert!(err.to_string().contains("deliberate failure"));
    }
}
