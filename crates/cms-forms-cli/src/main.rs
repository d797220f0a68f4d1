use std::process::ExitCode;

use cms_forms_cli::{builtin_registry, load_settings};
use cms_forms_core::logging::setup_logging;

#[tokio::main]
async fn main() -> ExitCode {
    let registry = builtin_registry();
    let matches = registry.build_cli().get_matches();

    let settings = match load_settings(&matches) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    setup_logging(&settings);
    tracing::debug!(api_url = %settings.api_url, "settings loaded");

    match registry.execute(&matches, &settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
