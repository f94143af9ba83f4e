//! pr-copilot CLI entrypoint.

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use ortho_config::OrthoConfig;
use pr_copilot::telemetry::{NoopTelemetrySink, StderrJsonlTelemetrySink, TelemetrySink};
use pr_copilot::{
    CopilotConfig, CopilotError, FileStore, HttpAnalysisService, RequestController,
    SystemClipboard,
};
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

/// Installs a stderr subscriber honouring `RUST_LOG`, defaulting to `warn`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _already_installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

async fn run() -> Result<bool, CopilotError> {
    let config = load_config()?;
    let controller = build_controller(&config)?;
    cli::analyze::run(&controller, &config).await
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`CopilotError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<CopilotConfig, CopilotError> {
    CopilotConfig::load().map_err(|error| CopilotError::Configuration {
        message: error.to_string(),
    })
}

fn build_controller(config: &CopilotConfig) -> Result<RequestController, CopilotError> {
    let state_file = config.state_file_path()?;
    let store = FileStore::open(&state_file)?;
    tracing::debug!(path = %state_file, "opened session store");

    let service = HttpAnalysisService::new(&config.api_base)?;
    let telemetry: Arc<dyn TelemetrySink> = if config.telemetry {
        Arc::new(StderrJsonlTelemetrySink::stderr())
    } else {
        Arc::new(NoopTelemetrySink)
    };

    let timings = config.timings()?;
    let clipboard = SystemClipboard::lingering(timings.copy_feedback);

    RequestController::builder(Arc::new(service), Arc::new(store))
        .with_clipboard(Arc::new(clipboard))
        .with_telemetry(telemetry)
        .with_timings(timings)
        .build()
}
