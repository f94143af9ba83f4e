//! Single submission mode: analyse one pull request and print the outcome.

use std::io;
use std::pin::pin;
use std::time::Duration;

use pr_copilot::{CopilotConfig, CopilotError, RequestController};

use super::output::{
    Palette, clear_progress, write_copy_status, write_error, write_progress, write_report,
};

/// How often the progress line is redrawn while a request is in flight.
const REDRAW_INTERVAL: Duration = Duration::from_millis(100);

/// Applies command-line overrides, submits the analysis, and renders the
/// resulting session.
///
/// Returns `true` when the cycle produced a result.
///
/// # Errors
///
/// Returns [`CopilotError::Io`] when writing to the terminal fails.
pub async fn run(
    controller: &RequestController,
    config: &CopilotConfig,
) -> Result<bool, CopilotError> {
    apply_inputs(controller, config);

    if config.toggle_theme {
        let theme = controller.toggle_theme();
        tracing::info!(%theme, "theme toggled");
    }

    let mut submission = pin!(controller.submit_analysis());
    let mut redraw = tokio::time::interval(REDRAW_INTERVAL);

    loop {
        tokio::select! {
            () = &mut submission => break,
            _ = redraw.tick() => {
                let session = controller.session();
                if session.is_loading() {
                    write_progress(&mut io::stderr().lock(), session.progress())?;
                }
            }
        }
    }
    clear_progress(&mut io::stderr().lock())?;

    let session = controller.session();
    let palette = Palette::for_theme(session.theme());

    if let Some(message) = session.error_message() {
        write_error(&mut io::stderr().lock(), message, palette)?;
        return Ok(false);
    }

    let Some(report) = session.analysis_result() else {
        return Ok(false);
    };
    write_report(&mut io::stdout().lock(), report, config.summary, palette)?;

    if config.copy {
        controller.copy_result_to_clipboard();
        write_copy_status(
            &mut io::stderr().lock(),
            controller.session().is_copied(),
            palette,
        )?;
    }

    Ok(true)
}

fn apply_inputs(controller: &RequestController, config: &CopilotConfig) {
    if let Some(repo_url) = &config.repo_url {
        controller.set_repository_url(repo_url.as_str());
    }
    if let Some(pr_number) = &config.pr_number {
        controller.set_pull_request_number(pr_number.as_str());
    }
}
