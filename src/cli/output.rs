//! Output formatting utilities for the command-line view.
//!
//! Everything here renders session snapshots; nothing mutates state.

use std::io::{self, Write};

use pr_copilot::{AnalysisReport, CopilotError, ProgressEstimate, RiskSummary, Theme};

const BAR_WIDTH: usize = 30;
const FULL_BAR_TENTHS: usize = 1000;
const RESET: &str = "\x1b[0m";

/// ANSI colours derived from the selected theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    accent: &'static str,
    error: &'static str,
    success: &'static str,
}

impl Palette {
    /// Palette for `theme`.
    #[must_use]
    pub const fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                accent: "\x1b[94m",
                error: "\x1b[91m",
                success: "\x1b[92m",
            },
            Theme::Light => Self {
                accent: "\x1b[34m",
                error: "\x1b[31m",
                success: "\x1b[32m",
            },
        }
    }
}

/// Renders a fixed-width progress bar followed by the percentage.
#[must_use]
pub fn progress_bar(progress: ProgressEstimate) -> String {
    let filled = (usize::from(progress.tenths()) * BAR_WIDTH)
        .div_euclid(FULL_BAR_TENTHS)
        .min(BAR_WIDTH);
    format!(
        "[{}{}] {progress}",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH.saturating_sub(filled))
    )
}

/// Redraws the progress line in place.
pub fn write_progress<W: Write>(
    writer: &mut W,
    progress: ProgressEstimate,
) -> Result<(), CopilotError> {
    write!(writer, "\r\x1b[2KAnalyzing... {}", progress_bar(progress)).map_err(|e| io_error(&e))?;
    writer.flush().map_err(|e| io_error(&e))
}

/// Erases the progress line.
pub fn clear_progress<W: Write>(writer: &mut W) -> Result<(), CopilotError> {
    write!(writer, "\r\x1b[2K").map_err(|e| io_error(&e))?;
    writer.flush().map_err(|e| io_error(&e))
}

/// Writes the error line for a failed cycle.
pub fn write_error<W: Write>(
    writer: &mut W,
    message: &str,
    palette: Palette,
) -> Result<(), CopilotError> {
    writeln!(writer, "{}{message}{RESET}", palette.error).map_err(|e| io_error(&e))
}

/// Writes the analysis result, either as raw JSON or as the risk summary.
///
/// Falls back to raw JSON when `summary` is requested but the document does
/// not have the summary shape.
pub fn write_report<W: Write>(
    writer: &mut W,
    report: &AnalysisReport,
    summary: bool,
    palette: Palette,
) -> Result<(), CopilotError> {
    writeln!(writer, "{}AI Analysis Result{RESET}", palette.accent).map_err(|e| io_error(&e))?;

    match report.summary().filter(|_| summary) {
        Some(risk) => write_summary(writer, &risk),
        None => writeln!(writer, "{}", report.to_pretty_string()).map_err(|e| io_error(&e)),
    }
}

fn write_summary<W: Write>(writer: &mut W, risk: &RiskSummary) -> Result<(), CopilotError> {
    writeln!(writer, "Risk score: {}/100", risk.risk_score).map_err(|e| io_error(&e))?;
    writeln!(writer, "Explanation: {}", risk.explanation).map_err(|e| io_error(&e))?;

    if risk.suggestions.is_empty() {
        return writeln!(writer, "Suggestions: none").map_err(|e| io_error(&e));
    }

    writeln!(writer, "Suggestions:").map_err(|e| io_error(&e))?;
    for suggestion in &risk.suggestions {
        writeln!(writer, "  - {suggestion}").map_err(|e| io_error(&e))?;
    }
    Ok(())
}

/// Writes the copy confirmation when it is showing.
pub fn write_copy_status<W: Write>(
    writer: &mut W,
    is_copied: bool,
    palette: Palette,
) -> Result<(), CopilotError> {
    if !is_copied {
        return Ok(());
    }
    writeln!(writer, "{}Copied!{RESET}", palette.success).map_err(|e| io_error(&e))
}

fn io_error(error: &io::Error) -> CopilotError {
    CopilotError::Io {
        message: error.to_string(),
    }
}
