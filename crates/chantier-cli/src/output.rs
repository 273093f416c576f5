//! Shared output layer for human/JSON parity across all CLI commands.
//!
//! Every command handler receives an [`OutputMode`] and formats its output
//! accordingly: human text for terminals, stable JSON for scripts and
//! agents. Success/failure toasts are deliberately the caller's concern:
//! the store stays silent, the CLI renders ✓/error lines after the fact.

use serde::Serialize;
use std::io::{self, Write};

/// The two output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text.
    Human,
    /// Machine-readable JSON (one object per result, or a JSON array).
    Json,
}

impl OutputMode {
    /// Returns `true` if JSON output was requested.
    #[allow(dead_code)]
    #[must_use]
    pub fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }
}

/// Machine-facing error shape mirrored into JSON output.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CliError {
    pub ok: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    pub code: String,
}

impl CliError {
    #[must_use]
    pub fn new(message: &str, code: &str) -> Self {
        Self {
            ok: false,
            error: message.to_string(),
            hint: None,
            code: code.to_string(),
        }
    }

    #[must_use]
    pub fn with_hint(message: &str, hint: &str, code: &str) -> Self {
        Self {
            ok: false,
            error: message.to_string(),
            hint: Some(hint.to_string()),
            code: code.to_string(),
        }
    }
}

/// Render a value either as JSON or through the provided human formatter.
pub fn render<T, F>(mode: OutputMode, value: &T, human: F) -> anyhow::Result<()>
where
    T: Serialize,
    F: FnOnce(&T, &mut dyn Write) -> io::Result<()>,
{
    let stdout = io::stdout();
    let mut w = stdout.lock();
    match mode {
        OutputMode::Json => {
            serde_json::to_writer(&mut w, value)?;
            writeln!(w)?;
        }
        OutputMode::Human => human(value, &mut w)?,
    }
    Ok(())
}

/// Render an error to stderr (human) or stdout (JSON, so scripts can parse
/// a single stream).
pub fn render_error(mode: OutputMode, err: &CliError) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            let stdout = io::stdout();
            let mut w = stdout.lock();
            serde_json::to_writer(&mut w, err)?;
            writeln!(w)?;
        }
        OutputMode::Human => {
            let stderr = io::stderr();
            let mut w = stderr.lock();
            writeln!(w, "error: {}", err.error)?;
            if let Some(hint) = &err.hint {
                writeln!(w, "  hint: {hint}")?;
            }
        }
    }
    Ok(())
}

/// Render a one-line success confirmation.
#[allow(dead_code)]
pub fn render_success(mode: OutputMode, message: &str) -> anyhow::Result<()> {
    #[derive(Serialize)]
    struct Confirmation<'a> {
        ok: bool,
        message: &'a str,
    }
    render(
        mode,
        &Confirmation { ok: true, message },
        |v, w| writeln!(w, "✓ {}", v.message),
    )
}

/// Progress bar used by list/show human output: `████░░░░░░ 40%`.
#[must_use]
pub fn progress_bar(percent: u8, width: usize) -> String {
    let filled = (usize::from(percent) * width).div_ceil(100).min(width);
    format!(
        "{}{} {percent:>3}%",
        "█".repeat(filled),
        "░".repeat(width - filled)
    )
}
