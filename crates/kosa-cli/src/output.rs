//! Shared output layer for the kosa tools.
//!
//! Results go to the `-o` destination (stdout by default). Errors always go
//! to stderr, as `error: ...` text or as a JSON object when the tool was
//! asked for JSON output.

use std::error::Error as StdError;
use std::io::{self, Write};

use kosa_core::error::ErrorCode;
use kosa_core::graph::GraphError;
use kosa_core::import::ImportError;
use serde::Serialize;

use crate::args::ArgError;

/// The output modes supported by the tools.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Plain text, one result per line.
    #[default]
    Text,
    /// Machine-readable JSON.
    Json,
}

impl OutputMode {
    #[must_use]
    pub const fn from_json_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Text }
    }

    /// Returns `true` if JSON output was requested.
    #[must_use]
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }
}

/// A structured error with optional suggestion and error code.
#[derive(Debug, Serialize)]
pub struct CliError {
    /// Human-readable error message.
    pub message: String,
    /// Optional suggestion for how to fix the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Machine-readable error code (e.g. "E1002").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl CliError {
    /// Create a simple error with just a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: None,
            error_code: None,
        }
    }

    /// Attach the code and hint of `code`.
    #[must_use]
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.error_code = Some(code.code().to_string());
        self.suggestion = code.hint().map(str::to_string);
        self
    }
}

/// Convert a failed run into a [`CliError`], picking the code of the first
/// typed error found in the chain.
impl From<&anyhow::Error> for CliError {
    fn from(err: &anyhow::Error) -> Self {
        let base = Self::new(format!("{err:#}"));
        match err.chain().find_map(error_code) {
            Some(code) => base.with_code(code),
            None => base,
        }
    }
}

fn error_code(err: &(dyn StdError + 'static)) -> Option<ErrorCode> {
    if let Some(e) = err.downcast_ref::<ImportError>() {
        return Some(e.code());
    }
    if let Some(e) = err.downcast_ref::<GraphError>() {
        return Some(e.code());
    }
    if let Some(e) = err.downcast_ref::<ArgError>() {
        return Some(e.code());
    }
    if err.is::<toml::de::Error>() {
        return Some(ErrorCode::ConfigParseError);
    }
    if err.is::<io::Error>() {
        return Some(ErrorCode::IoFailure);
    }
    None
}

/// Render an error to `out` in the requested format.
///
/// # Errors
///
/// Propagates write and serialization failures.
pub fn write_error(out: &mut dyn Write, mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            let wrapper = serde_json::json!({
                "error": error,
            });
            serde_json::to_writer_pretty(&mut *out, &wrapper)?;
            writeln!(out)?;
        }
        OutputMode::Text => {
            writeln!(out, "error: {}", error.message)?;
            if let Some(ref suggestion) = error.suggestion {
                writeln!(out, "  suggestion: {suggestion}")?;
            }
        }
    }
    Ok(())
}

/// Render an error to stderr in the requested format.
///
/// # Errors
///
/// Propagates write failures on stderr.
pub fn render_error(mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    write_error(&mut out, mode, error)
}
