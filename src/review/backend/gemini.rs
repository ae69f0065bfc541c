//! Gemini backend.
//!
//! Runs `gemini --output-format json --approval-mode plan --prompt -`. The
//! plan approval mode keeps the CLI from executing tools.

use super::{
    command_exists, non_empty, run_cli, BackendError, BackendResult, GenerationOptions,
    ModelBackend,
};
use serde::Deserialize;
use std::process::Command;
use tracing::debug;

/// Backend for the Gemini CLI.
#[derive(Debug, Clone, Default)]
pub struct GeminiBackend {
    extra_args: Vec<String>,
}

impl GeminiBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extra_args(extra_args: Vec<String>) -> Self {
        Self { extra_args }
    }

    fn command() -> &'static str {
        "gemini"
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new(Self::command());
        cmd.args(["--output-format", "json"]);
        cmd.args(&self.extra_args);
        cmd.args(["--approval-mode", "plan", "--prompt", "-"]);
        cmd
    }
}

impl ModelBackend for GeminiBackend {
    fn name(&self) -> &'static str {
        "Gemini"
    }

    fn is_available(&self) -> bool {
        command_exists(Self::command())
    }

    fn generate_content(&self, prompt: &str, options: &GenerationOptions) -> BackendResult<String> {
        if !self.is_available() {
            return Err(BackendError::NotAvailable(
                "gemini CLI not found in PATH".to_string(),
            ));
        }

        debug!(max_tokens = options.max_tokens, "invoking gemini");

        let stdout = run_cli(self.build_command(), prompt, options.timeout, |_| None)?;
        unwrap_gemini_output(&stdout)
    }
}

/// Envelope printed by `--output-format json`.
#[derive(Debug, Deserialize)]
struct GeminiWrapper {
    response: Option<String>,
    error: Option<GeminiError>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: Option<String>,
}

/// Text response from Gemini's JSON envelope, or the raw output.
pub(crate) fn unwrap_gemini_output(stdout: &str) -> BackendResult<String> {
    let trimmed = stdout.trim();
    match serde_json::from_str::<GeminiWrapper>(trimmed) {
        Ok(GeminiWrapper {
            error: Some(error), ..
        }) => Err(BackendError::Model(
            error
                .message
                .unwrap_or_else(|| "Gemini returned an error".to_string()),
        )),
        Ok(GeminiWrapper {
            response: Some(response),
            ..
        }) => non_empty(response),
        _ => non_empty(trimmed.to_string()),
    }
}
