//! Claude backend.
//!
//! Runs `claude --print --output-format json --tools "" -p -` and unwraps
//! the JSON envelope to the plain-text result.

use super::{
    command_exists, non_empty, run_cli, BackendError, BackendResult, GenerationOptions,
    ModelBackend,
};
use serde::Deserialize;
use std::process::Command;
use tracing::debug;

/// Backend for the Claude CLI.
#[derive(Debug, Clone, Default)]
pub struct ClaudeBackend {
    /// Extra CLI arguments, placed before the stdin passthrough args.
    extra_args: Vec<String>,
}

impl ClaudeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extra_args(extra_args: Vec<String>) -> Self {
        Self { extra_args }
    }

    fn command() -> &'static str {
        "claude"
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new(Self::command());
        cmd.args(["--print", "--output-format", "json"]);
        cmd.args(&self.extra_args);
        // no tools for a read-only review; prompt comes from stdin
        cmd.args(["--tools", "", "-p", "-"]);
        cmd
    }
}

impl ModelBackend for ClaudeBackend {
    fn name(&self) -> &'static str {
        "Claude"
    }

    fn is_available(&self) -> bool {
        command_exists(Self::command())
    }

    fn generate_content(&self, prompt: &str, options: &GenerationOptions) -> BackendResult<String> {
        if !self.is_available() {
            return Err(BackendError::NotAvailable(
                "claude CLI not found in PATH".to_string(),
            ));
        }

        // The CLI picks its own sampling settings.
        debug!(
            max_tokens = options.max_tokens,
            temperature = options.temperature,
            "invoking claude"
        );

        let stdout = run_cli(
            self.build_command(),
            prompt,
            options.timeout,
            extract_error_from_claude_response,
        )?;
        unwrap_claude_output(&stdout)
    }
}

/// Envelope printed by `--output-format json`.
#[derive(Debug, Deserialize)]
struct ClaudeWrapper {
    #[serde(rename = "type")]
    response_type: Option<String>,
    result: Option<String>,
    is_error: Option<bool>,
}

/// Text result from Claude's JSON envelope, or the raw output if there is none.
pub(crate) fn unwrap_claude_output(stdout: &str) -> BackendResult<String> {
    let trimmed = stdout.trim();
    match serde_json::from_str::<ClaudeWrapper>(trimmed) {
        Ok(wrapper) if wrapper.response_type.as_deref() == Some("result") => {
            if wrapper.is_error == Some(true) {
                return Err(BackendError::Model(
                    wrapper
                        .result
                        .unwrap_or_else(|| "Claude returned an error".to_string()),
                ));
            }
            non_empty(wrapper.result.unwrap_or_default())
        }
        _ => non_empty(trimmed.to_string()),
    }
}

/// Claude may exit non-zero with the real error message on stdout.
fn extract_error_from_claude_response(stdout: &str) -> Option<String> {
    let wrapper: ClaudeWrapper = serde_json::from_str(stdout.trim()).ok()?;
    if wrapper.is_error == Some(true) {
        wrapper
            .result
            .or_else(|| Some("Claude returned an error".to_string()))
    } else {
        wrapper.result.filter(|r| !r.is_empty())
    }
}
