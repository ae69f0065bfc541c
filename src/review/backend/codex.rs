//! Codex backend.
//!
//! Runs `codex exec` in a read-only sandbox. Codex prints the final answer
//! as plain text on stdout and progress on stderr.

use super::{
    command_exists, non_empty, run_cli, BackendError, BackendResult, GenerationOptions,
    ModelBackend,
};
use std::process::Command;
use tracing::debug;

/// Backend for the Codex CLI.
#[derive(Debug, Clone, Default)]
pub struct CodexBackend {
    extra_args: Vec<String>,
}

impl CodexBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extra_args(extra_args: Vec<String>) -> Self {
        Self { extra_args }
    }

    fn command() -> &'static str {
        "codex"
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new(Self::command());
        // run outside any project so codex does not pick up repository context
        cmd.args(["exec", "--cd"])
            .arg(std::env::temp_dir())
            .arg("--skip-git-repo-check");
        cmd.args(&self.extra_args);
        // sandbox goes last so extra args cannot loosen it
        cmd.args(["--sandbox", "read-only"]);
        cmd
    }
}

impl ModelBackend for CodexBackend {
    fn name(&self) -> &'static str {
        "Codex"
    }

    fn is_available(&self) -> bool {
        command_exists(Self::command())
    }

    fn generate_content(&self, prompt: &str, options: &GenerationOptions) -> BackendResult<String> {
        if !self.is_available() {
            return Err(BackendError::NotAvailable(
                "codex CLI not found in PATH".to_string(),
            ));
        }

        debug!(max_tokens = options.max_tokens, "invoking codex");

        let stdout = run_cli(self.build_command(), prompt, options.timeout, |_| None)?;
        non_empty(stdout.trim().to_string())
    }
}
