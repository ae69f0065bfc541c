//! Model backends that turn a prompt into generated text.
//!
//! The coordinator only sees the [`ModelBackend`] trait. The bundled
//! implementations drive locally installed agent CLIs:
//!
//! - **Claude**: `claude --print --output-format json --tools "" -p -`
//! - **Codex**: `codex exec --skip-git-repo-check --sandbox read-only`
//! - **Gemini**: `gemini --output-format json --approval-mode plan --prompt -`
//!
//! Prompts always travel through stdin so large compressed files never hit
//! argument length limits.

mod claude;
mod codex;
mod gemini;

pub use claude::ClaudeBackend;
pub use codex::CodexBackend;
pub use gemini::GeminiBackend;

use std::io::{Read, Write};
use std::process::{Child, Command, Output, Stdio};
use std::str::FromStr;
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// Per-call generation settings.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    /// Upper bound on generated tokens
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Wall-clock limit for one call
    pub timeout: Duration,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            max_tokens: 2048,
            temperature: 0.2,
            timeout: Duration::from_secs(120),
        }
    }
}

/// A text-generation model.
///
/// Implementations must be usable from several threads at once because
/// files in a batch may be reviewed in parallel.
pub trait ModelBackend: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &'static str;

    /// Whether the backend can be called at all.
    fn is_available(&self) -> bool {
        true
    }

    /// Generate a completion for `prompt`.
    fn generate_content(&self, prompt: &str, options: &GenerationOptions) -> BackendResult<String>;
}

impl<T: ModelBackend + ?Sized> ModelBackend for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn generate_content(&self, prompt: &str, options: &GenerationOptions) -> BackendResult<String> {
        (**self).generate_content(prompt, options)
    }
}

/// Agent CLIs with a bundled backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentType {
    Claude,
    Codex,
    Gemini,
}

impl AgentType {
    pub const ALL: [AgentType; 3] = [AgentType::Claude, AgentType::Codex, AgentType::Gemini];

    /// Create the backend for this agent, appending `extra_args` to its CLI.
    pub fn create_backend(&self, extra_args: Vec<String>) -> Box<dyn ModelBackend> {
        match self {
            AgentType::Claude => Box::new(ClaudeBackend::with_extra_args(extra_args)),
            AgentType::Codex => Box::new(CodexBackend::with_extra_args(extra_args)),
            AgentType::Gemini => Box::new(GeminiBackend::with_extra_args(extra_args)),
        }
    }

    /// CLI command name for this agent.
    pub fn command_name(&self) -> &'static str {
        match self {
            AgentType::Claude => "claude",
            AgentType::Codex => "codex",
            AgentType::Gemini => "gemini",
        }
    }
}

impl std::fmt::Display for AgentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentType::Claude => write!(f, "Claude"),
            AgentType::Codex => write!(f, "Codex"),
            AgentType::Gemini => write!(f, "Gemini"),
        }
    }
}

impl FromStr for AgentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentType::ALL
            .into_iter()
            .find(|agent| agent.command_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown agent '{}' (expected one of: claude, codex, gemini)",
                    s
                )
            })
    }
}

/// Errors from model backends.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Agent CLI not found: {0}")]
    NotAvailable(String),

    #[error("Agent timed out after {0:?}")]
    Timeout(Duration),

    #[error("Exit code {code}: {}", truncate_stderr(stderr))]
    ExitCode { code: i32, stderr: String },

    #[error("Rate limited: {0}")]
    RateLimited(RateLimitInfo),

    #[error("Model returned an error: {0}")]
    Model(String),

    #[error("Model returned an empty response")]
    EmptyResponse,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Rate limit details pulled from agent stderr.
#[derive(Debug, Clone)]
pub struct RateLimitInfo {
    pub retry_after: Option<Duration>,
    pub message: String,
}

impl std::fmt::Display for RateLimitInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.retry_after {
            Some(retry_after) => write!(f, "{} (retry after {:?})", self.message, retry_after),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Spawn `cmd`, feed `prompt` on stdin and collect its output within `timeout`.
///
/// Non-zero exits are checked for rate limiting first; `stderr_hint` lets a
/// backend substitute a better error message from stdout.
pub(crate) fn run_cli(
    mut cmd: Command,
    prompt: &str,
    timeout: Duration,
    stderr_hint: fn(&str) -> Option<String>,
) -> BackendResult<String> {
    cmd.stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = cmd.spawn()?;

    // Feed stdin from its own thread; the child may start writing output
    // before it has read the whole prompt.
    let writer = child.stdin.take().map(|mut stdin| {
        let prompt = prompt.to_owned();
        thread::spawn(move || stdin.write_all(prompt.as_bytes()))
    });

    let output = match wait_with_timeout(&mut child, timeout) {
        Ok(output) => output,
        Err(e) if e.kind() == std::io::ErrorKind::TimedOut => {
            return Err(BackendError::Timeout(timeout))
        }
        Err(e) => return Err(BackendError::Io(e)),
    };

    if let Some(Ok(Err(e))) = writer.map(|w| w.join()) {
        // a child that exits without reading all of stdin is not an error
        if e.kind() != std::io::ErrorKind::BrokenPipe {
            return Err(BackendError::Io(e));
        }
    }

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    if output.status.success() {
        return Ok(stdout);
    }

    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    if let Some(info) = parse_rate_limit_info(&stderr) {
        return Err(BackendError::RateLimited(info));
    }

    Err(BackendError::ExitCode {
        code: output.status.code().unwrap_or(-1),
        stderr: stderr_hint(&stdout).unwrap_or(stderr),
    })
}

/// Wait for `child` with a deadline, killing and reaping it on expiry.
///
/// Output pipes are drained on background threads so a chatty child cannot
/// block on a full pipe while we poll.
pub(crate) fn wait_with_timeout(child: &mut Child, timeout: Duration) -> std::io::Result<Output> {
    let drain = |pipe: Option<Box<dyn Read + Send>>| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            if let Some(mut pipe) = pipe {
                let _ = pipe.read_to_end(&mut buf);
            }
            buf
        })
    };
    let stdout = drain(child.stdout.take().map(|s| Box::new(s) as Box<dyn Read + Send>));
    let stderr = drain(child.stderr.take().map(|s| Box::new(s) as Box<dyn Read + Send>));

    let start = Instant::now();
    let poll_interval = Duration::from_millis(50);

    let status = loop {
        match child.try_wait()? {
            Some(status) => break status,
            None if start.elapsed() >= timeout => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(std::io::Error::new(
                    std::io::ErrorKind::TimedOut,
                    "Process timed out",
                ));
            }
            None => thread::sleep(poll_interval),
        }
    };

    Ok(Output {
        status,
        stdout: stdout.join().unwrap_or_default(),
        stderr: stderr.join().unwrap_or_default(),
    })
}

/// Parse rate limit info from agent CLI stderr.
pub fn parse_rate_limit_info(stderr: &str) -> Option<RateLimitInfo> {
    let lower = stderr.to_lowercase();

    let is_rate_limited = [
        "rate limit",
        "throttled",
        "resource_exhausted",
        "429",
        "too many requests",
        "quota exceeded",
    ]
    .iter()
    .any(|needle| lower.contains(needle));

    if !is_rate_limited {
        return None;
    }

    Some(RateLimitInfo {
        retry_after: extract_retry_seconds(&lower).map(Duration::from_secs),
        message: stderr.lines().next().unwrap_or("Rate limited").to_string(),
    })
}

/// Retry delay from the common "retry after N" style phrasings.
fn extract_retry_seconds(stderr: &str) -> Option<u64> {
    const KEYWORDS: [&str; 5] = ["retry after ", "retry_after", "retry in ", "retrydelay:", "wait "];

    let after = |keyword: &str| {
        stderr
            .find(keyword)
            .and_then(|pos| extract_first_number(&stderr[pos + keyword.len()..]))
    };

    KEYWORDS.iter().find_map(|keyword| after(keyword)).or_else(|| {
        stderr
            .contains("seconds")
            .then(|| extract_first_number(stderr))
            .flatten()
    })
}

/// First run of ASCII digits, skipping leading whitespace and colons.
fn extract_first_number(s: &str) -> Option<u64> {
    let start = s.trim_start_matches(|c: char| c.is_whitespace() || c == ':');
    let digits: String = start.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        // "45 seconds remaining" style: fall back to the first digits anywhere
        let from = s.find(|c: char| c.is_ascii_digit())?;
        return s[from..]
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect::<String>()
            .parse()
            .ok();
    }
    digits.parse().ok()
}

/// First line of stderr, capped at 200 characters.
fn truncate_stderr(stderr: &str) -> String {
    let first_line = stderr.lines().next().unwrap_or("").trim();
    match first_line.char_indices().nth(200) {
        Some((idx, _)) => format!("{}...", &first_line[..idx]),
        None => first_line.to_string(),
    }
}

/// Check if a command is available in PATH.
pub fn command_exists(command: &str) -> bool {
    #[cfg(windows)]
    let lookup_cmd = "where";
    #[cfg(not(windows))]
    let lookup_cmd = "which";

    Command::new(lookup_cmd)
        .arg(command)
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Reject empty model output so callers never parse nothing.
pub(crate) fn non_empty(text: String) -> BackendResult<String> {
    if text.trim().is_empty() {
        Err(BackendError::EmptyResponse)
    } else {
        Ok(text)
    }
}
