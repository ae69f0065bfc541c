//! Configuration type definitions and defaults

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::compress::CompressionConfig;
use crate::review::{AgentType, GenerationOptions, LargeFileConfig};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub compression: CompressionConfig,
    #[serde(default)]
    pub large_file: LargeFileConfig,
    #[serde(default)]
    pub model: ModelConfig,
}

/// Model invocation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Agent CLI used for reviews ("claude", "codex", "gemini")
    #[serde(default = "default_agent")]
    pub agent: String,
    /// Advisory. Logged with each call; the agent CLIs pick their own limit.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Advisory, like `max_tokens`.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Timeout per model call in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Extra CLI arguments passed to the agent
    #[serde(default)]
    pub extra_args: Vec<String>,
}

pub fn default_agent() -> String {
    "claude".to_string()
}

pub fn default_max_tokens() -> u32 {
    2048
}

pub fn default_temperature() -> f32 {
    0.2
}

pub fn default_timeout() -> u64 {
    120
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            agent: default_agent(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout: default_timeout(),
            extra_args: Vec::new(),
        }
    }
}

impl ModelConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.agent_type()?;
        if self.timeout == 0 {
            return Err("model.timeout must be > 0".to_string());
        }
        if self.timeout > 3600 {
            return Err(format!("model.timeout {} exceeds maximum (3600s)", self.timeout));
        }
        if self.max_tokens == 0 {
            return Err("model.max_tokens must be > 0".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!(
                "model.temperature {} must be between 0 and 2",
                self.temperature
            ));
        }
        Ok(())
    }

    pub fn agent_type(&self) -> Result<AgentType, String> {
        self.agent.parse()
    }

    pub fn generation_options(&self) -> GenerationOptions {
        GenerationOptions {
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            timeout: Duration::from_secs(self.timeout),
        }
    }
}
