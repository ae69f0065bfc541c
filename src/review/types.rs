//! Request and result types for large-file review.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// One file submitted for review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LargeFileRequest {
    pub file_path: String,
    pub current_content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_content: Option<String>,
    /// Language hint; `None` means detect
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl LargeFileRequest {
    pub fn new(file_path: impl Into<String>, current_content: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            current_content: current_content.into(),
            previous_content: None,
            language: None,
        }
    }

    pub fn with_previous(mut self, previous_content: impl Into<String>) -> Self {
        self.previous_content = Some(previous_content.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Content length in characters.
    pub fn char_len(&self) -> usize {
        self.current_content.chars().count()
    }

    /// Extension of `file_path` without the dot, or an empty string.
    pub fn file_type(&self) -> &str {
        Path::new(&self.file_path)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
    }
}

/// Review outcome for one file.
///
/// `score` is 1 when the response yielded at least one suggestion and 0
/// otherwise, including every failure placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LargeFileResult {
    pub suggestions: Vec<String>,
    pub score: Option<u8>,
}

impl LargeFileResult {
    pub const ERROR_PREFIX: &'static str = "Error processing large file: ";

    pub fn new(suggestions: Vec<String>) -> Self {
        let score = u8::from(!suggestions.is_empty());
        Self {
            suggestions,
            score: Some(score),
        }
    }

    /// Placeholder for a file whose review failed.
    pub fn error(message: impl std::fmt::Display) -> Self {
        Self {
            suggestions: vec![format!("{}{}", Self::ERROR_PREFIX, message)],
            score: Some(0),
        }
    }

    pub fn is_error(&self) -> bool {
        self.score == Some(0)
            && self
                .suggestions
                .first()
                .is_some_and(|s| s.starts_with(Self::ERROR_PREFIX))
    }
}
