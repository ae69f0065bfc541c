//! Prompt templates for file review.
//!
//! Defaults are compiled in from `src/review/prompts/`. Placeholders are
//! `{file_path}`, `{file_type}`, `{content}` and, for diffs,
//! `{previous_content}`. Substitution is a single pass, so placeholder-like
//! text inside file content is never expanded.

use super::error::ReviewError;
use std::fs;
use std::path::Path;

const DEFAULT_DIFF: &str = include_str!("prompts/diff.txt");
const DEFAULT_FULL_FILE: &str = include_str!("prompts/full_file.txt");
const DEFAULT_LARGE_FILE: &str = include_str!("prompts/large_file.txt");

const CONTENT: &str = "{content}";

/// The three review templates.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptTemplates {
    pub diff: String,
    pub full_file: String,
    pub large_file: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            diff: DEFAULT_DIFF.to_string(),
            full_file: DEFAULT_FULL_FILE.to_string(),
            large_file: DEFAULT_LARGE_FILE.to_string(),
        }
    }
}

impl PromptTemplates {
    pub fn with_large_file(mut self, template: impl Into<String>) -> Self {
        self.large_file = template.into();
        self
    }

    /// Defaults overridden by `diff.txt`, `full_file.txt` and `large_file.txt`
    /// found in `dir`. Missing files keep the built-in template.
    pub fn load_overrides(dir: &Path) -> std::io::Result<Self> {
        let mut templates = Self::default();
        for (name, slot) in [
            ("diff.txt", &mut templates.diff),
            ("full_file.txt", &mut templates.full_file),
            ("large_file.txt", &mut templates.large_file),
        ] {
            let path = dir.join(name);
            if path.is_file() {
                *slot = fs::read_to_string(&path)?;
            }
        }
        Ok(templates)
    }

    /// Prompt for a compressed large file.
    pub fn render_large_file(
        &self,
        file_path: &str,
        file_type: &str,
        content: &str,
    ) -> Result<String, ReviewError> {
        render(
            "large_file",
            &self.large_file,
            &[
                ("file_path", file_path),
                ("file_type", file_type),
                ("content", content),
            ],
        )
    }

    /// Prompt for a file small enough to send whole.
    pub fn render_full_file(
        &self,
        file_path: &str,
        file_type: &str,
        content: &str,
    ) -> Result<String, ReviewError> {
        render(
            "full_file",
            &self.full_file,
            &[
                ("file_path", file_path),
                ("file_type", file_type),
                ("content", content),
            ],
        )
    }

    /// Prompt comparing two versions of a file.
    pub fn render_diff(
        &self,
        file_path: &str,
        file_type: &str,
        previous_content: &str,
        content: &str,
    ) -> Result<String, ReviewError> {
        render(
            "diff",
            &self.diff,
            &[
                ("file_path", file_path),
                ("file_type", file_type),
                ("previous_content", previous_content),
                ("content", content),
            ],
        )
    }
}

/// Substitute `{name}` placeholders in one pass.
///
/// A template without `{content}` is rejected; unknown placeholders are kept
/// verbatim.
fn render(name: &str, template: &str, vars: &[(&str, &str)]) -> Result<String, ReviewError> {
    if !template.contains(CONTENT) {
        return Err(ReviewError::Template(format!(
            "{} template has no {} placeholder",
            name, CONTENT
        )));
    }

    let extra: usize = vars.iter().map(|(_, value)| value.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        let replaced = tail.find('}').and_then(|close| {
            let key = &tail[..close];
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, value)| (*value, close))
        });
        match replaced {
            Some((value, close)) => {
                out.push_str(value);
                rest = &tail[close + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    Ok(out)
}
