//! Test helper utilities

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use reviewpack::review::backend::{BackendError, BackendResult, GenerationOptions};
use reviewpack::ModelBackend;

/// Python module of at least `min_chars` characters.
///
/// Every fourth line is a `def`, the rest are assignments and returns, so
/// the scorer has a clear preference.
pub fn python_source(min_chars: usize) -> String {
    let mut out = String::from("import os\nimport sys\n\n");
    let mut i = 0;
    while out.chars().count() < min_chars {
        out.push_str(&format!("def handler_{}(value):\n", i));
        out.push_str(&format!("    total = value + {}\n", i));
        out.push_str("    total = total * 2\n");
        out.push_str("    return total\n");
        i += 1;
    }
    out
}

/// Rust source of at least `min_chars` characters.
pub fn rust_source(min_chars: usize) -> String {
    let mut out = String::from("use std::collections::HashMap;\n\n");
    let mut i = 0;
    while out.chars().count() < min_chars {
        out.push_str(&format!("pub fn step_{}(input: u32) -> u32 {{\n", i));
        out.push_str(&format!("    let offset = {};\n", i));
        out.push_str("    input + offset\n");
        out.push_str("}\n");
        i += 1;
    }
    out
}

/// Plain text with numbered lines and no language signal.
pub fn plain_lines(count: usize) -> String {
    (0..count)
        .map(|i| format!("line number {}", i))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Backend that returns the same answer for every prompt.
pub struct FixedBackend {
    pub response: String,
    pub calls: AtomicUsize,
}

impl FixedBackend {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ModelBackend for FixedBackend {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn generate_content(&self, _prompt: &str, _options: &GenerationOptions) -> BackendResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.clone())
    }
}

/// Backend that fails for prompts containing `marker` and records prompts.
pub struct MarkerFailBackend {
    pub marker: String,
    pub prompts: Mutex<Vec<String>>,
}

impl MarkerFailBackend {
    pub fn new(marker: &str) -> Self {
        Self {
            marker: marker.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

impl ModelBackend for MarkerFailBackend {
    fn name(&self) -> &'static str {
        "marker-fail"
    }

    fn generate_content(&self, prompt: &str, _options: &GenerationOptions) -> BackendResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if prompt.contains(&self.marker) {
            return Err(BackendError::Model("simulated failure".to_string()));
        }
        Ok("- tighten the error handling\n- split the long function".to_string())
    }
}
