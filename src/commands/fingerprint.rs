//! Fingerprint command handler

use anyhow::Result;
use serde_json::json;
use std::path::Path;

use reviewpack::compress::{fast_fingerprint, fingerprint, language};

use super::read_text;

/// Print the fingerprint of `file` as JSON.
#[cfg(not(tarpaulin_include))]
pub fn handle(file: &Path, language_hint: Option<&str>, fast: bool) -> Result<()> {
    let content = read_text(file)?;
    println!("{}", render(&content, language_hint, fast)?);
    Ok(())
}

/// JSON text for a full or fast fingerprint.
pub fn render(content: &str, language_hint: Option<&str>, fast: bool) -> Result<String> {
    if fast {
        let fp = fast_fingerprint(content);
        let value = json!({
            "length": fp.length,
            "hash": fp.hash,
            "key": fp.key(),
        });
        return Ok(serde_json::to_string_pretty(&value)?);
    }

    let fp = fingerprint(content, language_hint.unwrap_or(language::AUTO));
    Ok(fp.to_json()?)
}
