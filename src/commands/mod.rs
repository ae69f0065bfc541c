//! Command handlers for the reviewpack CLI.
//!
//! Each submodule handles one command or command group. Dispatch stays in
//! main.rs.

pub mod completions;
pub mod compress;
pub mod config;
pub mod fingerprint;
pub mod plan;
pub mod review;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use reviewpack::compress::CompressionConfig;
use reviewpack::review::LargeFileRequest;
use reviewpack::Config;

use crate::cli::CompressionArgs;

/// Load the config from `path` if given, else from the default location.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

/// Apply command-line overrides on top of configured compression settings.
pub fn apply_compression_args(config: &mut CompressionConfig, args: &CompressionArgs) -> Result<()> {
    if let Some(max_length) = args.max_length {
        config.max_content_length = max_length;
    }
    if let Some(header) = args.header {
        config.header_lines = header;
    }
    if let Some(footer) = args.footer {
        config.footer_lines = footer;
    }
    if let Some(rate) = args.rate {
        config.sample_rate = rate;
    }
    if let Some(ref language) = args.language {
        config.language = language.clone();
    }
    config.validate().map_err(|e| anyhow::anyhow!(e))
}

/// Read a file as UTF-8 text.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Build a review request for `path`.
///
/// With `previous_dir`, the same relative path under that directory is read
/// as the previous version when it exists.
pub fn read_request(path: &Path, previous_dir: Option<&Path>) -> Result<LargeFileRequest> {
    let mut request = LargeFileRequest::new(display_path(path), read_text(path)?);

    if let Some(dir) = previous_dir {
        let previous = previous_path(dir, path);
        if previous.is_file() {
            request = request.with_previous(read_text(&previous)?);
        }
    }

    Ok(request)
}

fn previous_path(dir: &Path, path: &Path) -> PathBuf {
    let relative = path
        .strip_prefix(std::env::current_dir().unwrap_or_default())
        .unwrap_or(path);
    let relative = relative.strip_prefix("/").unwrap_or(relative);
    dir.join(relative)
}

/// Path as shown to the user and used as the result key.
pub fn display_path(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
