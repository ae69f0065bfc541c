//! Compress command handler

use anyhow::Result;
use humansize::{format_size, BINARY};
use std::path::Path;

use reviewpack::compress::{self, CompressionStats};

use super::{apply_compression_args, load_config, read_text};
use crate::cli::CompressionArgs;

/// Compress `file` and print the result; statistics go to stderr.
#[cfg(not(tarpaulin_include))]
pub fn handle(
    config_path: Option<&Path>,
    file: &Path,
    args: &CompressionArgs,
    stats: bool,
) -> Result<()> {
    let mut config = load_config(config_path)?.compression;
    apply_compression_args(&mut config, args)?;
    config.include_stats = stats;

    let content = read_text(file)?;
    let result = compress::compress(&content, &config);

    if result.text.ends_with('\n') {
        print!("{}", result.text);
    } else {
        println!("{}", result.text);
    }
    eprintln!("{}", summary(&file.display().to_string(), &result.stats, result.language.as_str()));
    Ok(())
}

/// One-line human summary of a compression run.
pub fn summary(name: &str, stats: &CompressionStats, language: &str) -> String {
    if !stats.dropped_lines() && stats.compressed_size == stats.original_size {
        return format!(
            "{}: {} lines, {} chars ({}), unchanged",
            name,
            stats.total_lines,
            stats.original_size,
            language
        );
    }

    format!(
        "{}: {} -> {} chars ({:.1}%), kept {}/{} lines, {} ({})",
        name,
        stats.original_size,
        stats.compressed_size,
        stats.compression_ratio * 100.0,
        stats.kept_lines,
        stats.total_lines,
        format_size(stats.compressed_size, BINARY),
        language
    )
}
