//! Plan command handler

use anyhow::{anyhow, Result};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

use reviewpack::review::{Batch, LargeFileCoordinator, ModelBackend};
use reviewpack::Config;

use super::{apply_compression_args, load_config, read_request};
use crate::cli::CompressionArgs;

/// Print how `files` would be batched. No model is called.
#[cfg(not(tarpaulin_include))]
pub fn handle(
    config_path: Option<&Path>,
    files: &[PathBuf],
    args: &CompressionArgs,
    max_batch_tokens: Option<usize>,
    json: bool,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    apply_compression_args(&mut config.compression, args)?;
    if let Some(ceiling) = max_batch_tokens {
        config.large_file.max_batch_tokens = ceiling;
    }
    config.validate().map_err(|e| anyhow!(e))?;

    let requests = files
        .iter()
        .map(|path| read_request(path, None))
        .collect::<Result<Vec<_>>>()?;

    let agent = config.model.agent_type().map_err(|e| anyhow!(e))?;
    let coordinator = build_coordinator(&config, agent.create_backend(config.model.extra_args.clone()));
    let batches = coordinator.plan_batches(&requests);
    let skipped: Vec<&str> = requests
        .iter()
        .filter(|request| !coordinator.is_large(request))
        .map(|request| request.file_path.as_str())
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&plan_json(&batches, &skipped))?);
    } else {
        print!("{}", plan_text(&batches, &skipped, config.large_file.max_batch_tokens));
    }
    Ok(())
}

/// Coordinator wired from the loaded configuration.
pub fn build_coordinator<B: ModelBackend>(config: &Config, backend: B) -> LargeFileCoordinator<B> {
    LargeFileCoordinator::new(
        config.large_file.clone(),
        config.compression.clone(),
        backend,
    )
    .with_options(config.model.generation_options())
}

/// Batch plan without file contents.
pub fn plan_json(batches: &[Batch], skipped: &[&str]) -> Value {
    let batches: Vec<Value> = batches
        .iter()
        .map(|batch| {
            let files: Vec<Value> = batch
                .entries
                .iter()
                .map(|entry| {
                    json!({
                        "file_path": entry.file_path(),
                        "original_chars": entry.request.char_len(),
                        "compressed_chars": entry.compressed_chars,
                        "estimated_tokens": entry.estimated_tokens,
                    })
                })
                .collect();
            json!({
                "id": batch.id,
                "total_tokens": batch.total_tokens(),
                "files": files,
            })
        })
        .collect();

    json!({
        "batches": batches,
        "skipped": skipped,
    })
}

/// Human-readable batch plan.
pub fn plan_text(batches: &[Batch], skipped: &[&str], ceiling: usize) -> String {
    let mut out = String::new();

    if batches.is_empty() {
        out.push_str("No large files to batch.\n");
    }

    for batch in batches {
        let over = if batch.total_tokens() > ceiling {
            " (over ceiling)"
        } else {
            ""
        };
        out.push_str(&format!(
            "Batch {}: {} file(s), ~{} tokens{}\n",
            batch.id + 1,
            batch.len(),
            batch.total_tokens(),
            over
        ));
        for entry in &batch.entries {
            out.push_str(&format!(
                "  {}  {} -> {} chars, ~{} tokens\n",
                entry.file_path(),
                entry.request.char_len(),
                entry.compressed_chars,
                entry.estimated_tokens
            ));
        }
    }

    if !skipped.is_empty() {
        out.push_str(&format!("Skipped {} file(s) below the threshold:\n", skipped.len()));
        for path in skipped {
            out.push_str(&format!("  {}\n", path));
        }
    }

    out
}
