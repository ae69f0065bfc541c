//! Review command handler

use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

use reviewpack::review::{
    quality_score, LargeFileCoordinator, LargeFileRequest, LargeFileResult, ModelBackend,
    ProgressReporter, PromptTemplates,
};

use super::plan::build_coordinator;
use super::{apply_compression_args, load_config, read_request};
use crate::cli::CompressionArgs;

/// Command-line overrides for a review run.
#[derive(Debug, Clone, Default)]
pub struct ReviewOptions {
    pub agent: Option<String>,
    pub workers: Option<usize>,
    pub timeout: Option<u64>,
    pub large_only: bool,
    pub previous_dir: Option<PathBuf>,
    pub templates: Option<PathBuf>,
}

/// Review outcome for one file as printed on stdout.
#[derive(Debug, Clone, Serialize)]
pub struct FileReview {
    pub file_path: String,
    pub large: bool,
    pub score: Option<u8>,
    /// 1-10 heuristic, absent for failed files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<u8>,
    pub suggestions: Vec<String>,
}

impl FileReview {
    fn new(file_path: String, large: bool, result: LargeFileResult) -> Self {
        let quality = if result.is_error() {
            None
        } else {
            Some(quality_score(result.suggestions.len()))
        };
        Self {
            file_path,
            large,
            score: result.score,
            quality,
            suggestions: result.suggestions,
        }
    }
}

/// Review `files` with the configured agent and print JSON results.
#[cfg(not(tarpaulin_include))]
pub fn handle(
    config_path: Option<&Path>,
    files: &[PathBuf],
    args: &CompressionArgs,
    options: &ReviewOptions,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    apply_compression_args(&mut config.compression, args)?;
    if let Some(ref agent) = options.agent {
        config.model.agent = agent.clone();
    }
    if let Some(workers) = options.workers {
        config.large_file.workers = workers;
    }
    if let Some(timeout) = options.timeout {
        config.model.timeout = timeout;
    }
    config.validate().map_err(|e| anyhow!(e))?;

    let agent = config.model.agent_type().map_err(|e| anyhow!(e))?;
    let backend = agent.create_backend(config.model.extra_args.clone());
    if !backend.is_available() {
        bail!(
            "{} CLI '{}' not found in PATH",
            agent,
            agent.command_name()
        );
    }

    let templates = match options.templates {
        Some(ref dir) => PromptTemplates::load_overrides(dir)
            .with_context(|| format!("Failed to load templates from {}", dir.display()))?,
        None => PromptTemplates::default(),
    };

    let requests = files
        .iter()
        .map(|path| read_request(path, options.previous_dir.as_deref()))
        .collect::<Result<Vec<_>>>()?;

    let coordinator = build_coordinator(&config, backend).with_templates(templates);
    let reviews = review_requests(&coordinator, &requests, options.large_only, |done, total, path| {
        eprintln!("[{}/{}] {}", done, total, path);
    });

    println!("{}", serde_json::to_string_pretty(&reviews)?);
    Ok(())
}

/// Review every request, large files batch by batch and the rest one by one.
///
/// Results come back in input order. With `large_only`, files below the
/// threshold are left out.
pub fn review_requests<B, F>(
    coordinator: &LargeFileCoordinator<B>,
    requests: &[LargeFileRequest],
    large_only: bool,
    on_progress: F,
) -> Vec<FileReview>
where
    B: ModelBackend,
    F: Fn(usize, usize, &str) + Send + Sync + 'static,
{
    let batches = coordinator.plan_batches(requests);
    let large_count: usize = batches.iter().map(|b| b.len()).sum();
    let small_count = if large_only {
        0
    } else {
        requests.len() - large_count
    };

    let progress = ProgressReporter::with_callback(large_count + small_count, on_progress);
    let large_results = coordinator.process_batches_with_progress(&batches, &progress);

    let mut reviews = Vec::with_capacity(requests.len());
    for request in requests {
        if coordinator.is_large(request) {
            // A path listed twice maps to one result; report it each time.
            if let Some(result) = large_results.get(&request.file_path) {
                reviews.push(FileReview::new(request.file_path.clone(), true, result.clone()));
            }
        } else if !large_only {
            let result = coordinator.process_small(request);
            progress.report(&request.file_path);
            reviews.push(FileReview::new(request.file_path.clone(), false, result));
        }
    }

    reviews
}
