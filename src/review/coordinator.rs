//! Large-file review coordination.
//!
//! The coordinator decides which files are too large to send whole,
//! compresses them, asks the model for suggestions, and spreads many files
//! over token-bounded batches. A failing file never stops the run: its
//! result becomes an error placeholder and processing moves on.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::backend::{GenerationOptions, ModelBackend};
use super::batch::{Batch, BatchEntry, BatchPlanner, TokenBudget, MAX_BATCH_TOKENS, TOKENS_PER_CHAR};
use super::error::ReviewError;
use super::parser::SuggestionParser;
use super::progress::ProgressReporter;
use super::prompt::PromptTemplates;
use super::types::{LargeFileRequest, LargeFileResult};
use crate::compress::{self, CompressedContent, CompressionConfig};

/// Large-file handling settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LargeFileConfig {
    /// When false no file is considered large
    pub enabled: bool,
    /// Files longer than this many characters are large
    pub size_threshold: usize,
    pub max_batch_tokens: usize,
    pub tokens_per_char: f64,
    /// Files processed concurrently within a batch (1 = sequential)
    pub workers: usize,
}

impl Default for LargeFileConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            size_threshold: 20_000,
            max_batch_tokens: MAX_BATCH_TOKENS,
            tokens_per_char: TOKENS_PER_CHAR,
            workers: 1,
        }
    }
}

impl LargeFileConfig {
    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_batch_tokens == 0 {
            return Err("large_file.max_batch_tokens must be greater than 0".to_string());
        }
        if !(self.tokens_per_char > 0.0 && self.tokens_per_char.is_finite()) {
            return Err(format!(
                "large_file.tokens_per_char {} must be a positive number",
                self.tokens_per_char
            ));
        }
        if !(1..=32).contains(&self.workers) {
            return Err(format!(
                "large_file.workers {} must be between 1 and 32",
                self.workers
            ));
        }
        Ok(())
    }

    pub fn budget(&self) -> TokenBudget {
        TokenBudget::new(self.max_batch_tokens, self.tokens_per_char)
    }
}

/// Reviews large files through a [`ModelBackend`].
pub struct LargeFileCoordinator<B: ModelBackend> {
    config: LargeFileConfig,
    compression: CompressionConfig,
    backend: B,
    options: GenerationOptions,
    templates: PromptTemplates,
    parser: SuggestionParser,
    planner: BatchPlanner,
}

impl<B: ModelBackend> LargeFileCoordinator<B> {
    pub fn new(config: LargeFileConfig, compression: CompressionConfig, backend: B) -> Self {
        let planner = BatchPlanner::new(config.budget());
        Self {
            config,
            compression,
            backend,
            options: GenerationOptions::default(),
            templates: PromptTemplates::default(),
            parser: SuggestionParser::default(),
            planner,
        }
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_templates(mut self, templates: PromptTemplates) -> Self {
        self.templates = templates;
        self
    }

    pub fn with_parser(mut self, parser: SuggestionParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn config(&self) -> &LargeFileConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Whether `request` is above the size threshold.
    pub fn is_large(&self, request: &LargeFileRequest) -> bool {
        self.config.enabled && request.char_len() > self.config.size_threshold
    }

    /// Compress a request's content, honoring its language hint.
    pub fn compress(&self, request: &LargeFileRequest) -> CompressedContent {
        match request.language.as_deref() {
            Some(language) => compress::compress(
                &request.current_content,
                &self.compression.with_language(language),
            ),
            None => compress::compress(&request.current_content, &self.compression),
        }
    }

    /// Review one large file.
    ///
    /// Fails only when `request` is not large. Prompt and model failures
    /// produce an error placeholder with score 0.
    pub fn process_one(&self, request: &LargeFileRequest) -> Result<LargeFileResult, ReviewError> {
        if !self.is_large(request) {
            return Err(ReviewError::NotLarge {
                file_path: request.file_path.clone(),
                chars: request.char_len(),
                threshold: self.config.size_threshold,
            });
        }

        match self.review_large(request) {
            Ok(result) => Ok(result),
            Err(e) => {
                warn!(file = %request.file_path, error = %e, "large file review failed");
                Ok(LargeFileResult::error(e))
            }
        }
    }

    fn review_large(&self, request: &LargeFileRequest) -> Result<LargeFileResult, ReviewError> {
        let compressed = self.compress(request);
        let prompt = self.templates.render_large_file(
            &request.file_path,
            request.file_type(),
            &compressed.text,
        )?;
        self.generate(request, &prompt)
    }

    /// Review a file that fits in one prompt.
    ///
    /// Uses the diff template when the previous version is known and the
    /// full-file template otherwise. Failures produce an error placeholder.
    pub fn process_small(&self, request: &LargeFileRequest) -> LargeFileResult {
        let prompt = match request.previous_content.as_deref() {
            Some(previous) => self.templates.render_diff(
                &request.file_path,
                request.file_type(),
                previous,
                &request.current_content,
            ),
            None => self.templates.render_full_file(
                &request.file_path,
                request.file_type(),
                &request.current_content,
            ),
        };

        match prompt.and_then(|prompt| self.generate(request, &prompt)) {
            Ok(result) => result,
            Err(e) => {
                warn!(file = %request.file_path, error = %e, "file review failed");
                LargeFileResult::error(e)
            }
        }
    }

    fn generate(&self, request: &LargeFileRequest, prompt: &str) -> Result<LargeFileResult, ReviewError> {
        let response = self.backend.generate_content(prompt, &self.options)?;
        let parsed = self.parser.parse(&response);
        debug!(
            file = %request.file_path,
            suggestions = parsed.suggestions.len(),
            strategy = ?parsed.strategy,
            "parsed model response"
        );
        Ok(LargeFileResult::new(parsed.suggestions))
    }

    /// Group the large requests into token-bounded batches, in input order.
    ///
    /// Requests that are not large are skipped.
    pub fn plan_batches(&self, requests: &[LargeFileRequest]) -> Vec<Batch> {
        let budget = self.planner.budget();
        let entries = requests
            .iter()
            .filter(|request| self.is_large(request))
            .map(|request| {
                let compressed_chars = self.compress(request).stats.compressed_size;
                BatchEntry {
                    request: request.clone(),
                    compressed_chars,
                    estimated_tokens: budget.estimate(compressed_chars),
                }
            });

        let batches = self.planner.plan(entries);
        debug!(
            requests = requests.len(),
            batches = batches.len(),
            ceiling = budget.max_batch_tokens,
            "planned batches"
        );
        batches
    }

    /// Process every batch, returning one result per file path.
    pub fn process_batches(&self, batches: &[Batch]) -> BTreeMap<String, LargeFileResult> {
        let total = batches.iter().map(Batch::len).sum();
        self.process_batches_with_progress(batches, &ProgressReporter::new(total))
    }

    /// [`Self::process_batches`] with progress reporting.
    pub fn process_batches_with_progress(
        &self,
        batches: &[Batch],
        progress: &ProgressReporter,
    ) -> BTreeMap<String, LargeFileResult> {
        let pool = self.build_pool();
        let mut results = BTreeMap::new();

        for batch in batches {
            info!(
                batch = batch.id + 1,
                of = batches.len(),
                files = batch.len(),
                tokens = batch.total_tokens(),
                "processing batch"
            );

            let batch_results: Vec<(String, LargeFileResult)> = match &pool {
                Some(pool) if batch.len() > 1 => pool.install(|| {
                    batch
                        .entries
                        .par_iter()
                        .map(|entry| self.process_entry(entry, progress))
                        .collect()
                }),
                _ => batch
                    .entries
                    .iter()
                    .map(|entry| self.process_entry(entry, progress))
                    .collect(),
            };

            results.extend(batch_results);
        }

        results
    }

    fn process_entry(&self, entry: &BatchEntry, progress: &ProgressReporter) -> (String, LargeFileResult) {
        let request = &entry.request;
        let result = self.process_one(request).unwrap_or_else(|e| {
            warn!(file = %request.file_path, error = %e, "skipping file in batch");
            LargeFileResult::error(e)
        });
        progress.report(&request.file_path);
        (request.file_path.clone(), result)
    }

    /// Dedicated pool for in-batch parallelism, or `None` for sequential.
    fn build_pool(&self) -> Option<rayon::ThreadPool> {
        if self.config.workers <= 1 {
            return None;
        }

        match rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.workers)
            .thread_name(|i| format!("review-{}", i))
            .build()
        {
            Ok(pool) => Some(pool),
            Err(e) => {
                warn!(error = %e, "failed to build worker pool, processing sequentially");
                None
            }
        }
    }

    /// Plan and process `requests` in one call.
    pub fn review_all(&self, requests: &[LargeFileRequest]) -> BTreeMap<String, LargeFileResult> {
        let batches = self.plan_batches(requests);
        self.process_batches(&batches)
    }
}
