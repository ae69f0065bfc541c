//! Token budget and batch planning for large-file review.
//!
//! Files are packed greedily, in input order, into batches whose summed
//! token estimate stays under the budget ceiling. A file whose own estimate
//! is above the ceiling is never split; it forms a batch on its own.

use super::types::LargeFileRequest;
use serde::Serialize;

/// Default ratio used to turn characters into estimated tokens.
pub const TOKENS_PER_CHAR: f64 = 0.25;

/// Default per-batch token ceiling.
pub const MAX_BATCH_TOKENS: usize = 4000;

/// Token accounting for batch planning.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenBudget {
    /// Ceiling on the summed estimate of one batch
    pub max_batch_tokens: usize,
    /// Estimated tokens per character of compressed content
    pub tokens_per_char: f64,
}

impl Default for TokenBudget {
    fn default() -> Self {
        Self {
            max_batch_tokens: MAX_BATCH_TOKENS,
            tokens_per_char: TOKENS_PER_CHAR,
        }
    }
}

impl TokenBudget {
    pub fn new(max_batch_tokens: usize, tokens_per_char: f64) -> Self {
        Self {
            max_batch_tokens,
            tokens_per_char,
        }
    }

    /// Estimated tokens for `chars` characters, rounded up.
    pub fn estimate(&self, chars: usize) -> usize {
        (chars as f64 * self.tokens_per_char).ceil() as usize
    }

    /// Whether `tokens` alone exceeds the ceiling.
    pub fn is_oversized(&self, tokens: usize) -> bool {
        tokens > self.max_batch_tokens
    }
}

/// A request with its size estimate.
#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    pub request: LargeFileRequest,
    pub compressed_chars: usize,
    pub estimated_tokens: usize,
}

impl BatchEntry {
    pub fn file_path(&self) -> &str {
        &self.request.file_path
    }
}

/// An ordered group of requests sent as one unit of work.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Batch {
    pub id: usize,
    pub entries: Vec<BatchEntry>,
}

impl Batch {
    pub fn total_tokens(&self) -> usize {
        self.entries.iter().map(|e| e.estimated_tokens).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn requests(&self) -> impl Iterator<Item = &LargeFileRequest> {
        self.entries.iter().map(|e| &e.request)
    }
}

/// Greedy single-pass batch packer.
#[derive(Debug, Clone, Default)]
pub struct BatchPlanner {
    budget: TokenBudget,
}

impl BatchPlanner {
    pub fn new(budget: TokenBudget) -> Self {
        Self { budget }
    }

    pub fn budget(&self) -> &TokenBudget {
        &self.budget
    }

    /// Pack `entries` into batches, preserving their order.
    pub fn plan(&self, entries: impl IntoIterator<Item = BatchEntry>) -> Vec<Batch> {
        let mut batches = Vec::new();
        let mut current = Batch::default();
        let mut used = 0;

        for entry in entries {
            if !current.is_empty() && used + entry.estimated_tokens > self.budget.max_batch_tokens {
                let id = batches.len();
                batches.push(Batch {
                    id,
                    entries: std::mem::take(&mut current.entries),
                });
                used = 0;
            }
            used += entry.estimated_tokens;
            current.entries.push(entry);
        }

        if !current.is_empty() {
            current.id = batches.len();
            batches.push(current);
        }

        batches
    }
}
