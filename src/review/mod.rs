//! Model-backed review of large files.
//!
//! # Module Structure
//!
//! - [`backend`] - the `ModelBackend` trait and agent CLI backends
//! - [`batch`] - token estimates and greedy batch packing
//! - [`coordinator`] - `LargeFileCoordinator`, the entry point
//! - [`parser`] - suggestion grammar over free-form model output
//! - [`prompt`] - review prompt templates

pub mod backend;
pub mod batch;
pub mod coordinator;
pub mod error;
pub mod parser;
pub mod progress;
pub mod prompt;
pub mod types;

pub use backend::{AgentType, BackendError, GenerationOptions, ModelBackend};
pub use batch::{Batch, BatchEntry, BatchPlanner, TokenBudget, MAX_BATCH_TOKENS, TOKENS_PER_CHAR};
pub use coordinator::{LargeFileConfig, LargeFileCoordinator};
pub use error::ReviewError;
pub use parser::{quality_score, ParseStrategy, SuggestionParser};
pub use progress::ProgressReporter;
pub use prompt::PromptTemplates;
pub use types::{LargeFileRequest, LargeFileResult};
