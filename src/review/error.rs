//! Errors raised by the review coordinator.

use super::backend::BackendError;
use thiserror::Error;

/// Failure while reviewing a single file.
///
/// Only [`ReviewError::NotLarge`] ever escapes `process_one`; template and
/// backend failures are folded into an error placeholder result.
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("{file_path} is not a large file ({chars} chars, threshold {threshold})")]
    NotLarge {
        file_path: String,
        chars: usize,
        threshold: usize,
    },

    #[error("Prompt template error: {0}")]
    Template(String),

    #[error(transparent)]
    Backend(#[from] BackendError),
}
