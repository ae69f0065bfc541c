//! Thread-safe progress counting for batch processing.

use std::sync::atomic::{AtomicUsize, Ordering};

type Callback = Box<dyn Fn(usize, usize, &str) + Send + Sync>;

/// Counts processed files and forwards each step to an optional callback.
///
/// The callback receives `(completed, total, file_path)` and may be invoked
/// from worker threads.
pub struct ProgressReporter {
    completed: AtomicUsize,
    total: usize,
    callback: Option<Callback>,
}

impl ProgressReporter {
    pub fn new(total: usize) -> Self {
        Self {
            completed: AtomicUsize::new(0),
            total,
            callback: None,
        }
    }

    pub fn with_callback<F>(total: usize, callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        Self {
            completed: AtomicUsize::new(0),
            total,
            callback: Some(Box::new(callback)),
        }
    }

    /// Record one finished file. Returns the new completed count.
    pub fn report(&self, file_path: &str) -> usize {
        let completed = self.completed.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(ref callback) = self.callback {
            callback(completed, self.total, file_path);
        }
        completed
    }

    /// `(completed, total)`.
    pub fn get_progress(&self) -> (usize, usize) {
        (self.completed.load(Ordering::SeqCst), self.total)
    }
}

impl std::fmt::Debug for ProgressReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("completed", &self.completed)
            .field("total", &self.total)
            .finish_non_exhaustive()
    }
}
