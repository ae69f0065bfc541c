//! reviewpack library
//!
//! Shrinks large source files into representative excerpts, fingerprints
//! content for cache keys, and reviews many large files through an agent
//! CLI in token-bounded batches.
//!
//! # Module Structure
//!
//! - [`compress`] - language detection, line scoring, compression and fingerprints
//! - [`review`] - model backends, prompts, batching and the large-file coordinator
//! - [`config`] - TOML configuration

pub mod compress;
pub mod config;
pub mod review;

pub use compress::{compress, fingerprint, CompressionConfig, ContentFingerprint};
pub use config::Config;
pub use review::{LargeFileCoordinator, LargeFileRequest, LargeFileResult, ModelBackend};
