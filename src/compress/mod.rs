//! Language-aware content compression for size-limited model prompts.
//!
//! Large source files cannot be sent to a model verbatim. This module reduces
//! a file to a representative excerpt: the head and tail are kept as-is and
//! the middle is sampled by per-line importance.
//!
//! # Pipeline
//!
//! 1. [`language`] guesses the language from a bounded content sample
//! 2. [`scorer`] assigns every middle line an importance score
//! 3. [`compressor`] keeps the highest-scoring lines in reading order
//!
//! [`fingerprint`] runs independently of the pipeline and summarizes content
//! for cache keys and change detection.
//!
//! Every function here is pure: no I/O, no shared mutable state, no errors.
//! Pattern tables are compiled once on first use.

pub mod compressor;
pub mod fingerprint;
pub mod language;
pub mod scorer;

pub use compressor::{
    compress, CompressedContent, CompressionConfig, CompressionStats, COMPRESSED_SECTION_MARKER,
    END_OF_FILE_MARKER,
};
pub use fingerprint::{fast_fingerprint, fingerprint, ContentFingerprint, FastFingerprint};
pub use language::{detect, LanguageTag};
pub use scorer::{score_line, score_lines, ScoredLine};
