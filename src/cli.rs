//! CLI definitions for reviewpack
//!
//! Clap structures live apart from main.rs so command handlers and tests
//! can share them.

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell as CompletionShell;
use std::path::PathBuf;

/// Build clap styles for help output.
pub fn build_cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Green.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::White.on_default())
        .valid(AnsiColor::White.on_default())
        .invalid(AnsiColor::Red.on_default())
        .error(AnsiColor::Red.on_default() | Effects::BOLD)
}

#[derive(Parser)]
#[command(name = "reviewpack")]
#[command(about = "Compress and batch large source files for LLM code review")]
#[command(
    long_about = "reviewpack shrinks large source files into representative excerpts that fit a
model's input budget, fingerprints content for caching, and groups many large
files into token-bounded review batches.

QUICK START:
    reviewpack compress src/big.rs          Print the compressed excerpt
    reviewpack fingerprint src/big.rs       Print the structural fingerprint
    reviewpack plan src/*.rs                Show how files would be batched
    reviewpack review src/*.rs              Review files with the configured agent

Logging goes to stderr and is controlled with -v or REVIEWPACK_LOG."
)]
#[command(version)]
#[command(styles = build_cli_styles())]
pub struct Cli {
    /// Use this config file instead of ~/.config/reviewpack/config.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Compression overrides shared by several commands.
#[derive(Args, Debug, Clone, Default)]
pub struct CompressionArgs {
    /// Compress content longer than this many characters
    #[arg(long, value_name = "CHARS")]
    pub max_length: Option<usize>,
    /// Lines always kept from the start of the file
    #[arg(long, value_name = "LINES")]
    pub header: Option<usize>,
    /// Lines always kept from the end of the file
    #[arg(long, value_name = "LINES")]
    pub footer: Option<usize>,
    /// Fraction of middle lines to keep, in (0, 1]
    #[arg(long, value_name = "RATE")]
    pub rate: Option<f64>,
    /// Language hint instead of detection (e.g. rust, python)
    #[arg(long, short)]
    pub language: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print a compressed excerpt of a file
    #[command(long_about = "Compress a file and print the result on stdout.

Files at or below the length threshold are printed unchanged. Compression
statistics are written to stderr.

EXAMPLES:
    reviewpack compress src/big.rs
    reviewpack compress app.ts --rate 0.3 --stats
    reviewpack compress notes.txt --max-length 5000 --language markdown")]
    Compress {
        /// File to compress
        file: PathBuf,
        #[command(flatten)]
        compression: CompressionArgs,
        /// Prepend a statistics block to the output
        #[arg(long)]
        stats: bool,
    },

    /// Print the structural fingerprint of a file as JSON
    #[command(long_about = "Print a JSON fingerprint of a file.

The full fingerprint contains line, token and comment counts, language
specific structure counts and a content hash. --fast prints only the
length-plus-edges hash used as a cheap change pre-check.

EXAMPLES:
    reviewpack fingerprint src/lib.rs
    reviewpack fingerprint src/lib.rs --fast")]
    Fingerprint {
        /// File to fingerprint
        file: PathBuf,
        /// Language hint instead of detection
        #[arg(long, short)]
        language: Option<String>,
        /// Only hash the first and last 1000 characters plus the length
        #[arg(long)]
        fast: bool,
    },

    /// Show how large files would be grouped into batches
    #[command(long_about = "Plan review batches without calling a model.

Files above the large-file threshold are compressed, their token cost is
estimated, and they are packed in order into batches under the token
ceiling. Files below the threshold are listed as skipped.

EXAMPLE:
    reviewpack plan src/*.rs --json")]
    Plan {
        /// Files to plan
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[command(flatten)]
        compression: CompressionArgs,
        /// Per-batch token ceiling
        #[arg(long, value_name = "TOKENS")]
        max_batch_tokens: Option<usize>,
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Review files with an agent CLI and print suggestions as JSON
    #[command(long_about = "Review files with the configured agent CLI.

Large files are compressed and processed batch by batch. Smaller files are
sent whole, or as a diff when --previous-dir holds an older copy. A failing
file gets an error placeholder and the run continues.

EXAMPLES:
    reviewpack review src/big.rs
    reviewpack review src/*.rs --agent gemini --workers 4
    reviewpack review src/*.rs --large-only --timeout 300")]
    Review {
        /// Files to review
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[command(flatten)]
        compression: CompressionArgs,
        /// Agent CLI to use (claude, codex, gemini)
        #[arg(long, short)]
        agent: Option<String>,
        /// Files reviewed concurrently within a batch
        #[arg(long, short)]
        workers: Option<usize>,
        /// Timeout per model call in seconds
        #[arg(long, short)]
        timeout: Option<u64>,
        /// Only review files above the large-file threshold
        #[arg(long)]
        large_only: bool,
        /// Directory holding previous versions, matched by relative path
        #[arg(long, value_name = "DIR")]
        previous_dir: Option<PathBuf>,
        /// Directory with diff.txt / full_file.txt / large_file.txt overrides
        #[arg(long, value_name = "DIR")]
        templates: Option<PathBuf>,
    },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    #[command(long_about = "Print a shell completion script on stdout.

EXAMPLES:
    reviewpack completions bash > ~/.local/share/bash-completion/completions/reviewpack
    reviewpack completions zsh > ~/.zfunc/_reviewpack")]
    Completions {
        /// Target shell
        shell: CompletionShell,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration as TOML
    Show,
    /// Print the config file path
    Path,
    /// Write a default config file
    #[command(long_about = "Write the default configuration to the config file.

Refuses to overwrite an existing file unless --force is given.

EXAMPLE:
    reviewpack config init")]
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}
