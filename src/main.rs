//! reviewpack - CLI entry point

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, ConfigCommands};
use commands::review::ReviewOptions;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "REVIEWPACK_LOG";

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("reviewpack=debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(not(tarpaulin_include))]
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.config.as_deref();

    match cli.command {
        Commands::Compress {
            file,
            compression,
            stats,
        } => commands::compress::handle(config, &file, &compression, stats),
        Commands::Fingerprint {
            file,
            language,
            fast,
        } => commands::fingerprint::handle(&file, language.as_deref(), fast),
        Commands::Plan {
            files,
            compression,
            max_batch_tokens,
            json,
        } => commands::plan::handle(config, &files, &compression, max_batch_tokens, json),
        Commands::Review {
            files,
            compression,
            agent,
            workers,
            timeout,
            large_only,
            previous_dir,
            templates,
        } => {
            let options = ReviewOptions {
                agent,
                workers,
                timeout,
                large_only,
                previous_dir,
                templates,
            };
            commands::review::handle(config, &files, &compression, &options)
        }
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => commands::config::handle_show(config),
            ConfigCommands::Path => commands::config::handle_path(config),
            ConfigCommands::Init { force } => commands::config::handle_init(config, force),
        },
        Commands::Completions { shell } => commands::completions::handle::<Cli>(shell),
    }
}
