//! Config subcommands handler

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use reviewpack::Config;

use super::load_config;

/// Show the effective configuration as TOML.
#[cfg(not(tarpaulin_include))]
pub fn handle_show(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    print!("{}", render_show(&config)?);
    Ok(())
}

/// Note appended to `config show`. Still valid TOML.
pub const SAMPLING_NOTE: &str = "# model.max_tokens and model.temperature are advisory: the agent CLIs\n\
# choose their own sampling settings. Use model.extra_args for CLI flags.\n";

/// Effective configuration as TOML, followed by [`SAMPLING_NOTE`].
pub fn render_show(config: &Config) -> Result<String> {
    let mut out = toml::to_string_pretty(config)?;
    out.push('\n');
    out.push_str(SAMPLING_NOTE);
    Ok(out)
}

/// Print the path of the config file in use.
#[cfg(not(tarpaulin_include))]
pub fn handle_path(config_path: Option<&Path>) -> Result<()> {
    println!("{}", resolve_path(config_path)?.display());
    Ok(())
}

/// Write the default configuration, refusing to overwrite without `force`.
#[cfg(not(tarpaulin_include))]
pub fn handle_init(config_path: Option<&Path>, force: bool) -> Result<()> {
    let path = resolve_path(config_path)?;
    init_at(&path, force)?;
    eprintln!("Wrote default config to {}", path.display());
    Ok(())
}

fn resolve_path(config_path: Option<&Path>) -> Result<PathBuf> {
    match config_path {
        Some(path) => Ok(path.to_path_buf()),
        None => Config::config_path(),
    }
}

/// Write defaults to `path`, backing up any file being replaced.
pub fn init_at(path: &Path, force: bool) -> Result<()> {
    if path.exists() {
        if !force {
            bail!(
                "{} already exists (use --force to overwrite)",
                path.display()
            );
        }
        let backup = backup_path(path);
        fs::copy(path, &backup)
            .with_context(|| format!("Failed to back up config to {}", backup.display()))?;
    }
    Config::default().save_to(path)
}

/// First free `<name>.bak`, `<name>.bak.1`, ... next to `path`.
fn backup_path(path: &Path) -> PathBuf {
    let mut backup = path.with_extension("toml.bak");
    let mut counter = 1u32;
    while backup.exists() {
        backup = path.with_extension(format!("toml.bak.{}", counter));
        counter += 1;
    }
    backup
}
