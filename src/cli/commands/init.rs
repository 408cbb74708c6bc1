use std::{fs, path::Path};

use anyhow::{Context, Result};
use colored::Colorize;

use super::super::exit_status::ExitStatus;
use super::super::report::SUCCESS_MARK;
use crate::config::{CONFIG_FILE_NAME, Config, default_config_json};

/// Write the default configuration into `dir`, refusing to overwrite.
pub fn init(dir: &Path) -> Result<ExitStatus> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() {
        eprintln!("Error: {} already exists", CONFIG_FILE_NAME);
        return Ok(ExitStatus::Failure);
    }

    let content = default_config_json().context("Failed to serialize default config")?;
    fs::write(&config_path, content + "\n")
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!(
        "{} {}",
        SUCCESS_MARK.green(),
        format!("Created {}", CONFIG_FILE_NAME).green()
    );
    let defaults = Config::default();
    println!(
        "  locales {} from {}",
        defaults.engine.supported_locales.join(", ").cyan(),
        defaults.engine.locale_paths.join(", ").cyan()
    );

    Ok(ExitStatus::Success)
}
