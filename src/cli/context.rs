//! Project state shared by the commands that resolve keys.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context as _, Result};
use rayon::prelude::*;
use tracing::debug;

use super::args::CommonArgs;
use super::scan::{ScanResult, scan_files, scan_paths};
use crate::config::{Config, load_config};
use crate::core::FileResolution;
use crate::engine::{DocumentChange, I18nEngine};

/// What came out of one source file.
#[derive(Debug)]
pub enum FileOutcome {
    Analyzed {
        path: PathBuf,
        source: String,
        resolution: FileResolution,
    },
    Failed {
        path: PathBuf,
        error: String,
    },
}

impl FileOutcome {
    pub fn path(&self) -> &Path {
        match self {
            Self::Analyzed { path, .. } | Self::Failed { path, .. } => path,
        }
    }

    pub fn resolution(&self) -> Option<&FileResolution> {
        match self {
            Self::Analyzed { resolution, .. } => Some(resolution),
            Self::Failed { .. } => None,
        }
    }
}

pub struct ProjectContext {
    pub config: Config,
    pub root_dir: PathBuf,
    pub engine: I18nEngine,
    pub verbose: bool,
}

impl ProjectContext {
    /// Load the config under `--root` (or the current directory) and build
    /// an engine for it. Locales are not loaded yet.
    pub fn new(common: &CommonArgs) -> Result<Self> {
        let start_dir = common.root.clone().unwrap_or_else(|| PathBuf::from("."));
        let config_result = load_config(&start_dir)?;

        if common.verbose && !config_result.from_file() {
            eprintln!("Note: No .i18nlensrc.json found, using default configuration");
        }

        let root_dir = config_result.root_dir(&start_dir);
        let mut config = config_result.config;

        if let Some(locale) = &common.locale {
            select_locale(&mut config, locale)?;
        }

        let engine = I18nEngine::with_defaults(config.engine.clone(), &root_dir)?;

        Ok(Self {
            config,
            root_dir,
            engine,
            verbose: common.verbose,
        })
    }

    /// Source files named on the command line, or the configured includes.
    pub fn scan(&self, paths: &[PathBuf]) -> ScanResult {
        let result = if paths.is_empty() {
            scan_files(
                &self.root_dir,
                &self.config.includes,
                &self.config.ignores,
                self.config.ignore_test_files,
            )
        } else {
            scan_paths(paths, &self.config.ignores, self.config.ignore_test_files)
        };

        if result.skipped_count > 0 {
            eprintln!(
                "Warning: {} path(s) skipped{}",
                result.skipped_count,
                if self.verbose { "" } else { " (use -v for details)" }
            );
        }
        result
    }

    /// Read and analyze files in parallel against the active locale.
    pub fn analyze_files(&self, files: &[PathBuf]) -> Vec<FileOutcome> {
        files
            .par_iter()
            .map(|path| self.analyze_file(path))
            .collect()
    }

    pub fn analyze_file(&self, path: &Path) -> FileOutcome {
        let source = match fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))
        {
            Ok(source) => source,
            Err(e) => {
                return FileOutcome::Failed {
                    path: path.to_path_buf(),
                    error: format!("{:#}", e),
                };
            }
        };

        let doc = DocumentChange::from_path(path, source.as_str());
        match self.engine.try_analyze(&doc) {
            Ok(resolution) => {
                debug!(
                    path = %path.display(),
                    resolved = resolution.resolved_count(),
                    missing = resolution.missing_count(),
                    "analyzed"
                );
                FileOutcome::Analyzed {
                    path: path.to_path_buf(),
                    source,
                    resolution,
                }
            }
            Err(e) => FileOutcome::Failed {
                path: path.to_path_buf(),
                error: e.to_string(),
            },
        }
    }
}

/// Put `locale` first while keeping the cycling order of the rest.
fn select_locale(config: &mut Config, locale: &str) -> Result<()> {
    let locales = &mut config.engine.supported_locales;
    let index = locales.iter().position(|l| l == locale).with_context(|| {
        format!(
            "Locale '{}' is not one of the supported locales ({})",
            locale,
            locales.join(", ")
        )
    })?;
    locales.rotate_left(index);
    Ok(())
}
