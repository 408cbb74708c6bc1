//! Error taxonomy of the resolution engine.
//!
//! Every fallible operation in the library returns one of these tagged errors.
//! None of them is fatal to the host: a [`ParseError`] empties one file's
//! results, a [`LocaleLoadError`] keeps the file's previous keys, and a
//! [`ConfigError`] only stops the dictionary/watcher subsystem from starting.
//! A key that is not in the dictionary is not an error at all; it is reported
//! as a missing entry.

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::core::SourcePosition;

/// Source text is not valid for the configured language.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("parse error at {position}: {message}")]
pub struct ParseError {
    pub message: String,
    pub position: SourcePosition,
}

impl ParseError {
    pub fn new(message: impl Into<String>, position: SourcePosition) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

/// A locale-definition file could not be turned into data.
#[derive(Debug, Error)]
pub enum LocaleLoadError {
    #[error("failed to read locale file {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to parse locale file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to evaluate locale file {}: {message}", path.display())]
    Evaluate { path: PathBuf, message: String },

    #[error("loader task for {} did not complete: {message}", path.display())]
    Join { path: PathBuf, message: String },
}

impl LocaleLoadError {
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::Read { path, .. }
            | Self::Parse { path, .. }
            | Self::Evaluate { path, .. }
            | Self::Join { path, .. } => path,
        }
    }
}

/// Malformed engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("'supportedLocales' must list at least one locale")]
    NoSupportedLocales,

    #[error("'hookMatchNames' must name at least one hook")]
    NoHookNames,

    #[error("'localePaths' must contain at least one path template")]
    NoLocaleTemplate,

    #[error("locale path template \"{0}\" has no {{locale}} placeholder")]
    MissingLocalePlaceholder(String),

    #[error("invalid locale path template \"{template}\": {message}")]
    InvalidTemplate { template: String, message: String },

    #[error("invalid glob pattern in '{field}': \"{pattern}\": {message}")]
    InvalidPattern {
        field: &'static str,
        pattern: String,
        message: String,
    },

    #[error("failed to read config file {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    LocaleLoad(#[from] LocaleLoadError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;
