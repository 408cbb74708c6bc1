//! i18n-lens - locale-key resolution for React/Next.js sources
//!
//! i18n-lens finds namespace-scoped translation hooks
//! (`const t = useI18n("home")`) in JS/TS/JSX/TSX documents, composes the keys
//! their accessor calls reference, and classifies each one as resolved or
//! missing against a live, file-watched locale dictionary.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (`check`, `keys`, `watch`, `init`)
//! - `config`: Configuration file loading and validation
//! - `core`: Parsing, binding discovery and key resolution (pure, per document)
//! - `engine`: The session a host drives: documents in, resolutions out
//! - `error`: Error taxonomy
//! - `logging`: tracing subscriber setup for the binary
//! - `store`: Per-locale key dictionaries with atomic delta merges
//! - `watch`: Debounced locale file watching

pub mod cli;
pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod logging;
pub mod store;
pub mod watch;

pub use config::EngineConfig;
pub use engine::{DictionaryChanged, DocumentChange, I18nEngine};
pub use error::{ConfigError, Error, LocaleLoadError, ParseError, Result};
