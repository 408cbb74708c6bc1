//! Key dictionary store.
//!
//! Holds one [`LocaleDictionary`] snapshot per locale plus the per-file
//! contributions needed to merge incremental changes. Writes are serialized;
//! reads clone an `Arc` and never wait on a merge.

pub mod dictionary;

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::core::FlatMessages;
use crate::core::parsers::{LocaleLoader, load_flattened};
use crate::error::LocaleLoadError;

pub use dictionary::{LocaleDictionary, LocaleFileMapping};

/// Outcome of loading a set of locale files.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub locale: String,
    pub loaded: usize,
    pub errors: Vec<LocaleLoadError>,
}

impl LoadReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

pub struct KeyDictionaryStore {
    loader: Arc<dyn LocaleLoader>,
    current: RwLock<String>,
    snapshots: RwLock<HashMap<String, Arc<LocaleDictionary>>>,
    /// Writer-only state. Holding this lock serializes merges.
    files: Mutex<HashMap<String, LocaleFileMapping>>,
}

impl KeyDictionaryStore {
    pub fn new(loader: Arc<dyn LocaleLoader>, initial_locale: impl Into<String>) -> Self {
        Self {
            loader,
            current: RwLock::new(initial_locale.into()),
            snapshots: RwLock::new(HashMap::new()),
            files: Mutex::new(HashMap::new()),
        }
    }

    pub fn current_locale(&self) -> String {
        self.current.read().clone()
    }

    /// Switch the active locale. Lookups see nothing until it is loaded.
    pub fn set_locale(&self, locale: impl Into<String>) {
        let locale = locale.into();
        info!(locale = %locale, "switched locale");
        *self.current.write() = locale;
    }

    /// Move to the locale after the current one in `supported`, wrapping
    /// around. An unknown current locale moves to the first entry.
    pub fn cycle_locale(&self, supported: &[String]) -> Option<String> {
        let mut current = self.current.write();
        let next = match supported.iter().position(|l| *l == *current) {
            Some(index) => supported.get((index + 1) % supported.len()),
            None => supported.first(),
        }?
        .clone();
        let previous = std::mem::replace(&mut *current, next.clone());
        info!(from = %previous, to = %next, "switched locale");
        Some(next)
    }

    /// Snapshot of `locale`, if it has been loaded.
    pub fn snapshot(&self, locale: &str) -> Option<Arc<LocaleDictionary>> {
        self.snapshots.read().get(locale).cloned()
    }

    /// Snapshot of the active locale, if it has been loaded.
    pub fn current_snapshot(&self) -> Option<Arc<LocaleDictionary>> {
        let locale = self.current_locale();
        self.snapshot(&locale)
    }

    pub fn is_loaded(&self, locale: &str) -> bool {
        self.snapshots.read().contains_key(locale)
    }

    /// Files currently contributing to `locale`, in merge order.
    pub fn files(&self, locale: &str) -> Vec<PathBuf> {
        self.files
            .lock()
            .get(locale)
            .map(|mapping| mapping.paths().map(Path::to_path_buf).collect())
            .unwrap_or_default()
    }

    /// Evaluate every file of `locale` and publish their right-biased merge.
    ///
    /// Files are evaluated on blocking worker threads. A file that fails keeps
    /// the contribution it had from an earlier load; its error is logged and
    /// returned in the report.
    pub async fn load_all(&self, locale: &str, paths: &[PathBuf]) -> LoadReport {
        let mut tasks = Vec::with_capacity(paths.len());
        for path in paths {
            let loader = Arc::clone(&self.loader);
            let path = path.clone();
            tasks.push((
                path.clone(),
                tokio::task::spawn_blocking(move || load_flattened(loader.as_ref(), &path)),
            ));
        }

        let mut outcomes = Vec::with_capacity(tasks.len());
        for (path, task) in tasks {
            let outcome = match task.await {
                Ok(result) => result,
                Err(e) => Err(LocaleLoadError::Join {
                    path: path.clone(),
                    message: e.to_string(),
                }),
            };
            outcomes.push((path, outcome));
        }

        let mut report = LoadReport {
            locale: locale.to_string(),
            ..Default::default()
        };

        let mut files = self.files.lock();
        let previous = files.remove(locale).unwrap_or_default();
        let mut contributions = Vec::with_capacity(outcomes.len());
        for (path, outcome) in outcomes {
            match outcome {
                Ok(messages) => {
                    report.loaded += 1;
                    contributions.push((path, messages));
                }
                Err(e) => {
                    warn!(locale, error = %e, "failed to load locale file");
                    if let Some(prior) = previous.get(&path) {
                        contributions.push((path, prior.clone()));
                    }
                    report.errors.push(e);
                }
            }
        }

        let mapping = LocaleFileMapping::new(contributions);
        let merged = mapping.merged();
        files.insert(locale.to_string(), mapping);
        let keys = merged.len();
        self.publish(locale, merged);
        drop(files);

        info!(
            locale,
            files = report.loaded,
            failed = report.errors.len(),
            keys,
            "loaded locale"
        );
        report
    }

    /// Replace what `path` contributes to `locale` in one atomic step.
    pub fn apply_file_change(&self, locale: &str, path: &Path, new: FlatMessages) {
        let mut files = self.files.lock();
        let mut merged = self
            .snapshot(locale)
            .map(|snapshot| snapshot.messages().clone())
            .unwrap_or_default();

        let mapping = files.entry(locale.to_string()).or_default();
        let added = new.len();
        mapping.apply_change(path, new, &mut merged);
        self.publish(locale, merged);

        debug!(locale, path = %path.display(), keys = added, "merged locale file change");
    }

    /// Re-evaluate one file and merge it into `locale`.
    ///
    /// On failure the file's previous contribution stays in place.
    pub async fn reload_file(&self, locale: &str, path: &Path) -> Result<(), LocaleLoadError> {
        let loader = Arc::clone(&self.loader);
        let owned = path.to_path_buf();
        let result = tokio::task::spawn_blocking(move || load_flattened(loader.as_ref(), &owned))
            .await
            .map_err(|e| LocaleLoadError::Join {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        match result {
            Ok(messages) => {
                self.apply_file_change(locale, path, messages);
                Ok(())
            }
            Err(e) => {
                warn!(locale, error = %e, "failed to reload locale file");
                Err(e)
            }
        }
    }

    fn publish(&self, locale: &str, messages: FlatMessages) {
        let mut snapshots = self.snapshots.write();
        let version = snapshots.get(locale).map_or(0, |s| s.version()) + 1;
        snapshots.insert(
            locale.to_string(),
            Arc::new(LocaleDictionary::new(locale, messages, version)),
        );
    }
}
