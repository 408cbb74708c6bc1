//! The resolution session a host drives.
//!
//! An [`I18nEngine`] owns the dictionary store and the watcher of the active
//! locale. Hosts create it with a validated [`EngineConfig`], call
//! [`I18nEngine::start`] once inside a tokio runtime, feed it documents through
//! [`I18nEngine::analyze`] and call [`I18nEngine::shutdown`] when done.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::core::completion::{self, Completion, Hover};
use crate::core::extract::{NamespaceBinding, find_bindings};
use crate::core::parsers::{JsonLocaleLoader, LocaleLoader, locale_files, parse_source};
use crate::core::resolve::{FileResolution, ResolutionResult, resolve};
use crate::core::{FileKind, FlatMessages, SourcePosition};
use crate::error::{ConfigError, ParseError};
use crate::store::{KeyDictionaryStore, LoadReport, LocaleDictionary};
use crate::watch::{LocaleWatcher, PollingWatchSource, WatchSource};

pub use crate::watch::DictionaryChanged;

/// A document-change notification from the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentChange {
    pub uri: String,
    /// Editor language id (`typescriptreact`, ...). May be empty, in which
    /// case the file extension decides.
    pub language_id: String,
    pub version: i32,
    pub text: String,
}

impl DocumentChange {
    pub fn new(
        uri: impl Into<String>,
        language_id: impl Into<String>,
        version: i32,
        text: impl Into<String>,
    ) -> Self {
        Self {
            uri: uri.into(),
            language_id: language_id.into(),
            version,
            text: text.into(),
        }
    }

    /// A document read from disk, typed by its extension.
    pub fn from_path(path: &Path, text: impl Into<String>) -> Self {
        Self::new(path.to_string_lossy(), "", 0, text)
    }

    pub fn file_kind(&self) -> Option<FileKind> {
        FileKind::from_language_id(&self.language_id).or_else(|| FileKind::from_path(&self.uri))
    }
}

/// Bindings and results of one document, with the locale they were resolved in.
struct Analysis {
    bindings: Vec<NamespaceBinding>,
    results: Vec<ResolutionResult>,
    locale: String,
}

pub struct I18nEngine {
    config: EngineConfig,
    root_dir: PathBuf,
    store: Arc<KeyDictionaryStore>,
    watch_source: Arc<dyn WatchSource>,
    watcher: Mutex<Option<LocaleWatcher>>,
    changed: broadcast::Sender<DictionaryChanged>,
}

impl I18nEngine {
    pub fn new(
        config: EngineConfig,
        root_dir: impl Into<PathBuf>,
        loader: Arc<dyn LocaleLoader>,
        watch_source: Arc<dyn WatchSource>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let initial = config
            .supported_locales
            .first()
            .cloned()
            .ok_or(ConfigError::NoSupportedLocales)?;
        let (changed, _) = broadcast::channel(16);

        Ok(Self {
            store: Arc::new(KeyDictionaryStore::new(loader, initial)),
            config,
            root_dir: root_dir.into(),
            watch_source,
            watcher: Mutex::new(None),
            changed,
        })
    }

    /// An engine with the JSON loader and a polling watch source.
    pub fn with_defaults(
        config: EngineConfig,
        root_dir: impl Into<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let source = PollingWatchSource::new(config.poll_interval());
        Self::new(config, root_dir, Arc::new(JsonLocaleLoader), Arc::new(source))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn store(&self) -> &Arc<KeyDictionaryStore> {
        &self.store
    }

    pub fn current_locale(&self) -> String {
        self.store.current_locale()
    }

    /// Locale files of `locale` resolved from the configured templates.
    pub fn locale_files(&self, locale: &str) -> Result<Vec<PathBuf>, ConfigError> {
        locale_files(&self.config.locale_paths, locale, &self.root_dir)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DictionaryChanged> {
        self.changed.subscribe()
    }

    /// Load the active locale and start watching its files.
    ///
    /// Does nothing when the engine is disabled.
    pub async fn start(&self) -> Result<LoadReport, ConfigError> {
        if !self.config.enabled {
            debug!("engine disabled, not loading locales");
            return Ok(LoadReport::default());
        }
        let locale = self.current_locale();
        self.activate(&locale).await
    }

    /// Move to the next supported locale, wrapping after the last one.
    ///
    /// Safe while loads are in flight: a load that finishes after a newer
    /// switch fills its own locale's dictionary but installs no watcher.
    pub async fn switch_locale(&self) -> Result<String, ConfigError> {
        let next = self
            .store
            .cycle_locale(&self.config.supported_locales)
            .ok_or(ConfigError::NoSupportedLocales)?;
        if self.config.enabled {
            self.activate(&next).await?;
        }
        Ok(next)
    }

    async fn activate(&self, locale: &str) -> Result<LoadReport, ConfigError> {
        // Tear down the old watch set before anything else
        self.watcher.lock().take();

        let files = self.locale_files(locale)?;
        if files.is_empty() {
            warn!(locale, "no locale files matched");
        }
        let report = self.store.load_all(locale, &files).await;

        // Check and install under one guard: a newer switch's watcher must
        // never be replaced by this one
        let mut watcher = self.watcher.lock();
        if self.store.current_locale() == locale {
            *watcher = Some(LocaleWatcher::spawn(
                locale,
                files,
                self.watch_source.as_ref(),
                Arc::clone(&self.store),
                self.config.debounce(),
                self.changed.clone(),
            ));
            // No subscribers is fine
            let _ = self.changed.send(DictionaryChanged);
        } else {
            info!(locale, "locale switched during load, skipping watcher");
        }

        Ok(report)
    }

    /// Stop watching. The store keeps its contents.
    pub fn shutdown(&self) {
        if let Some(watcher) = self.watcher.lock().take() {
            watcher.shutdown();
        }
        info!("engine shut down");
    }

    /// Active locale id and its snapshot, if loaded.
    fn active_dictionary(&self) -> (String, Option<Arc<LocaleDictionary>>) {
        match self.store.current_snapshot() {
            Some(snapshot) => (snapshot.locale().to_string(), Some(snapshot)),
            None => (self.current_locale(), None),
        }
    }

    /// Parse and resolve a document against the active locale.
    fn run(&self, doc: &DocumentChange) -> Option<Result<Analysis, ParseError>> {
        if !self.config.enabled {
            return None;
        }
        let Some(kind) = doc.file_kind() else {
            debug!(uri = %doc.uri, language = %doc.language_id, "skipping unsupported document");
            return None;
        };

        Some(parse_source(&doc.text, &doc.uri, kind).map(|tree| {
            let bindings = find_bindings(&tree, &self.config);
            let (locale, snapshot) = self.active_dictionary();
            let empty = FlatMessages::new();
            let messages = snapshot.as_deref().map_or(&empty, LocaleDictionary::messages);
            let results = resolve(&bindings, &tree, messages, &self.config);
            Analysis {
                bindings,
                results,
                locale,
            }
        }))
    }

    /// Resolved and missing keys of a document.
    ///
    /// Disabled engines, unsupported languages and unparsable text all yield
    /// an empty result.
    pub fn analyze(&self, doc: &DocumentChange) -> FileResolution {
        match self.run(doc) {
            Some(Ok(analysis)) => FileResolution::from_results(
                &doc.uri,
                doc.version,
                analysis.locale,
                &analysis.results,
            ),
            Some(Err(e)) => {
                warn!(uri = %doc.uri, error = %e, "failed to parse document");
                FileResolution::empty(&doc.uri, doc.version, self.current_locale())
            }
            None => FileResolution::empty(&doc.uri, doc.version, self.current_locale()),
        }
    }

    /// Like [`analyze`](Self::analyze), but surfaces parse errors.
    pub fn try_analyze(&self, doc: &DocumentChange) -> Result<FileResolution, ParseError> {
        match self.run(doc) {
            Some(result) => result.map(|analysis| {
                FileResolution::from_results(
                    &doc.uri,
                    doc.version,
                    analysis.locale,
                    &analysis.results,
                )
            }),
            None => Ok(FileResolution::empty(
                &doc.uri,
                doc.version,
                self.current_locale(),
            )),
        }
    }

    pub fn bindings_for(&self, doc: &DocumentChange) -> Vec<NamespaceBinding> {
        match self.run(doc) {
            Some(Ok(analysis)) => analysis.bindings,
            _ => Vec::new(),
        }
    }

    /// Keys that can be completed inside the document's accessor calls.
    pub fn complete(&self, doc: &DocumentChange) -> Vec<Completion> {
        let bindings = self.bindings_for(doc);
        if bindings.is_empty() {
            return Vec::new();
        }
        match self.active_dictionary() {
            (_, Some(snapshot)) => completion::complete(&bindings, snapshot.messages()),
            (_, None) => Vec::new(),
        }
    }

    pub fn hover(&self, doc: &DocumentChange, position: SourcePosition) -> Option<Hover> {
        match self.run(doc) {
            Some(Ok(analysis)) => {
                completion::hover(&analysis.results, &analysis.locale, position)
            }
            _ => None,
        }
    }
}

impl Drop for I18nEngine {
    fn drop(&mut self) {
        self.watcher.lock().take();
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path, time::Duration};

    use serde_json::Value;
    use tempfile::tempdir;

    use super::*;
    use crate::error::LocaleLoadError;

    /// JSON loader that takes a while per file.
    struct SlowLoader;

    impl LocaleLoader for SlowLoader {
        fn evaluate(&self, path: &Path) -> Result<Value, LocaleLoadError> {
            std::thread::sleep(Duration::from_millis(50));
            JsonLocaleLoader.evaluate(path)
        }
    }

    #[tokio::test]
    async fn test_back_to_back_switches_settle_on_last_locale() {
        let dir = tempdir().unwrap();
        for (locale, title) in [("zh-CN", "首页"), ("en-US", "Home"), ("ja", "ホーム")] {
            let path = dir.path().join("src/locales").join(format!("{}.json", locale));
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, format!(r#"{{"title": "{}"}}"#, title)).unwrap();
        }
        let config = EngineConfig {
            supported_locales: vec!["zh-CN".to_string(), "en-US".to_string(), "ja".to_string()],
            ..Default::default()
        };
        let engine = I18nEngine::new(
            config,
            dir.path(),
            Arc::new(SlowLoader),
            Arc::new(PollingWatchSource::default()),
        )
        .unwrap();
        engine.start().await.unwrap();

        let (first, second) = tokio::join!(engine.switch_locale(), engine.switch_locale());
        assert_eq!(first.unwrap(), "en-US");
        assert_eq!(second.unwrap(), "ja");

        assert_eq!(engine.current_locale(), "ja");
        let snapshot = engine.store().current_snapshot().unwrap();
        assert_eq!(snapshot.get("title"), Some("ホーム"));
        assert!(engine.store().is_loaded("en-US"));

        let watcher = engine.watcher.lock();
        assert_eq!(watcher.as_ref().map(LocaleWatcher::locale), Some("ja"));
    }

    #[test]
    fn test_document_kind_from_language_or_extension() {
        let doc = DocumentChange::new("file:///a/page", "typescriptreact", 1, "");
        assert_eq!(doc.file_kind(), Some(FileKind::Tsx));

        let doc = DocumentChange::new("file:///a/page.jsx", "", 1, "");
        assert_eq!(doc.file_kind(), Some(FileKind::Jsx));

        let doc = DocumentChange::new("file:///a/README.md", "markdown", 1, "");
        assert_eq!(doc.file_kind(), None);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = EngineConfig {
            hook_match_names: vec![],
            ..Default::default()
        };
        let result = I18nEngine::with_defaults(config, "/tmp");
        assert!(matches!(result, Err(ConfigError::NoHookNames)));
    }

    #[test]
    fn test_analyze_before_start_reports_missing() {
        let engine = I18nEngine::with_defaults(EngineConfig::default(), "/nonexistent").unwrap();
        let doc = DocumentChange::new(
            "file:///page.tsx",
            "typescriptreact",
            7,
            r#"const t = useI18n("home"); t("title");"#,
        );
        let result = engine.analyze(&doc);
        assert_eq!(result.version, 7);
        assert_eq!(result.locale, "zh-CN");
        assert_eq!(result.missing_count(), 1);
    }

    #[test]
    fn test_parse_error_yields_empty_result() {
        let engine = I18nEngine::with_defaults(EngineConfig::default(), "/nonexistent").unwrap();
        let doc = DocumentChange::new("file:///bad.ts", "typescript", 1, "const = ;");
        assert!(engine.analyze(&doc).is_empty());
        assert!(engine.try_analyze(&doc).is_err());
    }

    #[test]
    fn test_disabled_engine_yields_nothing() {
        let config = EngineConfig {
            enabled: false,
            ..Default::default()
        };
        let engine = I18nEngine::with_defaults(config, "/nonexistent").unwrap();
        let doc = DocumentChange::new(
            "file:///page.tsx",
            "",
            1,
            r#"const t = useI18n("home"); t("title");"#,
        );
        assert!(engine.analyze(&doc).is_empty());
        assert!(engine.bindings_for(&doc).is_empty());
    }
}
