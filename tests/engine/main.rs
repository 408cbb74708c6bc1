use std::{fs, path::Path, sync::Arc, time::Duration};

use anyhow::Result;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use tokio::sync::{broadcast, mpsc};

use i18n_lens::core::SourcePosition;
use i18n_lens::core::parsers::JsonLocaleLoader;
use i18n_lens::watch::{WatchEvent, WatchEventKind, WatchSource};
use i18n_lens::{DictionaryChanged, DocumentChange, EngineConfig, I18nEngine};

const PAGE: &str = r#"const t = useI18n("home");
export default function Page() {
  return <h1>{t("title")}{t("subtitle")}</h1>;
}
"#;

fn page() -> DocumentChange {
    DocumentChange::new("file:///project/src/page.tsx", "typescriptreact", 1, PAGE)
}

fn write(root: &Path, path: &str, content: &str) {
    let path = root.join(path);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/locales/zh-CN.json", r#"{"home": {"title": "首页"}}"#);
    write(
        dir.path(),
        "src/locales/en-US.json",
        r#"{"home": {"title": "Home", "subtitle": "Welcome"}}"#,
    );
    dir
}

fn fast_config() -> EngineConfig {
    EngineConfig {
        debounce_ms: 30,
        poll_interval_ms: 10,
        ..Default::default()
    }
}

async fn next_change(rx: &mut broadcast::Receiver<DictionaryChanged>) {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("no dictionary change within 5s")
        .expect("change channel closed");
}

/// Events pushed by the test, handed to whichever watcher asks first.
struct ManualSource {
    rx: Mutex<Option<mpsc::Receiver<WatchEvent>>>,
}

impl WatchSource for ManualSource {
    fn watch(&self, _paths: Vec<std::path::PathBuf>) -> mpsc::Receiver<WatchEvent> {
        self.rx.lock().take().unwrap_or_else(|| mpsc::channel(1).1)
    }
}

#[tokio::test]
async fn test_start_then_analyze() -> Result<()> {
    let dir = project();
    let engine = I18nEngine::with_defaults(fast_config(), dir.path())?;

    let report = engine.start().await?;
    assert_eq!(report.locale, "zh-CN");
    assert_eq!(report.loaded, 1);
    assert!(report.is_ok());

    let result = engine.analyze(&page());
    assert_eq!(result.locale, "zh-CN");
    assert_eq!(result.version, 1);
    assert_eq!(result.resolved.len(), 1);
    assert_eq!(result.resolved[0].key, "home.title");
    assert_eq!(result.resolved[0].display_text, "首页");
    assert_eq!(result.resolved[0].position, SourcePosition::new(3, 24));
    assert_eq!(result.missing.len(), 1);
    assert_eq!(result.missing[0].warning_text, "missing key: home.subtitle");

    engine.shutdown();
    Ok(())
}

#[tokio::test]
async fn test_switch_locale_cycles() -> Result<()> {
    let dir = project();
    let engine = I18nEngine::with_defaults(fast_config(), dir.path())?;
    engine.start().await?;
    let mut changes = engine.subscribe();

    assert_eq!(engine.switch_locale().await?, "en-US");
    next_change(&mut changes).await;
    let result = engine.analyze(&page());
    assert_eq!(result.locale, "en-US");
    assert_eq!(result.resolved_count(), 2);
    assert_eq!(result.missing_count(), 0);

    assert_eq!(engine.switch_locale().await?, "zh-CN");
    assert_eq!(engine.analyze(&page()).missing_count(), 1);

    engine.shutdown();
    Ok(())
}

#[tokio::test]
async fn test_polling_watcher_picks_up_edits() -> Result<()> {
    let dir = project();
    let engine = I18nEngine::with_defaults(fast_config(), dir.path())?;
    engine.start().await?;
    let mut changes = engine.subscribe();

    // Let the poller record the initial stamps
    tokio::time::sleep(Duration::from_millis(50)).await;
    write(
        dir.path(),
        "src/locales/zh-CN.json",
        r#"{"home": {"title": "首页", "subtitle": "欢迎光临"}}"#,
    );
    next_change(&mut changes).await;

    let result = engine.analyze(&page());
    assert_eq!(result.missing_count(), 0);
    assert_eq!(result.resolved[1].display_text, "欢迎光临");

    engine.shutdown();
    Ok(())
}

#[tokio::test]
async fn test_change_in_one_file_keeps_the_others() -> Result<()> {
    let dir = TempDir::new()?;
    write(dir.path(), "src/home/locales/en-US.json", r#"{"home": {"title": "Home"}}"#);
    write(dir.path(), "src/nav/locales/en-US.json", r#"{"nav": {"about": "About"}}"#);

    let (tx, rx) = mpsc::channel(8);
    let source = ManualSource {
        rx: Mutex::new(Some(rx)),
    };
    let config = EngineConfig {
        supported_locales: vec!["en-US".to_string()],
        debounce_ms: 10,
        ..Default::default()
    };
    let engine = I18nEngine::new(
        config,
        dir.path(),
        Arc::new(JsonLocaleLoader),
        Arc::new(source),
    )?;
    engine.start().await?;
    let mut changes = engine.subscribe();

    let nav = dir.path().join("src/nav/locales/en-US.json");
    fs::write(&nav, r#"{"nav": {"contact": "Contact"}}"#)?;
    tx.send(WatchEvent {
        path: nav.clone(),
        kind: WatchEventKind::Modified,
    })
    .await?;
    next_change(&mut changes).await;

    let snapshot = engine.store().current_snapshot().expect("en-US loaded");
    assert_eq!(snapshot.get("home.title"), Some("Home"));
    assert_eq!(snapshot.get("nav.contact"), Some("Contact"));
    assert_eq!(snapshot.get("nav.about"), None);

    engine.shutdown();
    Ok(())
}

#[tokio::test]
async fn test_complete_and_hover() -> Result<()> {
    let dir = project();
    let engine = I18nEngine::with_defaults(fast_config(), dir.path())?;
    engine.start().await?;
    engine.switch_locale().await?;

    let labels: Vec<String> = engine
        .complete(&page())
        .into_iter()
        .map(|c| c.label)
        .collect();
    assert_eq!(labels, vec!["subtitle", "title"]);

    let hover = engine
        .hover(&page(), SourcePosition::new(3, 20))
        .expect("hover over the title literal");
    assert_eq!(hover.key, "home.title");
    assert_eq!(hover.text, "i18n en-US -> Home");
    assert!(engine.hover(&page(), SourcePosition::new(1, 1)).is_none());

    engine.shutdown();
    Ok(())
}

#[tokio::test]
async fn test_disabled_engine_is_inert() -> Result<()> {
    let dir = project();
    let config = EngineConfig {
        enabled: false,
        ..fast_config()
    };
    let engine = I18nEngine::with_defaults(config, dir.path())?;

    let report = engine.start().await?;
    assert_eq!(report.loaded, 0);
    assert!(!engine.store().is_loaded("zh-CN"));
    assert!(engine.analyze(&page()).is_empty());
    assert!(engine.complete(&page()).is_empty());

    Ok(())
}

#[tokio::test]
async fn test_locale_files_follow_templates() -> Result<()> {
    let dir = project();
    write(dir.path(), "src/features/cart/locales/en-US.json", r#"{"cart": {}}"#);
    let engine = I18nEngine::with_defaults(fast_config(), dir.path())?;

    let files = engine.locale_files("en-US")?;
    assert_eq!(files.len(), 2);
    assert!(files.iter().all(|f| f.ends_with("en-US.json")));
    assert!(engine.locale_files("fr")?.is_empty());

    Ok(())
}
