//! File change sources.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};

use tokio::sync::mpsc;
use tracing::debug;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchEventKind {
    Created,
    Modified,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    pub path: PathBuf,
    pub kind: WatchEventKind,
}

/// Produces change events for a set of files.
///
/// Watching stops once the returned receiver is dropped. Must be called from
/// within a tokio runtime.
pub trait WatchSource: Send + Sync + 'static {
    fn watch(&self, paths: Vec<PathBuf>) -> mpsc::Receiver<WatchEvent>;
}

/// Detects changes by polling file metadata on an interval.
#[derive(Debug, Clone, Copy)]
pub struct PollingWatchSource {
    interval: Duration,
}

impl PollingWatchSource {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for PollingWatchSource {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}

type Stamp = Option<(SystemTime, u64)>;

fn stamp(path: &Path) -> Stamp {
    let meta = fs::metadata(path).ok()?;
    Some((meta.modified().ok()?, meta.len()))
}

impl WatchSource for PollingWatchSource {
    fn watch(&self, paths: Vec<PathBuf>) -> mpsc::Receiver<WatchEvent> {
        let (tx, rx) = mpsc::channel(64);
        let interval = self.interval;

        tokio::spawn(async move {
            let mut stamps: HashMap<PathBuf, Stamp> =
                paths.into_iter().map(|p| (p.clone(), stamp(&p))).collect();
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                if tx.is_closed() {
                    break;
                }
                for (path, previous) in stamps.iter_mut() {
                    let current = stamp(path);
                    if current == *previous {
                        continue;
                    }
                    let kind = match (&*previous, &current) {
                        (None, _) => WatchEventKind::Created,
                        (_, None) => WatchEventKind::Removed,
                        _ => WatchEventKind::Modified,
                    };
                    *previous = current;
                    debug!(path = %path.display(), ?kind, "locale file changed");
                    let event = WatchEvent {
                        path: path.clone(),
                        kind,
                    };
                    if tx.send(event).await.is_err() {
                        return;
                    }
                }
            }
        });

        rx
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[tokio::test]
    async fn test_polling_reports_modification() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("en-US.json");
        fs::write(&path, "{}").unwrap();

        let source = PollingWatchSource::new(Duration::from_millis(10));
        let mut rx = source.watch(vec![path.clone()]);

        tokio::time::sleep(Duration::from_millis(30)).await;
        fs::write(&path, r#"{"a": "changed"}"#).unwrap();

        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(event.path, path);
        assert_eq!(event.kind, WatchEventKind::Modified);
    }

    #[tokio::test]
    async fn test_polling_reports_removal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("zh-CN.json");
        fs::write(&path, "{}").unwrap();

        let source = PollingWatchSource::new(Duration::from_millis(10));
        let mut rx = source.watch(vec![path.clone()]);

        tokio::time::sleep(Duration::from_millis(30)).await;
        fs::remove_file(&path).unwrap();

        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(event.kind, WatchEventKind::Removed);
    }
}
