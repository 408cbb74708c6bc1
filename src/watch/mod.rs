//! Locale file watching.
//!
//! A [`LocaleWatcher`] is bound to one locale. It listens to a [`WatchSource`]
//! for that locale's files, debounces bursts per path, reloads the changed file
//! into the store and announces [`DictionaryChanged`]. Dropping the watcher
//! tears down the event loop and every pending reload.

pub mod source;

use std::{
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use dashmap::{DashMap, mapref::entry::Entry};
use tokio::{
    sync::broadcast,
    task::{AbortHandle, JoinHandle},
};
use tracing::debug;

use crate::store::KeyDictionaryStore;

pub use source::{PollingWatchSource, WatchEvent, WatchEventKind, WatchSource};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Published after a watched file has been merged into the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DictionaryChanged;

/// Pending reloads keyed by path, tagged with a generation so a finished task
/// only clears its own entry.
type PendingReloads = Arc<DashMap<PathBuf, (u64, AbortHandle)>>;

pub struct LocaleWatcher {
    locale: String,
    event_loop: JoinHandle<()>,
    pending: PendingReloads,
    shut_down: Arc<AtomicBool>,
}

impl LocaleWatcher {
    /// Start watching `paths` on behalf of `locale`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(
        locale: impl Into<String>,
        paths: Vec<PathBuf>,
        source: &dyn WatchSource,
        store: Arc<KeyDictionaryStore>,
        debounce: Duration,
        changed: broadcast::Sender<DictionaryChanged>,
    ) -> Self {
        let locale = locale.into();
        let pending: PendingReloads = Arc::new(DashMap::new());
        let shut_down = Arc::new(AtomicBool::new(false));

        debug!(locale = %locale, files = paths.len(), "installed locale watcher");
        let mut events = source.watch(paths);

        let event_loop = {
            let locale = locale.clone();
            let pending = Arc::clone(&pending);
            let shut_down = Arc::clone(&shut_down);

            tokio::spawn(async move {
                let mut generation: u64 = 0;
                while let Some(event) = events.recv().await {
                    generation += 1;
                    let current = generation;

                    // The entry keeps its shard locked until the new handle is
                    // stored, so `shutdown` either sees the handle or has
                    // already raised the flag.
                    let slot = pending.entry(event.path.clone());
                    if shut_down.load(Ordering::SeqCst) {
                        break;
                    }

                    let task = {
                        let locale = locale.clone();
                        let path = event.path;
                        let store = Arc::clone(&store);
                        let changed = changed.clone();
                        let pending = Arc::clone(&pending);
                        tokio::spawn(async move {
                            tokio::time::sleep(debounce).await;
                            if store.reload_file(&locale, &path).await.is_ok() {
                                // No subscribers is fine
                                let _ = changed.send(DictionaryChanged);
                            }
                            pending.remove_if(&path, |_, (g, _)| *g == current);
                        })
                    };

                    match slot {
                        // Cancel the previous pending reload for this path
                        Entry::Occupied(mut entry) => {
                            let (_, previous) = entry.insert((current, task.abort_handle()));
                            previous.abort();
                        }
                        Entry::Vacant(entry) => {
                            entry.insert((current, task.abort_handle()));
                        }
                    }
                }
            })
        };

        Self {
            locale,
            event_loop,
            pending,
            shut_down,
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Stop the event loop and cancel every pending reload.
    pub fn shutdown(&self) {
        self.shut_down.store(true, Ordering::SeqCst);
        self.event_loop.abort();
        // Collect first so no shard lock is held while aborting
        let handles: Vec<AbortHandle> = self.pending.iter().map(|e| e.value().1.clone()).collect();
        self.pending.clear();
        for handle in handles {
            handle.abort();
        }
        debug!(locale = %self.locale, "removed locale watcher");
    }
}

impl Drop for LocaleWatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}
