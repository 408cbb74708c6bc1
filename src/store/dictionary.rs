//! Immutable dictionary snapshots and per-file contributions.

use std::path::{Path, PathBuf};

use crate::core::FlatMessages;

/// A published, immutable view of one locale's keys.
///
/// Readers hold it behind an `Arc`; a merge builds a new one and swaps it in,
/// so a reader sees either the whole old state or the whole new one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleDictionary {
    locale: String,
    messages: FlatMessages,
    version: u64,
}

impl LocaleDictionary {
    pub fn new(locale: impl Into<String>, messages: FlatMessages, version: u64) -> Self {
        Self {
            locale: locale.into(),
            messages,
            version,
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn messages(&self) -> &FlatMessages {
        &self.messages
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.messages.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Bumped on every publish for this locale.
    pub fn version(&self) -> u64 {
        self.version
    }
}

/// The flattened subset each locale file contributed, in merge order.
///
/// Later files win when two files define the same key.
#[derive(Debug, Clone, Default)]
pub struct LocaleFileMapping {
    files: Vec<(PathBuf, FlatMessages)>,
}

impl LocaleFileMapping {
    pub fn new(files: Vec<(PathBuf, FlatMessages)>) -> Self {
        Self { files }
    }

    pub fn get(&self, path: &Path) -> Option<&FlatMessages> {
        self.files
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, messages)| messages)
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(|(p, _)| p.as_path())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Right-biased merge of every contribution.
    pub fn merged(&self) -> FlatMessages {
        let mut merged = FlatMessages::new();
        for (_, messages) in &self.files {
            merged.extend(messages.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        merged
    }

    /// Replace the contribution of `path` and patch `merged` to match.
    ///
    /// The file becomes the most recent writer. Keys it no longer defines fall
    /// back to the latest other file defining them, or are removed.
    pub fn apply_change(&mut self, path: &Path, new: FlatMessages, merged: &mut FlatMessages) {
        let old = self
            .files
            .iter()
            .position(|(p, _)| p == path)
            .map(|index| self.files.remove(index).1);

        if let Some(old) = old {
            for key in old.keys().filter(|key| !new.contains_key(*key)) {
                let fallback = self
                    .files
                    .iter()
                    .rev()
                    .find_map(|(_, messages)| messages.get(key));
                match fallback {
                    Some(value) => {
                        merged.insert(key.clone(), value.clone());
                    }
                    None => {
                        merged.remove(key);
                    }
                }
            }
        }

        merged.extend(new.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.files.push((path.to_path_buf(), new));
    }
}
