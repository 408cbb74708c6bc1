//! Key completion and hover lookup for editor hosts.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::extract::NamespaceBinding;
use crate::core::resolve::{ResolutionResult, ResolutionStatus, missing_warning};
use crate::core::{FlatMessages, SourcePosition};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completion {
    /// Text to insert: the key relative to its namespace.
    pub label: String,
    /// Full dotted key.
    pub key: String,
    /// The value in the active locale.
    pub detail: String,
}

/// Candidate keys for the namespaces bound in a document.
///
/// When any binding has a prefix, only keys under one of those prefixes are
/// offered, with the prefix stripped. Otherwise every key is offered as is.
/// Labels shared by several namespaces go to the earliest declared binding.
pub fn complete(bindings: &[NamespaceBinding], messages: &FlatMessages) -> Vec<Completion> {
    let prefixes: Vec<String> = bindings
        .iter()
        .filter(|b| !b.prefix_key.is_empty())
        .map(|b| format!("{}.", b.prefix_key))
        .collect();

    let sorted: BTreeMap<&str, &str> = messages
        .iter()
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect();

    let candidates: Vec<(&str, &str, &str)> = if prefixes.is_empty() {
        sorted.iter().map(|(key, value)| (*key, *key, *value)).collect()
    } else {
        prefixes
            .iter()
            .flat_map(|prefix| {
                sorted.iter().filter_map(move |(key, value)| {
                    key.strip_prefix(prefix.as_str())
                        .map(|label| (label, *key, *value))
                })
            })
            .collect()
    };

    let mut by_label: BTreeMap<&str, Completion> = BTreeMap::new();
    for (label, key, value) in candidates {
        by_label.entry(label).or_insert_with(|| Completion {
            label: label.to_string(),
            key: key.to_string(),
            detail: value.to_string(),
        });
    }

    by_label.into_values().collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hover {
    pub key: String,
    pub text: String,
}

/// Hover text for the key literal under `position`.
pub fn hover(results: &[ResolutionResult], locale: &str, position: SourcePosition) -> Option<Hover> {
    let result = results.iter().find(|r| r.span.contains(position))?;
    let text = match &result.status {
        ResolutionStatus::Resolved(value) => format!("i18n {} -> {}", locale, value),
        ResolutionStatus::Missing => missing_warning(&result.composed_key),
    };
    Some(Hover {
        key: result.composed_key.clone(),
        text,
    })
}
