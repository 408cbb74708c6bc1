//! Key composition and classification.
//!
//! Every key use found in a file is composed with its binding's prefix and
//! looked up in the active locale's dictionary. The result is either the
//! display text or a missing-key marker, always with the position right after
//! the literal.

use serde::Serialize;

use crate::config::EngineConfig;
use crate::core::extract::{NamespaceBinding, collect_key_uses};
use crate::core::parsers::SyntaxTree;
use crate::core::{FlatMessages, SourcePosition, SourceSpan, compose_key};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionStatus {
    Resolved(String),
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionResult {
    pub composed_key: String,
    pub position: SourcePosition,
    pub span: SourceSpan,
    pub status: ResolutionStatus,
}

impl ResolutionResult {
    pub fn is_resolved(&self) -> bool {
        matches!(self.status, ResolutionStatus::Resolved(_))
    }
}

/// Resolve every key use of `bindings` against `messages`.
///
/// Produces exactly one result per key use, in binding order and then
/// source order.
pub fn resolve(
    bindings: &[NamespaceBinding],
    tree: &SyntaxTree,
    messages: &FlatMessages,
    config: &EngineConfig,
) -> Vec<ResolutionResult> {
    collect_key_uses(tree, bindings, config)
        .into_iter()
        .map(|key_use| {
            let binding = &bindings[key_use.binding];
            let composed_key = compose_key(&binding.prefix_key, &key_use.suffix_key);
            let status = match messages.get(&composed_key) {
                Some(value) => ResolutionStatus::Resolved(value.clone()),
                None => ResolutionStatus::Missing,
            };
            ResolutionResult {
                composed_key,
                position: key_use.position,
                span: key_use.span,
                status,
            }
        })
        .collect()
}

/// A key with a value in the active locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedEntry {
    pub key: String,
    pub position: SourcePosition,
    pub display_text: String,
}

/// A key the active locale does not define.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingEntry {
    pub key: String,
    pub position: SourcePosition,
    pub warning_text: String,
}

pub fn missing_warning(key: &str) -> String {
    format!("missing key: {}", key)
}

/// Per-document output handed to the renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileResolution {
    pub uri: String,
    pub version: i32,
    pub locale: String,
    pub resolved: Vec<ResolvedEntry>,
    pub missing: Vec<MissingEntry>,
}

impl FileResolution {
    /// An empty result for a document that produced nothing.
    pub fn empty(uri: impl Into<String>, version: i32, locale: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            version,
            locale: locale.into(),
            ..Default::default()
        }
    }

    pub fn from_results(
        uri: impl Into<String>,
        version: i32,
        locale: impl Into<String>,
        results: &[ResolutionResult],
    ) -> Self {
        let mut resolution = Self::empty(uri, version, locale);
        for result in results {
            match &result.status {
                ResolutionStatus::Resolved(text) => resolution.resolved.push(ResolvedEntry {
                    key: result.composed_key.clone(),
                    position: result.position,
                    display_text: text.clone(),
                }),
                ResolutionStatus::Missing => resolution.missing.push(MissingEntry {
                    key: result.composed_key.clone(),
                    position: result.position,
                    warning_text: missing_warning(&result.composed_key),
                }),
            }
        }
        resolution
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty() && self.missing.is_empty()
    }

    pub fn resolved_count(&self) -> usize {
        self.resolved.len()
    }

    pub fn missing_count(&self) -> usize {
        self.missing.len()
    }

    /// Every key used in the document, in position order.
    pub fn entries(&self) -> Vec<(&str, SourcePosition)> {
        let mut entries: Vec<_> = self
            .resolved
            .iter()
            .map(|e| (e.key.as_str(), e.position))
            .chain(self.missing.iter().map(|e| (e.key.as_str(), e.position)))
            .collect();
        entries.sort_by_key(|(_, position)| *position);
        entries
    }
}
