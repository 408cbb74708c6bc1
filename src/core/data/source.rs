use std::{fmt, path::Path};

use serde::Serialize;

/// A point in a source file.
///
/// Both fields are 1-indexed. Hosts with 0-indexed positions convert at
/// their boundary with [`SourcePosition::to_zero_based`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SourcePosition {
    pub line: usize,
    pub col: usize,
}

impl SourcePosition {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }

    /// `(line, col)` for editors that count from zero.
    pub fn to_zero_based(self) -> (usize, usize) {
        (self.line.saturating_sub(1), self.col.saturating_sub(1))
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Source range of a syntax node.
///
/// `start` is the first character, `end` the position immediately after the
/// last character. `lo`/`hi` are the matching byte offsets into the text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct SourceSpan {
    pub start: SourcePosition,
    pub end: SourcePosition,
    pub lo: usize,
    pub hi: usize,
}

impl SourceSpan {
    pub fn new(start: SourcePosition, end: SourcePosition, lo: usize, hi: usize) -> Self {
        Self { start, end, lo, hi }
    }

    /// Whether `pos` falls inside the span, both ends included.
    pub fn contains(&self, pos: SourcePosition) -> bool {
        self.start <= pos && pos <= self.end
    }
}

/// Language flavor of a source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Js,
    Jsx,
    Ts,
    Tsx,
}

impl FileKind {
    /// Map an editor language id (`typescriptreact`, ...) to a file kind.
    pub fn from_language_id(language_id: &str) -> Option<Self> {
        match language_id {
            "javascript" => Some(Self::Js),
            "javascriptreact" => Some(Self::Jsx),
            "typescript" => Some(Self::Ts),
            "typescriptreact" => Some(Self::Tsx),
            _ => None,
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?;
        match ext {
            "js" | "mjs" | "cjs" => Some(Self::Js),
            "jsx" => Some(Self::Jsx),
            "ts" | "mts" | "cts" => Some(Self::Ts),
            "tsx" => Some(Self::Tsx),
            _ => None,
        }
    }

    pub fn is_typescript(self) -> bool {
        matches!(self, Self::Ts | Self::Tsx)
    }
}
