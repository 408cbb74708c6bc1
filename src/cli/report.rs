//! Report formatting and printing utilities.
//!
//! Missing keys are printed cargo-style: message, clickable location, then
//! the source line with a caret under the key literal.

use std::{
    io::{self, Write},
    path::{Component, Path},
};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use super::context::FileOutcome;
use crate::core::completion::Completion;
use crate::core::{MissingEntry, ResolvedEntry, SourcePosition};
use crate::error::LocaleLoadError;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Totals over a set of analyzed files.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub files: usize,
    pub resolved: usize,
    pub missing: usize,
    pub failed: usize,
}

impl Summary {
    pub fn of(outcomes: &[FileOutcome]) -> Self {
        outcomes.iter().fold(
            Self {
                files: outcomes.len(),
                ..Self::default()
            },
            |mut acc, outcome| {
                match outcome.resolution() {
                    Some(r) => {
                        acc.resolved += r.resolved_count();
                        acc.missing += r.missing_count();
                    }
                    None => acc.failed += 1,
                }
                acc
            },
        )
    }
}

/// Path as shown to the user, without a leading `./`.
pub fn display_path(path: &Path) -> String {
    let trimmed: &Path = if matches!(path.components().next(), Some(Component::CurDir)) {
        path.strip_prefix(".").unwrap_or(path)
    } else {
        path
    };
    trimmed.to_string_lossy().replace('\\', "/")
}

/// Print missing keys (and, when asked, resolved ones) to stdout.
pub fn report(outcomes: &[FileOutcome], locale: &str, show_resolved: bool) {
    report_to(outcomes, locale, show_resolved, &mut io::stdout().lock());
}

pub fn report_to<W: Write>(
    outcomes: &[FileOutcome],
    locale: &str,
    show_resolved: bool,
    writer: &mut W,
) {
    let mut sorted: Vec<&FileOutcome> = outcomes.iter().collect();
    sorted.sort_by(|a, b| a.path().cmp(b.path()));

    let max_line_width = calculate_max_line_width(&sorted);

    for outcome in &sorted {
        match outcome {
            FileOutcome::Analyzed {
                path,
                source,
                resolution,
            } => {
                let file = display_path(path);
                for entry in &resolution.missing {
                    print_missing(entry, &file, source, writer, max_line_width);
                }
                if show_resolved {
                    print_resolved(&resolution.resolved, &file, writer);
                }
            }
            FileOutcome::Failed { path, error } => {
                let _ = writeln!(
                    writer,
                    "{}: could not analyze {}",
                    "error".bold().red(),
                    display_path(path)
                );
                let _ = writeln!(
                    writer,
                    "{:>width$} {} {}\n",
                    "",
                    "=".blue(),
                    error,
                    width = max_line_width
                );
            }
        }
    }

    print_summary(&Summary::of(outcomes), locale, writer);
}

/// Print warnings for locale files that failed to load.
pub fn print_load_errors(errors: &[LocaleLoadError]) {
    print_load_errors_to(errors, &mut io::stderr().lock());
}

pub fn print_load_errors_to<W: Write>(errors: &[LocaleLoadError], writer: &mut W) {
    for error in errors {
        let _ = writeln!(writer, "{} {}", "warning:".bold().yellow(), error);
    }
}

/// Print completion candidates, one per line: label, then its text.
pub fn print_completions<W: Write>(completions: &[Completion], writer: &mut W) {
    let label_width = completions
        .iter()
        .map(|c| UnicodeWidthStr::width(c.label.as_str()))
        .max()
        .unwrap_or(0);

    for completion in completions {
        let padding = label_width - UnicodeWidthStr::width(completion.label.as_str());
        let _ = writeln!(
            writer,
            "{}{:padding$}  {}",
            completion.label.bold(),
            "",
            completion.detail.dimmed(),
            padding = padding
        );
    }
}

// ============================================================
// Internal Functions
// ============================================================

fn print_missing<W: Write>(
    entry: &MissingEntry,
    file: &str,
    source: &str,
    writer: &mut W,
    max_line_width: usize,
) {
    let SourcePosition { line, col } = entry.position;

    let _ = writeln!(writer, "{}: {}", "error".bold().red(), entry.warning_text);
    let _ = writeln!(writer, "  {} {}:{}:{}", "-->".blue(), file, line, col);

    if let Some(source_line) = source.lines().nth(line.saturating_sub(1)) {
        let _ = writeln!(
            writer,
            "{:>width$} {}",
            "",
            "|".blue(),
            width = max_line_width
        );
        let _ = writeln!(
            writer,
            "{:>width$} {} {}",
            line.to_string().blue(),
            "|".blue(),
            source_line,
            width = max_line_width
        );

        // col is 1-based
        let prefix: String = source_line.chars().take(col.saturating_sub(1)).collect();
        let caret_padding = UnicodeWidthStr::width(prefix.as_str());
        let _ = writeln!(
            writer,
            "{:>width$} {} {:>padding$}{}",
            "",
            "|".blue(),
            "",
            "^".red(),
            width = max_line_width,
            padding = caret_padding
        );
    }

    let _ = writeln!(writer);
}

fn print_resolved<W: Write>(entries: &[ResolvedEntry], file: &str, writer: &mut W) {
    for entry in entries {
        let _ = writeln!(
            writer,
            "{} {}:{}:{} {} {}",
            SUCCESS_MARK.green(),
            file,
            entry.position.line,
            entry.position.col,
            entry.key.cyan(),
            entry.display_text.dimmed()
        );
    }
}

fn print_summary<W: Write>(summary: &Summary, locale: &str, writer: &mut W) {
    let files = if summary.files == 1 { "file" } else { "files" };

    if summary.missing == 0 && summary.failed == 0 {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!(
                "Checked {} source {} against {} - {} {} resolved, none missing",
                summary.files,
                files,
                locale,
                summary.resolved,
                if summary.resolved == 1 { "key" } else { "keys" }
            )
            .green()
        );
        return;
    }

    let _ = writeln!(
        writer,
        "{} Checked {} source {} against {}: {} missing {}, {} resolved, {} unreadable",
        FAILURE_MARK.red(),
        summary.files,
        files,
        locale,
        summary.missing,
        if summary.missing == 1 { "key" } else { "keys" }.red(),
        summary.resolved,
        summary.failed
    );
}

fn calculate_max_line_width(outcomes: &[&FileOutcome]) -> usize {
    outcomes
        .iter()
        .filter_map(|o| o.resolution())
        .flat_map(|r| r.missing.iter().map(|m| m.position.line))
        .max()
        .map(|n| n.to_string().len())
        .unwrap_or(1)
}
