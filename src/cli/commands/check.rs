use anyhow::Result;
use tracing::info;

use super::super::args::CheckCommand;
use super::super::context::{FileOutcome, ProjectContext};
use super::super::exit_status::ExitStatus;
use super::super::report::{Summary, print_load_errors, report};
use super::runtime;

pub fn check(cmd: CheckCommand) -> Result<ExitStatus> {
    let ctx = ProjectContext::new(&cmd.common)?;
    let runtime = runtime()?;

    let load = runtime.block_on(ctx.engine.start())?;
    print_load_errors(&load.errors);
    info!(locale = %load.locale, files = load.loaded, "locale loaded");

    let scan = ctx.scan(&cmd.paths);
    let outcomes = ctx.analyze_files(&scan.files);
    report(&outcomes, &ctx.engine.current_locale(), cmd.show_resolved);

    ctx.engine.shutdown();

    let status = status_of(&outcomes);
    Ok(if load.is_ok() {
        status
    } else {
        status.max(ExitStatus::Error)
    })
}

/// `Error` when a file could not be analyzed, else `Failure` when a key is missing.
pub fn status_of(outcomes: &[FileOutcome]) -> ExitStatus {
    let summary = Summary::of(outcomes);
    if summary.failed > 0 {
        ExitStatus::Error
    } else if summary.missing > 0 {
        ExitStatus::Failure
    } else {
        ExitStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::core::{FileResolution, MissingEntry, SourcePosition};

    fn with_missing(count: usize) -> FileOutcome {
        let mut resolution = FileResolution::empty("a.tsx", 0, "en-US");
        for i in 0..count {
            resolution.missing.push(MissingEntry {
                key: format!("k{}", i),
                position: SourcePosition::new(1, 1),
                warning_text: format!("missing key: k{}", i),
            });
        }
        FileOutcome::Analyzed {
            path: PathBuf::from("a.tsx"),
            source: String::new(),
            resolution,
        }
    }

    #[test]
    fn test_status_of() {
        assert_eq!(status_of(&[]), ExitStatus::Success);
        assert_eq!(status_of(&[with_missing(0)]), ExitStatus::Success);
        assert_eq!(status_of(&[with_missing(2)]), ExitStatus::Failure);

        let failed = FileOutcome::Failed {
            path: PathBuf::from("b.tsx"),
            error: "boom".to_string(),
        };
        assert_eq!(status_of(&[with_missing(1), failed]), ExitStatus::Error);
    }
}
