use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use tokio::sync::broadcast::error::RecvError;
use tracing::debug;

use super::super::args::WatchCommand;
use super::super::context::ProjectContext;
use super::super::exit_status::ExitStatus;
use super::super::report::{print_load_errors, report};
use super::runtime;

pub fn watch(cmd: WatchCommand) -> Result<ExitStatus> {
    let ctx = ProjectContext::new(&cmd.common)?;
    let runtime = runtime()?;
    let status = runtime.block_on(watch_until_interrupted(&ctx, &cmd.paths));
    ctx.engine.shutdown();
    status
}

async fn watch_until_interrupted(ctx: &ProjectContext, paths: &[PathBuf]) -> Result<ExitStatus> {
    let load = ctx.engine.start().await?;
    print_load_errors(&load.errors);

    // Subscribe after the initial load so its announcement is not replayed
    let mut changes = ctx.engine.subscribe();
    let files = ctx.scan(paths).files;
    let locale = ctx.engine.current_locale();

    report(&ctx.analyze_files(&files), &locale, false);
    println!(
        "Watching {} locale file(s) for {}. Press {} to stop.",
        ctx.engine.locale_files(&locale)?.len(),
        locale.cyan(),
        "Ctrl-C".cyan()
    );

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            event = changes.recv() => match event {
                Ok(_) | Err(RecvError::Lagged(_)) => {
                    // Coalesce changes that piled up while re-checking
                    while changes.try_recv().is_ok() {}
                    debug!("dictionary changed, re-checking");
                    println!("\n{}", "Locale files changed, re-checking...".dimmed());
                    report(&ctx.analyze_files(&files), &locale, false);
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    Ok(ExitStatus::Success)
}
