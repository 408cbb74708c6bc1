use std::{fs, io};

use anyhow::{Context, Result};

use super::super::args::KeysCommand;
use super::super::context::ProjectContext;
use super::super::exit_status::ExitStatus;
use super::super::report::{display_path, print_completions, print_load_errors};
use super::runtime;
use crate::engine::DocumentChange;

pub fn keys(cmd: KeysCommand) -> Result<ExitStatus> {
    let source = fs::read_to_string(&cmd.file)
        .with_context(|| format!("Failed to read file: {}", cmd.file.display()))?;
    let doc = DocumentChange::from_path(&cmd.file, source);

    let ctx = ProjectContext::new(&cmd.common)?;
    let runtime = runtime()?;
    let load = runtime.block_on(ctx.engine.start())?;
    print_load_errors(&load.errors);
    ctx.engine.shutdown();

    if let Err(e) = ctx.engine.try_analyze(&doc) {
        eprintln!("Error: {}: {}", display_path(&cmd.file), e);
        return Ok(ExitStatus::Error);
    }

    let completions = ctx.engine.complete(&doc);
    if completions.is_empty() {
        eprintln!(
            "No keys to complete in {} for {}",
            display_path(&cmd.file),
            ctx.engine.current_locale()
        );
        return Ok(ExitStatus::Failure);
    }

    print_completions(&completions, &mut io::stdout().lock());
    Ok(ExitStatus::Success)
}
