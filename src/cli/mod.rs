//! Command-line front end over the resolution engine.

mod args;
mod commands;
mod context;
mod exit_status;
mod report;
mod scan;

use std::{path::Path, process::ExitCode};

use anyhow::Result;

pub use args::{Arguments, CheckCommand, Command, CommonArgs, KeysCommand, WatchCommand};
pub use exit_status::ExitStatus;

use crate::logging;

pub fn run_cli(args: Arguments) -> Result<ExitCode> {
    logging::init(args.verbose());

    let Some(Arguments {
        command: Some(command),
    }) = args.with_command_or_help()
    else {
        return Ok(ExitStatus::Success.into());
    };

    let status = match command {
        Command::Check(cmd) => commands::check::check(cmd)?,
        Command::Keys(cmd) => commands::keys::keys(cmd)?,
        Command::Watch(cmd) => commands::watch::watch(cmd)?,
        Command::Init => commands::init::init(Path::new("."))?,
    };

    Ok(status.into())
}
