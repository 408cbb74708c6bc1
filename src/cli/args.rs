//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `check`: Report missing locale keys in source files
//! - `keys`: List the keys a file's namespaces can complete to
//! - `watch`: Re-check whenever a locale file changes
//! - `init`: Write a default configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Check(cmd)) => cmd.common.verbose,
            Some(Command::Keys(cmd)) => cmd.common.verbose,
            Some(Command::Watch(cmd)) => cmd.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Arguments shared by every command that loads locales.
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Locale to resolve against (defaults to the first supported locale)
    #[arg(long)]
    pub locale: Option<String>,

    /// Project root holding the config file (defaults to the current directory)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Files or directories to check (defaults to the configured includes)
    pub paths: Vec<PathBuf>,

    /// Also list every key that resolved, with its text
    #[arg(long)]
    pub show_resolved: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct KeysCommand {
    /// Source file whose namespaces select the keys
    pub file: PathBuf,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct WatchCommand {
    /// Files or directories to check (defaults to the configured includes)
    pub paths: Vec<PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Report locale keys used in source files that the locale does not define
    Check(CheckCommand),
    /// List completion candidates for the namespaces bound in a file
    Keys(KeysCommand),
    /// Check, then re-check whenever a locale file changes
    Watch(WatchCommand),
    /// Initialize a new .i18nlensrc.json configuration file
    Init,
}
