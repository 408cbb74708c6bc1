pub mod check;
pub mod init;
pub mod keys;
pub mod watch;

use anyhow::{Context, Result};
use tokio::runtime::Runtime;

/// Runtime for locale loading and watching.
fn runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")
}
