//! Power control: comment-guarded shutdown and reboot.
//!
//! The guard comments are deliberate friction: the operator UI must send
//! the exact phrase before the appliance powers off.

use anyhow::{Context, Result};
use std::process::Command;
use tracing::info;

pub const SHUTDOWN_COMMENT: &str = "shutdown now";
pub const REBOOT_COMMENT: &str = "reboot now";

pub fn shutdown() -> Result<()> {
    info!("Shutting down on operator request");
    run("shutdown", &["now"])
}

pub fn reboot() -> Result<()> {
    info!("Rebooting on operator request");
    run("reboot", &[])
}

fn run(program: &str, args: &[&str]) -> Result<()> {
    let status = Command::new(program)
        .args(args)
        .status()
        .with_context(|| format!("failed to run {program}"))?;
    if !status.success() {
        anyhow::bail!("{program} exited with {status}");
    }
    Ok(())
}
