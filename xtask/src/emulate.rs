//! xtask emulate - run the controller emulator
//!
//! Builds and runs the `controller_emulator` example with the `emulator`
//! feature. Output is inherited so the scripted session streams live.

use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;

pub fn run(release: bool, log: Option<&str>) -> Result<()> {
    println!();
    println!("{}", "📡 Starting controller emulator...".cyan().bold());
    println!();

    let mut cmd = Command::new("cargo");
    cmd.args([
        "run",
        "-p",
        "firmware",
        "--example",
        "controller_emulator",
        "--features",
        "emulator",
    ]);
    if release {
        cmd.arg("--release");
    }
    if let Some(filter) = log {
        cmd.env("RUST_LOG", filter);
    }

    let status = cmd.status().context("Failed to launch the emulator")?;
    if !status.success() {
        anyhow::bail!("Emulator exited with {status}");
    }

    println!("{}", "✓ Emulator session finished".green());
    Ok(())
}
