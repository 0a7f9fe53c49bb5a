use std::process::Command;

use clap::Args;
use emod_core::errors::{EmodError, ErrorInfo};
use serde::Serialize;

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Emit extended metadata including git and toolchain information.
    #[arg(long)]
    pub long: bool,
}

#[derive(Debug, Serialize)]
struct VersionInfo {
    version: String,
    git_commit: String,
    rustc: String,
}

pub fn run(args: &VersionArgs) -> Result<(), EmodError> {
    if !args.long {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    let info = gather_info();
    let json = serde_json::to_string_pretty(&info)
        .map_err(|err| EmodError::Io(ErrorInfo::new("version-encode", err.to_string())))?;
    println!("{json}");
    Ok(())
}

fn command_stdout(program: &str, args: &[&str], fallback: &str) -> String {
    Command::new(program)
        .args(args)
        .output()
        .ok()
        .and_then(|out| {
            if out.status.success() {
                Some(String::from_utf8_lossy(&out.stdout).trim().to_string())
            } else {
                None
            }
        })
        .unwrap_or_else(|| fallback.to_string())
}

fn gather_info() -> VersionInfo {
    VersionInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        git_commit: command_stdout("git", &["rev-parse", "HEAD"], "unknown"),
        rustc: command_stdout("rustc", &["--version"], "rustc unavailable"),
    }
}
