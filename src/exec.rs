use anyhow::{Context, Result, anyhow};
use regex::Regex;
use std::{
    path::Path,
    process::{Command, ExitStatus},
};

/// Exit code reported when a child's status can't be expressed as one.
pub const FALLBACK_EXIT_CODE: u8 = 1;

/// Ensure the cargo executable can be run at all before handing it a long build.
pub fn check_cargo(cargo: &Path) -> Result<()> {
    let output = Command::new(cargo)
        .arg("--version")
        .output()
        .with_context(|| format!("failed to run '{}'", cargo.display()))?;

    if !output.status.success() {
        return Err(anyhow!(
            "'{} --version' command failed: {}",
            cargo.display(),
            String::from_utf8_lossy(&output.stderr)
        ));
    }

    let version_string = String::from_utf8_lossy(&output.stdout);
    match parse_cargo_version(&version_string) {
        Some((major, minor, patch)) => {
            tracing::debug!(cargo = %cargo.display(), "using cargo {major}.{minor}.{patch}");
        }
        None => {
            tracing::warn!(
                cargo = %cargo.display(),
                "failed to parse cargo version from: {}",
                version_string.trim()
            );
        }
    }
    Ok(())
}

/// Extracts `(major, minor, patch)` from `cargo --version` output.
pub fn parse_cargo_version(version_string: &str) -> Option<(u32, u32, u32)> {
    let version_regex = Regex::new(r"cargo (\d+)\.(\d+)\.(\d+)").ok()?;
    let caps = version_regex.captures(version_string)?;
    Some((
        caps[1].parse().ok()?,
        caps[2].parse().ok()?,
        caps[3].parse().ok()?,
    ))
}

/// Spawns `command` and blocks until it exits.
pub fn run_to_completion(command: &mut Command) -> Result<ExitStatus> {
    let program = command.get_program().to_string_lossy().into_owned();
    let mut child = command
        .spawn()
        .with_context(|| format!("failed to start '{program}'"))?;
    child
        .wait()
        .with_context(|| format!("failed to wait for '{program}'"))
}

/// The code the wrapper exits with after the child finished with `status`.
pub fn exit_code(status: ExitStatus) -> u8 {
    match status.code() {
        Some(code) => u8::try_from(code).unwrap_or(FALLBACK_EXIT_CODE),
        None => terminated_by_signal(status),
    }
}

#[cfg(unix)]
fn terminated_by_signal(status: ExitStatus) -> u8 {
    use std::os::unix::process::ExitStatusExt;
    match status.signal() {
        Some(signal) => u8::try_from(128 + signal).unwrap_or(FALLBACK_EXIT_CODE),
        None => FALLBACK_EXIT_CODE,
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_status: ExitStatus) -> u8 {
    FALLBACK_EXIT_CODE
}
