use anyhow::{Context, Result};
use std::time::{SystemTime, UNIX_EPOCH};

pub const SNAPSHOT_PREFIX: &str = "snap_";
pub const SNAPSHOT_EXTENSION: &str = "bin";

/// Name of the snapshot file a live run writes, e.g. `snap_1650000000.bin`.
///
/// The timestamp is whole seconds since the UNIX epoch.
pub fn snapshot_filename(at: SystemTime) -> Result<String> {
    let secs = at
        .duration_since(UNIX_EPOCH)
        .context("system clock is set before the UNIX epoch")?
        .as_secs();
    Ok(format!("{SNAPSHOT_PREFIX}{secs}.{SNAPSHOT_EXTENSION}"))
}

pub fn snapshot_filename_now() -> Result<String> {
    snapshot_filename(SystemTime::now())
}
