// Diagnostic logging for netpong
// The terminal belongs to the UI, so tracing output goes to a file and only
// when --debug is given

use std::fs::OpenOptions;
use std::path::Path;
use std::str::FromStr;
use std::sync::Mutex;

use anyhow::{anyhow, Context};
use tracing::Level;

/// Install the global tracing subscriber.
///
/// With `enabled == false` nothing is installed and every `tracing` macro is a
/// no-op. Otherwise the file at `path` is truncated and receives plain-text
/// events at `level` and above. An unknown level name falls back to `info`.
pub fn init(enabled: bool, level: &str, path: &Path) -> anyhow::Result<()> {
    if !enabled {
        return Ok(());
    }

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_max_level(parse_level(level))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow!("installing tracing subscriber: {}", e))?;

    tracing::info!("netpong {} logging to {}", env!("CARGO_PKG_VERSION"), path.display());
    Ok(())
}

fn parse_level(level: &str) -> Level {
    Level::from_str(level.trim()).unwrap_or(Level::INFO)
}
