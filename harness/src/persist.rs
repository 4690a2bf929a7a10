//! One-shot atomic persistence of run results.
//!
//! Temp file + rename in the destination directory, so a crash mid-write
//! never leaves a truncated results file behind.

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use shortlist_types::RunResults;
use tempfile::NamedTempFile;

pub fn write_results(path: &Path, results: &RunResults) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(results).context("failed to encode run results")?;
    atomic_write(path, &bytes)
        .with_context(|| format!("failed to write results to {}", path.display()))
}

fn atomic_write(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|err| err.error)?;
    Ok(())
}
