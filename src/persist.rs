use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use tempfile::NamedTempFile;

/// Writes `value` as pretty JSON to `path` atomically: the document is
/// serialized into a temp file in the same directory, then renamed over
/// the canonical path. Readers see either the previous complete file or
/// the new complete file, never a partial write.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let dir = path
        .parent()
        .with_context(|| format!("no parent directory for {}", path.display()))?;
    let tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("create temp file in {}", dir.display()))?;
    serde_json::to_writer_pretty(&tmp, value)
        .with_context(|| format!("serialize {}", path.display()))?;
    tmp.persist(path)
        .with_context(|| format!("rename over {}", path.display()))?;
    Ok(())
}
