use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tempfile::NamedTempFile;

use crate::models::EventRecord;

const INDENT: &[u8] = b"    ";

/// Serialize `records` as one pretty-printed JSON array.
pub fn to_json(records: &[EventRecord]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(INDENT));
    records
        .serialize(&mut serializer)
        .context("failed to serialize usage events")?;
    Ok(out)
}

/// Write the whole session to `path`.
///
/// The JSON goes to a temp file next to `path` which is then renamed over
/// it, so an interrupted write leaves any earlier log intact.
pub fn flush(records: &[EventRecord], path: &Path) -> Result<()> {
    let json = to_json(records)?;
    let dir = parent_dir(path);

    let mut temp = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temp file in {}", dir.display()))?;
    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        writer.write_all(&json)?;
        writer.flush()?;
    }
    temp.as_file()
        .sync_all()
        .with_context(|| format!("failed to sync usage log for {}", path.display()))?;
    set_plain_permissions(&temp, path)
        .with_context(|| format!("failed to set permissions for {}", path.display()))?;

    temp.persist(path)
        .with_context(|| format!("failed to move usage log into {}", path.display()))?;
    Ok(())
}

pub fn read_log(path: &Path) -> Result<Vec<EventRecord>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open usage log {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse usage log {}", path.display()))
}

/// Session logs in `dir` with the given extension, sorted by name (which
/// sorts them by start time). A missing directory holds no logs.
pub fn list_logs(dir: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
    let mut logs = Vec::new();

    if dir.is_dir() {
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == extension) {
                logs.push(path);
            }
        }
    }

    logs.sort();
    Ok(logs)
}

/// Temp files are created owner-only. Before one is renamed over `target`,
/// give it the target's current mode, or 0644 for a new file.
pub(crate) fn set_plain_permissions(temp: &NamedTempFile, target: &Path) -> io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let permissions = match std::fs::metadata(target) {
            Ok(metadata) => metadata.permissions(),
            Err(_) => std::fs::Permissions::from_mode(0o644),
        };
        temp.as_file().set_permissions(permissions)?;
    }
    #[cfg(not(unix))]
    let _ = (temp, target);

    Ok(())
}

pub(crate) fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
