//! Bundles every session log of a directory into one zip archive.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::persistence::{list_logs, parent_dir, set_plain_permissions};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot read log directory {path}")]
    ListLogs {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot read log file {path}")]
    ReadLog {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot write archive {path}")]
    WriteArchive {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("archive encoding failed")]
    Zip(#[from] zip::result::ZipError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub path: PathBuf,
    /// Entry names, in archive order.
    pub entries: Vec<String>,
}

/// Write every `*.<extension>` file of `log_dir` into a deflated zip at
/// `destination`, each under its base name.
///
/// The archive is assembled in a temp file beside `destination` and only
/// renamed into place once complete; on error nothing is left behind and
/// the log directory is never modified.
pub fn export_logs(
    log_dir: &Path,
    extension: &str,
    destination: &Path,
) -> Result<ExportSummary, ExportError> {
    let logs = list_logs(log_dir, extension).map_err(|source| ExportError::ListLogs {
        path: log_dir.to_path_buf(),
        source,
    })?;

    let write_error = |source: io::Error| ExportError::WriteArchive {
        path: destination.to_path_buf(),
        source,
    };

    let mut temp = NamedTempFile::new_in(parent_dir(destination)).map_err(write_error)?;
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut entries = Vec::with_capacity(logs.len());

    {
        let mut zip = ZipWriter::new(temp.as_file_mut());
        for log in &logs {
            let Some(name) = log.file_name().and_then(|name| name.to_str()) else {
                log::warn!("skipping log with non UTF-8 name: {}", log.display());
                continue;
            };

            let mut source = File::open(log).map_err(|source| ExportError::ReadLog {
                path: log.clone(),
                source,
            })?;
            zip.start_file(name, options)?;
            io::copy(&mut source, &mut zip).map_err(|source| ExportError::ReadLog {
                path: log.clone(),
                source,
            })?;
            entries.push(name.to_string());
        }
        zip.finish()?;
    }

    set_plain_permissions(&temp, destination).map_err(write_error)?;
    temp.persist(destination)
        .map_err(|err| write_error(err.error))?;

    log::info!(
        "Exported {} usage logs from {} to {}",
        entries.len(),
        log_dir.display(),
        destination.display()
    );

    Ok(ExportSummary {
        path: destination.to_path_buf(),
        entries,
    })
}
