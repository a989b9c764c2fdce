use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDateTime;

use crate::settings::LoggerSettings;

/// Overrides the configured log directory when set to a non-empty path.
pub const LOG_DIR_ENV: &str = "USAGELOG_LOG_DIR";

pub fn default_log_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".usagelog")
        .join("user_logs")
}

pub fn resolve_log_dir(settings: &LoggerSettings) -> PathBuf {
    resolve_with_env(settings, std::env::var_os(LOG_DIR_ENV).map(PathBuf::from))
}

fn resolve_with_env(settings: &LoggerSettings, from_env: Option<PathBuf>) -> PathBuf {
    from_env
        .filter(|dir| !dir.as_os_str().is_empty())
        .or_else(|| settings.log_dir.clone())
        .unwrap_or_else(default_log_dir)
}

/// Resolve the log directory and create it if needed.
pub fn prepare_log_dir(settings: &LoggerSettings) -> Result<PathBuf> {
    let dir = resolve_log_dir(settings);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    Ok(dir)
}

/// First free `<YYYY-MM-DD_HH-MM-SS>_<n>.<ext>` in `dir`, trying `n` from
/// zero. Running out of attempts is fatal: the session would otherwise
/// overwrite an earlier log.
pub fn allocate_log_path(
    dir: &Path,
    started_at: NaiveDateTime,
    extension: &str,
    max_attempts: u32,
) -> Result<PathBuf> {
    let stamp = started_at.format("%Y-%m-%d_%H-%M-%S");

    for attempt in 0..max_attempts {
        let candidate = dir.join(format!("{stamp}_{attempt}.{extension}"));
        if !candidate.exists() {
            return Ok(candidate);
        }
    }

    bail!(
        "no free log file name for {stamp} in {} after {max_attempts} attempts",
        dir.display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn started_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_opt(13, 7, 5)
            .unwrap()
    }

    #[test]
    fn first_candidate_when_free() {
        let dir = TempDir::new().unwrap();

        let path = allocate_log_path(dir.path(), started_at(), "txt", 100).unwrap();

        assert_eq!(path, dir.path().join("2024-02-29_13-07-05_0.txt"));
    }

    #[test]
    fn skips_occupied_names() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("2024-02-29_13-07-05_0.txt"), "[]").unwrap();
        std::fs::write(dir.path().join("2024-02-29_13-07-05_1.txt"), "[]").unwrap();

        let path = allocate_log_path(dir.path(), started_at(), "txt", 100).unwrap();

        assert_eq!(path, dir.path().join("2024-02-29_13-07-05_2.txt"));
        assert_eq!(std::fs::read_to_string(dir.path().join("2024-02-29_13-07-05_0.txt")).unwrap(), "[]");
    }

    #[test]
    fn all_attempts_taken_is_an_error() {
        let dir = TempDir::new().unwrap();
        for n in 0..3 {
            std::fs::write(dir.path().join(format!("2024-02-29_13-07-05_{n}.txt")), "").unwrap();
        }

        assert!(allocate_log_path(dir.path(), started_at(), "txt", 3).is_err());
    }

    #[test]
    fn env_override_wins_over_settings() {
        let settings = LoggerSettings {
            log_dir: Some(PathBuf::from("/configured")),
            ..LoggerSettings::default()
        };

        assert_eq!(
            resolve_with_env(&settings, Some(PathBuf::from("/from-env"))),
            PathBuf::from("/from-env")
        );
        assert_eq!(
            resolve_with_env(&settings, Some(PathBuf::new())),
            PathBuf::from("/configured")
        );
        assert_eq!(
            resolve_with_env(&LoggerSettings::default(), None),
            default_log_dir()
        );
    }

    #[test]
    fn prepare_creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let settings = LoggerSettings {
            log_dir: Some(dir.path().join("a").join("b")),
            ..LoggerSettings::default()
        };

        // Only meaningful when the environment does not redirect the logs.
        if std::env::var_os(LOG_DIR_ENV).is_none() {
            let created = prepare_log_dir(&settings).unwrap();
            assert!(created.is_dir());
        }
    }
}
