use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerSettings {
    /// Where session logs go; `None` means `~/.usagelog/user_logs`.
    pub log_dir: Option<PathBuf>,
    pub log_extension: String,
    pub max_name_attempts: u32,
    /// Suggested export name is `<archive_prefix>_YYYY-MM-DD.zip`.
    pub archive_prefix: String,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            log_dir: None,
            log_extension: "txt".into(),
            max_name_attempts: 100,
            archive_prefix: "UsageLogs".into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct UserSettings {
    logger: LoggerSettings,
}

pub fn default_settings_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".usagelog")
        .join("settings.json")
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log::warn!("Ignoring unreadable settings {}: {err}", path.display());
                UserSettings::default()
            })
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn logger(&self) -> LoggerSettings {
        self.read().logger.clone()
    }

    pub fn update_logger(&self, settings: LoggerSettings) -> Result<()> {
        let mut guard = self.write();
        guard.logger = settings;
        self.persist(&guard)
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }

    fn read(&self) -> RwLockReadGuard<'_, UserSettings> {
        self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, UserSettings> {
        self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json")).unwrap();

        assert_eq!(store.logger(), LoggerSettings::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"logger": {"log_extension": "json"}}"#).unwrap();

        let logger = SettingsStore::new(path).unwrap().logger();

        assert_eq!(logger.log_extension, "json");
        assert_eq!(logger.max_name_attempts, 100);
    }

    #[test]
    fn garbage_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json").unwrap();

        assert_eq!(SettingsStore::new(path).unwrap().logger(), LoggerSettings::default());
    }

    #[test]
    fn update_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let store = SettingsStore::new(path.clone()).unwrap();
        let updated = LoggerSettings {
            log_dir: Some(dir.path().join("logs")),
            ..LoggerSettings::default()
        };

        store.update_logger(updated.clone()).unwrap();

        assert_eq!(SettingsStore::new(path).unwrap().logger(), updated);
    }
}
