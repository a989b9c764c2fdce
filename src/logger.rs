use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use log::info;

use crate::capture::{CaptureSession, SubscriptionRegistry, CATALOG};
use crate::commands::{self, ExportCommand, EXPORT_COMMAND};
use crate::host::Workbench;
use crate::models::EventRecord;
use crate::settings::LoggerSettings;
use crate::storage::{allocate_log_path, prepare_log_dir};

/// A running usage-logging session attached to a host.
///
/// Installing picks a fresh log file, subscribes to every catalog signal
/// and adds the export command. The log is written when the host fires its
/// closing signal.
pub struct EventLogger {
    session: CaptureSession,
    registry: SubscriptionRegistry,
    log_dir: PathBuf,
}

impl EventLogger {
    pub fn install<H>(host: &H, settings: &LoggerSettings) -> Result<Self>
    where
        H: Workbench + ?Sized,
    {
        let log_dir = prepare_log_dir(settings)?;
        let log_path = allocate_log_path(
            &log_dir,
            Local::now().naive_local(),
            &settings.log_extension,
            settings.max_name_attempts,
        )?;

        let session = CaptureSession::new(log_path);
        let mut registry = SubscriptionRegistry::new(session.clone());
        registry
            .attach(host, CATALOG)
            .context("failed to subscribe to usage signals")?;

        commands::register(
            host,
            ExportCommand::new(
                log_dir.clone(),
                settings,
                host.save_prompt(),
                host.notifier(),
            ),
        );

        info!(
            "Usage logging started, session log {}",
            session.log_path().display()
        );

        Ok(Self {
            session,
            registry,
            log_dir,
        })
    }

    pub fn log_path(&self) -> &Path {
        self.session.log_path()
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn event_count(&self) -> usize {
        self.session.len()
    }

    pub fn records(&self) -> Vec<EventRecord> {
        self.session.records()
    }

    pub fn is_closed(&self) -> bool {
        self.session.is_closed()
    }

    pub fn signals(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.registry.signals()
    }

    /// Stop listening and take the export command out of the host's menu.
    /// The log is written only by the closing signal.
    pub fn uninstall<H>(mut self, host: &H)
    where
        H: Workbench + ?Sized,
    {
        self.registry.detach(host);
        host.remove_command(EXPORT_COMMAND.id);
    }
}

impl fmt::Debug for EventLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventLogger")
            .field("log_path", &self.log_path())
            .field("log_dir", &self.log_dir)
            .field("events", &self.event_count())
            .field("closed", &self.is_closed())
            .finish()
    }
}
