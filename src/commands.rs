//! The "export usage logs" command.
//!
//! Asks the host where to save, archives the log directory, and reports
//! failures to the user. Nothing propagates back into the host's event loop.

use std::path::PathBuf;
use std::rc::Rc;

use chrono::{Local, NaiveDate};
use log::info;

use crate::host::{CommandHost, CommandSpec, Notifier, SavePrompt, SaveRequest};
use crate::settings::LoggerSettings;
use crate::storage::{export_logs, ExportSummary};

pub const EXPORT_COMMAND: CommandSpec = CommandSpec {
    id: "export_usage_logs",
    menu: "tools",
    label: "Export usage logs ...",
    group: 60,
};

const ARCHIVE_EXTENSION: &str = "zip";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Cancelled,
    Exported(ExportSummary),
}

pub fn suggested_archive_name(prefix: &str, today: NaiveDate) -> String {
    format!("{prefix}_{}.{ARCHIVE_EXTENSION}", today.format("%Y-%m-%d"))
}

pub struct ExportCommand {
    log_dir: PathBuf,
    log_extension: String,
    archive_prefix: String,
    prompt: Rc<dyn SavePrompt>,
    notifier: Rc<dyn Notifier>,
}

impl ExportCommand {
    pub fn new(
        log_dir: PathBuf,
        settings: &LoggerSettings,
        prompt: Rc<dyn SavePrompt>,
        notifier: Rc<dyn Notifier>,
    ) -> Self {
        Self {
            log_dir,
            log_extension: settings.log_extension.clone(),
            archive_prefix: settings.archive_prefix.clone(),
            prompt,
            notifier,
        }
    }

    pub fn run(&self) -> Result<ExportOutcome, String> {
        let request = SaveRequest {
            suggested_name: suggested_archive_name(&self.archive_prefix, Local::now().date_naive()),
            initial_dir: self.log_dir.clone(),
            default_extension: ARCHIVE_EXTENSION,
        };

        let Some(destination) = self.prompt.ask_save_path(&request) else {
            info!("Usage log export cancelled");
            return Ok(ExportOutcome::Cancelled);
        };

        match export_logs(&self.log_dir, &self.log_extension, &destination) {
            Ok(summary) => Ok(ExportOutcome::Exported(summary)),
            Err(err) => {
                let message = format!("{:#}", anyhow::Error::new(err));
                log::error!("Usage log export to {} failed: {message}", destination.display());
                self.notifier.error("Export failed", &message);
                Err(message)
            }
        }
    }
}

/// Expose `command` in the host's menu.
pub fn register<H>(host: &H, command: ExportCommand)
where
    H: CommandHost + ?Sized,
{
    host.add_command(
        EXPORT_COMMAND,
        Box::new(move || {
            // Outcome is already logged and, on failure, shown to the user.
            let _ = command.run();
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::fake::{RecordingNotifier, ScriptedPrompt};
    use tempfile::TempDir;

    fn command(log_dir: PathBuf) -> (ExportCommand, Rc<ScriptedPrompt>, Rc<RecordingNotifier>) {
        let prompt = Rc::new(ScriptedPrompt::default());
        let notifier = Rc::new(RecordingNotifier::default());
        let command = ExportCommand::new(
            log_dir,
            &LoggerSettings::default(),
            prompt.clone(),
            notifier.clone(),
        );
        (command, prompt, notifier)
    }

    #[test]
    fn suggested_name_embeds_date() {
        let day = NaiveDate::from_ymd_opt(2024, 7, 4).unwrap();
        assert_eq!(suggested_archive_name("UsageLogs", day), "UsageLogs_2024-07-04.zip");
    }

    #[test]
    fn cancel_is_silent() {
        let logs = TempDir::new().unwrap();
        let (command, prompt, notifier) = command(logs.path().to_path_buf());

        assert_eq!(command.run(), Ok(ExportOutcome::Cancelled));

        let requests = prompt.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].initial_dir, logs.path());
        assert_eq!(requests[0].default_extension, "zip");
        assert!(requests[0].suggested_name.starts_with("UsageLogs_"));
        assert!(notifier.errors().is_empty());
        assert_eq!(std::fs::read_dir(logs.path()).unwrap().count(), 0);
    }

    #[test]
    fn exports_to_chosen_path() {
        let logs = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        std::fs::write(logs.path().join("s_0.txt"), "[]").unwrap();
        let (command, prompt, _) = command(logs.path().to_path_buf());
        let destination = out.path().join("logs.zip");
        prompt.answer_with(Some(destination.clone()));

        let outcome = command.run().unwrap();

        assert_eq!(
            outcome,
            ExportOutcome::Exported(ExportSummary {
                path: destination.clone(),
                entries: vec!["s_0.txt".into()],
            })
        );
        assert!(destination.is_file());
    }

    #[test]
    fn failure_is_reported_to_user() {
        let logs = TempDir::new().unwrap();
        let (command, prompt, notifier) = command(logs.path().to_path_buf());
        prompt.answer_with(Some(logs.path().join("missing").join("logs.zip")));

        assert!(command.run().is_err());

        let errors = notifier.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, "Export failed");
        assert!(errors[0].1.contains("logs.zip"));
    }
}
