pub mod capture;
pub mod commands;
pub mod host;
pub mod logger;
pub mod models;
pub mod settings;
pub mod storage;
mod utils;

pub use capture::{extract, CaptureSession, IdentityTable, SubscriptionRegistry, CATALOG};
pub use commands::{ExportCommand, ExportOutcome};
pub use host::{EventSource, UiObject, UiRef, WidgetRole, Workbench};
pub use logger::EventLogger;
pub use models::{EventRecord, FieldValue, PayloadValue, RawEvent};
pub use settings::{LoggerSettings, SettingsStore};
pub use storage::{export_logs, ExportError, ExportSummary};

/// Route `log` output to stderr, filtered by `RUST_LOG` (default `info`).
/// Safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
