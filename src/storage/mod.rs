pub mod archive;
pub mod location;
pub mod persistence;

pub use archive::{export_logs, ExportError, ExportSummary};
pub use location::{allocate_log_path, prepare_log_dir};
pub use persistence::{flush, list_logs, read_log};
