pub mod buffer;
pub mod catalog;
pub mod extractor;
pub mod identity;
pub mod registry;
pub mod session;

pub use buffer::EventBuffer;
pub use catalog::{SignalSpec, CATALOG, CLOSING_SIGNAL};
pub use extractor::extract;
pub use identity::IdentityTable;
pub use registry::SubscriptionRegistry;
pub use session::CaptureSession;
