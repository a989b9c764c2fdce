pub mod event_record;
pub mod payload;

pub use event_record::{capture_time, EventRecord, FieldValue, Fields};
pub use payload::{EventOrigin, PayloadValue, RawEvent};
