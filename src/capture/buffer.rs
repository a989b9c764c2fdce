use crate::models::EventRecord;

/// Records of the running session, in capture order. Append-only.
#[derive(Debug, Default)]
pub struct EventBuffer {
    records: Vec<EventRecord>,
}

impl EventBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: EventRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
