use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::models::{capture_time, EventRecord, RawEvent};
use crate::storage::persistence;

use super::buffer::EventBuffer;
use super::extractor::extract;
use super::identity::IdentityTable;

// Set to false to silence per-event diagnostics in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error, log_info, log_warn};

struct SessionInner {
    buffer: RefCell<EventBuffer>,
    identities: RefCell<IdentityTable>,
    log_path: PathBuf,
    closed: Cell<bool>,
}

/// State of one logging session, shared by every signal handler.
///
/// Handlers run on the host's dispatch thread, so the state lives behind
/// `Rc`/`RefCell`. A handler that finds the state already borrowed (an event
/// fired from inside another handler) drops its event instead of panicking.
#[derive(Clone)]
pub struct CaptureSession {
    inner: Rc<SessionInner>,
}

impl CaptureSession {
    pub fn new(log_path: PathBuf) -> Self {
        Self {
            inner: Rc::new(SessionInner {
                buffer: RefCell::new(EventBuffer::new()),
                identities: RefCell::new(IdentityTable::new()),
                log_path,
                closed: Cell::new(false),
            }),
        }
    }

    pub fn log_path(&self) -> &Path {
        &self.inner.log_path
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.get()
    }

    /// Normalize `event` and append it to the buffer.
    pub fn record(&self, signal: &str, event: &RawEvent) {
        if self.is_closed() {
            log_debug!("session closed, ignoring {}", signal);
            return;
        }

        let time = capture_time();
        let fields = match self.inner.identities.try_borrow_mut() {
            Ok(mut identities) => extract(signal, event, &mut identities),
            Err(_) => {
                log_warn!("re-entrant {} while extracting, event dropped", signal);
                return;
            }
        };

        match self.inner.buffer.try_borrow_mut() {
            Ok(mut buffer) => buffer.push(EventRecord::new(signal, time, fields)),
            Err(_) => log_warn!("event buffer busy, {} dropped", signal),
        }
    }

    /// Write the buffer to the session log. Runs once; failures are logged
    /// and never reach the caller.
    pub fn close(&self) {
        if self.inner.closed.replace(true) {
            log_warn!("session already closed, {} left as is", self.log_path().display());
            return;
        }

        let buffer = match self.inner.buffer.try_borrow() {
            Ok(buffer) => buffer,
            Err(_) => {
                log_error!("event buffer busy during shutdown, usage log not written");
                return;
            }
        };

        match persistence::flush(buffer.records(), self.log_path()) {
            Ok(()) => log_info!(
                "Wrote {} usage events to {}",
                buffer.len(),
                self.log_path().display()
            ),
            Err(err) => log_error!(
                "failed to write usage log {}: {err:?}",
                self.log_path().display()
            ),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.buffer.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn records(&self) -> Vec<EventRecord> {
        self.inner.buffer.borrow().records().to_vec()
    }
}
