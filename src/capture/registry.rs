use std::rc::{Rc, Weak};

use crate::host::{same_object, EventSource, Handler, SubscribeError, SubscriptionId, UiObject};
use crate::models::{PayloadValue, RawEvent};

use super::catalog::{SignalAction, SignalSpec, TargetFilter};
use super::session::CaptureSession;

// Set to true to trace every subscription made at startup
const ENABLE_LOGS: bool = false;

use crate::log_debug;

/// Attaches one handler per catalog signal and keeps track of them.
pub struct SubscriptionRegistry {
    session: CaptureSession,
    subscriptions: Vec<(&'static str, SubscriptionId)>,
}

impl SubscriptionRegistry {
    pub fn new(session: CaptureSession) -> Self {
        Self {
            session,
            subscriptions: Vec::new(),
        }
    }

    /// Subscribe to every signal in `catalog`. The first rejection aborts
    /// the whole attach and removes the subscriptions already made.
    pub fn attach<S>(&mut self, source: &S, catalog: &'static [SignalSpec]) -> Result<(), SubscribeError>
    where
        S: EventSource + ?Sized,
    {
        let application = Rc::downgrade(&source.application());

        for spec in catalog {
            let handler = self.handler_for(spec, application.clone());
            match source.subscribe(spec.name, spec.scope, handler) {
                Ok(id) => {
                    log_debug!("subscribed to {} ({:?})", spec.name, spec.scope);
                    self.subscriptions.push((spec.name, id));
                }
                Err(err) => {
                    self.detach(source);
                    return Err(err);
                }
            }
        }

        Ok(())
    }

    /// Remove every subscription made by [`attach`](Self::attach).
    pub fn detach<S>(&mut self, source: &S)
    where
        S: EventSource + ?Sized,
    {
        for (_, id) in self.subscriptions.drain(..) {
            source.unsubscribe(id);
        }
    }

    pub fn signals(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.subscriptions.iter().map(|(name, _)| *name)
    }

    fn handler_for(&self, spec: &'static SignalSpec, application: Weak<dyn UiObject>) -> Handler {
        let session = self.session.clone();

        match (spec.action, spec.target) {
            (SignalAction::Shutdown, _) => Box::new(move |_event: &RawEvent| session.close()),
            (SignalAction::Record, TargetFilter::Any) => {
                Box::new(move |event: &RawEvent| session.record(spec.name, event))
            }
            (SignalAction::Record, TargetFilter::ApplicationOnly) => {
                Box::new(move |event: &RawEvent| {
                    if targets_application(event, &application) {
                        session.record(spec.name, event);
                    }
                })
            }
        }
    }
}

fn targets_application(event: &RawEvent, application: &Weak<dyn UiObject>) -> bool {
    let Some(application) = application.upgrade() else {
        return false;
    };

    event
        .get("widget")
        .and_then(PayloadValue::as_object)
        .map_or(false, |widget| same_object(widget, &application))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::catalog::{CATALOG, CLOSING_SIGNAL};
    use crate::host::fake::{FakeHost, FakeWidget};
    use crate::host::{DeliveryScope, WidgetRole};
    use crate::storage::persistence;
    use tempfile::TempDir;

    fn attached(dir: &TempDir) -> (FakeHost, CaptureSession, SubscriptionRegistry) {
        let host = FakeHost::new();
        let session = CaptureSession::new(dir.path().join("session.txt"));
        let mut registry = SubscriptionRegistry::new(session.clone());
        registry.attach(&host, CATALOG).unwrap();
        (host, session, registry)
    }

    #[test]
    fn subscribes_whole_catalog_with_its_scopes() {
        let dir = TempDir::new().unwrap();
        let (host, _, registry) = attached(&dir);

        let expected: Vec<_> = CATALOG
            .iter()
            .map(|spec| (spec.name.to_string(), spec.scope))
            .collect();
        assert_eq!(host.subscriptions(), expected);
        assert_eq!(registry.signals().count(), CATALOG.len());
        assert!(host
            .subscriptions()
            .contains(&("<<Undo>>".to_string(), DeliveryScope::Broadcast)));
    }

    #[test]
    fn rejected_signal_fails_attach() {
        let dir = TempDir::new().unwrap();
        let host = FakeHost::new().without_signal("ShellInput");
        let mut registry = SubscriptionRegistry::new(CaptureSession::new(dir.path().join("s.txt")));

        let err = registry.attach(&host, CATALOG).unwrap_err();

        assert!(matches!(err, SubscribeError::UnknownSignal(name) if name == "ShellInput"));
    }

    #[test]
    fn failed_attach_leaves_nothing_subscribed() {
        let dir = TempDir::new().unwrap();
        let host = FakeHost::new().without_signal("ShellInput");
        let session = CaptureSession::new(dir.path().join("s.txt"));
        let mut registry = SubscriptionRegistry::new(session.clone());
        let rejected_at = CATALOG.iter().position(|spec| spec.name == "ShellInput").unwrap();
        assert!(rejected_at > 0 && rejected_at + 1 < CATALOG.len());

        assert!(registry.attach(&host, CATALOG).is_err());

        assert!(host.subscriptions().is_empty());
        assert_eq!(registry.signals().count(), 0);
        assert_eq!(host.fire("Open", &RawEvent::application()), 0);
        assert!(session.is_empty());
    }

    #[test]
    fn focus_from_child_widgets_is_ignored() {
        let dir = TempDir::new().unwrap();
        let (host, session, _registry) = attached(&dir);
        let child = FakeWidget::new("CodeViewText", WidgetRole::TextSurface).into_ref();

        host.fire("<FocusIn>", &RawEvent::native().with("widget", &child));
        host.fire("<FocusIn>", &RawEvent::native().with("widget", host.app()));
        host.fire("<FocusOut>", &RawEvent::native());

        let records = session.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sequence, "<FocusIn>");
        assert_eq!(
            records[0].field("widget_class"),
            Some(&crate::models::FieldValue::Text("Workbench".into()))
        );
    }

    #[test]
    fn closing_signal_flushes_instead_of_recording() {
        let dir = TempDir::new().unwrap();
        let (host, session, _registry) = attached(&dir);

        host.fire("Open", &RawEvent::application().with("filename", "a.py"));
        host.fire("<<Paste>>", &RawEvent::native());
        host.fire(CLOSING_SIGNAL, &RawEvent::application());

        let written = persistence::read_log(session.log_path()).unwrap();
        let sequences: Vec<_> = written.iter().map(|r| r.sequence.as_str()).collect();
        assert_eq!(sequences, ["Open", "<<Paste>>"]);
    }

    #[test]
    fn detach_stops_delivery() {
        let dir = TempDir::new().unwrap();
        let (host, session, mut registry) = attached(&dir);

        registry.detach(&host);

        assert_eq!(host.fire("Save", &RawEvent::application()), 0);
        assert!(session.is_empty());
        assert!(host.subscriptions().is_empty());
    }
}
