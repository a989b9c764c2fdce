//! In-process host used to drive the pipeline without a UI toolkit.
//!
//! Signals are fired by hand, dialogs answer from a script and
//! notifications are recorded for inspection.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::path::PathBuf;
use std::rc::Rc;

use super::{
    CommandAction, CommandHost, CommandSpec, DeliveryScope, EventSource, Handler, Notifier,
    SavePrompt, SaveRequest, SubscribeError, SubscriptionId, UiObject, UiRef, WidgetRole,
    Workbench,
};
use crate::models::RawEvent;

pub struct FakeWidget {
    class_name: String,
    role: WidgetRole,
    container: Option<UiRef>,
    text_surface: Option<UiRef>,
}

impl FakeWidget {
    pub fn new(class_name: impl Into<String>, role: WidgetRole) -> Self {
        Self {
            class_name: class_name.into(),
            role,
            container: None,
            text_surface: None,
        }
    }

    pub fn inside(mut self, container: &UiRef) -> Self {
        self.container = Some(container.clone());
        self
    }

    pub fn editing(mut self, text_surface: &UiRef) -> Self {
        self.text_surface = Some(text_surface.clone());
        self
    }

    pub fn into_ref(self) -> UiRef {
        Rc::new(self)
    }
}

impl UiObject for FakeWidget {
    fn class_name(&self) -> &str {
        &self.class_name
    }

    fn role(&self) -> WidgetRole {
        self.role
    }

    fn container(&self) -> Option<UiRef> {
        self.container.clone()
    }

    fn text_surface(&self) -> Option<UiRef> {
        self.text_surface.clone()
    }
}

struct FakeSubscription {
    id: SubscriptionId,
    signal: String,
    scope: DeliveryScope,
    handler: Rc<RefCell<Handler>>,
}

/// Save prompt that returns a preset answer and remembers what it was asked.
#[derive(Default)]
pub struct ScriptedPrompt {
    answer: RefCell<Option<PathBuf>>,
    requests: RefCell<Vec<SaveRequest>>,
}

impl ScriptedPrompt {
    pub fn answer_with(&self, answer: Option<PathBuf>) {
        *self.answer.borrow_mut() = answer;
    }

    pub fn requests(&self) -> Vec<SaveRequest> {
        self.requests.borrow().clone()
    }
}

impl SavePrompt for ScriptedPrompt {
    fn ask_save_path(&self, request: &SaveRequest) -> Option<PathBuf> {
        self.requests.borrow_mut().push(request.clone());
        self.answer.borrow().clone()
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    errors: RefCell<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn errors(&self) -> Vec<(String, String)> {
        self.errors.borrow().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn error(&self, title: &str, message: &str) {
        self.errors
            .borrow_mut()
            .push((title.to_string(), message.to_string()));
    }
}

pub struct FakeHost {
    application: UiRef,
    unknown_signals: HashSet<String>,
    subscriptions: RefCell<Vec<FakeSubscription>>,
    commands: RefCell<Vec<(CommandSpec, CommandAction)>>,
    next_id: Cell<u64>,
    prompt: Rc<ScriptedPrompt>,
    notifier: Rc<RecordingNotifier>,
}

impl Default for FakeHost {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            application: FakeWidget::new("Workbench", WidgetRole::Application).into_ref(),
            unknown_signals: HashSet::new(),
            subscriptions: RefCell::new(Vec::new()),
            commands: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
            prompt: Rc::new(ScriptedPrompt::default()),
            notifier: Rc::new(RecordingNotifier::default()),
        }
    }

    /// Host that does not know `signal` and refuses to subscribe to it.
    pub fn without_signal(mut self, signal: &str) -> Self {
        self.unknown_signals.insert(signal.to_string());
        self
    }

    pub fn app(&self) -> UiRef {
        self.application.clone()
    }

    /// Deliver `event` to every handler subscribed to `signal`, in
    /// subscription order. Returns how many handlers ran.
    pub fn fire(&self, signal: &str, event: &RawEvent) -> usize {
        // Handlers may subscribe or fire again, so no borrow is held while they run.
        let handlers: Vec<Rc<RefCell<Handler>>> = self
            .subscriptions
            .borrow()
            .iter()
            .filter(|subscription| subscription.signal == signal)
            .map(|subscription| Rc::clone(&subscription.handler))
            .collect();

        for handler in &handlers {
            let mut handler = handler.borrow_mut();
            (*handler)(event);
        }
        handlers.len()
    }

    pub fn subscriptions(&self) -> Vec<(String, DeliveryScope)> {
        self.subscriptions
            .borrow()
            .iter()
            .map(|subscription| (subscription.signal.clone(), subscription.scope))
            .collect()
    }

    pub fn commands(&self) -> Vec<CommandSpec> {
        self.commands.borrow().iter().map(|(spec, _)| *spec).collect()
    }

    /// Run the command registered under `id`, as if picked from its menu.
    pub fn invoke_command(&self, id: &str) -> bool {
        let mut commands = self.commands.borrow_mut();
        match commands.iter_mut().find(|(spec, _)| spec.id == id) {
            Some((_, action)) => {
                action();
                true
            }
            None => false,
        }
    }

    pub fn prompt(&self) -> &ScriptedPrompt {
        &self.prompt
    }

    pub fn notifications(&self) -> &RecordingNotifier {
        &self.notifier
    }
}

impl EventSource for FakeHost {
    fn application(&self) -> UiRef {
        self.app()
    }

    fn subscribe(
        &self,
        signal: &str,
        scope: DeliveryScope,
        handler: Handler,
    ) -> Result<SubscriptionId, SubscribeError> {
        if self.unknown_signals.contains(signal) {
            return Err(SubscribeError::UnknownSignal(signal.to_string()));
        }

        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.subscriptions.borrow_mut().push(FakeSubscription {
            id,
            signal: signal.to_string(),
            scope,
            handler: Rc::new(RefCell::new(handler)),
        });
        Ok(id)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.subscriptions
            .borrow_mut()
            .retain(|subscription| subscription.id != id);
    }
}

impl CommandHost for FakeHost {
    fn add_command(&self, spec: CommandSpec, action: CommandAction) {
        self.commands.borrow_mut().push((spec, action));
    }

    fn remove_command(&self, id: &str) {
        self.commands.borrow_mut().retain(|(spec, _)| spec.id != id);
    }
}

impl Workbench for FakeHost {
    fn save_prompt(&self) -> Rc<dyn SavePrompt> {
        self.prompt.clone()
    }

    fn notifier(&self) -> Rc<dyn Notifier> {
        self.notifier.clone()
    }
}
