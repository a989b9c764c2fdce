//! Interfaces the capture pipeline needs from the host application.
//!
//! The host owns the widget tree, the event dispatch loop, menus and
//! dialogs. The pipeline only sees the narrow traits below, so it can run
//! against a real UI toolkit binding or against [`fake::FakeHost`].

pub mod fake;

use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;

use thiserror::Error;

use crate::models::RawEvent;

/// What a live UI object is, as far as extraction cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetRole {
    /// The top-level application object.
    Application,
    /// An editor that owns a text surface.
    Editor,
    /// A text-editing surface.
    TextSurface,
    /// The interactive console/shell view.
    Shell,
    Other,
}

/// A live object inside the host's UI. Never serialized; extraction reduces
/// it to an identity token and its class name.
pub trait UiObject {
    /// Concrete kind name, e.g. `"CodeViewText"`.
    fn class_name(&self) -> &str;

    fn role(&self) -> WidgetRole;

    /// The widget this one is placed in.
    fn container(&self) -> Option<UiRef> {
        None
    }

    /// For editors: the text surface they edit.
    fn text_surface(&self) -> Option<UiRef> {
        None
    }
}

pub type UiRef = Rc<dyn UiObject>;

impl fmt::Debug for dyn UiObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.class_name())
    }
}

/// Identity comparison of two live objects.
pub fn same_object(lhs: &UiRef, rhs: &UiRef) -> bool {
    Rc::as_ptr(lhs) as *const () == Rc::as_ptr(rhs) as *const ()
}

/// Where a subscription is attached in the host's dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryScope {
    /// Delivered regardless of which element has focus.
    Broadcast,
    /// Delivered through the application object's own dispatch path.
    Framework,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

pub type Handler = Box<dyn FnMut(&RawEvent)>;

#[derive(Debug, Error)]
pub enum SubscribeError {
    #[error("unknown signal '{0}'")]
    UnknownSignal(String),
    #[error("subscription to '{signal}' rejected: {reason}")]
    Rejected { signal: String, reason: String },
}

/// Signal source of the host UI framework.
pub trait EventSource {
    /// The main application object.
    fn application(&self) -> UiRef;

    /// Attach `handler` to `signal`. Handlers run synchronously on the
    /// dispatch thread and are added alongside existing ones.
    fn subscribe(
        &self,
        signal: &str,
        scope: DeliveryScope,
        handler: Handler,
    ) -> Result<SubscriptionId, SubscribeError>;

    fn unsubscribe(&self, id: SubscriptionId);
}

/// Menu entry the host shows for a user-facing command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub id: &'static str,
    pub menu: &'static str,
    pub label: &'static str,
    pub group: u32,
}

pub type CommandAction = Box<dyn FnMut()>;

pub trait CommandHost {
    fn add_command(&self, spec: CommandSpec, action: CommandAction);

    /// Drop the command registered under `id`, if any.
    fn remove_command(&self, id: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub suggested_name: String,
    pub initial_dir: PathBuf,
    pub default_extension: &'static str,
}

/// Save-location dialog. `None` means the user cancelled.
pub trait SavePrompt {
    fn ask_save_path(&self, request: &SaveRequest) -> Option<PathBuf>;
}

/// User-visible notification channel.
pub trait Notifier {
    fn error(&self, title: &str, message: &str);
}

/// Everything the event logger needs from its host.
pub trait Workbench: EventSource + CommandHost {
    fn save_prompt(&self) -> Rc<dyn SavePrompt>;
    fn notifier(&self) -> Rc<dyn Notifier>;
}
