//! The fixed table of signals the logger listens to.
//!
//! Adding or moving a signal only touches [`CATALOG`]; extraction and the
//! registry read everything they need from the entries.

use crate::host::DeliveryScope;

/// Fields kept from the framework's own input events.
pub const DEFAULT_INPUT_ALLOW_LIST: &[&str] = &["widget", "text_widget", "text_widget_context"];

/// Method-like names dropped from the application's own event objects.
pub const RESERVED_NAMES: &[&str] = &["update", "setdefault"];

pub const CLOSING_SIGNAL: &str = "WorkbenchClose";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetFilter {
    Any,
    /// Only events whose `widget` is the application object itself.
    ApplicationOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalAction {
    Record,
    /// Persist the buffer instead of recording.
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalSpec {
    pub name: &'static str,
    pub scope: DeliveryScope,
    pub target: TargetFilter,
    pub action: SignalAction,
    pub allow_list: Option<&'static [&'static str]>,
}

impl SignalSpec {
    pub const fn broadcast(name: &'static str) -> Self {
        Self {
            name,
            scope: DeliveryScope::Broadcast,
            target: TargetFilter::Any,
            action: SignalAction::Record,
            allow_list: None,
        }
    }

    pub const fn framework(name: &'static str) -> Self {
        Self {
            name,
            scope: DeliveryScope::Framework,
            target: TargetFilter::Any,
            action: SignalAction::Record,
            allow_list: None,
        }
    }

    pub const fn application_only(self) -> Self {
        Self {
            target: TargetFilter::ApplicationOnly,
            ..self
        }
    }

    pub const fn shutdown(self) -> Self {
        Self {
            action: SignalAction::Shutdown,
            ..self
        }
    }

    pub const fn allowing(self, fields: &'static [&'static str]) -> Self {
        Self {
            allow_list: Some(fields),
            ..self
        }
    }

    pub fn input_allow_list(&self) -> &'static [&'static str] {
        self.allow_list.unwrap_or(DEFAULT_INPUT_ALLOW_LIST)
    }
}

pub const CATALOG: &[SignalSpec] = &[
    SignalSpec::broadcast("<<Undo>>"),
    SignalSpec::broadcast("<<Redo>>"),
    SignalSpec::broadcast("<<Cut>>"),
    SignalSpec::broadcast("<<Copy>>"),
    SignalSpec::broadcast("<<Paste>>"),
    SignalSpec::broadcast("<Button-1>"),
    SignalSpec::broadcast("<Button-2>"),
    SignalSpec::broadcast("<Button-3>"),
    SignalSpec::framework("Command"),
    SignalSpec::framework("Open"),
    SignalSpec::framework("Save"),
    SignalSpec::framework("SaveAs"),
    SignalSpec::framework("NewFile"),
    SignalSpec::framework("EditorTextCreated"),
    SignalSpec::framework("ShellCommand"),
    SignalSpec::framework("ShellInput"),
    SignalSpec::framework("ShowView"),
    SignalSpec::framework("HideView"),
    SignalSpec::framework("TextInsert"),
    SignalSpec::framework("TextDelete"),
    SignalSpec::framework("<FocusIn>").application_only(),
    SignalSpec::framework("<FocusOut>").application_only(),
    SignalSpec::framework(CLOSING_SIGNAL).shutdown(),
];

pub fn find(name: &str) -> Option<&'static SignalSpec> {
    CATALOG.iter().find(|spec| spec.name == name)
}

/// Allow-list for generic input events on `signal`; signals outside the
/// catalog use the default list.
pub fn input_allow_list(signal: &str) -> &'static [&'static str] {
    find(signal)
        .map(SignalSpec::input_allow_list)
        .unwrap_or(DEFAULT_INPUT_ALLOW_LIST)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique() {
        let names: HashSet<_> = CATALOG.iter().map(|spec| spec.name).collect();
        assert_eq!(names.len(), CATALOG.len());
    }

    #[test]
    fn exactly_one_shutdown_signal() {
        let shutdown: Vec<_> = CATALOG
            .iter()
            .filter(|spec| spec.action == SignalAction::Shutdown)
            .collect();

        assert_eq!(shutdown.len(), 1);
        assert_eq!(shutdown[0].name, CLOSING_SIGNAL);
        assert_eq!(shutdown[0].scope, DeliveryScope::Framework);
    }

    #[test]
    fn focus_signals_only_count_the_application() {
        for name in ["<FocusIn>", "<FocusOut>"] {
            let spec = find(name).unwrap();
            assert_eq!(spec.target, TargetFilter::ApplicationOnly);
            assert_eq!(spec.scope, DeliveryScope::Framework);
        }
        assert_eq!(find("<<Copy>>").unwrap().scope, DeliveryScope::Broadcast);
    }

    #[test]
    fn allow_list_override() {
        let spec = SignalSpec::broadcast("<Key>").allowing(&["widget", "keysym"]);

        assert_eq!(spec.input_allow_list(), &["widget", "keysym"]);
        assert_eq!(input_allow_list("<<Paste>>"), DEFAULT_INPUT_ALLOW_LIST);
        assert_eq!(input_allow_list("not-in-catalog"), DEFAULT_INPUT_ALLOW_LIST);
    }
}
