use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::host::{UiObject, UiRef};

/// Dead entries are swept once the table grows past this many slots.
const INITIAL_SWEEP_AT: usize = 256;

/// Maps live UI objects to opaque integer tokens for the process lifetime.
///
/// Entries hold only a weak handle, so the table never keeps a widget
/// alive. The weak handle also pins the allocation, which means an address
/// cannot be handed to a different object while its entry exists.
pub struct IdentityTable {
    entries: HashMap<*const (), (Weak<dyn UiObject>, i64)>,
    next_token: i64,
    sweep_at: usize,
}

impl Default for IdentityTable {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityTable {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            next_token: 0,
            sweep_at: INITIAL_SWEEP_AT,
        }
    }

    pub fn token_for(&mut self, object: &UiRef) -> i64 {
        let key = Rc::as_ptr(object) as *const ();
        if let Some((_, token)) = self.entries.get(&key) {
            return *token;
        }

        if self.entries.len() >= self.sweep_at {
            self.sweep();
        }

        self.next_token += 1;
        let token = self.next_token;
        self.entries.insert(key, (Rc::downgrade(object), token));
        token
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn sweep(&mut self) {
        self.entries.retain(|_, (weak, _)| weak.strong_count() > 0);
        self.sweep_at = (self.entries.len() * 2).max(INITIAL_SWEEP_AT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::fake::FakeWidget;
    use crate::host::WidgetRole;

    #[test]
    fn same_object_same_token() {
        let mut table = IdentityTable::new();
        let text = FakeWidget::new("Text", WidgetRole::TextSurface).into_ref();
        let alias = text.clone();

        assert_eq!(table.token_for(&text), table.token_for(&alias));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn distinct_objects_distinct_tokens() {
        let mut table = IdentityTable::new();
        let first = FakeWidget::new("Text", WidgetRole::TextSurface).into_ref();
        let second = FakeWidget::new("Text", WidgetRole::TextSurface).into_ref();

        assert_ne!(table.token_for(&first), table.token_for(&second));
    }

    #[test]
    fn dropped_objects_never_share_a_token() {
        let mut table = IdentityTable::new();
        let mut seen = std::collections::HashSet::new();

        for _ in 0..(INITIAL_SWEEP_AT * 3) {
            let widget = FakeWidget::new("Button", WidgetRole::Other).into_ref();
            assert!(seen.insert(table.token_for(&widget)));
        }

        assert!(table.len() <= INITIAL_SWEEP_AT + 1);
    }

    #[test]
    fn does_not_keep_objects_alive() {
        let mut table = IdentityTable::new();
        let widget = FakeWidget::new("Button", WidgetRole::Other).into_ref();
        let weak = Rc::downgrade(&widget);

        table.token_for(&widget);
        drop(widget);

        assert!(weak.upgrade().is_none());
    }
}
