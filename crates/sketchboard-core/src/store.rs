//! Session store with change-detecting selectors.
//!
//! The [`Store`] owns the whole [`Snapshot`]. Writers go through
//! [`Store::update`]; readers either register a callback with
//! [`Store::subscribe`] or poll a [`Selector`] once per frame. Both only
//! report a change when the selected value differs from the last one seen.

use crate::document::Document;
use crate::settings::Settings;
use crate::shapes::ShapeId;
use crate::tools::ToolKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-session editor state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub active_tool: ToolKind,
    /// Keep the active tool after creating a shape.
    pub is_tool_locked: bool,
    pub selected_ids: Vec<ShapeId>,
    pub hovered_id: Option<ShapeId>,
    /// Shape an in-progress arrow would bind to.
    pub binding_id: Option<ShapeId>,
}

/// Everything the UI reads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub app_state: AppState,
    pub settings: Settings,
    pub document: Document,
}

pub type SubscriptionId = u64;

type Listener = Box<dyn FnMut(&Snapshot)>;

pub struct Store {
    snapshot: Snapshot,
    version: u64,
    next_subscription: SubscriptionId,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("version", &self.version)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(Snapshot::default())
    }
}

impl Store {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            version: 0,
            next_subscription: 0,
            listeners: Vec::new(),
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Incremented on every write.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Read a value out of the snapshot.
    pub fn select<T>(&self, selector: impl Fn(&Snapshot) -> T) -> T {
        selector(&self.snapshot)
    }

    /// Apply a write and notify subscribers whose selection changed.
    pub fn update<R>(&mut self, write: impl FnOnce(&mut Snapshot) -> R) -> R {
        let result = write(&mut self.snapshot);
        self.version += 1;
        for (_, listener) in &mut self.listeners {
            listener(&self.snapshot);
        }
        result
    }

    /// Call `callback` with the new value whenever `selector`'s output changes.
    pub fn subscribe<T, S, C>(&mut self, selector: S, mut callback: C) -> SubscriptionId
    where
        T: PartialEq + 'static,
        S: Fn(&Snapshot) -> T + 'static,
        C: FnMut(&T) + 'static,
    {
        let mut last = selector(&self.snapshot);
        let listener = move |snapshot: &Snapshot| {
            let next = selector(snapshot);
            if next != last {
                callback(&next);
                last = next;
            }
        };
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false when `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }
}

/// Poll-style selector for immediate-mode UIs.
pub struct Selector<T> {
    select: fn(&Snapshot) -> T,
    value: T,
    seen_version: u64,
}

impl<T: fmt::Debug> fmt::Debug for Selector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selector")
            .field("value", &self.value)
            .field("seen_version", &self.seen_version)
            .finish()
    }
}

impl<T: PartialEq> Selector<T> {
    pub fn new(store: &Store, select: fn(&Snapshot) -> T) -> Self {
        Self {
            value: select(store.snapshot()),
            select,
            seen_version: store.version(),
        }
    }

    /// Re-read the store. Returns true when the selected value changed.
    pub fn poll(&mut self, store: &Store) -> bool {
        if store.version() == self.seen_version {
            return false;
        }
        self.seen_version = store.version();
        let next = (self.select)(store.snapshot());
        if next == self.value {
            false
        } else {
            self.value = next;
            true
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::DockPosition;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_subscribe_fires_only_on_change() {
        let mut store = Store::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        store.subscribe(
            |s| s.app_state.active_tool,
            move |tool| sink.borrow_mut().push(*tool),
        );

        store.update(|s| s.settings.is_dark_mode = true);
        store.update(|s| s.app_state.active_tool = ToolKind::Heart);
        store.update(|s| s.app_state.active_tool = ToolKind::Heart);
        store.update(|s| s.app_state.active_tool = ToolKind::Select);

        assert_eq!(*seen.borrow(), vec![ToolKind::Heart, ToolKind::Select]);
    }

    #[test]
    fn test_unsubscribe() {
        let mut store = Store::default();
        let count = Rc::new(RefCell::new(0));
        let sink = count.clone();
        let id = store.subscribe(|s| s.settings.is_dark_mode, move |_| *sink.borrow_mut() += 1);

        store.update(|s| s.settings.is_dark_mode = true);
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.update(|s| s.settings.is_dark_mode = false);

        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_update_bumps_version_and_returns_value() {
        let mut store = Store::default();
        let previous = store.update(|s| std::mem::replace(&mut s.app_state.is_tool_locked, true));
        assert!(!previous);
        assert_eq!(store.version(), 1);
        assert!(store.select(|s| s.app_state.is_tool_locked));
    }

    #[test]
    fn test_selector_poll() {
        let mut store = Store::default();
        let mut dock = Selector::new(&store, |s| s.settings.dock_position);
        assert_eq!(*dock.get(), DockPosition::Bottom);
        assert!(!dock.poll(&store));

        store.update(|s| s.app_state.is_tool_locked = true);
        assert!(!dock.poll(&store));

        store.update(|s| s.settings.dock_position = DockPosition::Left);
        assert!(dock.poll(&store));
        assert_eq!(*dock.get(), DockPosition::Left);
        assert!(!dock.poll(&store));
    }
}
