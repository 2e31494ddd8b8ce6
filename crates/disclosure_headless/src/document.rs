//! Host abstraction over the single global `document`.

use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
};

use serde::{Deserialize, Serialize};

/// Identifier of a registered document listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Identifier of an open content layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Document-level event types the engine listens to.
pub enum ListenerKind {
    /// `keydown`
    KeyDown,
    /// `pointerdown`
    PointerDown,
    /// `focusin`
    FocusIn,
}

impl ListenerKind {
    /// DOM event type name.
    pub const fn event_type(self) -> &'static str {
        match self {
            Self::KeyDown => "keydown",
            Self::PointerDown => "pointerdown",
            Self::FocusIn => "focusin",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Payload of a document event, normalized across hosts.
pub enum EventKind {
    /// Key press with the DOM `key` value.
    KeyDown {
        /// DOM `KeyboardEvent.key`.
        key: String,
        /// Whether Shift was held.
        shift: bool,
    },
    /// Pointer press.
    PointerDown,
    /// Focus moved onto `target`.
    FocusIn,
}

impl EventKind {
    /// Listener type that receives this event.
    pub fn listener_kind(&self) -> ListenerKind {
        match self {
            Self::KeyDown { .. } => ListenerKind::KeyDown,
            Self::PointerDown => ListenerKind::PointerDown,
            Self::FocusIn => ListenerKind::FocusIn,
        }
    }
}

/// Event delivered to document listeners.
pub struct DocumentEvent<N> {
    /// Event payload.
    pub kind: EventKind,
    /// Event target, when it resolves to a host node.
    pub target: Option<N>,
    default_prevented: Cell<bool>,
}

impl<N> DocumentEvent<N> {
    /// Wraps a payload and target.
    pub fn new(kind: EventKind, target: Option<N>) -> Self {
        Self {
            kind,
            target,
            default_prevented: Cell::new(false),
        }
    }

    /// Marks the event handled; later listeners observe it via [`Self::default_prevented`].
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    /// Whether an earlier listener handled the event.
    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    /// Returns the key for keydown events.
    pub fn key(&self) -> Option<&str> {
        match &self.kind {
            EventKind::KeyDown { key, .. } => Some(key.as_str()),
            _ => None,
        }
    }
}

impl<N: fmt::Debug> fmt::Debug for DocumentEvent<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentEvent")
            .field("kind", &self.kind)
            .field("target", &self.target)
            .field("default_prevented", &self.default_prevented.get())
            .finish()
    }
}

/// Document listener callback.
pub type EventHandler<N> = Rc<dyn Fn(&DocumentEvent<N>)>;

/// Per-document bookkeeping shared by every session on that document.
#[derive(Debug, Default)]
pub struct SharedDocumentState {
    scroll_lock_depth: Cell<usize>,
    layers: RefCell<Vec<LayerId>>,
    next_layer: Cell<u64>,
}

impl SharedDocumentState {
    pub(crate) fn increment_scroll_lock(&self) -> usize {
        let depth = self.scroll_lock_depth.get() + 1;
        self.scroll_lock_depth.set(depth);
        depth
    }

    pub(crate) fn decrement_scroll_lock(&self) -> usize {
        let depth = self.scroll_lock_depth.get().saturating_sub(1);
        self.scroll_lock_depth.set(depth);
        depth
    }

    /// Number of live scroll-lock holders.
    pub fn scroll_lock_depth(&self) -> usize {
        self.scroll_lock_depth.get()
    }

    pub(crate) fn push_layer(&self) -> LayerId {
        let id = LayerId(self.next_layer.get());
        self.next_layer.set(id.0 + 1);
        self.layers.borrow_mut().push(id);
        id
    }

    pub(crate) fn remove_layer(&self, id: LayerId) {
        self.layers.borrow_mut().retain(|layer| *layer != id);
    }

    /// Whether `id` is the most recently opened live layer.
    pub fn is_topmost(&self, id: LayerId) -> bool {
        self.layers.borrow().last() == Some(&id)
    }

    /// Number of open layers.
    pub fn open_layers(&self) -> usize {
        self.layers.borrow().len()
    }
}

/// The global document as seen by the disclosure engine.
///
/// Browser bindings implement this over `web_sys::Document`; tests use
/// [`crate::testing::FakeDocument`].
pub trait DocumentHost: 'static {
    /// Element handle.
    type Node: Clone + PartialEq + 'static;

    /// Currently focused element.
    fn active_element(&self) -> Option<Self::Node>;

    /// Moves focus to `node`, ignoring host focus errors.
    fn focus(&self, node: &Self::Node);

    /// Whether `node` is still attached to the document.
    fn is_connected(&self, node: &Self::Node) -> bool;

    /// Whether `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: &Self::Node, node: &Self::Node) -> bool;

    /// Tabbable descendants of `root` in tab order: buttons, links with `href`,
    /// inputs, selects, textareas, and elements whose `tabindex` is not `-1`.
    fn tabbable_descendants(&self, root: &Self::Node) -> Vec<Self::Node>;

    /// Applies or removes the document scroll lock.
    fn set_scroll_locked(&self, locked: bool);

    /// Shared per-document bookkeeping.
    fn shared_state(&self) -> &SharedDocumentState;

    /// Registers a document-level listener.
    fn add_listener(&self, kind: ListenerKind, handler: EventHandler<Self::Node>) -> ListenerId;

    /// Removes a listener registered with [`Self::add_listener`].
    fn remove_listener(&self, id: ListenerId);
}

/// Document listener that is removed when dropped.
pub struct ListenerGuard<H: DocumentHost> {
    host: Rc<H>,
    id: Option<ListenerId>,
}

impl<H: DocumentHost> ListenerGuard<H> {
    /// Registers `handler` for `kind` on `host`.
    pub fn attach(
        host: &Rc<H>,
        kind: ListenerKind,
        handler: impl Fn(&DocumentEvent<H::Node>) + 'static,
    ) -> Self {
        let id = host.add_listener(kind, Rc::new(handler));
        Self {
            host: Rc::clone(host),
            id: Some(id),
        }
    }

    /// Removes the listener now. Further calls are no-ops.
    pub fn remove(&mut self) {
        if let Some(id) = self.id.take() {
            self.host.remove_listener(id);
        }
    }
}

impl<H: DocumentHost> Drop for ListenerGuard<H> {
    fn drop(&mut self) {
        self.remove();
    }
}

impl<H: DocumentHost> fmt::Debug for ListenerGuard<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerGuard").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::testing::FakeDocument;

    #[test]
    fn guard_removes_listener_on_drop() {
        let doc = Rc::new(FakeDocument::new());
        let guard = ListenerGuard::attach(&doc, ListenerKind::KeyDown, |_| {});
        assert_eq!(doc.listener_count(), 1);

        drop(guard);
        assert_eq!(doc.listener_count(), 0);
    }

    #[test]
    fn explicit_remove_is_idempotent() {
        let doc = Rc::new(FakeDocument::new());
        let mut guard = ListenerGuard::attach(&doc, ListenerKind::PointerDown, |_| {});
        guard.remove();
        guard.remove();
        drop(guard);
        assert_eq!(doc.listener_count(), 0);
    }

    #[test]
    fn layer_stack_tracks_topmost() {
        let state = SharedDocumentState::default();
        let outer = state.push_layer();
        let inner = state.push_layer();
        assert!(state.is_topmost(inner));

        state.remove_layer(inner);
        assert!(state.is_topmost(outer));
        assert_eq!(state.open_layers(), 1);
    }
}
