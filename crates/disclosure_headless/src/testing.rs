//! In-memory [`DocumentHost`] for exercising disclosure behavior without a browser.
//!
//! [`FakeDocument`] models just enough of the DOM: a node tree with tabbable
//! flags, the active element, document listeners, and the scroll lock. Listener
//! dispatch snapshots the registry before delivery, so a listener attached while
//! an event is in flight does not see that event.

use std::{
    cell::{Cell, RefCell},
    fmt,
};

use crate::{
    DocumentEvent, DocumentHost, EventHandler, EventKind, ListenerId, ListenerKind,
    SharedDocumentState,
};

/// Handle to a node inside a [`FakeDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FakeNode(usize);

#[derive(Debug)]
struct NodeData {
    label: String,
    parent: Option<usize>,
    tabbable: bool,
    connected: bool,
}

/// Test document: node tree, focus, listeners and scroll lock.
#[derive(Default)]
pub struct FakeDocument {
    nodes: RefCell<Vec<NodeData>>,
    active: Cell<Option<FakeNode>>,
    listeners: RefCell<Vec<(ListenerId, ListenerKind, EventHandler<FakeNode>)>>,
    next_listener: Cell<u64>,
    scroll_locked: Cell<bool>,
    locks_applied: Cell<usize>,
    locks_released: Cell<usize>,
    shared: SharedDocumentState,
}

impl FakeDocument {
    /// Creates a document containing only `body`.
    pub fn new() -> Self {
        let doc = Self::default();
        doc.nodes.borrow_mut().push(NodeData {
            label: "body".to_string(),
            parent: None,
            tabbable: false,
            connected: true,
        });
        doc
    }

    /// The root `body` node.
    pub fn body(&self) -> FakeNode {
        FakeNode(0)
    }

    /// Appends a non-tabbable element under `parent`.
    pub fn create_element(&self, label: &str, parent: FakeNode) -> FakeNode {
        self.push_node(label, parent, false)
    }

    /// Appends a tabbable element (button, input, link with href...) under `parent`.
    pub fn create_tabbable(&self, label: &str, parent: FakeNode) -> FakeNode {
        self.push_node(label, parent, true)
    }

    fn push_node(&self, label: &str, parent: FakeNode, tabbable: bool) -> FakeNode {
        let mut nodes = self.nodes.borrow_mut();
        let connected = nodes.get(parent.0).map(|p| p.connected).unwrap_or(false);
        nodes.push(NodeData {
            label: label.to_string(),
            parent: Some(parent.0),
            tabbable,
            connected,
        });
        FakeNode(nodes.len() - 1)
    }

    /// Detaches `node` and its subtree. Focus inside the subtree falls back to nothing.
    pub fn detach(&self, node: FakeNode) {
        let doomed: Vec<usize> = (0..self.nodes.borrow().len())
            .filter(|index| self.contains(&node, &FakeNode(*index)))
            .collect();
        {
            let mut nodes = self.nodes.borrow_mut();
            for index in &doomed {
                nodes[*index].connected = false;
            }
        }
        if let Some(active) = self.active.get() {
            if doomed.contains(&active.0) {
                self.active.set(None);
            }
        }
    }

    /// Label given at creation.
    pub fn label(&self, node: FakeNode) -> String {
        self.nodes
            .borrow()
            .get(node.0)
            .map(|data| data.label.clone())
            .unwrap_or_default()
    }

    /// Label of the focused element, if any.
    pub fn active_label(&self) -> Option<String> {
        self.active.get().map(|node| self.label(node))
    }

    /// Delivers an event to matching listeners and returns it for inspection.
    pub fn dispatch(&self, kind: EventKind, target: Option<FakeNode>) -> DocumentEvent<FakeNode> {
        let event = DocumentEvent::new(kind, target);
        let listener_kind = event.kind.listener_kind();
        let snapshot: Vec<(ListenerId, EventHandler<FakeNode>)> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(_, kind, _)| *kind == listener_kind)
            .map(|(id, _, handler)| (*id, handler.clone()))
            .collect();
        for (id, handler) in snapshot {
            let still_registered = self.listeners.borrow().iter().any(|(live, _, _)| *live == id);
            if still_registered {
                handler(&event);
            }
        }
        event
    }

    /// Presses `key` on the focused element; returns whether a listener handled it.
    pub fn press_key(&self, key: &str) -> bool {
        self.dispatch(
            EventKind::KeyDown {
                key: key.to_string(),
                shift: false,
            },
            self.active.get(),
        )
        .default_prevented()
    }

    /// Presses Tab (or Shift+Tab) and applies the browser's default move when unhandled.
    pub fn press_tab(&self, shift: bool) {
        let event = self.dispatch(
            EventKind::KeyDown {
                key: "Tab".to_string(),
                shift,
            },
            self.active.get(),
        );
        if event.default_prevented() {
            return;
        }
        let order = self.tabbable_descendants(&self.body());
        if order.is_empty() {
            return;
        }
        let current = self
            .active
            .get()
            .and_then(|active| order.iter().position(|node| *node == active));
        let next = match (current, shift) {
            (Some(index), false) => (index + 1) % order.len(),
            (Some(index), true) => (index + order.len() - 1) % order.len(),
            (None, false) => 0,
            (None, true) => order.len() - 1,
        };
        self.focus(&order[next]);
    }

    /// Simulates a pointer press on `target`.
    pub fn pointer_down(&self, target: FakeNode) -> bool {
        self.dispatch(EventKind::PointerDown, Some(target))
            .default_prevented()
    }

    /// Number of live document listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Number of live listeners of one kind.
    pub fn listener_count_of(&self, kind: ListenerKind) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|(_, registered, _)| *registered == kind)
            .count()
    }

    /// Whether the scroll lock is currently applied.
    pub fn scroll_locked(&self) -> bool {
        self.scroll_locked.get()
    }

    /// How many times the lock was applied and removed.
    pub fn scroll_lock_transitions(&self) -> (usize, usize) {
        (self.locks_applied.get(), self.locks_released.get())
    }
}

impl DocumentHost for FakeDocument {
    type Node = FakeNode;

    fn active_element(&self) -> Option<FakeNode> {
        self.active.get()
    }

    fn focus(&self, node: &FakeNode) {
        if !self.is_connected(node) || self.active.get() == Some(*node) {
            return;
        }
        self.active.set(Some(*node));
        self.dispatch(EventKind::FocusIn, Some(*node));
    }

    fn is_connected(&self, node: &FakeNode) -> bool {
        self.nodes
            .borrow()
            .get(node.0)
            .map(|data| data.connected)
            .unwrap_or(false)
    }

    fn contains(&self, ancestor: &FakeNode, node: &FakeNode) -> bool {
        let nodes = self.nodes.borrow();
        let mut cursor = Some(node.0);
        while let Some(index) = cursor {
            if index == ancestor.0 {
                return true;
            }
            cursor = nodes.get(index).and_then(|data| data.parent);
        }
        false
    }

    fn tabbable_descendants(&self, root: &FakeNode) -> Vec<FakeNode> {
        let count = self.nodes.borrow().len();
        (0..count)
            .map(FakeNode)
            .filter(|node| node != root && self.contains(root, node))
            .filter(|node| {
                let nodes = self.nodes.borrow();
                let data = &nodes[node.0];
                data.tabbable && data.connected
            })
            .collect()
    }

    fn set_scroll_locked(&self, locked: bool) {
        if locked {
            self.locks_applied.set(self.locks_applied.get() + 1);
        } else {
            self.locks_released.set(self.locks_released.get() + 1);
        }
        self.scroll_locked.set(locked);
    }

    fn shared_state(&self) -> &SharedDocumentState {
        &self.shared
    }

    fn add_listener(&self, kind: ListenerKind, handler: EventHandler<FakeNode>) -> ListenerId {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, kind, handler));
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        self.listeners
            .borrow_mut()
            .retain(|(registered, _, _)| *registered != id);
    }
}

impl fmt::Debug for FakeDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeDocument")
            .field("nodes", &self.nodes.borrow().len())
            .field("active", &self.active.get())
            .field("listeners", &self.listener_count())
            .field("scroll_locked", &self.scroll_locked.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn tabbable_query_is_scoped_and_ordered() {
        let doc = FakeDocument::new();
        let outside = doc.create_tabbable("outside", doc.body());
        let panel = doc.create_element("panel", doc.body());
        let first = doc.create_tabbable("first", panel);
        let _text = doc.create_element("text", panel);
        let second = doc.create_tabbable("second", panel);

        assert_eq!(doc.tabbable_descendants(&panel), vec![first, second]);
        assert!(!doc.tabbable_descendants(&panel).contains(&outside));
    }

    #[test]
    fn detach_disconnects_subtree_and_drops_focus() {
        let doc = FakeDocument::new();
        let panel = doc.create_element("panel", doc.body());
        let button = doc.create_tabbable("button", panel);
        doc.focus(&button);

        doc.detach(panel);

        assert!(!doc.is_connected(&button));
        assert_eq!(doc.active_element(), None);
    }

    #[test]
    fn listeners_added_during_dispatch_miss_the_current_event() {
        let doc = Rc::new(FakeDocument::new());
        let late_hits = Rc::new(Cell::new(0));
        let late = Rc::clone(&late_hits);
        let registrar = Rc::clone(&doc);
        doc.add_listener(
            ListenerKind::PointerDown,
            Rc::new(move |_| {
                let late = Rc::clone(&late);
                registrar.add_listener(
                    ListenerKind::PointerDown,
                    Rc::new(move |_| late.set(late.get() + 1)),
                );
            }),
        );

        doc.pointer_down(doc.body());
        assert_eq!(late_hits.get(), 0);
    }

    #[test]
    fn unhandled_tab_walks_document_order() {
        let doc = FakeDocument::new();
        let a = doc.create_tabbable("a", doc.body());
        let b = doc.create_tabbable("b", doc.body());

        doc.press_tab(false);
        assert_eq!(doc.active_element(), Some(a));
        doc.press_tab(false);
        assert_eq!(doc.active_element(), Some(b));
        doc.press_tab(true);
        assert_eq!(doc.active_element(), Some(a));
    }
}
