//! Browser document host and DOM focus helpers.

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    fmt,
    rc::Rc,
};

use disclosure_headless::{
    next_index, DocumentEvent, DocumentHost, EventHandler, EventKind, ListenerId, ListenerKind,
    RovingKey, SharedDocumentState,
};
use leptos::{html::ElementDescriptor, logging, queue_microtask, NodeRef};
use wasm_bindgen::{closure::Closure, JsCast};

const TABBABLE_SELECTOR: &str =
    "button, [href], input, select, textarea, [tabindex], [contenteditable=\"true\"]";

const MENU_ITEM_SELECTOR: &str =
    r#"[role="menuitem"], [role="menuitemcheckbox"], [role="menuitemradio"]"#;

type DomListener = Closure<dyn FnMut(web_sys::Event)>;

thread_local! {
    static CURRENT: RefCell<Option<Rc<WebDocument>>> = RefCell::new(None);
}

/// [`DocumentHost`] over the page's `web_sys::Document`.
///
/// One instance exists per thread so every open layer shares the same scroll-lock
/// depth and layer stack.
pub struct WebDocument {
    document: web_sys::Document,
    listeners: RefCell<HashMap<ListenerId, (ListenerKind, DomListener)>>,
    next_listener: Cell<u64>,
    saved_overflow: RefCell<Option<String>>,
    shared: SharedDocumentState,
}

impl WebDocument {
    /// Returns this thread's document host, creating it on first use.
    ///
    /// `None` outside a browser window.
    pub fn current() -> Option<Rc<Self>> {
        CURRENT.with(|slot| {
            let existing = slot.borrow().clone();
            if existing.is_some() {
                return existing;
            }
            let document = web_sys::window().and_then(|window| window.document())?;
            let host = Rc::new(Self {
                document,
                listeners: RefCell::new(HashMap::new()),
                next_listener: Cell::new(0),
                saved_overflow: RefCell::new(None),
                shared: SharedDocumentState::default(),
            });
            *slot.borrow_mut() = Some(Rc::clone(&host));
            Some(host)
        })
    }
}

fn normalize(kind: ListenerKind, event: &web_sys::Event) -> DocumentEvent<web_sys::Element> {
    let payload = match kind {
        ListenerKind::KeyDown => {
            let (key, shift) = event
                .dyn_ref::<web_sys::KeyboardEvent>()
                .map(|ev| (ev.key(), ev.shift_key()))
                .unwrap_or_default();
            EventKind::KeyDown { key, shift }
        }
        ListenerKind::PointerDown => EventKind::PointerDown,
        ListenerKind::FocusIn => EventKind::FocusIn,
    };
    let target = event
        .target()
        .and_then(|target| target.dyn_into::<web_sys::Element>().ok());
    let normalized = DocumentEvent::new(payload, target);
    if event.default_prevented() {
        normalized.prevent_default();
    }
    normalized
}

fn is_tabbable(element: &web_sys::HtmlElement) -> bool {
    !element.has_attribute("disabled")
        && element.tab_index() >= 0
        && !element.hidden()
        && element.get_attribute("aria-hidden").as_deref() != Some("true")
}

impl DocumentHost for WebDocument {
    type Node = web_sys::Element;

    fn active_element(&self) -> Option<web_sys::Element> {
        self.document.active_element()
    }

    fn focus(&self, node: &web_sys::Element) {
        if let Some(element) = node.dyn_ref::<web_sys::HtmlElement>() {
            let _ = element.focus();
        }
    }

    fn is_connected(&self, node: &web_sys::Element) -> bool {
        node.is_connected()
    }

    fn contains(&self, ancestor: &web_sys::Element, node: &web_sys::Element) -> bool {
        ancestor.contains(Some(node))
    }

    fn tabbable_descendants(&self, root: &web_sys::Element) -> Vec<web_sys::Element> {
        let Ok(nodes) = root.query_selector_all(TABBABLE_SELECTOR) else {
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|index| nodes.item(index))
            .filter_map(|node| node.dyn_into::<web_sys::HtmlElement>().ok())
            .filter(is_tabbable)
            .map(Into::into)
            .collect()
    }

    fn set_scroll_locked(&self, locked: bool) {
        let Some(body) = self.document.body() else {
            return;
        };
        let style = body.style();
        if locked {
            let previous = style.get_property_value("overflow").unwrap_or_default();
            *self.saved_overflow.borrow_mut() = Some(previous);
            let _ = style.set_property("overflow", "hidden");
            return;
        }
        match self.saved_overflow.borrow_mut().take() {
            Some(previous) if !previous.is_empty() => {
                let _ = style.set_property("overflow", &previous);
            }
            _ => {
                let _ = style.remove_property("overflow");
            }
        }
    }

    fn shared_state(&self) -> &SharedDocumentState {
        &self.shared
    }

    fn add_listener(
        &self,
        kind: ListenerKind,
        handler: EventHandler<web_sys::Element>,
    ) -> ListenerId {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        let listener = DomListener::new(move |event: web_sys::Event| {
            let normalized = normalize(kind, &event);
            handler(&normalized);
            if normalized.default_prevented() && !event.default_prevented() {
                event.prevent_default();
            }
        });
        if let Err(err) = self
            .document
            .add_event_listener_with_callback(kind.event_type(), listener.as_ref().unchecked_ref())
        {
            logging::warn!("document `{}` listener not attached: {err:?}", kind.event_type());
        }
        self.listeners.borrow_mut().insert(id, (kind, listener));
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        let Some((kind, listener)) = self.listeners.borrow_mut().remove(&id) else {
            return;
        };
        let _ = self.document.remove_event_listener_with_callback(
            kind.event_type(),
            listener.as_ref().unchecked_ref(),
        );
        // A listener may remove itself while it is running.
        queue_microtask(move || drop(listener));
    }
}

impl fmt::Debug for WebDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebDocument")
            .field("listeners", &self.listeners.borrow().len())
            .field("shared", &self.shared)
            .finish()
    }
}

/// Element behind a mounted node ref.
pub(crate) fn element_of<E>(node_ref: NodeRef<E>) -> Option<web_sys::Element>
where
    E: ElementDescriptor + Clone + 'static,
{
    node_ref.get_untracked().map(|element| {
        let element = element.into_any();
        let html: web_sys::HtmlElement = (*element).clone();
        html.into()
    })
}

fn active_element() -> Option<web_sys::Element> {
    web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.active_element())
}

fn roving_items(root: &web_sys::Element, selector: &str) -> Vec<web_sys::HtmlElement> {
    let Ok(nodes) = root.query_selector_all(selector) else {
        return Vec::new();
    };

    let mut items = Vec::new();
    for index in 0..nodes.length() {
        let Some(node) = nodes.item(index) else {
            continue;
        };
        let Ok(item) = node.dyn_into::<web_sys::HtmlElement>() else {
            continue;
        };
        if item.has_attribute("disabled") {
            continue;
        }
        if item.get_attribute("aria-disabled").as_deref() == Some("true") {
            continue;
        }
        items.push(item);
    }
    items
}

/// Focuses the first enabled menu item inside `menu`.
pub(crate) fn focus_first_menu_item(menu: &web_sys::Element) -> bool {
    match roving_items(menu, MENU_ITEM_SELECTOR).first() {
        Some(first) => {
            let _ = first.focus();
            true
        }
        None => false,
    }
}

/// Handles arrow/Home/End movement between menu items and prevents default when handled.
pub(crate) fn handle_menu_roving_keydown(
    ev: &web_sys::KeyboardEvent,
    menu: &web_sys::Element,
) -> bool {
    handle_roving_keydown(ev, menu, MENU_ITEM_SELECTOR)
}

/// Moves focus among the enabled elements of `root` matching `selector`.
pub(crate) fn handle_roving_keydown(
    ev: &web_sys::KeyboardEvent,
    root: &web_sys::Element,
    selector: &str,
) -> bool {
    let Some(key) = RovingKey::from_key(&ev.key()) else {
        return false;
    };
    let items = roving_items(root, selector);
    let active = active_element();
    let current = active.and_then(|active| {
        items
            .iter()
            .position(|item| AsRef::<web_sys::Element>::as_ref(item) == &active)
    });
    let Some(next) = next_index(current, items.len(), key) else {
        return false;
    };
    let _ = items[next].focus();
    ev.prevent_default();
    ev.stop_propagation();
    true
}
