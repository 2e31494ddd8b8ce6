//! Content-layer sessions: everything a mounted content region holds on the document.
//!
//! A [`ContentSession`] is the scoped acquisition for one open content region. It
//! captures focus, moves focus inside, takes the scroll lock, and installs the
//! Escape / backdrop / outside / Tab listeners. Dropping it releases all of that
//! exactly once, whatever caused the close.

use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
};

use serde::{Deserialize, Serialize};

use crate::{
    focus_first_tabbable, handle_tab_trap, DisclosureController, DocumentEvent, DocumentHost,
    FocusSnapshot, LayerId, ListenerGuard, ListenerKind, OutsideGuard, OutsideInteractionDetector,
    ScrollLockGuard, Subscription,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Why an open layer asked to close.
pub enum DismissReason {
    /// Escape was pressed while this layer was topmost.
    EscapeKey,
    /// The modal backdrop itself received a pointer press.
    BackdropPointer,
    /// A pointer press landed outside non-modal content.
    OutsidePointer,
    /// Focus moved outside non-modal content.
    OutsideFocus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Per-content behavior switches.
pub struct ContentOptions {
    /// Escape anywhere in the document requests close.
    pub close_on_escape: bool,
    /// Pointer press on the modal backdrop requests close.
    pub close_on_backdrop_click: bool,
    /// Pointer or focus outside non-modal content requests close.
    pub close_on_outside_interaction: bool,
    /// Modal layers dismiss through their backdrop; non-modal ones through outside detection.
    pub modal: bool,
    /// Keep Tab / Shift+Tab inside the content.
    pub trap_focus: bool,
    /// Suppress document scrolling while open.
    pub lock_scroll: bool,
}

impl Default for ContentOptions {
    fn default() -> Self {
        Self::dialog()
    }
}

impl ContentOptions {
    /// Modal dialog: backdrop and Escape dismissal, focus trap, scroll lock.
    pub const fn dialog() -> Self {
        Self {
            close_on_escape: true,
            close_on_backdrop_click: true,
            close_on_outside_interaction: false,
            modal: true,
            trap_focus: true,
            lock_scroll: true,
        }
    }

    /// Alert dialog: like [`Self::dialog`] but the backdrop never dismisses.
    pub const fn alert_dialog() -> Self {
        Self {
            close_on_backdrop_click: false,
            ..Self::dialog()
        }
    }

    /// Popover: non-modal, dismissed by Escape or outside interaction.
    pub const fn popover() -> Self {
        Self {
            close_on_escape: true,
            close_on_backdrop_click: false,
            close_on_outside_interaction: true,
            modal: false,
            trap_focus: false,
            lock_scroll: false,
        }
    }

    /// Dropdown menu: same dismissal rules as [`Self::popover`].
    pub const fn menu() -> Self {
        Self::popover()
    }

    /// Overrides [`Self::close_on_escape`].
    pub fn with_close_on_escape(mut self, enabled: bool) -> Self {
        self.close_on_escape = enabled;
        self
    }

    /// Overrides [`Self::close_on_backdrop_click`].
    pub fn with_close_on_backdrop_click(mut self, enabled: bool) -> Self {
        self.close_on_backdrop_click = enabled;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Nodes a session needs. Any of them may be missing at open time.
pub struct LayerNodes<N> {
    /// Content region.
    pub content: Option<N>,
    /// Modal backdrop / overlay element.
    pub backdrop: Option<N>,
    /// Trigger; ignored by outside detection.
    pub trigger: Option<N>,
}

impl<N> Default for LayerNodes<N> {
    fn default() -> Self {
        Self {
            content: None,
            backdrop: None,
            trigger: None,
        }
    }
}

/// Document resources held by one open content region.
pub struct ContentSession<H: DocumentHost> {
    host: Rc<H>,
    layer: Option<LayerId>,
    listeners: Vec<ListenerGuard<H>>,
    outside: Option<OutsideGuard<H>>,
    scroll: Option<ScrollLockGuard<H>>,
    focus: Option<FocusSnapshot<H>>,
    focus_left: Rc<Cell<bool>>,
}

impl<H: DocumentHost> ContentSession<H> {
    /// Opens a session for freshly mounted content.
    ///
    /// A missing content node is not an error: focus simply stays where it is.
    /// When the user moved focus out of the content, closing leaves it there.
    pub fn open(
        host: &Rc<H>,
        nodes: LayerNodes<H::Node>,
        options: ContentOptions,
        on_dismiss: Rc<dyn Fn(DismissReason)>,
    ) -> Self {
        let focus_left = Rc::new(Cell::new(false));
        let on_dismiss: Rc<dyn Fn(DismissReason)> = {
            let focus_left = Rc::clone(&focus_left);
            Rc::new(move |reason| {
                focus_left.set(reason == DismissReason::OutsideFocus);
                on_dismiss(reason);
            })
        };
        let focus = FocusSnapshot::capture(host);
        if let Some(content) = nodes.content.as_ref() {
            let _ = focus_first_tabbable(&**host, content);
        }
        let scroll = options.lock_scroll.then(|| ScrollLockGuard::acquire(host));
        let layer = host.shared_state().push_layer();

        let mut listeners = Vec::new();
        if options.close_on_escape {
            let host_ref = Rc::clone(host);
            let on_dismiss = Rc::clone(&on_dismiss);
            listeners.push(ListenerGuard::attach(
                host,
                ListenerKind::KeyDown,
                move |event: &DocumentEvent<H::Node>| {
                    if event.key() != Some("Escape") || event.default_prevented() {
                        return;
                    }
                    if !host_ref.shared_state().is_topmost(layer) {
                        return;
                    }
                    event.prevent_default();
                    on_dismiss(DismissReason::EscapeKey);
                },
            ));
        }

        if let (true, Some(content)) = (options.trap_focus, nodes.content.clone()) {
            let host_ref = Rc::clone(host);
            listeners.push(ListenerGuard::attach(
                host,
                ListenerKind::KeyDown,
                move |event: &DocumentEvent<H::Node>| {
                    if host_ref.shared_state().is_topmost(layer) {
                        handle_tab_trap(&*host_ref, &content, event);
                    }
                },
            ));
        }

        if let (true, true, Some(backdrop)) = (
            options.modal,
            options.close_on_backdrop_click,
            nodes.backdrop.clone(),
        ) {
            let host_ref = Rc::clone(host);
            let on_dismiss = Rc::clone(&on_dismiss);
            listeners.push(ListenerGuard::attach(
                host,
                ListenerKind::PointerDown,
                move |event: &DocumentEvent<H::Node>| {
                    if event.target.as_ref() != Some(&backdrop) {
                        return;
                    }
                    if host_ref.shared_state().is_topmost(layer) {
                        on_dismiss(DismissReason::BackdropPointer);
                    }
                },
            ));
        }

        let outside = match (
            options.modal,
            options.close_on_outside_interaction,
            nodes.content,
        ) {
            (false, true, Some(content)) => Some(OutsideInteractionDetector::attach(
                host,
                content,
                nodes.trigger.into_iter().collect(),
                on_dismiss,
            )),
            _ => None,
        };

        Self {
            host: Rc::clone(host),
            layer: Some(layer),
            listeners,
            outside,
            scroll,
            focus: Some(focus),
            focus_left,
        }
    }

    /// Closes the session now; equivalent to dropping it.
    pub fn close(self) {}

    /// Element that will receive focus back on close.
    pub fn restore_target(&self) -> Option<&H::Node> {
        self.focus.as_ref().and_then(|snapshot| snapshot.previous())
    }

    fn release(&mut self) {
        for listener in &mut self.listeners {
            listener.remove();
        }
        self.listeners.clear();
        if let Some(mut outside) = self.outside.take() {
            outside.detach();
        }
        if let Some(layer) = self.layer.take() {
            self.host.shared_state().remove_layer(layer);
        }
        if let Some(mut scroll) = self.scroll.take() {
            scroll.release();
        }
        if let Some(focus) = self.focus.take() {
            if !self.focus_left.get() {
                focus.restore();
            }
        }
    }
}

impl<H: DocumentHost> Drop for ContentSession<H> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<H: DocumentHost> fmt::Debug for ContentSession<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentSession")
            .field("layer", &self.layer)
            .field("listeners", &self.listeners.len())
            .field("outside", &self.outside.is_some())
            .field("scroll_locked", &self.scroll.is_some())
            .finish()
    }
}

/// Binds a [`DisclosureController`] to content sessions.
///
/// Every open transition opens a session and every close transition drops it.
/// Dropping the mount (owner torn down while open) releases the live session too.
pub struct LayerMount<H: DocumentHost> {
    subscription: Option<Subscription<bool>>,
    session: Rc<RefCell<Option<ContentSession<H>>>>,
}

impl<H: DocumentHost> LayerMount<H> {
    /// Starts following `controller`. `nodes` is queried on each open transition, after
    /// the new state has committed.
    ///
    /// A mount created while the controller is already open (content that is only
    /// rendered while open, mounted after the opening event) opens its session at once.
    pub fn new(
        host: &Rc<H>,
        controller: &DisclosureController,
        options: ContentOptions,
        nodes: impl Fn() -> LayerNodes<H::Node> + 'static,
    ) -> Self {
        let session: Rc<RefCell<Option<ContentSession<H>>>> = Rc::new(RefCell::new(None));
        let on_dismiss: Rc<dyn Fn(DismissReason)> = {
            let controller = controller.clone();
            Rc::new(move |_reason| controller.request_open_change(false))
        };
        let sync = {
            let host = Rc::clone(host);
            let session = Rc::clone(&session);
            move |open: bool| {
                let is_live = session.borrow().is_some();
                if open && !is_live {
                    let opened =
                        ContentSession::open(&host, nodes(), options, Rc::clone(&on_dismiss));
                    *session.borrow_mut() = Some(opened);
                } else if !open && is_live {
                    let closed = session.borrow_mut().take();
                    drop(closed);
                }
            }
        };

        if controller.open() {
            sync(true);
        }
        let subscription = controller.subscribe(sync);
        Self {
            subscription: Some(subscription),
            session,
        }
    }

    /// Whether a session is currently live.
    pub fn is_active(&self) -> bool {
        self.session.borrow().is_some()
    }
}

impl<H: DocumentHost> Drop for LayerMount<H> {
    fn drop(&mut self) {
        self.subscription.take();
        let live = self.session.borrow_mut().take();
        drop(live);
    }
}

impl<H: DocumentHost> fmt::Debug for LayerMount<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerMount")
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::testing::{FakeDocument, FakeNode};

    struct Modal {
        doc: Rc<FakeDocument>,
        opener: FakeNode,
        backdrop: FakeNode,
        content: FakeNode,
        reasons: Rc<RefCell<Vec<DismissReason>>>,
    }

    fn modal() -> Modal {
        let doc = Rc::new(FakeDocument::new());
        let opener = doc.create_tabbable("Open", doc.body());
        let backdrop = doc.create_element("backdrop", doc.body());
        let content = doc.create_element("content", backdrop);
        doc.create_tabbable("Confirm", content);
        doc.focus(&opener);
        Modal {
            doc,
            opener,
            backdrop,
            content,
            reasons: Rc::new(RefCell::new(Vec::new())),
        }
    }

    fn open(fx: &Modal, options: ContentOptions) -> ContentSession<FakeDocument> {
        let sink = Rc::clone(&fx.reasons);
        ContentSession::open(
            &fx.doc,
            LayerNodes {
                content: Some(fx.content),
                backdrop: Some(fx.backdrop),
                trigger: Some(fx.opener),
            },
            options,
            Rc::new(move |reason| sink.borrow_mut().push(reason)),
        )
    }

    #[test]
    fn open_moves_focus_and_close_restores_it() {
        let fx = modal();
        let session = open(&fx, ContentOptions::dialog());
        assert_eq!(fx.doc.active_label().as_deref(), Some("Confirm"));
        assert_eq!(session.restore_target(), Some(&fx.opener));

        session.close();
        assert_eq!(fx.doc.active_label().as_deref(), Some("Open"));
        assert_eq!(fx.doc.listener_count(), 0);
        assert_eq!(fx.doc.shared_state().open_layers(), 0);
    }

    #[test]
    fn missing_content_leaves_focus_alone() {
        let fx = modal();
        let session = ContentSession::open(
            &fx.doc,
            LayerNodes::default(),
            ContentOptions::dialog(),
            Rc::new(|_| {}),
        );
        assert_eq!(fx.doc.active_label().as_deref(), Some("Open"));
        drop(session);
    }

    #[test]
    fn backdrop_only_counts_when_it_is_the_target() {
        let fx = modal();
        let _session = open(&fx, ContentOptions::dialog());

        fx.doc.pointer_down(fx.content);
        assert!(fx.reasons.borrow().is_empty());

        fx.doc.pointer_down(fx.backdrop);
        assert_eq!(*fx.reasons.borrow(), vec![DismissReason::BackdropPointer]);
    }

    #[test]
    fn alert_dialog_ignores_backdrop() {
        let fx = modal();
        let _session = open(&fx, ContentOptions::alert_dialog());
        fx.doc.pointer_down(fx.backdrop);
        assert!(fx.reasons.borrow().is_empty());
    }

    #[test]
    fn only_topmost_layer_handles_escape() {
        let fx = modal();
        let _outer = open(&fx, ContentOptions::dialog());
        let inner_reasons = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&inner_reasons);
        let inner = ContentSession::open(
            &fx.doc,
            LayerNodes::default(),
            ContentOptions::popover(),
            Rc::new(move |reason| sink.borrow_mut().push(reason)),
        );

        assert!(fx.doc.press_key("Escape"));
        assert_eq!(*inner_reasons.borrow(), vec![DismissReason::EscapeKey]);
        assert!(fx.reasons.borrow().is_empty());

        drop(inner);
        fx.doc.press_key("Escape");
        assert_eq!(*fx.reasons.borrow(), vec![DismissReason::EscapeKey]);
    }

    #[test]
    fn focus_moved_outside_is_not_pulled_back() {
        let fx = modal();
        let next = fx.doc.create_tabbable("Next", fx.doc.body());
        let session: Rc<RefCell<Option<ContentSession<FakeDocument>>>> = Rc::default();
        let live = Rc::clone(&session);
        let opened = ContentSession::open(
            &fx.doc,
            LayerNodes {
                content: Some(fx.content),
                backdrop: None,
                trigger: Some(fx.opener),
            },
            ContentOptions::popover(),
            Rc::new(move |_reason| {
                let closed = live.borrow_mut().take();
                drop(closed);
            }),
        );
        *session.borrow_mut() = Some(opened);

        fx.doc.focus(&next);

        assert!(session.borrow().is_none());
        assert_eq!(fx.doc.active_label().as_deref(), Some("Next"));
    }

    #[test]
    fn outside_pointer_still_restores_focus() {
        let fx = modal();
        let elsewhere = fx.doc.create_element("elsewhere", fx.doc.body());
        let session: Rc<RefCell<Option<ContentSession<FakeDocument>>>> = Rc::default();
        let live = Rc::clone(&session);
        let opened = ContentSession::open(
            &fx.doc,
            LayerNodes {
                content: Some(fx.content),
                backdrop: None,
                trigger: Some(fx.opener),
            },
            ContentOptions::popover(),
            Rc::new(move |_reason| {
                let closed = live.borrow_mut().take();
                drop(closed);
            }),
        );
        *session.borrow_mut() = Some(opened);
        assert_eq!(fx.doc.active_label().as_deref(), Some("Confirm"));

        fx.doc.pointer_down(elsewhere);

        assert!(session.borrow().is_none());
        assert_eq!(fx.doc.active_label().as_deref(), Some("Open"));
    }

    #[test]
    fn options_round_trip_through_config() {
        let parsed: ContentOptions =
            serde_json::from_str(r#"{"close_on_escape":false}"#).expect("parse options");
        assert_eq!(parsed, ContentOptions::dialog().with_close_on_escape(false));
    }
}
