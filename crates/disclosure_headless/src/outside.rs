//! Outside-interaction detection for non-modal content (menus, popovers).

use std::{fmt, rc::Rc};

use crate::{DismissReason, DocumentEvent, DocumentHost, EventKind, ListenerGuard, ListenerKind};

/// Attaches document listeners that report pointer or focus activity outside a region.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutsideInteractionDetector;

impl OutsideInteractionDetector {
    /// Watches `content` while the returned guard lives.
    ///
    /// Events targeting `content`, its descendants, or any node in `ignore` (typically
    /// the trigger, whose own click handler toggles the disclosure) are not reported.
    pub fn attach<H: DocumentHost>(
        host: &Rc<H>,
        content: H::Node,
        ignore: Vec<H::Node>,
        on_outside: Rc<dyn Fn(DismissReason)>,
    ) -> OutsideGuard<H> {
        let region = Rc::new((content, ignore));
        let listeners = [ListenerKind::PointerDown, ListenerKind::FocusIn]
            .into_iter()
            .map(|kind| {
                let host_ref = Rc::clone(host);
                let region = Rc::clone(&region);
                let on_outside = Rc::clone(&on_outside);
                ListenerGuard::attach(host, kind, move |event: &DocumentEvent<H::Node>| {
                    let (content, ignore) = &*region;
                    if !is_outside(&*host_ref, content, ignore, event) {
                        return;
                    }
                    on_outside(match event.kind {
                        EventKind::FocusIn => DismissReason::OutsideFocus,
                        _ => DismissReason::OutsidePointer,
                    });
                })
            })
            .collect();
        OutsideGuard { listeners }
    }
}

fn is_outside<H: DocumentHost>(
    host: &H,
    content: &H::Node,
    ignore: &[H::Node],
    event: &DocumentEvent<H::Node>,
) -> bool {
    let Some(target) = event.target.as_ref() else {
        return false;
    };
    if host.contains(content, target) {
        return false;
    }
    !ignore.iter().any(|node| host.contains(node, target))
}

/// Live outside-interaction listeners; detached on drop.
pub struct OutsideGuard<H: DocumentHost> {
    listeners: Vec<ListenerGuard<H>>,
}

impl<H: DocumentHost> OutsideGuard<H> {
    /// Detaches every listener now.
    pub fn detach(&mut self) {
        for listener in &mut self.listeners {
            listener.remove();
        }
        self.listeners.clear();
    }
}

impl<H: DocumentHost> fmt::Debug for OutsideGuard<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutsideGuard")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::testing::FakeDocument;

    struct Fixture {
        doc: Rc<FakeDocument>,
        reasons: Rc<RefCell<Vec<DismissReason>>>,
        guard: OutsideGuard<FakeDocument>,
    }

    fn fixture() -> (Fixture, [crate::testing::FakeNode; 4]) {
        let doc = Rc::new(FakeDocument::new());
        let trigger = doc.create_tabbable("trigger", doc.body());
        let content = doc.create_element("content", doc.body());
        let item = doc.create_tabbable("item", content);
        let elsewhere = doc.create_tabbable("elsewhere", doc.body());
        let reasons = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&reasons);
        let guard = OutsideInteractionDetector::attach(
            &doc,
            content,
            vec![trigger],
            Rc::new(move |reason| sink.borrow_mut().push(reason)),
        );
        (
            Fixture {
                doc,
                reasons,
                guard,
            },
            [trigger, content, item, elsewhere],
        )
    }

    #[test]
    fn reports_pointer_and_focus_outside() {
        let (fx, [_, _, _, elsewhere]) = fixture();
        fx.doc.pointer_down(elsewhere);
        fx.doc.focus(&elsewhere);
        assert_eq!(
            *fx.reasons.borrow(),
            vec![DismissReason::OutsidePointer, DismissReason::OutsideFocus]
        );
    }

    #[test]
    fn ignores_content_descendants_and_trigger() {
        let (fx, [trigger, content, item, _]) = fixture();
        fx.doc.pointer_down(content);
        fx.doc.pointer_down(item);
        fx.doc.focus(&item);
        fx.doc.pointer_down(trigger);
        assert!(fx.reasons.borrow().is_empty());
    }

    #[test]
    fn detaches_on_drop() {
        let (fx, [_, _, _, elsewhere]) = fixture();
        let Fixture {
            doc,
            reasons,
            guard,
        } = fx;
        assert_eq!(doc.listener_count(), 2);

        drop(guard);
        doc.pointer_down(elsewhere);

        assert_eq!(doc.listener_count(), 0);
        assert!(reasons.borrow().is_empty());
    }
}
