//! Focus capture, restore and containment helpers.

use std::rc::Rc;

use crate::{DocumentEvent, DocumentHost, EventKind};

/// Element focused immediately before a content region opened.
pub struct FocusSnapshot<H: DocumentHost> {
    host: Rc<H>,
    previous: Option<H::Node>,
}

impl<H: DocumentHost> FocusSnapshot<H> {
    /// Records the document's active element.
    pub fn capture(host: &Rc<H>) -> Self {
        Self {
            host: Rc::clone(host),
            previous: host.active_element(),
        }
    }

    /// The recorded element, if any.
    pub fn previous(&self) -> Option<&H::Node> {
        self.previous.as_ref()
    }

    /// Returns focus to the recorded element when it is still in the document.
    pub fn restore(self) {
        if let Some(previous) = self.previous {
            if self.host.is_connected(&previous) {
                self.host.focus(&previous);
            }
        }
    }
}

/// Focuses the first tabbable descendant of `root`. Returns `false` when there is none.
pub fn focus_first_tabbable<H: DocumentHost>(host: &H, root: &H::Node) -> bool {
    match host.tabbable_descendants(root).first() {
        Some(first) => {
            host.focus(first);
            true
        }
        None => false,
    }
}

/// Keeps Tab / Shift+Tab cycling inside `root`.
///
/// Returns `true` and prevents default when the event was handled.
pub fn handle_tab_trap<H: DocumentHost>(
    host: &H,
    root: &H::Node,
    event: &DocumentEvent<H::Node>,
) -> bool {
    let EventKind::KeyDown { key, shift } = &event.kind else {
        return false;
    };
    if key != "Tab" || event.default_prevented() {
        return false;
    }

    let tabbables = host.tabbable_descendants(root);
    let (Some(first), Some(last)) = (tabbables.first(), tabbables.last()) else {
        event.prevent_default();
        return true;
    };

    let active = host.active_element();
    let inside = active
        .as_ref()
        .map(|node| host.contains(root, node))
        .unwrap_or(false);
    let target = match (inside, *shift) {
        (false, false) => Some(first),
        (false, true) => Some(last),
        (true, false) if active.as_ref() == Some(last) => Some(first),
        (true, true) if active.as_ref() == Some(first) => Some(last),
        _ => None,
    };

    match target {
        Some(node) => {
            host.focus(node);
            event.prevent_default();
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::testing::FakeDocument;

    fn tab(shift: bool) -> EventKind {
        EventKind::KeyDown {
            key: "Tab".to_string(),
            shift,
        }
    }

    #[test]
    fn restore_skips_detached_elements() {
        let doc = Rc::new(FakeDocument::new());
        let opener = doc.create_tabbable("Open", doc.body());
        doc.focus(&opener);
        let snapshot = FocusSnapshot::capture(&doc);
        let other = doc.create_tabbable("Other", doc.body());
        doc.focus(&other);

        doc.detach(opener);
        snapshot.restore();

        assert_eq!(doc.active_label().as_deref(), Some("Other"));
    }

    #[test]
    fn focus_first_is_a_noop_without_tabbables() {
        let doc = FakeDocument::new();
        let panel = doc.create_element("panel", doc.body());
        assert!(!focus_first_tabbable(&doc, &panel));
        assert_eq!(doc.active_element(), None);
    }

    #[test]
    fn tab_wraps_at_both_edges() {
        let doc = FakeDocument::new();
        let panel = doc.create_element("panel", doc.body());
        let first = doc.create_tabbable("first", panel);
        let last = doc.create_tabbable("last", panel);

        doc.focus(&last);
        let forward = DocumentEvent::new(tab(false), Some(last));
        assert!(handle_tab_trap(&doc, &panel, &forward));
        assert!(forward.default_prevented());
        assert_eq!(doc.active_element(), Some(first));

        let backward = DocumentEvent::new(tab(true), Some(first));
        assert!(handle_tab_trap(&doc, &panel, &backward));
        assert_eq!(doc.active_element(), Some(last));
    }

    #[test]
    fn tab_between_inner_elements_is_left_to_the_browser() {
        let doc = FakeDocument::new();
        let panel = doc.create_element("panel", doc.body());
        let first = doc.create_tabbable("first", panel);
        let _last = doc.create_tabbable("last", panel);
        doc.focus(&first);

        let event = DocumentEvent::new(tab(false), Some(first));
        assert!(!handle_tab_trap(&doc, &panel, &event));
        assert!(!event.default_prevented());
    }

    #[test]
    fn empty_region_swallows_tab() {
        let doc = FakeDocument::new();
        let panel = doc.create_element("panel", doc.body());
        let event = DocumentEvent::new(tab(false), None);
        assert!(handle_tab_trap(&doc, &panel, &event));
        assert!(event.default_prevented());
    }
}
