//! Paired, depth-counted document scroll lock.

use std::{fmt, rc::Rc};

use crate::DocumentHost;

/// Holds one reference on the document scroll lock until released or dropped.
///
/// The first live guard applies the lock and the last one removes it, so
/// overlapping holders never unlock early and release happens once per guard.
pub struct ScrollLockGuard<H: DocumentHost> {
    host: Option<Rc<H>>,
}

impl<H: DocumentHost> ScrollLockGuard<H> {
    /// Takes a reference on the scroll lock of `host`.
    pub fn acquire(host: &Rc<H>) -> Self {
        if host.shared_state().increment_scroll_lock() == 1 {
            host.set_scroll_locked(true);
        }
        Self {
            host: Some(Rc::clone(host)),
        }
    }

    /// Whether this guard still holds its reference.
    pub fn is_held(&self) -> bool {
        self.host.is_some()
    }

    /// Drops the reference now. Later calls and the eventual drop are no-ops.
    pub fn release(&mut self) {
        let Some(host) = self.host.take() else {
            return;
        };
        if host.shared_state().decrement_scroll_lock() == 0 {
            host.set_scroll_locked(false);
        }
    }
}

impl<H: DocumentHost> Drop for ScrollLockGuard<H> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<H: DocumentHost> fmt::Debug for ScrollLockGuard<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollLockGuard")
            .field("held", &self.is_held())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::testing::FakeDocument;

    #[test]
    fn overlapping_guards_lock_once_and_unlock_once() {
        let doc = Rc::new(FakeDocument::new());
        let mut outer = ScrollLockGuard::acquire(&doc);
        let inner = ScrollLockGuard::acquire(&doc);
        assert!(doc.scroll_locked());

        outer.release();
        assert!(doc.scroll_locked());

        drop(inner);
        assert!(!doc.scroll_locked());
        assert_eq!(doc.scroll_lock_transitions(), (1, 1));
    }

    #[test]
    fn release_is_idempotent() {
        let doc = Rc::new(FakeDocument::new());
        let mut guard = ScrollLockGuard::acquire(&doc);
        guard.release();
        guard.release();
        assert!(!guard.is_held());
        drop(guard);

        assert_eq!(doc.shared_state().scroll_lock_depth(), 0);
        assert_eq!(doc.scroll_lock_transitions(), (1, 1));
    }
}
