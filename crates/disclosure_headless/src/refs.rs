//! Fan-out of one element acquisition to several owners.

use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
};

/// Handle returned by [`MergedRef::observe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Observer<N> = Rc<dyn Fn(Option<N>)>;

/// One element handle shared with every registered observer.
///
/// Each observer receives `Some(node)` on acquisition and `None` on release or
/// when it is individually removed.
pub struct MergedRef<N> {
    current: RefCell<Option<N>>,
    observers: RefCell<Vec<(ObserverId, Observer<N>)>>,
    next_id: Cell<u64>,
}

impl<N> Default for MergedRef<N> {
    fn default() -> Self {
        Self {
            current: RefCell::new(None),
            observers: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }
}

impl<N: Clone + 'static> MergedRef<N> {
    /// Creates an empty ref.
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently acquired node.
    pub fn get(&self) -> Option<N> {
        self.current.borrow().clone()
    }

    /// Registers `observer`; it is told about an already-acquired node immediately.
    pub fn observe(&self, observer: impl Fn(Option<N>) + 'static) -> ObserverId {
        let id = ObserverId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        let observer: Observer<N> = Rc::new(observer);
        if let Some(node) = self.get() {
            observer(Some(node));
        }
        self.observers.borrow_mut().push((id, observer));
        id
    }

    /// Removes one observer and hands it `None`.
    pub fn unobserve(&self, id: ObserverId) {
        let removed = {
            let mut observers = self.observers.borrow_mut();
            let position = observers.iter().position(|(live, _)| *live == id);
            position.map(|index| observers.remove(index).1)
        };
        if let Some(observer) = removed {
            observer(None);
        }
    }

    /// Records `node` and notifies every observer.
    pub fn acquire(&self, node: N) {
        *self.current.borrow_mut() = Some(node.clone());
        for observer in self.snapshot() {
            observer(Some(node.clone()));
        }
    }

    /// Clears the node and hands every observer `None`.
    pub fn release(&self) {
        if self.current.borrow_mut().take().is_none() {
            return;
        }
        for observer in self.snapshot() {
            observer(None);
        }
    }

    fn snapshot(&self) -> Vec<Observer<N>> {
        self.observers
            .borrow()
            .iter()
            .map(|(_, observer)| Rc::clone(observer))
            .collect()
    }
}

impl<N: fmt::Debug> fmt::Debug for MergedRef<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergedRef")
            .field("current", &*self.current.borrow())
            .field("observers", &self.observers.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn slot() -> (Rc<RefCell<Option<u8>>>, impl Fn(Option<u8>) + 'static) {
        let slot = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&slot);
        (slot, move |node| *sink.borrow_mut() = node)
    }

    #[test]
    fn acquisition_reaches_every_observer() {
        let merged = MergedRef::new();
        let (a, observe_a) = slot();
        let (b, observe_b) = slot();
        merged.observe(observe_a);
        merged.observe(observe_b);

        merged.acquire(7);
        assert_eq!((*a.borrow(), *b.borrow()), (Some(7), Some(7)));

        merged.release();
        assert_eq!((*a.borrow(), *b.borrow()), (None, None));
    }

    #[test]
    fn unobserve_nulls_only_that_owner() {
        let merged = MergedRef::new();
        let (a, observe_a) = slot();
        let (b, observe_b) = slot();
        let id_a = merged.observe(observe_a);
        merged.observe(observe_b);
        merged.acquire(3);

        merged.unobserve(id_a);

        assert_eq!(*a.borrow(), None);
        assert_eq!(*b.borrow(), Some(3));
    }

    #[test]
    fn late_observer_sees_current_node() {
        let merged = MergedRef::new();
        merged.acquire(9);
        let (late, observe_late) = slot();
        merged.observe(observe_late);
        assert_eq!(*late.borrow(), Some(9));
    }
}
