//! Controlled/uncontrolled value reconciliation shared by every compound component.

use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    fmt,
    rc::Rc,
};

use serde::{Deserialize, Serialize};

use crate::DisclosureError;

/// Caller-supplied observer invoked with each requested value.
pub type ChangeHandler<T> = Rc<dyn Fn(&T)>;

type Subscriber<T> = Rc<dyn Fn(&T)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Who owns the authoritative value of a [`ControllableState`].
pub enum Controllability {
    /// The caller owns the value and must echo requested changes back.
    Controlled,
    /// The state holder owns and mutates its own value.
    Uncontrolled,
}

impl Controllability {
    fn of<T>(external: &Option<T>) -> Self {
        if external.is_some() {
            Self::Controlled
        } else {
            Self::Uncontrolled
        }
    }
}

struct Inner<T> {
    mode: Controllability,
    value: RefCell<T>,
    on_change: Option<ChangeHandler<T>>,
    pending: RefCell<VecDeque<T>>,
    dispatching: Cell<bool>,
    subscribers: RefCell<Vec<(u64, Subscriber<T>)>>,
    next_subscriber: Cell<u64>,
}

/// Single-threaded shared value holder implementing controlled/uncontrolled semantics.
///
/// Clones share the same value. The mode is fixed when the holder is created.
pub struct ControllableState<T> {
    inner: Rc<Inner<T>>,
}

impl<T> Clone for ControllableState<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ControllableState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllableState")
            .field("mode", &self.inner.mode)
            .field("value", &*self.inner.value.borrow())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> ControllableState<T> {
    /// Creates a holder. `controlled` selects controlled mode; otherwise `default` seeds
    /// the internal value.
    pub fn new(controlled: Option<T>, default: T, on_change: Option<ChangeHandler<T>>) -> Self {
        let mode = Controllability::of(&controlled);
        Self {
            inner: Rc::new(Inner {
                mode,
                value: RefCell::new(controlled.unwrap_or(default)),
                on_change,
                pending: RefCell::new(VecDeque::new()),
                dispatching: Cell::new(false),
                subscribers: RefCell::new(Vec::new()),
                next_subscriber: Cell::new(0),
            }),
        }
    }

    /// Returns the currently displayed value.
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Reads the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Returns the mode fixed at construction.
    pub fn mode(&self) -> Controllability {
        self.inner.mode
    }

    /// Requests a new value.
    ///
    /// Controlled holders only report the request to the change handler; the displayed
    /// value moves when the caller echoes it through [`Self::sync_controlled`].
    /// Uncontrolled holders commit synchronously, notify subscribers, then report.
    ///
    /// A request made from a subscriber or change handler is queued and applied once
    /// the current change has been fully reported, so reports arrive in commit order.
    pub fn request_change(&self, next: T) {
        self.inner.pending.borrow_mut().push_back(next);
        if self.inner.dispatching.replace(true) {
            return;
        }
        let _dispatch = DispatchGuard(&self.inner.dispatching);
        loop {
            let Some(next) = self.inner.pending.borrow_mut().pop_front() else {
                break;
            };
            self.apply_request(next);
        }
    }

    fn apply_request(&self, next: T) {
        if *self.inner.value.borrow() == next {
            return;
        }
        match self.inner.mode {
            Controllability::Controlled => self.report(&next),
            Controllability::Uncontrolled => {
                self.commit(next.clone());
                self.report(&next);
            }
        }
    }

    /// Applies an external value update.
    ///
    /// # Errors
    ///
    /// Returns [`DisclosureError::ModeSwitch`] when `external` implies a different mode
    /// than the one fixed at construction. State is left untouched in that case.
    pub fn sync_controlled(&self, external: Option<T>) -> Result<(), DisclosureError> {
        let implied = Controllability::of(&external);
        if implied != self.inner.mode {
            return Err(DisclosureError::ModeSwitch {
                from: self.inner.mode,
                to: implied,
            });
        }
        if let Some(value) = external {
            if *self.inner.value.borrow() != value {
                self.commit(value);
            }
        }
        Ok(())
    }

    /// Registers `f` to run after every committed value change.
    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> Subscription<T> {
        let id = self.inner.next_subscriber.get();
        self.inner.next_subscriber.set(id + 1);
        self.inner
            .subscribers
            .borrow_mut()
            .push((id, Rc::new(f) as Subscriber<T>));
        Subscription {
            id,
            inner: Rc::downgrade(&self.inner),
        }
    }

    fn commit(&self, value: T) {
        *self.inner.value.borrow_mut() = value.clone();
        let subscribers: Vec<Subscriber<T>> = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .map(|(_, f)| Rc::clone(f))
            .collect();
        for subscriber in subscribers {
            subscriber(&value);
        }
    }

    fn report(&self, next: &T) {
        if let Some(on_change) = self.inner.on_change.as_ref() {
            on_change(next);
        }
    }
}

/// Clears the dispatch flag even when a callback unwinds.
struct DispatchGuard<'a>(&'a Cell<bool>);

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Live subscription to a [`ControllableState`]; unsubscribes on drop.
pub struct Subscription<T> {
    id: u64,
    inner: std::rc::Weak<Inner<T>>,
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner
                .subscribers
                .borrow_mut()
                .retain(|(id, _)| *id != self.id);
        }
    }
}

impl<T> fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn recorder<T: Clone + 'static>() -> (ChangeHandler<T>, Rc<RefCell<Vec<T>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        (
            Rc::new(move |value: &T| sink.borrow_mut().push(value.clone())),
            seen,
        )
    }

    #[test]
    fn uncontrolled_commits_then_reports() {
        let (on_change, seen) = recorder::<u8>();
        let state = ControllableState::new(None, 1, Some(on_change));

        state.request_change(4);

        assert_eq!(state.get(), 4);
        assert_eq!(state.mode(), Controllability::Uncontrolled);
        assert_eq!(*seen.borrow(), vec![4]);
    }

    #[test]
    fn controlled_reports_without_mutating() {
        let (on_change, seen) = recorder::<u8>();
        let state = ControllableState::new(Some(1), 0, Some(on_change));

        state.request_change(7);

        assert_eq!(state.get(), 1);
        assert_eq!(*seen.borrow(), vec![7]);

        state.sync_controlled(Some(7)).expect("controlled echo");
        assert_eq!(state.get(), 7);
    }

    #[test]
    fn unchanged_requests_are_ignored() {
        let (on_change, seen) = recorder::<u8>();
        let state = ControllableState::new(None, 3, Some(on_change));

        state.request_change(3);

        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn mode_switch_is_rejected_both_ways() {
        let uncontrolled = ControllableState::new(None, false, None);
        assert_eq!(
            uncontrolled.sync_controlled(Some(true)),
            Err(DisclosureError::ModeSwitch {
                from: Controllability::Uncontrolled,
                to: Controllability::Controlled,
            })
        );
        assert!(!uncontrolled.get());

        let controlled = ControllableState::new(Some(true), false, None);
        assert!(controlled.sync_controlled(None).is_err());
        assert!(controlled.get());
    }

    #[test]
    fn dropped_subscription_stops_notifications() {
        let state = ControllableState::new(None, 0u8, None);
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let subscription = state.subscribe(move |_| counter.set(counter.get() + 1));

        state.request_change(1);
        drop(subscription);
        state.request_change(2);

        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn subscribers_may_reenter_the_holder() {
        let (on_change, seen) = recorder::<u8>();
        let state = ControllableState::new(None, 0u8, Some(on_change));
        let reentrant = state.clone();
        let _subscription = state.subscribe(move |value| {
            if *value == 1 {
                reentrant.request_change(2);
            }
        });

        state.request_change(1);

        assert_eq!(state.get(), 2);
        assert_eq!(*seen.borrow(), vec![1, 2]);
        assert_eq!(seen.borrow().last().copied(), Some(state.get()));
    }

    #[test]
    fn change_handler_requests_apply_after_the_report() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let holder: Rc<RefCell<Option<ControllableState<u8>>>> = Rc::default();
        let sink = Rc::clone(&seen);
        let handle = Rc::clone(&holder);
        let state = ControllableState::new(
            None,
            0u8,
            Some(Rc::new(move |value: &u8| {
                sink.borrow_mut().push(*value);
                if *value < 3 {
                    if let Some(state) = handle.borrow().as_ref() {
                        state.request_change(value + 1);
                    }
                }
            })),
        );
        *holder.borrow_mut() = Some(state.clone());

        state.request_change(1);

        assert_eq!(state.get(), 3);
        assert_eq!(*seen.borrow(), vec![1, 2, 3]);
        holder.borrow_mut().take();
    }
}
