//! Open/closed controller shared by a disclosure's trigger and content.

use std::{
    rc::Rc,
    sync::atomic::{AtomicU64, Ordering},
};

use serde::{Deserialize, Serialize};

use crate::{ChangeHandler, Controllability, ControllableState, DisclosureError, Subscription};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
/// Root configuration recognized by every disclosure root.
pub struct DisclosureProps {
    /// Externally owned open value; presence selects controlled mode.
    pub open: Option<bool>,
    /// Initial value for uncontrolled roots.
    pub default_open: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Content presence: the content tree exists only while the disclosure is open.
pub enum Presence<T> {
    /// Nothing is rendered.
    Closed,
    /// Content tree for the open disclosure.
    Open(T),
}

impl<T> Presence<T> {
    /// Returns `true` for [`Presence::Open`].
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }

    /// Maps the open payload.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Presence<U> {
        match self {
            Self::Closed => Presence::Closed,
            Self::Open(content) => Presence::Open(f(content)),
        }
    }

    /// Converts into an optional payload.
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Closed => None,
            Self::Open(content) => Some(content),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// DOM ids tying a trigger to its content for ARIA relationships.
pub struct DisclosureIds {
    /// Trigger element id.
    pub trigger: String,
    /// Content element id (`aria-controls`).
    pub content: String,
    /// Title element id (`aria-labelledby`).
    pub title: String,
    /// Description element id (`aria-describedby`).
    pub description: String,
}

static NEXT_DISCLOSURE: AtomicU64 = AtomicU64::new(1);

/// Allocates a fresh id set; no two controllers ever share one.
pub fn next_disclosure_ids(prefix: &str) -> DisclosureIds {
    let n = NEXT_DISCLOSURE.fetch_add(1, Ordering::Relaxed);
    DisclosureIds {
        trigger: format!("{prefix}-{n}-trigger"),
        content: format!("{prefix}-{n}-content"),
        title: format!("{prefix}-{n}-title"),
        description: format!("{prefix}-{n}-description"),
    }
}

/// Resolves a scoped compound-component lookup.
///
/// # Errors
///
/// Returns [`DisclosureError::OutsideRoot`] when no root was found in scope.
pub fn require_root<T>(found: Option<T>, part: &'static str) -> Result<T, DisclosureError> {
    found.ok_or(DisclosureError::OutsideRoot { part })
}

/// Single source of truth for one disclosure's open/closed state.
///
/// Each mounted root owns one controller. Nested roots own independent controllers.
#[derive(Debug, Clone)]
pub struct DisclosureController {
    state: ControllableState<bool>,
    ids: Rc<DisclosureIds>,
}

impl DisclosureController {
    /// Creates a controller from root props.
    pub fn new(props: DisclosureProps, on_open_change: Option<ChangeHandler<bool>>) -> Self {
        Self::with_prefix("disclosure", props, on_open_change)
    }

    /// Creates a controller whose DOM ids use `prefix`.
    pub fn with_prefix(
        prefix: &str,
        props: DisclosureProps,
        on_open_change: Option<ChangeHandler<bool>>,
    ) -> Self {
        Self {
            state: ControllableState::new(
                props.open,
                props.default_open.unwrap_or(false),
                on_open_change,
            ),
            ids: Rc::new(next_disclosure_ids(prefix)),
        }
    }

    /// Current open state.
    pub fn open(&self) -> bool {
        self.state.get()
    }

    /// Mode fixed at construction.
    pub fn mode(&self) -> Controllability {
        self.state.mode()
    }

    /// Requests an open-state change (see [`ControllableState::request_change`]).
    pub fn request_open_change(&self, next: bool) {
        self.state.request_change(next);
    }

    /// Requests the opposite of the current state.
    pub fn toggle(&self) {
        self.request_open_change(!self.open());
    }

    /// Applies the caller's controlled `open` value.
    ///
    /// # Errors
    ///
    /// Returns [`DisclosureError::ModeSwitch`] if the root changes controllability.
    pub fn sync_controlled(&self, open: Option<bool>) -> Result<(), DisclosureError> {
        self.state.sync_controlled(open)
    }

    /// Observes committed open-state changes.
    pub fn subscribe(&self, f: impl Fn(bool) + 'static) -> Subscription<bool> {
        self.state.subscribe(move |open| f(*open))
    }

    /// Builds content only when open.
    pub fn presence<T>(&self, build: impl FnOnce() -> T) -> Presence<T> {
        if self.open() {
            Presence::Open(build())
        } else {
            Presence::Closed
        }
    }

    /// ARIA ids for this disclosure.
    pub fn ids(&self) -> &DisclosureIds {
        &self.ids
    }

    /// Returns `true` when both handles refer to the same controller instance.
    pub fn same_instance(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.ids, &other.ids)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_open_seeds_uncontrolled_state() {
        let closed = DisclosureController::new(DisclosureProps::default(), None);
        assert!(!closed.open());

        let opened = DisclosureController::new(
            DisclosureProps {
                default_open: Some(true),
                ..DisclosureProps::default()
            },
            None,
        );
        assert!(opened.open());
        assert_eq!(opened.mode(), Controllability::Uncontrolled);
    }

    #[test]
    fn controlled_value_wins_over_default() {
        let controller = DisclosureController::new(
            DisclosureProps {
                open: Some(false),
                default_open: Some(true),
            },
            None,
        );
        assert!(!controller.open());
        assert_eq!(controller.mode(), Controllability::Controlled);
    }

    #[test]
    fn toggle_flips_uncontrolled_state() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let controller = DisclosureController::new(
            DisclosureProps::default(),
            Some(Rc::new(move |open: &bool| sink.borrow_mut().push(*open))),
        );

        controller.toggle();
        controller.toggle();

        assert!(!controller.open());
        assert_eq!(*seen.borrow(), vec![true, false]);
    }

    #[test]
    fn presence_builds_only_when_open() {
        let controller = DisclosureController::new(DisclosureProps::default(), None);
        assert_eq!(controller.presence(|| "content"), Presence::Closed);

        controller.request_open_change(true);
        assert_eq!(
            controller.presence(|| "content").into_option(),
            Some("content")
        );
    }

    #[test]
    fn ids_are_unique_per_controller() {
        let a = DisclosureController::with_prefix("dialog", DisclosureProps::default(), None);
        let b = DisclosureController::with_prefix("dialog", DisclosureProps::default(), None);
        assert_ne!(a.ids(), b.ids());
        assert!(a.ids().content.starts_with("dialog-"));
        assert!(a.same_instance(&a.clone()));
        assert!(!a.same_instance(&b));
    }

    #[test]
    fn require_root_fails_loudly_without_scope() {
        let err = require_root(None::<DisclosureController>, "PopoverContent")
            .expect_err("lookup outside root");
        assert_eq!(err, DisclosureError::OutsideRoot {
            part: "PopoverContent"
        });
    }
}
