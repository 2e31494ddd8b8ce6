//! Root context wiring shared by every compound component.
//!
//! Each root owns one [`DisclosureController`] and provides a [`DisclosureContext`]
//! scoped by a marker type, so a `DialogTrigger` never binds to an enclosing
//! `Popover`. Content parts hold a [`LayerMount`] once they are in the DOM and
//! release it when their owner is cleaned up.

use std::{cell::RefCell, marker::PhantomData, rc::Rc};

use disclosure_headless::{
    require_root, ChangeHandler, ContentOptions, ControllableState, DisclosureController,
    DisclosureError, DisclosureIds, DisclosureProps, LayerMount, LayerNodes, MergedRef, Presence,
};
use leptos::*;

use crate::dom::{element_of, WebDocument};

/// Marker naming one compound-component family.
pub trait DisclosureScope: 'static {
    /// Root component name, used in lookup errors.
    const ROOT: &'static str;
    /// Prefix for generated DOM ids.
    const ID_PREFIX: &'static str;
}

macro_rules! disclosure_scope {
    ($(#[$meta:meta])* $name:ident, $root:literal, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name;

        impl DisclosureScope for $name {
            const ROOT: &'static str = $root;
            const ID_PREFIX: &'static str = $prefix;
        }
    };
}

disclosure_scope!(
    /// Scope of [`crate::Dialog`] parts.
    DialogScope,
    "Dialog",
    "dialog"
);
disclosure_scope!(
    /// Scope of [`crate::AlertDialog`] parts.
    AlertDialogScope,
    "AlertDialog",
    "alert-dialog"
);
disclosure_scope!(
    /// Scope of [`crate::DropdownMenu`] parts.
    DropdownMenuScope,
    "DropdownMenu",
    "menu"
);
disclosure_scope!(
    /// Scope of [`crate::Popover`] parts.
    PopoverScope,
    "Popover",
    "popover"
);
disclosure_scope!(
    /// Scope of [`crate::Collapsible`] parts.
    CollapsibleScope,
    "Collapsible",
    "collapsible"
);

/// Scope-erased handle used by content layers.
#[derive(Clone, Copy)]
pub(crate) struct DisclosureLayer {
    controller: StoredValue<DisclosureController>,
    trigger: NodeRef<html::Button>,
}

impl DisclosureLayer {
    pub(crate) fn controller(&self) -> DisclosureController {
        self.controller.get_value()
    }
}

/// Leptos context for one mounted disclosure root.
pub struct DisclosureContext<S> {
    controller: StoredValue<DisclosureController>,
    open: RwSignal<bool>,
    trigger: NodeRef<html::Button>,
    scope: PhantomData<fn() -> S>,
}

impl<S> Clone for DisclosureContext<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for DisclosureContext<S> {}

impl<S: DisclosureScope> DisclosureContext<S> {
    /// Builds the controller for a root and mirrors its state into a signal.
    ///
    /// `open` selects controlled mode for the lifetime of the root.
    pub fn new(
        open: Option<MaybeSignal<bool>>,
        default_open: bool,
        on_open_change: Option<Callback<bool>>,
    ) -> Self {
        let on_change = on_open_change
            .map(|callback| Rc::new(move |open: &bool| callback.call(*open)) as ChangeHandler<bool>);
        let controller = DisclosureController::with_prefix(
            S::ID_PREFIX,
            DisclosureProps {
                open: open.as_ref().map(|open| open.get_untracked()),
                default_open: Some(default_open),
            },
            on_change,
        );

        let mirror = create_rw_signal(controller.open());
        let subscription = controller.subscribe(move |open| mirror.set(open));
        on_cleanup(move || drop(subscription));

        if let Some(open) = open {
            let controller = controller.clone();
            create_effect(move |_| {
                if let Err(err) = controller.sync_controlled(Some(open.get())) {
                    logging::warn!("{}: {err}", S::ROOT);
                }
            });
        }

        Self {
            controller: store_value(controller),
            open: mirror,
            trigger: create_node_ref::<html::Button>(),
            scope: PhantomData,
        }
    }

    /// Current open state (tracked).
    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    /// Open state as a read-only signal.
    pub fn open_signal(&self) -> Signal<bool> {
        self.open.into()
    }

    /// Content presence (tracked); `build` only runs while the root is open.
    pub fn presence<T>(&self, build: impl FnOnce() -> T) -> Presence<T> {
        self.open.track();
        self.controller
            .with_value(|controller| controller.presence(build))
    }

    /// Requests an open-state change through the controller.
    pub fn set_open(&self, open: bool) {
        self.controller.get_value().request_open_change(open);
    }

    /// Requests the opposite of the current state.
    pub fn toggle(&self) {
        self.controller.get_value().toggle();
    }

    /// ARIA ids of this disclosure.
    pub fn ids(&self) -> DisclosureIds {
        self.controller.with_value(|controller| controller.ids().clone())
    }

    /// Node ref the trigger part binds; focus returns here when content closes.
    pub fn trigger_ref(&self) -> NodeRef<html::Button> {
        self.trigger
    }

    /// Hands the trigger element to `caller` as well as to the root's own ref.
    pub(crate) fn share_trigger(&self, caller: Option<NodeRef<html::Button>>) {
        let Some(caller) = caller else {
            return;
        };
        let merged = Rc::new(MergedRef::<HtmlElement<html::Button>>::new());
        merged.observe(move |element| {
            if let Some(element) = element {
                caller.load(&element);
            }
        });
        let acquire = Rc::clone(&merged);
        self.trigger.on_load(move |element| acquire.acquire(element));
        on_cleanup(move || merged.release());
    }

    pub(crate) fn layer(&self) -> DisclosureLayer {
        DisclosureLayer {
            controller: self.controller,
            trigger: self.trigger,
        }
    }
}

/// Looks up the nearest root of scope `S`.
///
/// # Errors
///
/// Returns [`DisclosureError::OutsideRoot`] naming `part` when no root is in scope.
pub fn try_use_disclosure<S: DisclosureScope>(
    part: &'static str,
) -> Result<DisclosureContext<S>, DisclosureError> {
    require_root(use_context::<DisclosureContext<S>>(), part)
}

/// Returns the nearest root of scope `S`.
///
/// # Panics
///
/// Panics when `part` is rendered outside its root.
pub fn use_disclosure<S: DisclosureScope>(part: &'static str) -> DisclosureContext<S> {
    match try_use_disclosure::<S>(part) {
        Ok(context) => context,
        Err(err) => panic!("{err} ({})", S::ROOT),
    }
}

/// Creates a root context and provides it to descendants.
pub(crate) fn provide_disclosure<S: DisclosureScope>(
    open: Option<MaybeSignal<bool>>,
    default_open: bool,
    on_open_change: Option<Callback<bool>>,
) -> DisclosureContext<S> {
    let context = DisclosureContext::<S>::new(open, default_open, on_open_change);
    provide_context(context);
    context
}

/// Mirrors a [`ControllableState`] into a signal and keeps a controlled value in sync.
pub(crate) fn mirror_controllable<T>(
    state: &ControllableState<T>,
    controlled: Option<MaybeSignal<T>>,
    owner_name: &'static str,
) -> RwSignal<T>
where
    T: Clone + PartialEq + 'static,
{
    let mirror = create_rw_signal(state.get());
    let subscription = state.subscribe(move |value: &T| mirror.set(value.clone()));
    on_cleanup(move || drop(subscription));

    if let Some(controlled) = controlled {
        let state = state.clone();
        create_effect(move |_| {
            if let Err(err) = state.sync_controlled(Some(controlled.get())) {
                logging::warn!("{owner_name}: {err}");
            }
        });
    }
    mirror
}

/// Mounts a [`LayerMount`] for this content once it is painted and drops it on cleanup.
///
/// The mount opens a session right away (the root is open while its content exists),
/// closes it on the close transition, and releases it if the owner is torn down first.
/// `after_open` runs with the content element right after the session opened.
pub(crate) fn use_content_session(
    layer: DisclosureLayer,
    options: ContentOptions,
    content: NodeRef<html::Div>,
    backdrop: Option<NodeRef<html::Div>>,
    after_open: impl Fn(&web_sys::Element) + 'static,
) {
    let mount: Rc<RefCell<Option<LayerMount<WebDocument>>>> = Rc::default();
    let pending = Rc::clone(&mount);

    let frame = request_animation_frame_with_handle(move || {
        let Some(host) = WebDocument::current() else {
            return;
        };
        let trigger = layer.trigger;
        let mounted = LayerMount::new(&host, &layer.controller(), options, move || LayerNodes {
            content: element_of(content),
            backdrop: backdrop.and_then(element_of),
            trigger: element_of(trigger),
        });
        let active = mounted.is_active();
        *pending.borrow_mut() = Some(mounted);
        if let (true, Some(element)) = (active, element_of(content)) {
            after_open(&element);
        }
    });

    on_cleanup(move || {
        if let Ok(frame) = frame {
            frame.cancel();
        }
        let live = mount.borrow_mut().take();
        drop(live);
    });
}
