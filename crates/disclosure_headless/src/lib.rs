//! Headless disclosure engine shared by the compound UI components.
//!
//! This crate owns every piece of state and every document side effect that a
//! trigger/content pair needs: controlled vs. uncontrolled open state, focus
//! capture and restore, Escape and backdrop dismissal, outside-interaction
//! detection, and scroll locking. Nothing here depends on a UI framework; the
//! bindings in `ui_components` mirror this state into reactive signals and tie
//! [`ContentSession`] lifetimes to content mounts.
//!
//! The global `document` is reached only through [`DocumentHost`], so the same
//! rules run against the browser and against [`testing::FakeDocument`].

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod accordion;
mod avatar;
mod class_merge;
mod controllable;
mod disclosure;
mod document;
mod error;
mod focus;
mod layer;
mod outside;
mod refs;
mod roving;
mod scroll_lock;

pub mod datetime;
pub mod testing;

pub use accordion::{AccordionController, AccordionKind};
pub use avatar::{fallback_visible, ImageLoadingStatus};
pub use class_merge::{merge_classes, ClassList};
pub use controllable::{ChangeHandler, Controllability, ControllableState, Subscription};
pub use disclosure::{
    next_disclosure_ids, require_root, DisclosureController, DisclosureIds, DisclosureProps,
    Presence,
};
pub use document::{
    DocumentEvent, DocumentHost, EventHandler, EventKind, LayerId, ListenerGuard, ListenerId,
    ListenerKind, SharedDocumentState,
};
pub use error::DisclosureError;
pub use focus::{focus_first_tabbable, handle_tab_trap, FocusSnapshot};
pub use layer::{ContentOptions, ContentSession, DismissReason, LayerMount, LayerNodes};
pub use outside::{OutsideGuard, OutsideInteractionDetector};
pub use refs::{MergedRef, ObserverId};
pub use roving::{next_index, RovingKey};
pub use scroll_lock::ScrollLockGuard;
