//! Leptos compound components built on the `disclosure_headless` engine.
//!
//! Every trigger/content family (dialogs, menus, popovers, accordions,
//! collapsibles) shares one controller per root and emits the stable
//! `data-ui-*` / `data-state` DOM contract styled by the consuming app.
//! Parts rendered outside their root panic at render time; use
//! [`try_use_disclosure`] to check for a root instead.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod context;
mod dom;
mod primitives;

pub use context::{
    try_use_disclosure, use_disclosure, AlertDialogScope, CollapsibleScope, DialogScope,
    DisclosureContext, DisclosureScope, DropdownMenuScope, PopoverScope,
};
pub use dom::WebDocument;
pub use primitives::{
    Accordion, AccordionContent, AccordionItem, AccordionTrigger, AlertDialog, AlertDialogAction,
    AlertDialogCancel, AlertDialogContent, AlertDialogDescription, AlertDialogFooter,
    AlertDialogTitle, AlertDialogTrigger, Avatar, AvatarFallback, AvatarImage, Button, ButtonSize,
    ButtonVariant, Collapsible, CollapsibleContent, CollapsibleTrigger, DateTimePicker, Dialog,
    DialogClose, DialogContent, DialogDescription, DialogTitle, DialogTrigger, DropdownMenu,
    DropdownMenuContent, DropdownMenuItem, DropdownMenuLabel, DropdownMenuSeparator,
    DropdownMenuTrigger, Input, Popover, PopoverClose, PopoverContent, PopoverTrigger,
};

pub use disclosure_headless::{AccordionKind, DisclosureError, ImageLoadingStatus};

/// Convenience imports for application crates.
pub mod prelude {
    pub use crate::{
        Accordion, AccordionContent, AccordionItem, AccordionKind, AccordionTrigger, AlertDialog,
        AlertDialogAction, AlertDialogCancel, AlertDialogContent, AlertDialogDescription,
        AlertDialogFooter, AlertDialogTitle, AlertDialogTrigger, Avatar, AvatarFallback,
        AvatarImage, Button, ButtonSize, ButtonVariant, Collapsible, CollapsibleContent,
        CollapsibleTrigger, DateTimePicker, Dialog, DialogClose, DialogContent, DialogDescription,
        DialogTitle, DialogTrigger, DropdownMenu, DropdownMenuContent, DropdownMenuItem,
        DropdownMenuLabel, DropdownMenuSeparator, DropdownMenuTrigger, Input, Popover,
        PopoverClose, PopoverContent, PopoverTrigger,
    };
}
