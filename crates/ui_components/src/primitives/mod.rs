//! Styled compound components and controls.

use leptos::ev::{KeyboardEvent, MouseEvent};
use leptos::*;

use disclosure_headless::ClassList;

use crate::context::{
    provide_disclosure, use_content_session, use_disclosure, AlertDialogScope, CollapsibleScope,
    DialogScope, DisclosureContext, DisclosureScope, DropdownMenuScope, PopoverScope,
};

mod accordion;
mod alert_dialog;
mod avatar;
mod collapsible;
mod controls;
mod date_time_picker;
mod dialog;
mod dropdown_menu;
mod popover;

pub use accordion::{Accordion, AccordionContent, AccordionItem, AccordionTrigger};
pub use alert_dialog::{
    AlertDialog, AlertDialogAction, AlertDialogCancel, AlertDialogContent,
    AlertDialogDescription, AlertDialogFooter, AlertDialogTitle, AlertDialogTrigger,
};
pub use avatar::{Avatar, AvatarFallback, AvatarImage};
pub use collapsible::{Collapsible, CollapsibleContent, CollapsibleTrigger};
pub use controls::{Button, Input};
pub use date_time_picker::DateTimePicker;
pub use dialog::{
    Dialog, DialogClose, DialogContent, DialogDescription, DialogTitle, DialogTrigger,
};
pub use dropdown_menu::{
    DropdownMenu, DropdownMenuContent, DropdownMenuItem, DropdownMenuLabel,
    DropdownMenuSeparator, DropdownMenuTrigger,
};
pub use popover::{Popover, PopoverClose, PopoverContent, PopoverTrigger};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Button visual variants.
pub enum ButtonVariant {
    /// Filled primary action.
    #[default]
    Default,
    /// Destructive action.
    Destructive,
    /// Bordered action.
    Outline,
    /// Muted filled action.
    Secondary,
    /// Borderless action that only shows a hover surface.
    Ghost,
    /// Inline text link.
    Link,
}

impl ButtonVariant {
    pub(crate) fn token(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Destructive => "destructive",
            Self::Outline => "outline",
            Self::Secondary => "secondary",
            Self::Ghost => "ghost",
            Self::Link => "link",
        }
    }

    fn classes(self) -> &'static str {
        match self {
            Self::Default => "bg-primary text-primary-foreground shadow hover:bg-primary/90",
            Self::Destructive => {
                "bg-destructive text-destructive-foreground shadow-sm hover:bg-destructive/90"
            }
            Self::Outline => {
                "border border-input bg-background shadow-sm hover:bg-accent hover:text-accent-foreground"
            }
            Self::Secondary => {
                "bg-secondary text-secondary-foreground shadow-sm hover:bg-secondary/80"
            }
            Self::Ghost => "hover:bg-accent hover:text-accent-foreground",
            Self::Link => "text-primary underline-offset-4 hover:underline",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Button sizing tokens.
pub enum ButtonSize {
    /// Default height.
    #[default]
    Default,
    /// Dense button.
    Sm,
    /// Large button.
    Lg,
    /// Square icon-only button.
    Icon,
}

impl ButtonSize {
    pub(crate) fn token(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Sm => "sm",
            Self::Lg => "lg",
            Self::Icon => "icon",
        }
    }

    fn classes(self) -> &'static str {
        match self {
            Self::Default => "h-9 px-4 py-2",
            Self::Sm => "h-8 rounded-md px-3 text-xs",
            Self::Lg => "h-10 rounded-md px-8",
            Self::Icon => "h-9 w-9",
        }
    }
}

const BUTTON_BASE: &str = "inline-flex items-center justify-center gap-2 whitespace-nowrap rounded-md text-sm font-medium transition-colors focus-visible:outline-none focus-visible:ring-1 focus-visible:ring-ring disabled:pointer-events-none disabled:opacity-50";

/// Class string for a button-like element.
pub(crate) fn button_class(
    variant: ButtonVariant,
    size: ButtonSize,
    caller: Option<&str>,
) -> String {
    ClassList::new(BUTTON_BASE)
        .variant(variant.classes())
        .size(size.classes())
        .caller(caller)
        .build()
}

/// Class string for a part with only base and caller layers.
pub(crate) fn part_class(base: &str, caller: Option<&str>) -> String {
    ClassList::new(base).caller(caller).build()
}

pub(crate) fn bool_token(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

pub(crate) fn state_token(open: bool) -> &'static str {
    if open {
        "open"
    } else {
        "closed"
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn caller_class_overrides_variant_and_size() {
        let class = button_class(ButtonVariant::Outline, ButtonSize::Sm, Some("px-6 h-12"));
        assert!(class.ends_with("px-6 h-12"));
        assert!(!class.contains("px-3"));
        assert!(!class.contains("h-8"));
        assert!(class.contains("border-input"));
    }

    #[test]
    fn tokens_are_stable() {
        assert_eq!(ButtonVariant::default().token(), "default");
        assert_eq!(ButtonSize::Icon.token(), "icon");
        assert_eq!(state_token(true), "open");
        assert_eq!(bool_token(false), "false");
    }
}
