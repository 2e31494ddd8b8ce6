use disclosure_headless::ContentOptions;

use super::dialog::disclosure_trigger;
use super::*;
use crate::{
    context::DisclosureLayer,
    dom::{element_of, focus_first_menu_item, handle_menu_roving_keydown},
};

const MENU_CONTENT_CLASS: &str = "absolute left-0 top-full z-50 mt-1 min-w-[8rem] overflow-hidden rounded-md border bg-popover p-1 text-popover-foreground shadow-md";

const MENU_ITEM_CLASS: &str = "relative flex cursor-default select-none items-center gap-2 rounded-sm px-2 py-1.5 text-sm outline-none transition-colors focus:bg-accent focus:text-accent-foreground";

const MENU_ITEM_DISABLED: &str = "pointer-events-none opacity-50";

#[component]
/// Menu root. Pass `open` to control it; otherwise `default_open` seeds it.
pub fn DropdownMenu(
    #[prop(optional, into)] open: Option<MaybeSignal<bool>>,
    #[prop(optional)] default_open: bool,
    #[prop(optional)] on_open_change: Option<Callback<bool>>,
    #[prop(optional, into)] class: Option<String>,
    #[prop(attrs)] attrs: Vec<(&'static str, Attribute)>,
    children: Children,
) -> impl IntoView {
    let ctx = provide_disclosure::<DropdownMenuScope>(open, default_open, on_open_change);
    view! {
        <div
            class=part_class("relative inline-block text-left", class.as_deref())
            data-ui-primitive="true"
            data-ui-kind="dropdown-menu"
            data-state=move || state_token(ctx.is_open())
            {..attrs}
        >
            {children()}
        </div>
    }
}

#[component]
/// Button that toggles the enclosing [`DropdownMenu`].
pub fn DropdownMenuTrigger(
    #[prop(default = ButtonVariant::Outline)] variant: ButtonVariant,
    #[prop(optional)] size: ButtonSize,
    #[prop(optional, into)] class: Option<String>,
    #[prop(optional)] node_ref: Option<NodeRef<html::Button>>,
    #[prop(attrs)] attrs: Vec<(&'static str, Attribute)>,
    children: Children,
) -> impl IntoView {
    let ctx = use_disclosure::<DropdownMenuScope>("DropdownMenuTrigger");
    ctx.share_trigger(node_ref);
    disclosure_trigger(ctx, "menu", variant, size, class, attrs, children)
}

#[component]
/// Menu panel. Arrow keys, Home and End move between items; Tab closes it.
pub fn DropdownMenuContent(
    #[prop(default = true)] close_on_escape: bool,
    #[prop(optional, into)] class: Option<String>,
    #[prop(attrs)] attrs: Vec<(&'static str, Attribute)>,
    children: ChildrenFn,
) -> impl IntoView {
    let ctx = use_disclosure::<DropdownMenuScope>("DropdownMenuContent");
    let options = ContentOptions::menu().with_close_on_escape(close_on_escape);
    let class = part_class(MENU_CONTENT_CLASS, class.as_deref());
    let layer = ctx.layer();
    let ids = ctx.ids();
    view! {
        <Show when=move || ctx.is_open() fallback=|| ()>
            <MenuLayer
                layer=layer
                options=options
                id=ids.content.clone()
                labelled_by=ids.trigger.clone()
                class=class.clone()
                extra_attrs=attrs.clone()
                children=children.clone()
            />
        </Show>
    }
}

#[component]
fn MenuLayer(
    layer: DisclosureLayer,
    options: ContentOptions,
    id: String,
    labelled_by: String,
    class: String,
    extra_attrs: Vec<(&'static str, Attribute)>,
    children: ChildrenFn,
) -> impl IntoView {
    let content = create_node_ref::<html::Div>();
    use_content_session(layer, options, content, None, |menu| {
        let _ = focus_first_menu_item(menu);
    });

    let on_keydown = move |ev: KeyboardEvent| {
        if ev.key() == "Tab" {
            layer.controller().request_open_change(false);
            return;
        }
        if let Some(menu) = element_of(content) {
            let _ = handle_menu_roving_keydown(&ev, &menu);
        }
    };

    view! {
        <div
            node_ref=content
            id=id
            role="menu"
            aria-orientation="vertical"
            aria-labelledby=labelled_by
            tabindex="-1"
            class=class
            data-ui-primitive="true"
            data-ui-kind="menu"
            data-state="open"
            on:keydown={on_keydown}
            {..extra_attrs}
        >
            {children()}
        </div>
    }
}

#[component]
/// Menu entry. Selecting it (click, Enter, or Space) runs `on_select` and closes the menu.
pub fn DropdownMenuItem(
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
    #[prop(optional)] on_select: Option<Callback<()>>,
    #[prop(optional, into)] class: Option<String>,
    #[prop(attrs)] attrs: Vec<(&'static str, Attribute)>,
    children: Children,
) -> impl IntoView {
    let ctx = use_disclosure::<DropdownMenuScope>("DropdownMenuItem");
    let select = move || {
        if disabled.get_untracked() {
            return;
        }
        if let Some(on_select) = on_select.as_ref() {
            on_select.call(());
        }
        ctx.set_open(false);
    };
    let class = move || {
        ClassList::new(MENU_ITEM_CLASS)
            .state(disabled.get(), MENU_ITEM_DISABLED)
            .caller(class.as_deref())
            .build()
    };

    view! {
        <div
            role="menuitem"
            tabindex="-1"
            class=class
            aria-disabled=move || bool_token(disabled.get())
            data-ui-primitive="true"
            data-ui-kind="menu-item"
            data-disabled=move || disabled.get().then_some("")
            on:click=move |_| select()
            on:keydown=move |ev: KeyboardEvent| {
                if matches!(ev.key().as_str(), "Enter" | " ") {
                    ev.prevent_default();
                    select();
                }
            }
            {..attrs}
        >
            {children()}
        </div>
    }
}

#[component]
/// Non-interactive group heading.
pub fn DropdownMenuLabel(
    #[prop(optional, into)] class: Option<String>,
    #[prop(attrs)] attrs: Vec<(&'static str, Attribute)>,
    children: Children,
) -> impl IntoView {
    view! {
        <div
            class=part_class("px-2 py-1.5 text-sm font-semibold", class.as_deref())
            data-ui-primitive="true"
            data-ui-kind="menu-label"
            {..attrs}
        >
            {children()}
        </div>
    }
}

#[component]
/// Divider between item groups.
pub fn DropdownMenuSeparator(
    #[prop(optional, into)] class: Option<String>,
    #[prop(attrs)] attrs: Vec<(&'static str, Attribute)>,
) -> impl IntoView {
    view! {
        <div
            role="separator"
            aria-hidden="true"
            class=part_class("-mx-1 my-1 h-px bg-muted", class.as_deref())
            data-ui-primitive="true"
            data-ui-kind="menu-separator"
            {..attrs}
        ></div>
    }
}
