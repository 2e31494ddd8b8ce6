use disclosure_headless::ContentOptions;

use super::dialog::{
    disclosure_trigger, ModalLayer, DIALOG_CONTENT_CLASS, DIALOG_DESCRIPTION_CLASS, DIALOG_TITLE_CLASS,
};
use super::controls::part_button;
use super::*;

const FOOTER_CLASS: &str = "flex flex-col-reverse sm:flex-row sm:justify-end sm:space-x-2";

#[component]
/// Confirmation dialog root; its backdrop never dismisses it.
pub fn AlertDialog(
    #[prop(optional, into)] open: Option<MaybeSignal<bool>>,
    #[prop(optional)] default_open: bool,
    #[prop(optional)] on_open_change: Option<Callback<bool>>,
    children: Children,
) -> impl IntoView {
    provide_disclosure::<AlertDialogScope>(open, default_open, on_open_change);
    children().into_view()
}

#[component]
/// Button that opens the enclosing [`AlertDialog`].
pub fn AlertDialogTrigger(
    #[prop(optional)] variant: ButtonVariant,
    #[prop(optional)] size: ButtonSize,
    #[prop(optional, into)] class: Option<String>,
    #[prop(optional)] node_ref: Option<NodeRef<html::Button>>,
    #[prop(attrs)] attrs: Vec<(&'static str, Attribute)>,
    children: Children,
) -> impl IntoView {
    let ctx = use_disclosure::<AlertDialogScope>("AlertDialogTrigger");
    ctx.share_trigger(node_ref);
    disclosure_trigger(ctx, "dialog", variant, size, class, attrs, children)
}

#[component]
/// Alert content. Escape closes it unless `close_on_escape` is `false`.
pub fn AlertDialogContent(
    #[prop(default = true)] close_on_escape: bool,
    #[prop(optional, into)] class: Option<String>,
    #[prop(attrs)] attrs: Vec<(&'static str, Attribute)>,
    children: ChildrenFn,
) -> impl IntoView {
    let ctx = use_disclosure::<AlertDialogScope>("AlertDialogContent");
    let options = ContentOptions::alert_dialog().with_close_on_escape(close_on_escape);
    let class = part_class(DIALOG_CONTENT_CLASS, class.as_deref());
    let layer = ctx.layer();
    let ids = ctx.ids();
    view! {
        <Show when=move || ctx.is_open() fallback=|| ()>
            <ModalLayer
                layer=layer
                options=options
                role="alertdialog"
                kind="alert-dialog"
                ids=ids.clone()
                class=class.clone()
                extra_attrs=attrs.clone()
                children=children.clone()
            />
        </Show>
    }
}

#[component]
/// Accessible name of the enclosing alert dialog.
pub fn AlertDialogTitle(
    #[prop(optional, into)] class: Option<String>,
    #[prop(attrs)] attrs: Vec<(&'static str, Attribute)>,
    children: Children,
) -> impl IntoView {
    let ctx = use_disclosure::<AlertDialogScope>("AlertDialogTitle");
    view! {
        <h2 id=ctx.ids().title class=part_class(DIALOG_TITLE_CLASS, class.as_deref()) {..attrs}>
            {children()}
        </h2>
    }
}

#[component]
/// Accessible description of the enclosing alert dialog.
pub fn AlertDialogDescription(
    #[prop(optional, into)] class: Option<String>,
    #[prop(attrs)] attrs: Vec<(&'static str, Attribute)>,
    children: Children,
) -> impl IntoView {
    let ctx = use_disclosure::<AlertDialogScope>("AlertDialogDescription");
    view! {
        <p
            id=ctx.ids().description
            class=part_class(DIALOG_DESCRIPTION_CLASS, class.as_deref())
            {..attrs}
        >
            {children()}
        </p>
    }
}

#[component]
/// Confirms: runs `on_click`, then closes.
pub fn AlertDialogAction(
    #[prop(optional)] variant: ButtonVariant,
    #[prop(optional, into)] class: Option<String>,
    #[prop(optional)] on_click: Option<Callback<MouseEvent>>,
    #[prop(attrs)] attrs: Vec<(&'static str, Attribute)>,
    children: Children,
) -> impl IntoView {
    let ctx = use_disclosure::<AlertDialogScope>("AlertDialogAction");
    part_button(
        variant,
        ButtonSize::Default,
        class.as_deref(),
        Some("action"),
        move |ev| {
            if let Some(on_click) = on_click.as_ref() {
                on_click.call(ev);
            }
            ctx.set_open(false);
        },
        attrs,
        children,
    )
}

#[component]
/// Dismisses without confirming.
pub fn AlertDialogCancel(
    #[prop(optional, into)] class: Option<String>,
    #[prop(attrs)] attrs: Vec<(&'static str, Attribute)>,
    children: Children,
) -> impl IntoView {
    let ctx = use_disclosure::<AlertDialogScope>("AlertDialogCancel");
    let class = part_class("mt-2 sm:mt-0", class.as_deref());
    part_button(
        ButtonVariant::Outline,
        ButtonSize::Default,
        Some(class.as_str()),
        Some("cancel"),
        move |_| ctx.set_open(false),
        attrs,
        children,
    )
}

#[component]
/// Right-aligned row for the action buttons.
pub fn AlertDialogFooter(
    #[prop(optional, into)] class: Option<String>,
    #[prop(attrs)] attrs: Vec<(&'static str, Attribute)>,
    children: Children,
) -> impl IntoView {
    view! {
        <div class=part_class(FOOTER_CLASS, class.as_deref()) data-ui-slot="footer" {..attrs}>
            {children()}
        </div>
    }
}
