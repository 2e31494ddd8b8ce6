use disclosure_headless::ContentOptions;

use super::controls::part_button;
use super::*;
use crate::context::DisclosureLayer;

const OVERLAY_CLASS: &str =
    "fixed inset-0 z-50 flex items-center justify-center bg-black/80 data-[state=open]:animate-in";

pub(super) const DIALOG_CONTENT_CLASS: &str = "relative z-50 grid w-full max-w-lg gap-4 border bg-background p-6 shadow-lg sm:rounded-lg";

pub(super) const DIALOG_TITLE_CLASS: &str = "text-lg font-semibold leading-none tracking-tight";

pub(super) const DIALOG_DESCRIPTION_CLASS: &str = "text-sm text-muted-foreground";

#[component]
/// Modal dialog root. Pass `open` to control it; otherwise `default_open` seeds it.
pub fn Dialog(
    #[prop(optional, into)] open: Option<MaybeSignal<bool>>,
    #[prop(optional)] default_open: bool,
    #[prop(optional)] on_open_change: Option<Callback<bool>>,
    children: Children,
) -> impl IntoView {
    provide_disclosure::<DialogScope>(open, default_open, on_open_change);
    children().into_view()
}

#[component]
/// Button that toggles the enclosing [`Dialog`].
pub fn DialogTrigger(
    #[prop(optional)] variant: ButtonVariant,
    #[prop(optional)] size: ButtonSize,
    #[prop(optional, into)] class: Option<String>,
    #[prop(optional)] node_ref: Option<NodeRef<html::Button>>,
    #[prop(attrs)] attrs: Vec<(&'static str, Attribute)>,
    children: Children,
) -> impl IntoView {
    let ctx = use_disclosure::<DialogScope>("DialogTrigger");
    ctx.share_trigger(node_ref);
    disclosure_trigger(ctx, "dialog", variant, size, class, attrs, children)
}

pub(super) fn disclosure_trigger<S: DisclosureScope>(
    ctx: DisclosureContext<S>,
    haspopup: &'static str,
    variant: ButtonVariant,
    size: ButtonSize,
    class: Option<String>,
    attrs: Vec<(&'static str, Attribute)>,
    children: Children,
) -> View {
    let ids = ctx.ids();
    let trigger_ref = ctx.trigger_ref();
    view! {
        <button
            type="button"
            id=ids.trigger
            class=button_class(variant, size, class.as_deref())
            node_ref=trigger_ref
            aria-haspopup=haspopup
            aria-expanded=move || bool_token(ctx.is_open())
            aria-controls=ids.content
            data-ui-primitive="true"
            data-ui-kind="trigger"
            data-state=move || state_token(ctx.is_open())
            on:click=move |_| ctx.toggle()
            {..attrs}
        >
            {children()}
        </button>
    }
    .into_view()
}

#[component]
/// Modal content: rendered only while open, with backdrop, focus trap, and scroll lock.
pub fn DialogContent(
    #[prop(default = true)] close_on_escape: bool,
    #[prop(default = true)] close_on_backdrop_click: bool,
    #[prop(optional, into)] class: Option<String>,
    #[prop(attrs)] attrs: Vec<(&'static str, Attribute)>,
    children: ChildrenFn,
) -> impl IntoView {
    let ctx = use_disclosure::<DialogScope>("DialogContent");
    let options = ContentOptions::dialog()
        .with_close_on_escape(close_on_escape)
        .with_close_on_backdrop_click(close_on_backdrop_click);
    let class = part_class(DIALOG_CONTENT_CLASS, class.as_deref());
    let layer = ctx.layer();
    let ids = ctx.ids();
    view! {
        <Show when=move || ctx.is_open() fallback=|| ()>
            <ModalLayer
                layer=layer
                options=options
                role="dialog"
                kind="dialog"
                ids=ids.clone()
                class=class.clone()
                extra_attrs=attrs.clone()
                children=children.clone()
            />
        </Show>
    }
}

#[component]
pub(super) fn ModalLayer(
    layer: DisclosureLayer,
    options: ContentOptions,
    role: &'static str,
    kind: &'static str,
    ids: disclosure_headless::DisclosureIds,
    class: String,
    extra_attrs: Vec<(&'static str, Attribute)>,
    children: ChildrenFn,
) -> impl IntoView {
    let backdrop = create_node_ref::<html::Div>();
    let content = create_node_ref::<html::Div>();
    use_content_session(layer, options, content, Some(backdrop), |_| {});
    view! {
        <div
            node_ref=backdrop
            class=OVERLAY_CLASS
            data-ui-primitive="true"
            data-ui-kind="overlay"
            data-state="open"
        >
            <div
                node_ref=content
                id=ids.content
                role=role
                aria-modal="true"
                aria-labelledby=ids.title
                aria-describedby=ids.description
                tabindex="-1"
                class=class
                data-ui-primitive="true"
                data-ui-kind=kind
                data-state="open"
                {..extra_attrs}
            >
                {children()}
            </div>
        </div>
    }
}

#[component]
/// Accessible name of the enclosing dialog.
pub fn DialogTitle(
    #[prop(optional, into)] class: Option<String>,
    #[prop(attrs)] attrs: Vec<(&'static str, Attribute)>,
    children: Children,
) -> impl IntoView {
    let ctx = use_disclosure::<DialogScope>("DialogTitle");
    view! {
        <h2 id=ctx.ids().title class=part_class(DIALOG_TITLE_CLASS, class.as_deref()) {..attrs}>
            {children()}
        </h2>
    }
}

#[component]
/// Accessible description of the enclosing dialog.
pub fn DialogDescription(
    #[prop(optional, into)] class: Option<String>,
    #[prop(attrs)] attrs: Vec<(&'static str, Attribute)>,
    children: Children,
) -> impl IntoView {
    let ctx = use_disclosure::<DialogScope>("DialogDescription");
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
/// Button that closes the enclosing dialog.
pub fn DialogClose(
    #[prop(default = ButtonVariant::Outline)] variant: ButtonVariant,
    #[prop(optional)] size: ButtonSize,
    #[prop(optional, into)] class: Option<String>,
    #[prop(attrs)] attrs: Vec<(&'static str, Attribute)>,
    children: Children,
) -> impl IntoView {
    let ctx = use_disclosure::<DialogScope>("DialogClose");
    part_button(
        variant,
        size,
        class.as_deref(),
        Some("close"),
        move |_| ctx.set_open(false),
        attrs,
        children,
    )
}
