use disclosure_headless::ContentOptions;

use super::controls::part_button;
use super::dialog::disclosure_trigger;
use super::*;
use crate::context::DisclosureLayer;

const POPOVER_CONTENT_CLASS: &str = "absolute left-0 top-full z-50 mt-2 w-72 rounded-md border bg-popover p-4 text-popover-foreground shadow-md outline-none";

#[component]
/// Non-modal floating panel root.
pub fn Popover(
    #[prop(optional, into)] open: Option<MaybeSignal<bool>>,
    #[prop(optional)] default_open: bool,
    #[prop(optional)] on_open_change: Option<Callback<bool>>,
    #[prop(optional, into)] class: Option<String>,
    #[prop(attrs)] attrs: Vec<(&'static str, Attribute)>,
    children: Children,
) -> impl IntoView {
    let ctx = provide_disclosure::<PopoverScope>(open, default_open, on_open_change);
    view! {
        <div
            class=part_class("relative inline-block", class.as_deref())
            data-ui-primitive="true"
            data-ui-kind="popover"
            data-state=move || state_token(ctx.is_open())
            {..attrs}
        >
            {children()}
        </div>
    }
}

#[component]
/// Button that toggles the enclosing [`Popover`].
pub fn PopoverTrigger(
    #[prop(default = ButtonVariant::Outline)] variant: ButtonVariant,
    #[prop(optional)] size: ButtonSize,
    #[prop(optional, into)] class: Option<String>,
    #[prop(optional)] node_ref: Option<NodeRef<html::Button>>,
    #[prop(attrs)] attrs: Vec<(&'static str, Attribute)>,
    children: Children,
) -> impl IntoView {
    let ctx = use_disclosure::<PopoverScope>("PopoverTrigger");
    ctx.share_trigger(node_ref);
    disclosure_trigger(ctx, "dialog", variant, size, class, attrs, children)
}

#[component]
/// Popover panel, closed by Escape or by pointer/focus activity outside it.
pub fn PopoverContent(
    #[prop(default = true)] close_on_escape: bool,
    #[prop(default = true)] close_on_outside_interaction: bool,
    #[prop(optional, into)] class: Option<String>,
    #[prop(attrs)] attrs: Vec<(&'static str, Attribute)>,
    children: ChildrenFn,
) -> impl IntoView {
    let ctx = use_disclosure::<PopoverScope>("PopoverContent");
    let options = ContentOptions {
        close_on_outside_interaction,
        ..ContentOptions::popover().with_close_on_escape(close_on_escape)
    };
    let class = part_class(POPOVER_CONTENT_CLASS, class.as_deref());
    let layer = ctx.layer();
    let id = ctx.ids().content;
    view! {
        <Show when=move || ctx.is_open() fallback=|| ()>
            <PopoverLayer
                layer=layer
                options=options
                id=id.clone()
                class=class.clone()
                extra_attrs=attrs.clone()
                children=children.clone()
            />
        </Show>
    }
}

#[component]
fn PopoverLayer(
    layer: DisclosureLayer,
    options: ContentOptions,
    id: String,
    class: String,
    extra_attrs: Vec<(&'static str, Attribute)>,
    children: ChildrenFn,
) -> impl IntoView {
    let content = create_node_ref::<html::Div>();
    use_content_session(layer, options, content, None, |_| {});
    view! {
        <div
            node_ref=content
            id=id
            role="dialog"
            tabindex="-1"
            class=class
            data-ui-primitive="true"
            data-ui-kind="popover-content"
            data-state="open"
            {..extra_attrs}
        >
            {children()}
        </div>
    }
}

#[component]
/// Button that closes the enclosing popover.
pub fn PopoverClose(
    #[prop(default = ButtonVariant::Ghost)] variant: ButtonVariant,
    #[prop(optional)] size: ButtonSize,
    #[prop(optional, into)] class: Option<String>,
    #[prop(attrs)] attrs: Vec<(&'static str, Attribute)>,
    children: Children,
) -> impl IntoView {
    let ctx = use_disclosure::<PopoverScope>("PopoverClose");
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
