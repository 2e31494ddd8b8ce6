use super::*;

#[component]
/// Inline show/hide region. Pass `open` to control it; otherwise `default_open` seeds it.
pub fn Collapsible(
    #[prop(optional, into)] open: Option<MaybeSignal<bool>>,
    #[prop(optional)] default_open: bool,
    #[prop(optional)] on_open_change: Option<Callback<bool>>,
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
    #[prop(optional, into)] class: Option<String>,
    #[prop(attrs)] attrs: Vec<(&'static str, Attribute)>,
    children: Children,
) -> impl IntoView {
    let ctx = provide_disclosure::<CollapsibleScope>(open, default_open, on_open_change);
    provide_context(CollapsibleDisabled(disabled));
    view! {
        <div
            class=part_class("", class.as_deref())
            data-ui-primitive="true"
            data-ui-kind="collapsible"
            data-state=move || state_token(ctx.is_open())
            data-disabled=move || disabled.get().then_some("")
            {..attrs}
        >
            {children()}
        </div>
    }
}

#[derive(Clone, Copy)]
struct CollapsibleDisabled(MaybeSignal<bool>);

#[component]
/// Toggle button for the enclosing [`Collapsible`].
pub fn CollapsibleTrigger(
    #[prop(default = ButtonVariant::Ghost)] variant: ButtonVariant,
    #[prop(optional)] size: ButtonSize,
    #[prop(optional, into)] class: Option<String>,
    #[prop(optional)] node_ref: Option<NodeRef<html::Button>>,
    #[prop(attrs)] attrs: Vec<(&'static str, Attribute)>,
    children: Children,
) -> impl IntoView {
    let ctx = use_disclosure::<CollapsibleScope>("CollapsibleTrigger");
    ctx.share_trigger(node_ref);
    let disabled = use_context::<CollapsibleDisabled>()
        .map(|CollapsibleDisabled(disabled)| disabled)
        .unwrap_or_default();
    let ids = ctx.ids();
    let trigger_ref = ctx.trigger_ref();
    view! {
        <button
            type="button"
            id=ids.trigger
            class=button_class(variant, size, class.as_deref())
            node_ref=trigger_ref
            aria-controls=ids.content
            aria-expanded=move || bool_token(ctx.is_open())
            disabled=move || disabled.get()
            data-ui-primitive="true"
            data-ui-kind="collapsible-trigger"
            data-state=move || state_token(ctx.is_open())
            on:click=move |_| {
                if !disabled.get_untracked() {
                    ctx.toggle();
                }
            }
            {..attrs}
        >
            {children()}
        </button>
    }
}

#[component]
/// Region shown only while the enclosing [`Collapsible`] is open.
pub fn CollapsibleContent(
    #[prop(optional, into)] class: Option<String>,
    #[prop(attrs)] attrs: Vec<(&'static str, Attribute)>,
    children: ChildrenFn,
) -> impl IntoView {
    let ctx = use_disclosure::<CollapsibleScope>("CollapsibleContent");
    let ids = ctx.ids();
    let class = part_class("overflow-hidden", class.as_deref());
    move || {
        ctx.presence(|| {
            view! {
                <div
                    id=ids.content.clone()
                    class=class.clone()
                    data-ui-primitive="true"
                    data-ui-kind="collapsible-content"
                    data-state="open"
                    {..attrs.clone()}
                >
                    {children()}
                </div>
            }
        })
        .into_option()
    }
}
