use std::rc::Rc;

use disclosure_headless::{
    next_disclosure_ids, require_root, AccordionController, AccordionKind, ChangeHandler,
};

use super::*;
use crate::dom::{element_of, handle_roving_keydown};

const TRIGGER_SELECTOR: &str = r#"[data-ui-kind="accordion-trigger"]"#;

const ITEM_CLASS: &str = "border-b";

const TRIGGER_CLASS: &str = "flex flex-1 items-center justify-between py-4 text-sm font-medium transition-all hover:underline disabled:pointer-events-none disabled:opacity-50";

const CONTENT_CLASS: &str = "overflow-hidden pb-4 pt-0 text-sm";

#[derive(Clone, Copy)]
struct AccordionContext {
    controller: StoredValue<AccordionController>,
    open_items: RwSignal<Vec<String>>,
    id_stem: StoredValue<String>,
    item_count: StoredValue<usize>,
    root: NodeRef<html::Div>,
}

impl AccordionContext {
    fn is_open(&self, item: &str) -> bool {
        self.open_items.with(|open| open.iter().any(|value| value == item))
    }

    fn register_item(&self) -> usize {
        self.item_count
            .try_update_value(|count| {
                *count += 1;
                *count - 1
            })
            .unwrap_or_default()
    }

    fn ids(&self, index: usize) -> (String, String) {
        self.id_stem.with_value(|stem| item_ids(stem, index))
    }
}

/// Trigger and content ids of the `index`th item. Item values never reach the DOM id.
fn item_ids(stem: &str, index: usize) -> (String, String) {
    (
        format!("{stem}-item-{index}-trigger"),
        format!("{stem}-item-{index}-content"),
    )
}

#[derive(Clone, Copy)]
struct AccordionItemContext {
    value: StoredValue<String>,
    index: usize,
    disabled: MaybeSignal<bool>,
}

fn use_accordion(part: &'static str) -> AccordionContext {
    match require_root(use_context::<AccordionContext>(), part) {
        Ok(context) => context,
        Err(err) => panic!("{err} (Accordion)"),
    }
}

fn use_accordion_item(part: &'static str) -> AccordionItemContext {
    match require_root(use_context::<AccordionItemContext>(), part) {
        Ok(context) => context,
        Err(err) => panic!("{err} (AccordionItem)"),
    }
}

#[component]
/// Stack of collapsible sections. `kind` decides whether several may be open at once.
pub fn Accordion(
    #[prop(optional)] kind: AccordionKind,
    #[prop(optional, into)] value: Option<MaybeSignal<Vec<String>>>,
    #[prop(optional)] default_value: Vec<String>,
    #[prop(optional)] on_value_change: Option<Callback<Vec<String>>>,
    #[prop(optional, into)] class: Option<String>,
    #[prop(attrs)] attrs: Vec<(&'static str, Attribute)>,
    children: Children,
) -> impl IntoView {
    let on_change = on_value_change.map(|callback| {
        Rc::new(move |items: &Vec<String>| callback.call(items.clone()))
            as ChangeHandler<Vec<String>>
    });
    let controller = AccordionController::new(
        kind,
        value.as_ref().map(|value| value.get_untracked()),
        default_value,
        on_change,
    );

    let open_items = create_rw_signal(controller.open_items());
    let subscription = controller.subscribe(move |items| open_items.set(items.to_vec()));
    on_cleanup(move || drop(subscription));

    if let Some(value) = value {
        let controller = controller.clone();
        create_effect(move |_| {
            if let Err(err) = controller.sync_controlled(Some(value.get())) {
                logging::warn!("Accordion: {err}");
            }
        });
    }

    let variant = match kind {
        AccordionKind::Single { .. } => "single",
        AccordionKind::Multiple => "multiple",
    };
    let ids = next_disclosure_ids("accordion");
    let id_stem = ids
        .trigger
        .strip_suffix("-trigger")
        .unwrap_or(ids.trigger.as_str())
        .to_string();
    let root = create_node_ref::<html::Div>();
    provide_context(AccordionContext {
        controller: store_value(controller),
        open_items,
        id_stem: store_value(id_stem),
        item_count: store_value(0),
        root,
    });

    view! {
        <div
            node_ref=root
            class=part_class("w-full", class.as_deref())
            data-ui-primitive="true"
            data-ui-kind="accordion"
            data-ui-variant={variant}
            {..attrs}
        >
            {children()}
        </div>
    }
}

#[component]
/// One section of an [`Accordion`], identified by `value`.
pub fn AccordionItem(
    #[prop(into)] value: String,
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
    #[prop(optional, into)] class: Option<String>,
    #[prop(attrs)] attrs: Vec<(&'static str, Attribute)>,
    children: Children,
) -> impl IntoView {
    let accordion = use_accordion("AccordionItem");
    let state_value = value.clone();
    provide_context(AccordionItemContext {
        value: store_value(value),
        index: accordion.register_item(),
        disabled,
    });
    view! {
        <div
            class=part_class(ITEM_CLASS, class.as_deref())
            data-ui-primitive="true"
            data-ui-kind="accordion-item"
            data-state=move || state_token(accordion.is_open(&state_value))
            data-disabled=move || disabled.get().then_some("")
            {..attrs}
        >
            {children()}
        </div>
    }
}

#[component]
/// Header button toggling its [`AccordionItem`]. Arrow keys move between triggers.
pub fn AccordionTrigger(
    #[prop(optional, into)] class: Option<String>,
    #[prop(attrs)] attrs: Vec<(&'static str, Attribute)>,
    children: Children,
) -> impl IntoView {
    let accordion = use_accordion("AccordionTrigger");
    let item = use_accordion_item("AccordionTrigger");
    let value = item.value.get_value();
    let (trigger_id, content_id) = accordion.ids(item.index);
    let is_open = {
        let value = value.clone();
        move || accordion.is_open(&value)
    };
    let is_open_state = is_open.clone();
    let disabled = item.disabled;

    view! {
        <h3 class="flex">
            <button
                type="button"
                id=trigger_id
                class=part_class(TRIGGER_CLASS, class.as_deref())
                aria-controls=content_id
                aria-expanded=move || bool_token(is_open())
                disabled=move || disabled.get()
                data-ui-primitive="true"
                data-ui-kind="accordion-trigger"
                data-state=move || state_token(is_open_state())
                on:click=move |_| {
                    if !disabled.get_untracked() {
                        accordion.controller.get_value().toggle_item(&value);
                    }
                }
                on:keydown=move |ev: KeyboardEvent| {
                    if let Some(root) = element_of(accordion.root) {
                        let _ = handle_roving_keydown(&ev, &root, TRIGGER_SELECTOR);
                    }
                }
                {..attrs}
            >
                {children()}
            </button>
        </h3>
    }
}

#[component]
/// Body of its [`AccordionItem`], rendered only while the item is open.
pub fn AccordionContent(
    #[prop(optional, into)] class: Option<String>,
    #[prop(attrs)] attrs: Vec<(&'static str, Attribute)>,
    children: ChildrenFn,
) -> impl IntoView {
    let accordion = use_accordion("AccordionContent");
    let item = use_accordion_item("AccordionContent");
    let value = item.value.get_value();
    let (trigger_id, content_id) = accordion.ids(item.index);
    let class = part_class(CONTENT_CLASS, class.as_deref());
    view! {
        <Show when=move || accordion.is_open(&value) fallback=|| ()>
            <div
                id=content_id.clone()
                role="region"
                aria-labelledby=trigger_id.clone()
                class=class.clone()
                data-ui-primitive="true"
                data-ui-kind="accordion-content"
                data-state="open"
                {..attrs.clone()}
            >
                {children()}
            </div>
        </Show>
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn item_ids_are_index_based() {
        assert_eq!(
            item_ids("accordion-4", 2),
            (
                "accordion-4-item-2-trigger".to_string(),
                "accordion-4-item-2-content".to_string()
            )
        );
    }

    #[test]
    fn registered_items_get_sequential_ids() {
        let _ = create_runtime();
        let context = AccordionContext {
            controller: store_value(AccordionController::new(
                AccordionKind::Multiple,
                None,
                Vec::new(),
                None,
            )),
            open_items: create_rw_signal(Vec::new()),
            id_stem: store_value("accordion-9".to_string()),
            item_count: store_value(0),
            root: create_node_ref::<html::Div>(),
        };

        let first = context.register_item();
        let second = context.register_item();
        let (trigger, content) = context.ids(second);

        assert_eq!((first, second), (0, 1));
        assert!(!trigger.contains(char::is_whitespace));
        assert_eq!(content, "accordion-9-item-1-content");
    }
}
