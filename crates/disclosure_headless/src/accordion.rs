//! Multi-item disclosure state for accordions.

use serde::{Deserialize, Serialize};

use crate::{ChangeHandler, Controllability, ControllableState, DisclosureError, Subscription};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
/// How many accordion items may be open at once.
pub enum AccordionKind {
    /// At most one item open.
    Single {
        /// Whether the open item may be closed, leaving none open.
        collapsible: bool,
    },
    /// Items open and close independently.
    Multiple,
}

impl Default for AccordionKind {
    fn default() -> Self {
        Self::Single { collapsible: false }
    }
}

/// Open-item set for one accordion root.
#[derive(Debug, Clone)]
pub struct AccordionController {
    kind: AccordionKind,
    state: ControllableState<Vec<String>>,
}

impl AccordionController {
    /// Creates a controller. `value` selects controlled mode; otherwise `default_value`
    /// seeds the open items.
    pub fn new(
        kind: AccordionKind,
        value: Option<Vec<String>>,
        default_value: Vec<String>,
        on_value_change: Option<ChangeHandler<Vec<String>>>,
    ) -> Self {
        Self {
            kind,
            state: ControllableState::new(value, default_value, on_value_change),
        }
    }

    /// Accordion kind fixed at construction.
    pub fn kind(&self) -> AccordionKind {
        self.kind
    }

    /// Mode fixed at construction.
    pub fn mode(&self) -> Controllability {
        self.state.mode()
    }

    /// Currently open item values.
    pub fn open_items(&self) -> Vec<String> {
        self.state.get()
    }

    /// Whether `item` is open.
    pub fn is_item_open(&self, item: &str) -> bool {
        self.state.with(|open| open.iter().any(|value| value == item))
    }

    /// Requests opening or closing `item` according to the accordion kind.
    pub fn toggle_item(&self, item: &str) {
        let current = self.state.get();
        let is_open = current.iter().any(|value| value == item);
        let next = match (self.kind, is_open) {
            (AccordionKind::Single { collapsible: true }, true) => Vec::new(),
            (AccordionKind::Single { collapsible: false }, true) => return,
            (AccordionKind::Single { .. }, false) => vec![item.to_string()],
            (AccordionKind::Multiple, true) => current
                .into_iter()
                .filter(|value| value != item)
                .collect(),
            (AccordionKind::Multiple, false) => {
                let mut next = current;
                next.push(item.to_string());
                next
            }
        };
        self.state.request_change(next);
    }

    /// Applies the caller's controlled value.
    ///
    /// # Errors
    ///
    /// Returns [`DisclosureError::ModeSwitch`] if the root changes controllability.
    pub fn sync_controlled(&self, value: Option<Vec<String>>) -> Result<(), DisclosureError> {
        self.state.sync_controlled(value)
    }

    /// Observes committed open-item changes.
    pub fn subscribe(&self, f: impl Fn(&[String]) + 'static) -> Subscription<Vec<String>> {
        self.state.subscribe(move |items| f(items))
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use pretty_assertions::assert_eq;

    use super::*;

    fn items(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn single_replaces_open_item() {
        let accordion = AccordionController::new(AccordionKind::default(), None, items(&["a"]), None);
        accordion.toggle_item("b");
        assert_eq!(accordion.open_items(), items(&["b"]));
        assert!(!accordion.is_item_open("a"));
    }

    #[test]
    fn single_non_collapsible_keeps_last_item_open() {
        let accordion = AccordionController::new(AccordionKind::default(), None, items(&["a"]), None);
        accordion.toggle_item("a");
        assert_eq!(accordion.open_items(), items(&["a"]));
    }

    #[test]
    fn single_collapsible_can_close_everything() {
        let accordion = AccordionController::new(
            AccordionKind::Single { collapsible: true },
            None,
            items(&["a"]),
            None,
        );
        accordion.toggle_item("a");
        assert!(accordion.open_items().is_empty());
    }

    #[test]
    fn multiple_toggles_independently() {
        let accordion = AccordionController::new(AccordionKind::Multiple, None, Vec::new(), None);
        accordion.toggle_item("a");
        accordion.toggle_item("b");
        accordion.toggle_item("a");
        assert_eq!(accordion.open_items(), items(&["b"]));
    }

    #[test]
    fn controlled_accordion_only_reports() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let accordion = AccordionController::new(
            AccordionKind::Multiple,
            Some(Vec::new()),
            Vec::new(),
            Some(Rc::new(move |value: &Vec<String>| {
                sink.borrow_mut().push(value.clone())
            })),
        );

        accordion.toggle_item("a");

        assert!(accordion.open_items().is_empty());
        assert_eq!(*seen.borrow(), vec![items(&["a"])]);
    }

    #[test]
    fn kind_parses_from_config() {
        let kind: AccordionKind =
            serde_json::from_str(r#"{"type":"single","collapsible":true}"#).expect("parse kind");
        assert_eq!(kind, AccordionKind::Single { collapsible: true });
    }
}
