//! Arrow / Home / End navigation across a list of menu items.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Keys that move roving focus.
pub enum RovingKey {
    /// `ArrowDown`: next item, wrapping.
    Next,
    /// `ArrowUp`: previous item, wrapping.
    Previous,
    /// `Home`: first item.
    First,
    /// `End`: last item.
    Last,
}

impl RovingKey {
    /// Maps a DOM `KeyboardEvent.key` value.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowDown" => Some(Self::Next),
            "ArrowUp" => Some(Self::Previous),
            "Home" => Some(Self::First),
            "End" => Some(Self::Last),
            _ => None,
        }
    }
}

/// Index to focus after `key`, given the currently focused index (if any) and item count.
///
/// Returns `None` for an empty list.
pub fn next_index(current: Option<usize>, len: usize, key: RovingKey) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let last = len - 1;
    Some(match (key, current) {
        (RovingKey::First, _) => 0,
        (RovingKey::Last, _) => last,
        (RovingKey::Next, None) => 0,
        (RovingKey::Previous, None) => last,
        (RovingKey::Next, Some(index)) => (index.min(last) + 1) % len,
        (RovingKey::Previous, Some(index)) => (index.min(last) + len - 1) % len,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn arrows_wrap_around() {
        assert_eq!(next_index(Some(2), 3, RovingKey::Next), Some(0));
        assert_eq!(next_index(Some(0), 3, RovingKey::Previous), Some(2));
        assert_eq!(next_index(Some(1), 3, RovingKey::Next), Some(2));
    }

    #[test]
    fn home_and_end_jump_to_edges() {
        assert_eq!(next_index(Some(1), 4, RovingKey::First), Some(0));
        assert_eq!(next_index(None, 4, RovingKey::Last), Some(3));
    }

    #[test]
    fn unfocused_list_starts_at_an_edge() {
        assert_eq!(next_index(None, 2, RovingKey::Next), Some(0));
        assert_eq!(next_index(None, 2, RovingKey::Previous), Some(1));
    }

    #[test]
    fn empty_list_has_no_target() {
        assert_eq!(next_index(None, 0, RovingKey::Next), None);
    }

    #[test]
    fn unrelated_keys_are_ignored() {
        assert_eq!(RovingKey::from_key("Enter"), None);
        assert_eq!(RovingKey::from_key("End"), Some(RovingKey::Last));
    }
}
