//! Class-name composition with fixed layer precedence.
//!
//! Component classes are built from five layers, always applied in this order:
//! base, variant, size, conditional state, caller override. When two layers set
//! the same utility (for example `px-4` then `px-8`), the later layer wins.

const DISPLAY: &[&str] = &[
    "block",
    "inline-block",
    "inline",
    "flex",
    "inline-flex",
    "grid",
    "inline-grid",
    "hidden",
    "contents",
    "table",
];

const POSITION: &[&str] = &["static", "fixed", "absolute", "relative", "sticky"];

const TEXT_SIZES: &[&str] = &[
    "xs", "sm", "base", "lg", "xl", "2xl", "3xl", "4xl", "5xl", "6xl", "7xl", "8xl", "9xl",
];

const TEXT_ALIGN: &[&str] = &["left", "center", "right", "justify", "start", "end"];

const FONT_WEIGHTS: &[&str] = &[
    "thin",
    "extralight",
    "light",
    "normal",
    "medium",
    "semibold",
    "bold",
    "extrabold",
    "black",
];

// Longer prefixes first so `min-w-` never matches as `m-`.
const PREFIX_GROUPS: &[(&str, &str)] = &[
    ("min-w-", "min-w"),
    ("max-w-", "max-w"),
    ("min-h-", "min-h"),
    ("max-h-", "max-h"),
    ("gap-x-", "gap-x"),
    ("gap-y-", "gap-y"),
    ("gap-", "gap"),
    ("px-", "px"),
    ("py-", "py"),
    ("pt-", "pt"),
    ("pr-", "pr"),
    ("pb-", "pb"),
    ("pl-", "pl"),
    ("p-", "p"),
    ("mx-", "mx"),
    ("my-", "my"),
    ("mt-", "mt"),
    ("mr-", "mr"),
    ("mb-", "mb"),
    ("ml-", "ml"),
    ("m-", "m"),
    ("size-", "size"),
    ("w-", "w"),
    ("h-", "h"),
    ("opacity-", "opacity"),
    ("z-", "z"),
    ("leading-", "leading"),
    ("tracking-", "tracking"),
    ("items-", "items"),
    ("justify-", "justify"),
    ("cursor-", "cursor"),
    ("bg-", "bg"),
    ("outline-", "outline"),
];

fn utility_group(utility: &str) -> Option<String> {
    if DISPLAY.contains(&utility) {
        return Some("display".to_string());
    }
    if POSITION.contains(&utility) {
        return Some("position".to_string());
    }
    if utility == "rounded" || utility.starts_with("rounded-") {
        let side = utility
            .strip_prefix("rounded-")
            .filter(|rest| {
                ["t-", "r-", "b-", "l-", "tl-", "tr-", "bl-", "br-"]
                    .iter()
                    .any(|side| rest.starts_with(side))
            })
            .and_then(|rest| rest.split('-').next());
        return Some(match side {
            Some(side) => format!("rounded-{side}"),
            None => "rounded".to_string(),
        });
    }
    if utility == "shadow" || utility.starts_with("shadow-") {
        return Some("shadow".to_string());
    }
    if let Some(rest) = utility.strip_prefix("text-") {
        let group = if TEXT_SIZES.contains(&rest) {
            "text-size"
        } else if TEXT_ALIGN.contains(&rest) {
            "text-align"
        } else {
            "text-color"
        };
        return Some(group.to_string());
    }
    if let Some(rest) = utility.strip_prefix("font-") {
        let group = if FONT_WEIGHTS.contains(&rest) {
            "font-weight"
        } else {
            "font-family"
        };
        return Some(group.to_string());
    }
    if utility == "border" {
        return Some("border-width".to_string());
    }
    if let Some(rest) = utility.strip_prefix("border-") {
        if rest.chars().all(|ch| ch.is_ascii_digit()) {
            return Some("border-width".to_string());
        }
        if ["x", "y", "t", "r", "b", "l"]
            .iter()
            .any(|side| rest == *side || rest.starts_with(&format!("{side}-")))
        {
            return None;
        }
        return Some("border-color".to_string());
    }
    PREFIX_GROUPS
        .iter()
        .find(|(prefix, _)| utility.starts_with(prefix))
        .map(|(_, group)| group.to_string())
}

/// Conflict key: modifiers (`hover:`, `md:` ...) plus the utility group.
fn conflict_key(token: &str) -> String {
    let (modifiers, utility) = match token.rfind(':') {
        Some(index) => token.split_at(index + 1),
        None => ("", token),
    };
    let utility = utility.trim_start_matches('!').trim_start_matches('-');
    match utility_group(utility) {
        Some(group) => format!("{modifiers}{group}"),
        None => token.to_string(),
    }
}

/// Merges class strings left to right; later conflicting utilities replace earlier ones.
pub fn merge_classes(layers: &[&str]) -> String {
    let mut merged: Vec<(String, &str)> = Vec::new();
    for token in layers.iter().flat_map(|layer| layer.split_whitespace()) {
        let key = conflict_key(token);
        merged.retain(|(existing, _)| *existing != key);
        merged.push((key, token));
    }
    merged
        .into_iter()
        .map(|(_, token)| token)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Layered class builder used by every styled component.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList {
    base: String,
    variant: String,
    size: String,
    states: Vec<String>,
    caller: String,
}

impl ClassList {
    /// Starts from the component's base classes.
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            ..Self::default()
        }
    }

    /// Sets the variant layer.
    pub fn variant(mut self, classes: impl Into<String>) -> Self {
        self.variant = classes.into();
        self
    }

    /// Sets the size layer.
    pub fn size(mut self, classes: impl Into<String>) -> Self {
        self.size = classes.into();
        self
    }

    /// Adds conditional state classes when `active`.
    pub fn state(mut self, active: bool, classes: impl Into<String>) -> Self {
        if active {
            self.states.push(classes.into());
        }
        self
    }

    /// Sets the caller override layer.
    pub fn caller(mut self, classes: Option<&str>) -> Self {
        self.caller = classes.unwrap_or_default().to_string();
        self
    }

    /// Resolves the final class string.
    pub fn build(&self) -> String {
        let mut layers = vec![self.base.as_str(), self.variant.as_str(), self.size.as_str()];
        layers.extend(self.states.iter().map(String::as_str));
        layers.push(self.caller.as_str());
        merge_classes(&layers)
    }
}
