use thiserror::Error;

use crate::Controllability;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Failures raised by disclosure state holders and compound-component lookup.
pub enum DisclosureError {
    /// A compound sub-component was rendered without its root in scope.
    #[error("`{part}` must be used inside its root compound component")]
    OutsideRoot {
        /// Name of the sub-component that performed the lookup.
        part: &'static str,
    },
    /// An external update tried to flip a state holder between controlled and uncontrolled.
    #[error("state holder created as {from:?} cannot switch to {to:?} mid-lifecycle")]
    ModeSwitch {
        /// Mode fixed at construction.
        from: Controllability,
        /// Mode implied by the rejected update.
        to: Controllability,
    },
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn outside_root_names_the_part() {
        let err = DisclosureError::OutsideRoot {
            part: "DialogTrigger",
        };
        assert_eq!(
            err.to_string(),
            "`DialogTrigger` must be used inside its root compound component"
        );
    }
}
