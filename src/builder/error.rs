//! Declaration errors for machine builders.

use thiserror::Error;

/// A single rejected declaration.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BuildError {
    #[error("State {state} has an empty name. State::name() must identify its node")]
    UnnamedState { state: String },

    #[error("Event class declared on state '{state}' has an empty tag")]
    UntaggedEventClass { state: String },

    #[error("Rule #{rule} has an empty source state name")]
    UnnamedRuleSource { rule: usize },
}

/// Every problem found in a builder's declarations.
///
/// Returned by `build()` instead of stopping at the first bad call.
#[derive(Debug, Error)]
#[error("{} invalid declaration(s): {}", .errors.len(), summarize(.errors))]
pub struct DeclarationError {
    pub errors: Vec<BuildError>,
}

fn summarize(errors: &[BuildError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
