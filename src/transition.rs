//! State transitions

use thiserror::Error;

/// A state machine refused an action from the current state.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("cannot {action} {entity} in state {from}")]
pub struct TransitionError {
    /// The kind of record being transitioned, e.g. `"change request"`.
    pub entity: &'static str,

    /// Name of the state the record was in.
    pub from: &'static str,

    /// The refused action.
    pub action: &'static str,
}

impl TransitionError {
    /// Describe a refused transition.
    pub const fn new(entity: &'static str, from: &'static str, action: &'static str) -> Self {
        Self {
            entity,
            from,
            action,
        }
    }
}
