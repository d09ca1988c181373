//! Simulation error types.
//!
//! Nothing in the core is fatal: parameter input is clamped, and these errors
//! only report commands that were rejected or text that could not be parsed.
//! The controller logs them and carries on.

use std::fmt;

use crate::simulation::controller::RunState;

#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// A run-state command was issued from a state that does not allow it.
    InvalidTransition {
        from: RunState,
        command: &'static str,
    },

    /// Parameter name not recognised by [`crate::ParameterChange::parse`].
    UnknownParameter { name: String },

    /// Parameter value could not be parsed for the named parameter.
    InvalidValue { name: String, value: String },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidTransition { from, command } => {
                write!(f, "cannot {} while {:?}", command, from)
            }
            SimError::UnknownParameter { name } => write!(f, "unknown parameter '{}'", name),
            SimError::InvalidValue { name, value } => {
                write!(f, "invalid value '{}' for parameter '{}'", value, name)
            }
        }
    }
}

impl std::error::Error for SimError {}

/// Convenience alias: a `Result` using `SimError` as the error type.
pub type SimResult<T> = Result<T, SimError>;
