//! Configuration error types.
//!
//! Gameplay itself never fails: rejected actions (firing while reloading,
//! ticking a stopped game) are silent no-ops. Only loading a [`Tuning`]
//! can go wrong.
//!
//! [`Tuning`]: crate::tuning::Tuning

use std::fmt;

/// Errors raised while loading or validating game balance data
#[derive(Debug)]
pub enum TuningError {
    /// The tuning document is not valid JSON for [`crate::Tuning`]
    Parse(serde_json::Error),

    /// A field holds a value the simulation cannot run with
    InvalidValue {
        /// Name of the offending field
        field: &'static str,
        /// What the field must satisfy
        reason: &'static str,
    },
}

impl TuningError {
    pub(crate) fn invalid(field: &'static str, reason: &'static str) -> Self {
        Self::InvalidValue { field, reason }
    }
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Parse(err) => write!(f, "failed to parse tuning: {err}"),
            TuningError::InvalidValue { field, reason } => {
                write!(f, "invalid tuning value for `{field}`: {reason}")
            }
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Parse(err) => Some(err),
            TuningError::InvalidValue { .. } => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(err: serde_json::Error) -> Self {
        TuningError::Parse(err)
    }
}
