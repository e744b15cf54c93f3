//! Error types for simulation operations.

use ht_controls::ControlError;
use ht_core::HtError;
use thiserror::Error;

/// Errors raised before integration starts. Once parameters validate, a run
/// always completes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid parameters: `{field}` {constraint}")]
    InvalidParameters {
        field: &'static str,
        constraint: &'static str,
    },
}

pub type SimResult<T> = Result<T, SimError>;

impl SimError {
    pub fn invalid(field: &'static str, constraint: &'static str) -> Self {
        SimError::InvalidParameters { field, constraint }
    }

    /// Name of the offending parameter.
    pub fn field(&self) -> &'static str {
        match self {
            SimError::InvalidParameters { field, .. } => field,
        }
    }
}

impl From<HtError> for SimError {
    fn from(e: HtError) -> Self {
        match e {
            HtError::NonFinite { what, .. } => SimError::invalid(what, "must be finite"),
            HtError::OutOfRange {
                what, constraint, ..
            } => SimError::invalid(what, constraint),
        }
    }
}

impl From<ControlError> for SimError {
    fn from(e: ControlError) -> Self {
        match e {
            ControlError::InvalidParameter { field, constraint } => {
                SimError::invalid(field, constraint)
            }
        }
    }
}
