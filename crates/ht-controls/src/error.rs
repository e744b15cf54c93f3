//! Error types for control configuration.

use ht_core::HtError;
use thiserror::Error;

/// Result type for control operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors that can occur when configuring a controller or output mapping.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// A controller parameter violates its constraint.
    #[error("Invalid parameter `{field}`: {constraint}")]
    InvalidParameter {
        field: &'static str,
        constraint: &'static str,
    },
}

impl From<HtError> for ControlError {
    fn from(e: HtError) -> Self {
        match e {
            HtError::NonFinite { what, .. } => ControlError::InvalidParameter {
                field: what,
                constraint: "must be finite",
            },
            HtError::OutOfRange {
                what, constraint, ..
            } => ControlError::InvalidParameter {
                field: what,
                constraint,
            },
        }
    }
}
