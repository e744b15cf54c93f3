use thiserror::Error;

pub type HtResult<T> = Result<T, HtError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HtError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Value out of range for {what}: {value} ({constraint})")]
    OutOfRange {
        what: &'static str,
        value: f64,
        constraint: &'static str,
    },
}

impl HtError {
    /// Name of the offending quantity.
    pub fn what(&self) -> &'static str {
        match self {
            Self::NonFinite { what, .. } | Self::OutOfRange { what, .. } => what,
        }
    }
}
