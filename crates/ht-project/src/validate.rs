//! Scenario validation logic.

use crate::schema::{LATEST_VERSION, Scenario};
use ht_sim::{SimError, SimulationParameters};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid value: {field} ({reason})")]
    InvalidValue { field: String, reason: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },

    #[error("Too many steps: {steps} exceeds max_steps = {max_steps}")]
    TooManySteps { steps: usize, max_steps: usize },
}

impl From<SimError> for ValidationError {
    fn from(e: SimError) -> Self {
        match e {
            SimError::InvalidParameters { field, constraint } => ValidationError::InvalidValue {
                field: field.to_string(),
                reason: constraint.to_string(),
            },
        }
    }
}

/// Validate a scenario and build its simulator input.
pub fn validate_scenario(scenario: &Scenario) -> Result<SimulationParameters, ValidationError> {
    if scenario.version == 0 || scenario.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }

    if scenario.name.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "name".to_string(),
            reason: "must not be empty".to_string(),
        });
    }

    let params = scenario.to_parameters();
    let steps = params.step_count()?;
    if steps > scenario.max_steps {
        return Err(ValidationError::TooManySteps {
            steps,
            max_steps: scenario.max_steps,
        });
    }

    Ok(params)
}
