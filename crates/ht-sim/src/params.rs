//! Simulation parameters and validation.

use crate::error::{SimError, SimResult};
use crate::plant::{PlantModel, TankState};
use ht_controls::{OutputMapping, PidGains};
use ht_core::{ensure_finite, ensure_positive};
use serde::{Deserialize, Serialize};

/// Fixed-step timing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Timing {
    /// Fixed time step (seconds)
    pub dt_s: f64,
    /// Total simulated time (seconds)
    pub duration_s: f64,
}

impl Timing {
    pub fn validate(&self) -> SimResult<()> {
        ensure_positive(self.dt_s, "dt_s")?;
        ensure_positive(self.duration_s, "duration_s")?;
        Ok(())
    }

    /// Number of samples, `floor(duration / dt)`.
    ///
    /// Only meaningful once [`validate`](Self::validate) has passed.
    pub fn step_count(&self) -> usize {
        (self.duration_s / self.dt_s).floor() as usize
    }
}

/// Everything one simulation run needs. Immutable for the duration of a run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    /// Tank physics
    pub plant: PlantModel,
    /// Controller gains
    pub gains: PidGains,
    /// Controller output to heat-flow mapping
    pub output: OutputMapping,
    /// Temperature setpoint (°C)
    pub setpoint_c: f64,
    /// Liquid temperature at t = 0 (°C)
    pub initial_temperature_c: f64,
    pub timing: Timing,
}

impl SimulationParameters {
    /// Check every field.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidParameters`] naming the first offending field.
    pub fn validate(&self) -> SimResult<()> {
        self.timing.validate()?;
        self.plant.validate()?;
        self.gains.validate()?;
        self.output.validate()?;
        ensure_finite(self.setpoint_c, "setpoint_c")?;
        ensure_finite(self.initial_temperature_c, "initial_temperature_c")?;
        if self.timing.step_count() == 0 {
            return Err(SimError::invalid(
                "duration_s",
                "must yield at least one step (duration_s >= dt_s)",
            ));
        }
        Ok(())
    }

    /// Validated number of samples.
    pub fn step_count(&self) -> SimResult<usize> {
        self.validate()?;
        Ok(self.timing.step_count())
    }

    /// Plant state at t = 0.
    pub fn initial_state(&self) -> TankState {
        TankState {
            temperature_c: self.initial_temperature_c,
            height_m: self.plant.initial_height_m(),
        }
    }
}
