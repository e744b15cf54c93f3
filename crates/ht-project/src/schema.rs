//! Scenario schema definitions.

use ht_sim::{OutputMapping, PidGains, PlantModel, SimulationParameters, Timing};
use serde::{Deserialize, Serialize};

pub const LATEST_VERSION: u32 = 1;

/// Default caller-side cap on the number of simulated samples.
pub const DEFAULT_MAX_STEPS: usize = 10_000_000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub version: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub plant: PlantModel,
    pub controller: PidGains,
    pub output: OutputMapping,
    pub setpoint_c: f64,
    /// Defaults to the plant inlet temperature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_temperature_c: Option<f64>,
    pub timing: Timing,
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
}

fn default_max_steps() -> usize {
    DEFAULT_MAX_STEPS
}

impl Scenario {
    pub fn initial_temperature_c(&self) -> f64 {
        self.initial_temperature_c
            .unwrap_or_else(|| self.plant.inlet_temperature_c())
    }

    /// Simulator input for this scenario. Not validated.
    pub fn to_parameters(&self) -> SimulationParameters {
        SimulationParameters {
            plant: self.plant.clone(),
            gains: self.controller,
            output: self.output,
            setpoint_c: self.setpoint_c,
            initial_temperature_c: self.initial_temperature_c(),
            timing: self.timing,
        }
    }
}
