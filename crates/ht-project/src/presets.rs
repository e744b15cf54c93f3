//! Built-in scenarios for the three tank dashboards.

use crate::ProjectError;
use crate::schema::{DEFAULT_MAX_STEPS, LATEST_VERSION, Scenario};
use ht_core::constants::{STEAM_LATENT_HEAT_J_PER_KG, WATER_CP_J_PER_KG_K, WATER_DENSITY_KG_M3};
use ht_sim::{
    FlowThroughTank, LevelTracking, OutputMapping, PidGains, PlantModel, Timing, WellMixedTank,
};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Steam-heated tank, time-constant gains, actuator rescale.
    SteamHeated,
    /// Inlet/outlet flow tank, parallel gains, direct saturation.
    FlowThrough,
    /// Flow-through tank with level tracking.
    LevelTracking,
}

impl Preset {
    pub const ALL: [Preset; 3] = [
        Preset::SteamHeated,
        Preset::FlowThrough,
        Preset::LevelTracking,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::SteamHeated => "steam-heated",
            Preset::FlowThrough => "flow-through",
            Preset::LevelTracking => "level-tracking",
        }
    }

    pub fn scenario(&self) -> Scenario {
        match self {
            Preset::SteamHeated => steam_heated(),
            Preset::FlowThrough => flow_through(None),
            Preset::LevelTracking => flow_through(Some(LevelTracking {
                initial_height_m: 1.0,
            })),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = ProjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| ProjectError::UnknownPreset {
                name: s.to_string(),
            })
    }
}

fn steam_heated() -> Scenario {
    Scenario {
        version: LATEST_VERSION,
        name: "Steam heated tank".to_string(),
        description: Some(
            "Constant-volume tank heated by condensing steam; controller output drives the steam valve."
                .to_string(),
        ),
        plant: PlantModel::WellMixed(WellMixedTank {
            volume_m3: 5.0,
            through_flow_m3_s: 0.1,
            latent_heat_j_per_kg: STEAM_LATENT_HEAT_J_PER_KG,
            density_kg_m3: WATER_DENSITY_KG_M3,
            cp_j_per_kg_k: WATER_CP_J_PER_KG_K,
            inlet_temperature_c: 15.0,
        }),
        controller: PidGains::TimeConstant {
            kp: 0.05,
            ti_s: 1.0,
            td_s: 0.1,
        },
        output: OutputMapping::ActuatorRescale {
            u_min: 0.0,
            u_max: 10.0,
            q_min: 0.0,
            q_max: 10.0,
        },
        setpoint_c: 40.0,
        initial_temperature_c: None,
        timing: Timing {
            dt_s: 0.1,
            duration_s: 3600.0,
        },
        max_steps: DEFAULT_MAX_STEPS,
    }
}

fn flow_through(level: Option<LevelTracking>) -> Scenario {
    let (name, description, area_m2, inlet_flow) = match level {
        Some(_) => (
            "Filling tank with level",
            "Directly heated tank filling slowly; height tracked alongside temperature.",
            10.0,
            2.02,
        ),
        None => (
            "Flow-through tank",
            "Directly heated tank with balanced inlet and outlet streams.",
            1.0,
            2.0,
        ),
    };
    Scenario {
        version: LATEST_VERSION,
        name: name.to_string(),
        description: Some(description.to_string()),
        plant: PlantModel::FlowThrough(FlowThroughTank {
            area_m2,
            density_kg_m3: WATER_DENSITY_KG_M3,
            cp_j_per_kg_k: WATER_CP_J_PER_KG_K,
            inlet_flow,
            outlet_flow: 2.0,
            inlet_temperature_c: 15.0,
            outlet_temperature_c: 15.0,
            level,
        }),
        controller: PidGains::Parallel {
            kp: 20_000.0,
            ki: 200.0,
            kd: 0.0,
        },
        output: OutputMapping::Saturate {
            out_min: 0.0,
            out_max: 200_000.0,
        },
        setpoint_c: 40.0,
        initial_temperature_c: None,
        timing: Timing {
            dt_s: 0.5,
            duration_s: 1800.0,
        },
        max_steps: DEFAULT_MAX_STEPS,
    }
}
