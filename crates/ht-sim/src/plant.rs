//! Lumped tank models with energy (and optionally level) balance.
//!
//! Two plants are available:
//! - [`WellMixedTank`]: constant volume heated by condensing steam, with a
//!   through-flow of inlet liquid
//! - [`FlowThroughTank`]: direct heat input with separate inlet and outlet
//!   flows, optionally tracking liquid height

use crate::error::SimResult;
use crate::model::TransientModel;
use ht_core::{
    Time, ensure_finite, ensure_non_negative, ensure_positive, m3, m3ps, residence_time,
};
use serde::{Deserialize, Serialize};

/// State of the tank contents.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TankState {
    /// Liquid temperature (°C)
    pub temperature_c: f64,
    /// Liquid height (m), when the level is modeled
    pub height_m: Option<f64>,
}

/// Steam-heated tank at constant volume.
///
/// Energy balance:
/// `dT/dt = (λ·Q/(ρ·Cp) + F·(T_in - T)) / V`
/// where `Q` is the steam mass flow (kg/s).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WellMixedTank {
    /// Liquid volume (m³)
    pub volume_m3: f64,
    /// Through-flow of liquid (m³/s)
    pub through_flow_m3_s: f64,
    /// Latent heat released by the steam (J/kg)
    pub latent_heat_j_per_kg: f64,
    /// Liquid density (kg/m³)
    pub density_kg_m3: f64,
    /// Liquid specific heat (J/(kg·K))
    pub cp_j_per_kg_k: f64,
    /// Inlet liquid temperature (°C)
    pub inlet_temperature_c: f64,
}

impl WellMixedTank {
    pub fn validate(&self) -> SimResult<()> {
        ensure_positive(self.volume_m3, "volume_m3")?;
        ensure_non_negative(self.through_flow_m3_s, "through_flow_m3_s")?;
        ensure_positive(self.latent_heat_j_per_kg, "latent_heat_j_per_kg")?;
        ensure_positive(self.density_kg_m3, "density_kg_m3")?;
        ensure_positive(self.cp_j_per_kg_k, "cp_j_per_kg_k")?;
        ensure_finite(self.inlet_temperature_c, "inlet_temperature_c")?;
        Ok(())
    }

    /// Temperature rate of change (K/s) for heat-flow command `q`.
    pub fn dtemp_dt(&self, temperature_c: f64, q: f64) -> f64 {
        let heating = self.latent_heat_j_per_kg * q / (self.density_kg_m3 * self.cp_j_per_kg_k);
        let mixing = self.through_flow_m3_s * (self.inlet_temperature_c - temperature_c);
        (heating + mixing) / self.volume_m3
    }

    /// Time for the through-flow to replace the tank contents once, the
    /// open-loop time constant. `None` without through-flow.
    pub fn residence_time(&self) -> Option<Time> {
        (self.through_flow_m3_s > 0.0)
            .then(|| residence_time(m3(self.volume_m3), m3ps(self.through_flow_m3_s)))
    }
}

/// Optional level balance for a [`FlowThroughTank`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelTracking {
    /// Liquid height at t = 0 (m)
    pub initial_height_m: f64,
}

/// Tank with independent inlet and outlet streams.
///
/// Energy balance:
/// `dT/dt = (F_in/ρ)·(T_in - T) + Q/(ρ·Cp) - (F_out/ρ)·(T - T_out)`
///
/// Level balance (when tracked):
/// `dh/dt = (F_in - F_out) / A`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlowThroughTank {
    /// Cross-sectional area (m²)
    pub area_m2: f64,
    /// Liquid density (kg/m³)
    pub density_kg_m3: f64,
    /// Liquid specific heat (J/(kg·K))
    pub cp_j_per_kg_k: f64,
    /// Inlet flow rate
    pub inlet_flow: f64,
    /// Outlet flow rate
    pub outlet_flow: f64,
    /// Inlet temperature (°C)
    pub inlet_temperature_c: f64,
    /// Outlet reference temperature (°C)
    pub outlet_temperature_c: f64,
    /// Level balance, if modeled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<LevelTracking>,
}

impl FlowThroughTank {
    pub fn validate(&self) -> SimResult<()> {
        ensure_positive(self.area_m2, "area_m2")?;
        ensure_positive(self.density_kg_m3, "density_kg_m3")?;
        ensure_positive(self.cp_j_per_kg_k, "cp_j_per_kg_k")?;
        ensure_non_negative(self.inlet_flow, "inlet_flow")?;
        ensure_non_negative(self.outlet_flow, "outlet_flow")?;
        ensure_finite(self.inlet_temperature_c, "inlet_temperature_c")?;
        ensure_finite(self.outlet_temperature_c, "outlet_temperature_c")?;
        if let Some(level) = &self.level {
            ensure_non_negative(level.initial_height_m, "initial_height_m")?;
        }
        Ok(())
    }

    /// Temperature rate of change (K/s) for heat-flow command `q`.
    pub fn dtemp_dt(&self, temperature_c: f64, q: f64) -> f64 {
        let rho = self.density_kg_m3;
        (self.inlet_flow / rho) * (self.inlet_temperature_c - temperature_c)
            + q / (rho * self.cp_j_per_kg_k)
            - (self.outlet_flow / rho) * (temperature_c - self.outlet_temperature_c)
    }

    /// Level rate of change (m/s).
    pub fn dheight_dt(&self) -> f64 {
        (self.inlet_flow - self.outlet_flow) / self.area_m2
    }
}

/// Plant model selection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model")]
pub enum PlantModel {
    WellMixed(WellMixedTank),
    FlowThrough(FlowThroughTank),
}

impl PlantModel {
    pub fn validate(&self) -> SimResult<()> {
        match self {
            PlantModel::WellMixed(tank) => tank.validate(),
            PlantModel::FlowThrough(tank) => tank.validate(),
        }
    }

    /// Inlet temperature, the natural initial condition for a filling tank.
    pub fn inlet_temperature_c(&self) -> f64 {
        match self {
            PlantModel::WellMixed(tank) => tank.inlet_temperature_c,
            PlantModel::FlowThrough(tank) => tank.inlet_temperature_c,
        }
    }

    /// Initial height, if the level is modeled.
    pub fn initial_height_m(&self) -> Option<f64> {
        match self {
            PlantModel::WellMixed(_) => None,
            PlantModel::FlowThrough(tank) => tank.level.map(|l| l.initial_height_m),
        }
    }

    pub fn tracks_height(&self) -> bool {
        self.initial_height_m().is_some()
    }

    /// Open-loop time constant, when the model has one.
    pub fn residence_time(&self) -> Option<Time> {
        match self {
            PlantModel::WellMixed(tank) => tank.residence_time(),
            PlantModel::FlowThrough(_) => None,
        }
    }
}

impl TransientModel for PlantModel {
    type State = TankState;
    type Input = f64;

    fn rhs(&self, x: &TankState, q: f64) -> TankState {
        match self {
            PlantModel::WellMixed(tank) => TankState {
                temperature_c: tank.dtemp_dt(x.temperature_c, q),
                height_m: None,
            },
            PlantModel::FlowThrough(tank) => TankState {
                temperature_c: tank.dtemp_dt(x.temperature_c, q),
                height_m: x.height_m.map(|_| tank.dheight_dt()),
            },
        }
    }

    fn add(&self, a: &TankState, b: &TankState) -> TankState {
        TankState {
            temperature_c: a.temperature_c + b.temperature_c,
            height_m: match (a.height_m, b.height_m) {
                (Some(ha), Some(hb)) => Some(ha + hb),
                _ => None,
            },
        }
    }

    fn scale(&self, a: &TankState, scale: f64) -> TankState {
        TankState {
            temperature_c: a.temperature_c * scale,
            height_m: a.height_m.map(|h| h * scale),
        }
    }
}
