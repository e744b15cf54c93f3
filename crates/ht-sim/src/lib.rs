//! Heated stirred tank simulator under PID temperature control.
//!
//! Provides:
//! - Validated simulation parameters (plant, gains, output mapping, timing)
//! - Two plant models: steam-heated well-mixed tank and flow-through tank with optional level
//! - Fixed-step forward Euler integration
//! - A pure `simulate` driver returning aligned time series
//! - Parallel gain sweeps over independent runs

pub mod error;
pub mod integrator;
pub mod model;
pub mod params;
pub mod plant;
pub mod sim;
pub mod sweep;
pub mod trace;

pub use error::{SimError, SimResult};
pub use integrator::{ForwardEuler, Integrator};
pub use model::TransientModel;
pub use params::{SimulationParameters, Timing};
pub use plant::{FlowThroughTank, LevelTracking, PlantModel, TankState, WellMixedTank};
pub use sim::simulate;
pub use sweep::{SweepPoint, kp_range, sweep};
pub use trace::{SimulationTrace, TraceSample};

pub use ht_controls::{OutputMapping, PidGains};
