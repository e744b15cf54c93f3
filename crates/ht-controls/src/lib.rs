//! Discrete PID control primitives for heattank.
//!
//! The controller runs in sampled mode at the simulation step. It produces an
//! unbounded control signal `u`; an [`OutputMapping`] then turns `u` into the
//! bounded heat-flow command that drives the plant.
//!
//! # Design Principles
//!
//! - **Functional state**: `update` takes the previous state and returns the next one
//! - **Faithful integral**: the integral term is never clamped or reset
//! - **Two mapping policies**: direct saturation or actuator-range rescaling

pub mod error;
pub mod output;
pub mod pid;

pub use error::{ControlError, ControlResult};
pub use output::OutputMapping;
pub use pid::{PidController, PidGains, PidState, ResolvedGains};
