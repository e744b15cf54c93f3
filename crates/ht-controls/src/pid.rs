//! Discrete PID controller.
//!
//! Gains come in two forms:
//! - **Parallel**: `u = kp*e + ki*∫e + kd*de/dt`
//! - **Time constant**: `(kp, ti, td)`, resolved at the sample period `dt` into
//!   `ki = kp * dt / ti` and `kd = kp * td / dt`
//!
//! The integral accumulates `e * dt` without any anti-windup. Long runs with a
//! sustained error will grow the integral term without bound.

use crate::error::ControlResult;
use ht_core::{ensure_finite, ensure_non_negative, ensure_positive};
use serde::{Deserialize, Serialize};

/// PID gain configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "form")]
pub enum PidGains {
    /// Gains applied directly to error, integral and derivative.
    Parallel { kp: f64, ki: f64, kd: f64 },
    /// Proportional gain with integral and derivative time constants (seconds).
    TimeConstant { kp: f64, ti_s: f64, td_s: f64 },
}

impl PidGains {
    /// Check that every gain is usable.
    pub fn validate(&self) -> ControlResult<()> {
        match *self {
            PidGains::Parallel { kp, ki, kd } => {
                ensure_finite(kp, "kp")?;
                ensure_finite(ki, "ki")?;
                ensure_finite(kd, "kd")?;
            }
            PidGains::TimeConstant { kp, ti_s, td_s } => {
                ensure_finite(kp, "kp")?;
                ensure_positive(ti_s, "ti_s")?;
                ensure_non_negative(td_s, "td_s")?;
            }
        }
        Ok(())
    }

    /// Proportional gain.
    pub fn kp(&self) -> f64 {
        match *self {
            PidGains::Parallel { kp, .. } | PidGains::TimeConstant { kp, .. } => kp,
        }
    }

    /// Resolve to parallel gains at sample period `dt`.
    pub fn resolve(&self, dt: f64) -> ResolvedGains {
        match *self {
            PidGains::Parallel { kp, ki, kd } => ResolvedGains { kp, ki, kd },
            PidGains::TimeConstant { kp, ti_s, td_s } => ResolvedGains {
                kp,
                ki: kp * (dt / ti_s),
                kd: kp * (td_s / dt),
            },
        }
    }
}

/// Parallel-form gains as used inside the control loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedGains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
}

/// PID controller running at a fixed sample period.
#[derive(Debug, Clone, PartialEq)]
pub struct PidController {
    gains: ResolvedGains,
}

impl PidController {
    /// Create a controller for sample period `dt`.
    ///
    /// # Errors
    ///
    /// Returns error if a gain is not finite, if `ti_s <= 0` or `td_s < 0` in
    /// time-constant form, or if `dt` is not positive.
    pub fn new(gains: PidGains, dt: f64) -> ControlResult<Self> {
        ensure_positive(dt, "dt_s")?;
        gains.validate()?;
        Ok(Self::from_resolved(gains.resolve(dt)))
    }

    fn from_resolved(gains: ResolvedGains) -> Self {
        Self { gains }
    }

    pub fn gains(&self) -> ResolvedGains {
        self.gains
    }

    /// Compute the raw control signal.
    ///
    /// # Arguments
    ///
    /// * `state` - Controller state (integral and previous error)
    /// * `pv` - Process variable (measured temperature)
    /// * `sp` - Setpoint
    /// * `dt` - Sample period (seconds)
    ///
    /// # Returns
    ///
    /// Updated state and the unbounded signal `u`.
    pub fn update(&self, state: &PidState, pv: f64, sp: f64, dt: f64) -> (PidState, f64) {
        // Positive error means PV is below setpoint
        let error = sp - pv;

        let integral = state.integral + error * dt;

        // No derivative kick on the first sample
        let derivative = match state.previous_error {
            Some(prev) => (error - prev) / dt,
            None => 0.0,
        };

        let ResolvedGains { kp, ki, kd } = self.gains;
        let u = kp * error + ki * integral + kd * derivative;

        let new_state = PidState {
            integral,
            previous_error: Some(error),
        };

        (new_state, u)
    }
}

/// PID controller state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PidState {
    /// Integral accumulator (sum of `error * dt`).
    pub integral: f64,
    /// Error at the previous sample, `None` before the first update.
    pub previous_error: Option<f64>,
}
