//! Interactive gain and setpoint overrides.
//!
//! Mirrors what the dashboard sliders allow: each slider-backed value is
//! clamped into its slider range before it reaches the simulator. The gain
//! sliders exist for time-constant gains only; parallel gains pass through.

use crate::schema::Scenario;
use crate::{ProjectError, ProjectResult};
use ht_sim::PidGains;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Closed interval a slider can produce.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderRange {
    pub min: f64,
    pub max: f64,
}

impl SliderRange {
    pub const KP: SliderRange = SliderRange {
        min: 0.01,
        max: 1.0,
    };
    pub const TI_S: SliderRange = SliderRange {
        min: 0.1,
        max: 10.0,
    };
    pub const TD_S: SliderRange = SliderRange {
        min: 0.01,
        max: 10.0,
    };
    pub const SETPOINT_C: SliderRange = SliderRange {
        min: 10.0,
        max: 100.0,
    };

    /// Clamp into the range. NaN is passed through for validation to reject.
    pub fn clamp(&self, v: f64) -> f64 {
        v.clamp(self.min, self.max)
    }
}

/// Values supplied by an interactive caller on top of a scenario.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Overrides {
    pub kp: Option<f64>,
    pub ti_s: Option<f64>,
    pub td_s: Option<f64>,
    pub ki: Option<f64>,
    pub kd: Option<f64>,
    pub setpoint_c: Option<f64>,
}

impl Overrides {
    pub fn is_empty(&self) -> bool {
        *self == Overrides::default()
    }

    /// Apply to a copy of `scenario`.
    ///
    /// `setpoint_c` is always clamped to its slider range; `kp`, `ti_s` and
    /// `td_s` are clamped when the scenario uses time-constant gains.
    /// `ti_s`/`td_s` only apply to time-constant gains and `ki`/`kd` only to
    /// parallel gains.
    pub fn apply(&self, scenario: &Scenario) -> ProjectResult<Scenario> {
        let mut out = scenario.clone();

        out.controller = match scenario.controller {
            PidGains::Parallel { kp, ki, kd } => {
                if self.ti_s.is_some() {
                    return Err(incompatible("ti_s", "parallel"));
                }
                if self.td_s.is_some() {
                    return Err(incompatible("td_s", "parallel"));
                }
                PidGains::Parallel {
                    kp: self.kp.unwrap_or(kp),
                    ki: self.ki.unwrap_or(ki),
                    kd: self.kd.unwrap_or(kd),
                }
            }
            PidGains::TimeConstant { kp, ti_s, td_s } => {
                if self.ki.is_some() {
                    return Err(incompatible("ki", "time-constant"));
                }
                if self.kd.is_some() {
                    return Err(incompatible("kd", "time-constant"));
                }
                PidGains::TimeConstant {
                    kp: self.kp.map_or(kp, |v| SliderRange::KP.clamp(v)),
                    ti_s: self.ti_s.map_or(ti_s, |v| SliderRange::TI_S.clamp(v)),
                    td_s: self.td_s.map_or(td_s, |v| SliderRange::TD_S.clamp(v)),
                }
            }
        };

        if let Some(sp) = self.setpoint_c {
            out.setpoint_c = SliderRange::SETPOINT_C.clamp(sp);
        }

        debug!(controller = ?out.controller, setpoint_c = out.setpoint_c, "applied overrides");
        Ok(out)
    }

    /// Short `key=value` summary of the values that are set.
    pub fn describe(&self) -> String {
        let fields = [
            ("Kp", self.kp),
            ("Ti", self.ti_s),
            ("Td", self.td_s),
            ("Ki", self.ki),
            ("Kd", self.kd),
            ("Tset", self.setpoint_c),
        ];
        fields
            .iter()
            .filter_map(|(k, v)| v.map(|v| format!("{k}={v}")))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn incompatible(field: &'static str, form: &'static str) -> ProjectError {
    ProjectError::IncompatibleOverride { field, form }
}
