//! Mapping from raw controller signal to bounded heat-flow command.
//!
//! Two policies are supported:
//! - **Saturate**: clamp `u` directly into `[out_min, out_max]`
//! - **ActuatorRescale**: treat `u` as an actuator signal on `[u_min, u_max]`,
//!   rescale linearly onto the flow range `[q_min, q_max]`, then clamp
//!
//! # Example
//!
//! ```
//! use ht_controls::OutputMapping;
//!
//! let mapping = OutputMapping::ActuatorRescale {
//!     u_min: 0.0,
//!     u_max: 10.0,
//!     q_min: 0.0,
//!     q_max: 5.0,
//! };
//! mapping.validate().unwrap();
//!
//! assert_eq!(mapping.apply(4.0), 2.0);
//! assert_eq!(mapping.apply(50.0), 5.0);
//! ```

use crate::error::{ControlError, ControlResult};
use ht_core::{ensure_finite, rescale};
use serde::{Deserialize, Serialize};

/// Output mapping policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy")]
pub enum OutputMapping {
    /// Clamp the controller signal into `[out_min, out_max]`.
    Saturate { out_min: f64, out_max: f64 },
    /// Rescale from actuator range `[u_min, u_max]` onto `[q_min, q_max]`, then clamp.
    ActuatorRescale {
        u_min: f64,
        u_max: f64,
        q_min: f64,
        q_max: f64,
    },
}

impl OutputMapping {
    /// Check bounds ordering.
    ///
    /// Saturation and flow ranges need `min <= max`. The actuator range is a
    /// divisor and needs `u_min < u_max`.
    pub fn validate(&self) -> ControlResult<()> {
        match *self {
            OutputMapping::Saturate { out_min, out_max } => {
                ensure_finite(out_min, "out_min")?;
                ensure_finite(out_max, "out_max")?;
                if out_min > out_max {
                    return Err(ControlError::InvalidParameter {
                        field: "out_min",
                        constraint: "must be <= out_max",
                    });
                }
            }
            OutputMapping::ActuatorRescale {
                u_min,
                u_max,
                q_min,
                q_max,
            } => {
                ensure_finite(u_min, "u_min")?;
                ensure_finite(u_max, "u_max")?;
                ensure_finite(q_min, "q_min")?;
                ensure_finite(q_max, "q_max")?;
                if u_min >= u_max {
                    return Err(ControlError::InvalidParameter {
                        field: "u_min",
                        constraint: "must be < u_max",
                    });
                }
                if q_min > q_max {
                    return Err(ControlError::InvalidParameter {
                        field: "q_min",
                        constraint: "must be <= q_max",
                    });
                }
            }
        }
        Ok(())
    }

    /// Bounds of the mapped output, `(min, max)`.
    pub fn bounds(&self) -> (f64, f64) {
        match *self {
            OutputMapping::Saturate { out_min, out_max } => (out_min, out_max),
            OutputMapping::ActuatorRescale { q_min, q_max, .. } => (q_min, q_max),
        }
    }

    /// Map a raw controller signal to the bounded output.
    ///
    /// NaN input stays NaN. Panics if the bounds have not passed [`validate`](Self::validate).
    pub fn apply(&self, u: f64) -> f64 {
        match *self {
            OutputMapping::Saturate { out_min, out_max } => u.clamp(out_min, out_max),
            OutputMapping::ActuatorRescale {
                u_min,
                u_max,
                q_min,
                q_max,
            } => rescale(u, u_min, u_max, q_min, q_max).clamp(q_min, q_max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saturate_clamps() {
        let m = OutputMapping::Saturate {
            out_min: 0.0,
            out_max: 10.0,
        };
        assert_eq!(m.apply(-3.0), 0.0);
        assert_eq!(m.apply(4.5), 4.5);
        assert_eq!(m.apply(12.0), 10.0);
        assert_eq!(m.bounds(), (0.0, 10.0));
    }

    #[test]
    fn rescale_maps_actuator_endpoints() {
        let m = OutputMapping::ActuatorRescale {
            u_min: 0.0,
            u_max: 10.0,
            q_min: 2.0,
            q_max: 4.0,
        };
        assert_eq!(m.apply(0.0), 2.0);
        assert_eq!(m.apply(10.0), 4.0);
        assert_eq!(m.apply(5.0), 3.0);
        // Below actuator range still clamps to the flow floor
        assert_eq!(m.apply(-100.0), 2.0);
        assert_eq!(m.bounds(), (2.0, 4.0));
    }

    #[test]
    fn degenerate_saturation_range_is_allowed() {
        let m = OutputMapping::Saturate {
            out_min: 1.5,
            out_max: 1.5,
        };
        assert!(m.validate().is_ok());
        assert_eq!(m.apply(100.0), 1.5);
    }

    #[test]
    fn invalid_bounds() {
        let m = OutputMapping::Saturate {
            out_min: 1.0,
            out_max: 0.0,
        };
        assert_eq!(
            m.validate().unwrap_err(),
            ControlError::InvalidParameter {
                field: "out_min",
                constraint: "must be <= out_max"
            }
        );

        let m = OutputMapping::ActuatorRescale {
            u_min: 1.0,
            u_max: 1.0,
            q_min: 0.0,
            q_max: 1.0,
        };
        assert!(matches!(
            m.validate(),
            Err(ControlError::InvalidParameter { field: "u_min", .. })
        ));

        let m = OutputMapping::ActuatorRescale {
            u_min: 0.0,
            u_max: 1.0,
            q_min: 2.0,
            q_max: 1.0,
        };
        assert!(matches!(
            m.validate(),
            Err(ControlError::InvalidParameter { field: "q_min", .. })
        ));
    }
}
