//! Parallel parameter sweeps.
//!
//! `simulate` holds no shared state, so independent runs are spread over the
//! rayon thread pool. Results come back in input order.

use crate::error::SimResult;
use crate::params::SimulationParameters;
use crate::sim::simulate;
use crate::trace::SimulationTrace;
use ht_controls::PidGains;
use rayon::prelude::*;
use tracing::debug;

/// One run of a sweep.
#[derive(Clone, Debug)]
pub struct SweepPoint {
    /// Gains used for this run
    pub gains: PidGains,
    /// Trace, or the validation error for these gains
    pub result: SimResult<SimulationTrace>,
}

/// Simulate `base` once per gain set, in parallel.
pub fn sweep(base: &SimulationParameters, gains: &[PidGains]) -> Vec<SweepPoint> {
    debug!(runs = gains.len(), "starting gain sweep");
    gains
        .par_iter()
        .map(|g| {
            let params = SimulationParameters {
                gains: *g,
                ..base.clone()
            };
            SweepPoint {
                gains: *g,
                result: simulate(&params),
            }
        })
        .collect()
}

/// `count` copies of `gains` with `kp` spaced evenly over `[kp_min, kp_max]`.
pub fn kp_range(gains: PidGains, kp_min: f64, kp_max: f64, count: usize) -> Vec<PidGains> {
    let with_kp = |kp: f64| match gains {
        PidGains::Parallel { ki, kd, .. } => PidGains::Parallel { kp, ki, kd },
        PidGains::TimeConstant { ti_s, td_s, .. } => PidGains::TimeConstant { kp, ti_s, td_s },
    };
    match count {
        0 => Vec::new(),
        1 => vec![with_kp(kp_min)],
        _ => {
            let step = (kp_max - kp_min) / (count - 1) as f64;
            (0..count)
                .map(|i| with_kp(kp_min + step * i as f64))
                .collect()
        }
    }
}
