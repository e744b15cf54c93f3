//! Control loop performance metrics.
//!
//! Computes rise time, settling time, overshoot and steady-state error for a
//! setpoint step from the initial temperature. Percent figures are relative
//! to the step size `|setpoint - T0|`, since Celsius values have no
//! meaningful zero.

use ht_core::{Tolerances, nearly_equal};
use ht_sim::SimulationTrace;
use serde::{Deserialize, Serialize};

/// Settling band as a fraction of the step size.
pub const SETTLING_BAND: f64 = 0.02;

/// Standard control loop performance metrics.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct LoopMetrics {
    /// Time to cover 10% of the step (seconds)
    pub rise_time_10_s: Option<f64>,
    /// Time to cover 90% of the step (seconds)
    pub rise_time_90_s: Option<f64>,
    /// Time after which the temperature stays within ±2% of the step around the setpoint (seconds)
    pub settling_time_2pct_s: Option<f64>,
    /// Peak excursion past the setpoint, in percent of the step
    pub overshoot_pct: Option<f64>,
    /// Final temperature minus setpoint (K)
    pub steady_state_error: Option<f64>,
    /// Highest temperature reached (°C)
    pub peak_temperature_c: Option<f64>,
    /// Integral of |setpoint - T| over the run (K·s)
    pub iae: Option<f64>,
    /// Percentage of samples with the output at its upper bound
    pub saturation_pct_upper: Option<f64>,
    /// Percentage of samples with the output at its lower bound
    pub saturation_pct_lower: Option<f64>,
}

impl LoopMetrics {
    /// Returns true if at least some metrics were computed
    pub fn has_data(&self) -> bool {
        self.steady_state_error.is_some() || self.peak_temperature_c.is_some()
    }
}

/// Compute metrics for a trace tracking a constant setpoint.
///
/// `bounds` are the `(min, max)` limits of the mapped output, used for the
/// saturation shares. Step-response figures are `None` when the trace starts
/// at the setpoint or never reaches the threshold.
pub fn compute_loop_metrics(
    trace: &SimulationTrace,
    setpoint_c: f64,
    bounds: (f64, f64),
) -> LoopMetrics {
    let series = trace.temperature_series();
    let (Some(&(_, initial)), Some(&(_, last))) = (series.first(), series.last()) else {
        return LoopMetrics::default();
    };

    let mut metrics = LoopMetrics {
        steady_state_error: Some(last - setpoint_c),
        peak_temperature_c: Some(
            series
                .iter()
                .map(|&(_, v)| v)
                .fold(f64::NEG_INFINITY, f64::max),
        ),
        iae: Some(integral_abs_error(&series, setpoint_c)),
        ..Default::default()
    };

    let step = setpoint_c - initial;
    if !nearly_equal(setpoint_c, initial, Tolerances::default()) {
        metrics.rise_time_10_s = time_to_fraction(&series, initial, step, 0.1);
        metrics.rise_time_90_s = time_to_fraction(&series, initial, step, 0.9);
        metrics.overshoot_pct = overshoot_pct(&series, setpoint_c, step);
        metrics.settling_time_2pct_s =
            settling_time(&series, setpoint_c, SETTLING_BAND * step.abs());
    }

    let (lo, hi) = bounds;
    if !trace.control.is_empty() {
        metrics.saturation_pct_upper = Some(share_pct(&trace.control, |q| q >= hi));
        metrics.saturation_pct_lower = Some(share_pct(&trace.control, |q| q <= lo));
    }

    metrics
}

/// First time the response covers `frac` of the step, interpolated between samples.
fn time_to_fraction(series: &[(f64, f64)], initial: f64, step: f64, frac: f64) -> Option<f64> {
    let target = initial + frac * step;
    let reached = |v: f64| if step > 0.0 { v >= target } else { v <= target };

    for (i, &(time, val)) in series.iter().enumerate() {
        if !reached(val) {
            continue;
        }
        if i == 0 {
            return Some(time);
        }
        let (prev_time, prev_val) = series[i - 1];
        if !nearly_equal(val, prev_val, Tolerances::default()) {
            let frac = (target - prev_val) / (val - prev_val);
            return Some(prev_time + frac * (time - prev_time));
        }
        return Some(time);
    }

    None
}

/// Largest excursion past the setpoint in the step direction.
fn overshoot_pct(series: &[(f64, f64)], setpoint: f64, step: f64) -> Option<f64> {
    let direction = step.signum();
    let worst = series
        .iter()
        .map(|&(_, v)| (v - setpoint) * direction)
        .fold(f64::NEG_INFINITY, f64::max);
    (worst > 0.0).then(|| worst / step.abs() * 100.0)
}

/// Start of the final stretch spent strictly inside `setpoint ± half_width`.
fn settling_time(series: &[(f64, f64)], setpoint: f64, half_width: f64) -> Option<f64> {
    let mut entry: Option<f64> = None;
    for &(time, val) in series {
        let in_band = (val - setpoint).abs() < half_width;
        match (in_band, entry) {
            (true, None) => entry = Some(time),
            (false, Some(_)) => entry = None,
            _ => {}
        }
    }
    entry
}

/// Trapezoidal integral of `|setpoint - T|`.
fn integral_abs_error(series: &[(f64, f64)], setpoint: f64) -> f64 {
    series
        .windows(2)
        .map(|w| {
            let (t1, v1) = w[0];
            let (t2, v2) = w[1];
            0.5 * ((setpoint - v1).abs() + (setpoint - v2).abs()) * (t2 - t1)
        })
        .sum()
}

fn share_pct(values: &[f64], pred: impl Fn(f64) -> bool) -> f64 {
    let hits = values.iter().filter(|&&v| pred(v)).count();
    hits as f64 / values.len() as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trace(points: &[(f64, f64)], control: &[f64]) -> SimulationTrace {
        SimulationTrace {
            time_s: points.iter().map(|p| p.0).collect(),
            temperature_c: points.iter().map(|p| p.1).collect(),
            control: control.to_vec(),
            raw_control: control.to_vec(),
            height_m: None,
        }
    }

    #[test]
    fn rise_time_10_90_percent() {
        // 20 → 30 °C step
        let t = trace(
            &[
                (0.0, 20.0),
                (1.0, 20.0),
                (2.0, 22.0),
                (3.0, 26.0),
                (4.0, 29.5),
                (5.0, 30.0),
            ],
            &[1.0; 6],
        );
        let m = compute_loop_metrics(&t, 30.0, (0.0, 1.0));

        let t10 = m.rise_time_10_s.unwrap();
        let t90 = m.rise_time_90_s.unwrap();
        assert!((t10 - 1.5).abs() < 1e-12);
        assert!(t90 > 3.0 && t90 < 4.0);
        assert_eq!(m.steady_state_error, Some(0.0));
    }

    #[test]
    fn overshoot_relative_to_step() {
        let t = trace(
            &[(0.0, 20.0), (1.0, 28.0), (2.0, 32.0), (3.0, 30.5), (4.0, 30.0)],
            &[0.5; 5],
        );
        let m = compute_loop_metrics(&t, 30.0, (0.0, 1.0));

        let overshoot = m.overshoot_pct.unwrap();
        assert!((overshoot - 20.0).abs() < 1e-9);
        assert_eq!(m.peak_temperature_c, Some(32.0));
    }

    #[test]
    fn cooling_step_overshoots_downwards() {
        let t = trace(&[(0.0, 50.0), (1.0, 38.0), (2.0, 40.0)], &[0.0; 3]);
        let m = compute_loop_metrics(&t, 40.0, (0.0, 1.0));
        assert!((m.overshoot_pct.unwrap() - 20.0).abs() < 1e-9);
        assert_eq!(m.peak_temperature_c, Some(50.0));
    }

    #[test]
    fn settling_time_resets_on_leaving_band() {
        // Step 0 → 100, band is ±2
        let t = trace(
            &[
                (0.0, 0.0),
                (1.0, 99.0),
                (2.0, 103.0),
                (3.0, 101.0),
                (4.0, 100.5),
                (5.0, 100.0),
            ],
            &[0.0; 6],
        );
        let m = compute_loop_metrics(&t, 100.0, (0.0, 1.0));
        assert_eq!(m.settling_time_2pct_s, Some(3.0));
    }

    #[test]
    fn never_settles() {
        let t = trace(&[(0.0, 0.0), (1.0, 50.0), (2.0, 80.0)], &[1.0; 3]);
        let m = compute_loop_metrics(&t, 100.0, (0.0, 1.0));
        assert!(m.settling_time_2pct_s.is_none());
        assert!(m.rise_time_90_s.is_none());
        assert!(m.overshoot_pct.is_none());
    }

    #[test]
    fn iae_is_trapezoidal() {
        let t = trace(&[(0.0, 0.0), (1.0, 10.0), (2.0, 10.0)], &[0.0; 3]);
        let m = compute_loop_metrics(&t, 10.0, (0.0, 1.0));
        assert!((m.iae.unwrap() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn saturation_shares() {
        let t = trace(
            &[(0.0, 15.0), (0.1, 16.0), (0.2, 17.0), (0.3, 18.0)],
            &[10.0, 10.0, 4.0, 0.0],
        );
        let m = compute_loop_metrics(&t, 40.0, (0.0, 10.0));
        assert_eq!(m.saturation_pct_upper, Some(50.0));
        assert_eq!(m.saturation_pct_lower, Some(25.0));
    }

    #[test]
    fn empty_trace() {
        let m = compute_loop_metrics(&SimulationTrace::default(), 40.0, (0.0, 1.0));
        assert!(!m.has_data());
        assert_eq!(m, LoopMetrics::default());
    }

    #[test]
    fn rounding_noise_is_not_a_step() {
        let t = trace(&[(0.0, 40.0), (1.0, 40.5), (2.0, 40.0)], &[0.0; 3]);
        let m = compute_loop_metrics(&t, 40.0 + 1e-12, (0.0, 1.0));
        assert!(m.rise_time_10_s.is_none());
        assert!(m.overshoot_pct.is_none());
    }

    #[test]
    fn no_step_change() {
        let t = trace(&[(0.0, 40.0), (1.0, 40.0), (2.0, 40.0)], &[0.0; 3]);
        let m = compute_loop_metrics(&t, 40.0, (0.0, 1.0));

        assert!(m.rise_time_10_s.is_none());
        assert!(m.overshoot_pct.is_none());
        assert!(m.settling_time_2pct_s.is_none());
        assert_eq!(m.steady_state_error, Some(0.0));
        assert_eq!(m.iae, Some(0.0));
    }
}
