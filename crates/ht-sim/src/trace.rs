//! Simulation output: aligned time series.

use crate::plant::TankState;
use serde::{Deserialize, Serialize};
use std::collections::TryReserveError;

/// Result of one simulation run. Every series has the same length.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationTrace {
    /// Sample times (seconds), `k * dt`
    pub time_s: Vec<f64>,
    /// Liquid temperature (°C)
    pub temperature_c: Vec<f64>,
    /// Bounded heat-flow command applied over each step
    pub control: Vec<f64>,
    /// Unbounded PID signal before output mapping
    pub raw_control: Vec<f64>,
    /// Liquid height (m), when the level is modeled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_m: Option<Vec<f64>>,
}

/// One row of a [`SimulationTrace`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TraceSample {
    pub time_s: f64,
    pub temperature_c: f64,
    pub control: f64,
    pub raw_control: f64,
    pub height_m: Option<f64>,
}

impl SimulationTrace {
    /// Empty trace with room for `n` samples, failing instead of aborting
    /// when the allocation cannot be made.
    pub(crate) fn try_with_capacity(
        n: usize,
        tracks_height: bool,
    ) -> Result<Self, TryReserveError> {
        let mut trace = Self::default();
        trace.time_s.try_reserve_exact(n)?;
        trace.temperature_c.try_reserve_exact(n)?;
        trace.control.try_reserve_exact(n)?;
        trace.raw_control.try_reserve_exact(n)?;
        if tracks_height {
            let mut heights = Vec::new();
            heights.try_reserve_exact(n)?;
            trace.height_m = Some(heights);
        }
        Ok(trace)
    }

    pub(crate) fn push(&mut self, time_s: f64, x: &TankState, control: f64, raw_control: f64) {
        self.time_s.push(time_s);
        self.temperature_c.push(x.temperature_c);
        self.control.push(control);
        self.raw_control.push(raw_control);
        if let (Some(heights), Some(h)) = (self.height_m.as_mut(), x.height_m) {
            heights.push(h);
        }
    }

    pub fn len(&self) -> usize {
        self.time_s.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time_s.is_empty()
    }

    pub fn sample(&self, k: usize) -> Option<TraceSample> {
        Some(TraceSample {
            time_s: *self.time_s.get(k)?,
            temperature_c: *self.temperature_c.get(k)?,
            control: *self.control.get(k)?,
            raw_control: *self.raw_control.get(k)?,
            height_m: self.height_m.as_ref().and_then(|h| h.get(k).copied()),
        })
    }

    /// Iterate rows in time order.
    pub fn samples(&self) -> impl Iterator<Item = TraceSample> + '_ {
        (0..self.len()).filter_map(|k| self.sample(k))
    }

    pub fn last(&self) -> Option<TraceSample> {
        self.len().checked_sub(1).and_then(|k| self.sample(k))
    }

    pub fn final_temperature_c(&self) -> Option<f64> {
        self.temperature_c.last().copied()
    }

    /// `(time, temperature)` pairs.
    pub fn temperature_series(&self) -> Vec<(f64, f64)> {
        zip_series(&self.time_s, &self.temperature_c)
    }

    /// Index of the first sample holding a NaN or infinite value.
    pub fn first_non_finite(&self) -> Option<usize> {
        self.samples().position(|s| {
            !(s.temperature_c.is_finite()
                && s.control.is_finite()
                && s.raw_control.is_finite()
                && s.height_m.is_none_or(f64::is_finite))
        })
    }
}

fn zip_series(t: &[f64], v: &[f64]) -> Vec<(f64, f64)> {
    t.iter().copied().zip(v.iter().copied()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(t: f64, h: Option<f64>) -> TankState {
        TankState {
            temperature_c: t,
            height_m: h,
        }
    }

    #[test]
    fn push_keeps_series_aligned() {
        let mut trace = SimulationTrace::try_with_capacity(2, true).unwrap();
        trace.push(0.0, &state(15.0, Some(1.0)), 0.5, 0.7);
        trace.push(0.1, &state(15.2, Some(1.1)), 0.6, 0.8);

        assert_eq!(trace.len(), 2);
        assert_eq!(trace.height_m.as_ref().map(Vec::len), Some(2));
        let last = trace.last().unwrap();
        assert_eq!(last.time_s, 0.1);
        assert_eq!(last.height_m, Some(1.1));
        assert_eq!(trace.final_temperature_c(), Some(15.2));
        assert_eq!(trace.temperature_series(), vec![(0.0, 15.0), (0.1, 15.2)]);
    }

    #[test]
    fn detects_non_finite() {
        let mut trace = SimulationTrace::try_with_capacity(3, false).unwrap();
        trace.push(0.0, &state(15.0, None), 0.0, 0.0);
        trace.push(0.1, &state(16.0, None), 0.0, f64::INFINITY);
        trace.push(0.2, &state(f64::NAN, None), 0.0, 0.0);
        assert_eq!(trace.first_non_finite(), Some(1));
        assert!(trace.height_m.is_none());
    }

    #[test]
    fn oversized_capacity_fails_cleanly() {
        assert!(SimulationTrace::try_with_capacity(usize::MAX, false).is_err());
    }

    #[test]
    fn empty_trace() {
        let trace = SimulationTrace::default();
        assert!(trace.is_empty());
        assert!(trace.last().is_none());
        assert!(trace.first_non_finite().is_none());
    }
}
