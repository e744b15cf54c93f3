//! Result data types.

use crate::hash::{SOLVER_VERSION, compute_run_id};
use crate::metrics::{LoopMetrics, compute_loop_metrics};
use ht_sim::{SimulationParameters, SimulationTrace};
use serde::{Deserialize, Serialize};

pub type RunId = String;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunManifest {
    pub run_id: RunId,
    pub name: String,
    pub timestamp: String,
    pub steps: usize,
    pub dt_s: f64,
    pub duration_s: f64,
    pub solver_version: String,
}

impl RunManifest {
    /// Describe a finished run of `params`, stamped with the current UTC time.
    pub fn new(name: impl Into<String>, params: &SimulationParameters, steps: usize) -> Self {
        Self {
            run_id: compute_run_id(params),
            name: name.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            steps,
            dt_s: params.timing.dt_s,
            duration_s: params.timing.duration_s,
            solver_version: SOLVER_VERSION.to_string(),
        }
    }
}

/// Persisted form of a run: manifest, metrics and the full trace.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunRecord {
    pub manifest: RunManifest,
    pub metrics: LoopMetrics,
    pub trace: SimulationTrace,
}

/// A finished run with a display label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledRun {
    pub label: String,
    pub setpoint_c: f64,
    pub trace: SimulationTrace,
    pub metrics: LoopMetrics,
}

impl LabeledRun {
    pub fn new(
        label: impl Into<String>,
        params: &SimulationParameters,
        trace: SimulationTrace,
    ) -> Self {
        let metrics = compute_loop_metrics(&trace, params.setpoint_c, params.output.bounds());
        Self {
            label: label.into(),
            setpoint_c: params.setpoint_c,
            trace,
            metrics,
        }
    }
}

/// The current run plus, once a second run exists, the one before it.
///
/// Callers keep this between runs to overlay the previous response on the
/// current one.
#[derive(Debug, Clone, PartialEq)]
pub struct RunComparison {
    pub previous: Option<LabeledRun>,
    pub current: LabeledRun,
}

impl RunComparison {
    pub fn new(current: LabeledRun) -> Self {
        Self {
            previous: None,
            current,
        }
    }

    /// Make `next` current and keep the old current run as previous.
    pub fn push(&mut self, next: LabeledRun) {
        let old = std::mem::replace(&mut self.current, next);
        self.previous = Some(old);
    }

    /// Change in final temperature from the previous run (K).
    pub fn final_temperature_delta(&self) -> Option<f64> {
        let prev = self.previous.as_ref()?.trace.final_temperature_c()?;
        Some(self.current.trace.final_temperature_c()? - prev)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(label: &str, temps: &[f64]) -> LabeledRun {
        LabeledRun {
            label: label.to_string(),
            setpoint_c: 40.0,
            trace: SimulationTrace {
                time_s: (0..temps.len()).map(|k| k as f64).collect(),
                temperature_c: temps.to_vec(),
                control: vec![0.0; temps.len()],
                raw_control: vec![0.0; temps.len()],
                height_m: None,
            },
            metrics: LoopMetrics::default(),
        }
    }

    #[test]
    fn push_rotates_current_into_previous() {
        let mut cmp = RunComparison::new(run("a", &[15.0, 20.0]));
        assert!(cmp.previous.is_none());
        assert_eq!(cmp.final_temperature_delta(), None);

        cmp.push(run("b", &[15.0, 25.0]));
        assert_eq!(cmp.previous.as_ref().map(|r| r.label.as_str()), Some("a"));
        assert_eq!(cmp.current.label, "b");
        assert_eq!(cmp.final_temperature_delta(), Some(5.0));

        cmp.push(run("c", &[15.0, 22.0]));
        assert_eq!(cmp.previous.as_ref().map(|r| r.label.as_str()), Some("b"));
        assert_eq!(cmp.final_temperature_delta(), Some(-3.0));
    }
}
