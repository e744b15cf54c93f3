//! Simulation driver.

use crate::error::{SimError, SimResult};
use crate::integrator::{ForwardEuler, Integrator};
use crate::params::SimulationParameters;
use crate::trace::SimulationTrace;
use ht_controls::{PidController, PidState};
use tracing::{debug, warn};

/// Run one closed-loop simulation.
///
/// Each step measures the current temperature, updates the PID controller,
/// maps its signal onto the output range and advances the plant by one
/// forward Euler step with that output held constant. The last sample is
/// recorded without advancing the plant, so every series has exactly
/// `floor(duration / dt)` entries.
///
/// The function is pure: identical parameters give bit-identical traces.
/// Non-finite values produced by extreme gains are kept in the trace.
///
/// # Errors
///
/// Returns [`SimError::InvalidParameters`](crate::SimError::InvalidParameters)
/// before any step runs if the parameters do not validate.
pub fn simulate(params: &SimulationParameters) -> SimResult<SimulationTrace> {
    let steps = params.step_count()?;
    let dt = params.timing.dt_s;
    let controller = PidController::new(params.gains, dt)?;
    let gains = controller.gains();

    debug!(
        steps,
        dt_s = dt,
        setpoint_c = params.setpoint_c,
        kp = gains.kp,
        ki = gains.ki,
        kd = gains.kd,
        "starting tank simulation"
    );

    let mut trace = SimulationTrace::try_with_capacity(steps, params.plant.tracks_height())
        .map_err(|_| SimError::invalid("duration_s", "step count does not fit in memory"))?;
    let mut x = params.initial_state();
    let mut pid = PidState::default();

    for k in 0..steps {
        let (next_pid, u) = controller.update(&pid, x.temperature_c, params.setpoint_c, dt);
        pid = next_pid;
        let q = params.output.apply(u);

        trace.push(k as f64 * dt, &x, q, u);

        if k + 1 < steps {
            x = ForwardEuler.step(&params.plant, &x, q, dt);
        }
    }

    if let Some(k) = trace.first_non_finite() {
        warn!(
            sample = k,
            time_s = trace.time_s[k],
            "simulation produced non-finite values"
        );
    }

    debug!(
        final_temperature_c = trace.final_temperature_c(),
        integral = pid.integral,
        "tank simulation finished"
    );

    Ok(trace)
}
