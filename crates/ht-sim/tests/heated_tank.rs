//! Integration tests: closed-loop heated tank scenarios.
//!
//! Covers:
//! - Trace shape and timing (length, t[k] = k·dt, initial conditions)
//! - Concrete steam-heated scenario with proportional-only control
//! - Zero-gain runs follow the uncontrolled plant
//! - Actuator rescale floor and level tracking
//! - Agreement with a straight-line reference loop for time-constant gains

use ht_sim::{
    FlowThroughTank, LevelTracking, OutputMapping, PidGains, PlantModel, SimError,
    SimulationParameters, Timing, WellMixedTank, simulate,
};

fn steam_tank() -> WellMixedTank {
    WellMixedTank {
        volume_m3: 5.0,
        through_flow_m3_s: 0.1,
        latent_heat_j_per_kg: 2.3e6,
        density_kg_m3: 1000.0,
        cp_j_per_kg_k: 4200.0,
        inlet_temperature_c: 15.0,
    }
}

fn steam_params(gains: PidGains, dt_s: f64, duration_s: f64) -> SimulationParameters {
    SimulationParameters {
        plant: PlantModel::WellMixed(steam_tank()),
        gains,
        output: OutputMapping::Saturate {
            out_min: 0.0,
            out_max: 10.0,
        },
        setpoint_c: 40.0,
        initial_temperature_c: 15.0,
        timing: Timing { dt_s, duration_s },
    }
}

fn p_only(kp: f64) -> PidGains {
    PidGains::Parallel {
        kp,
        ki: 0.0,
        kd: 0.0,
    }
}

#[test]
fn proportional_scenario_ten_seconds() {
    let params = steam_params(p_only(0.05), 0.1, 10.0);
    let trace = simulate(&params).unwrap();

    assert_eq!(trace.len(), 100);
    assert_eq!(trace.temperature_c.len(), 100);
    assert_eq!(trace.control.len(), 100);
    assert!(trace.height_m.is_none());
    assert_eq!(trace.temperature_c[0], 15.0);

    // Heat is being added toward the setpoint
    for k in 0..10 {
        assert!(
            trace.temperature_c[k + 1] >= trace.temperature_c[k],
            "temperature dropped at step {k}"
        );
    }
    // Far from steady state after 10 s
    assert!(trace.temperature_c[99] < 40.0);
    assert!(trace.temperature_c[99] > 15.0);
}

#[test]
fn time_axis_is_exact_multiple_of_step() {
    let params = steam_params(p_only(0.05), 0.1, 10.0);
    let trace = simulate(&params).unwrap();
    assert_eq!(trace.time_s[0], 0.0);
    for (k, t) in trace.time_s.iter().enumerate() {
        assert_eq!(*t, k as f64 * 0.1);
    }
}

#[test]
fn repeated_runs_are_identical() {
    let params = steam_params(
        PidGains::TimeConstant {
            kp: 0.3,
            ti_s: 2.0,
            td_s: 0.5,
        },
        0.1,
        120.0,
    );
    let a = simulate(&params).unwrap();
    let b = simulate(&params).unwrap();
    assert_eq!(a, b);
}

#[test]
fn zero_gains_leave_plant_uncontrolled() {
    let mut params = steam_params(p_only(0.0), 0.1, 60.0);
    params.initial_temperature_c = 30.0;
    let trace = simulate(&params).unwrap();

    assert!(trace.control.iter().all(|&q| q == 0.0));
    // Through-flow of 15 °C liquid cools the tank monotonically
    for w in trace.temperature_c.windows(2) {
        assert!(w[1] < w[0]);
        assert!(w[1] > 15.0);
    }
}

#[test]
fn zero_gains_hold_output_at_rescale_floor() {
    let mut params = steam_params(p_only(0.0), 0.1, 5.0);
    params.output = OutputMapping::ActuatorRescale {
        u_min: 0.0,
        u_max: 10.0,
        q_min: 0.5,
        q_max: 10.0,
    };
    let trace = simulate(&params).unwrap();
    assert!(trace.control.iter().all(|&q| q == 0.5));
    assert!(trace.temperature_c.last().unwrap() > &15.0);
}

#[test]
fn level_rises_with_net_inflow() {
    let params = SimulationParameters {
        plant: PlantModel::FlowThrough(FlowThroughTank {
            area_m2: 2.0,
            density_kg_m3: 1000.0,
            cp_j_per_kg_k: 4200.0,
            inlet_flow: 0.3,
            outlet_flow: 0.1,
            inlet_temperature_c: 15.0,
            outlet_temperature_c: 15.0,
            level: Some(LevelTracking {
                initial_height_m: 1.0,
            }),
        }),
        gains: p_only(500.0),
        output: OutputMapping::Saturate {
            out_min: 0.0,
            out_max: 50_000.0,
        },
        setpoint_c: 25.0,
        initial_temperature_c: 15.0,
        timing: Timing {
            dt_s: 0.5,
            duration_s: 20.0,
        },
    };
    let trace = simulate(&params).unwrap();
    let heights = trace.height_m.as_ref().unwrap();

    assert_eq!(heights.len(), 40);
    assert_eq!(heights[0], 1.0);
    for (k, h) in heights.iter().enumerate() {
        let expected = 1.0 + k as f64 * 0.5 * 0.1;
        assert!((h - expected).abs() < 1e-9, "height {h} at {k}");
    }
    assert!(trace.temperature_c[39] > 15.0);
    assert!(trace.control.iter().all(|&q| (0.0..=50_000.0).contains(&q)));
}

#[test]
fn sub_step_duration_is_rejected() {
    let params = steam_params(p_only(0.05), 0.1, 0.05);
    let err = simulate(&params).unwrap_err();
    assert!(matches!(
        err,
        SimError::InvalidParameters {
            field: "duration_s",
            ..
        }
    ));
}

#[test]
fn invalid_gains_are_rejected() {
    let params = steam_params(
        PidGains::TimeConstant {
            kp: 0.05,
            ti_s: 0.0,
            td_s: 0.1,
        },
        0.1,
        10.0,
    );
    assert_eq!(simulate(&params).unwrap_err().field(), "ti_s");
}

/// Straight-line steam loop: error, integral, derivative, rescale, clamp, Euler.
fn reference_temperatures(
    kp: f64,
    ti: f64,
    td: f64,
    dt: f64,
    steps: usize,
) -> (Vec<f64>, Vec<f64>) {
    let (v, f, lambda, rho, cp, t_in, t_set) = (5.0, 0.1, 2.3e6, 1000.0, 4200.0, 15.0, 40.0);
    let (q_min, q_max, u_min, u_max) = (0.0, 10.0, 0.0, 10.0);
    let ki = kp * (dt / ti);
    let kd = kp * (td / dt);

    let mut temps = vec![t_in];
    let mut flows = Vec::new();
    let mut integral = 0.0;
    let mut prev_error = 0.0;
    for n in 0..steps {
        let t = temps[n];
        let error = t_set - t;
        integral += error * dt;
        let derivative = if n > 0 { (error - prev_error) / dt } else { 0.0 };
        prev_error = error;
        let u = kp * error + ki * integral + kd * derivative;
        let q = (((q_max - q_min) / (u_max - u_min)) * (u - u_min) + q_min).clamp(q_min, q_max);
        flows.push(q);
        if n + 1 < steps {
            temps.push(t + (dt / v) * ((lambda * q / (rho * cp)) + f * (t_in - t)));
        }
    }
    (temps, flows)
}

#[test]
fn matches_reference_loop_with_time_constant_gains() {
    let (kp, ti, td, dt) = (0.05, 1.0, 0.1, 0.1);
    let params = SimulationParameters {
        output: OutputMapping::ActuatorRescale {
            u_min: 0.0,
            u_max: 10.0,
            q_min: 0.0,
            q_max: 10.0,
        },
        ..steam_params(
            PidGains::TimeConstant {
                kp,
                ti_s: ti,
                td_s: td,
            },
            dt,
            600.0,
        )
    };
    let trace = simulate(&params).unwrap();
    let (temps, flows) = reference_temperatures(kp, ti, td, dt, trace.len());

    assert_eq!(temps.len(), trace.len());
    for k in 0..trace.len() {
        assert!(
            (trace.temperature_c[k] - temps[k]).abs() < 1e-9,
            "temperature mismatch at {k}: {} vs {}",
            trace.temperature_c[k],
            temps[k]
        );
        assert!((trace.control[k] - flows[k]).abs() < 1e-9);
    }
}
