//! Fixed-step time integrators.

use crate::model::TransientModel;

/// Trait for time integrators.
pub trait Integrator {
    /// Advance state by one time step with input `u` held constant.
    fn step<M: TransientModel>(&self, model: &M, x: &M::State, u: M::Input, dt: f64) -> M::State;
}

/// Forward Euler (explicit, 1st order): `x_new = x + dt * f(x, u)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ForwardEuler;

impl Integrator for ForwardEuler {
    fn step<M: TransientModel>(&self, model: &M, x: &M::State, u: M::Input, dt: f64) -> M::State {
        let xdot = model.rhs(x, u);
        model.add(x, &model.scale(&xdot, dt))
    }
}
