//! Gravity evaluation for the ring engine
//!
//! `GravityEvaluator` is the seam between the stepping logic and the force
//! model. `DirectGravity` is the only implementation: softened Newtonian
//! gravity by direct O(N^2) pair summation. A tree code can be added as
//! another evaluator without changing `integrate`.

use serde::Deserialize;

use crate::simulation::states::{SimulationState, NVec3};

/// Which gravity evaluator the engine builds
/// gravity: "basic"
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GravityMode {
    #[serde(rename = "basic")] // direct pair summation with softening
    #[default]
    Basic,
}

impl GravityMode {
    pub fn evaluator(self) -> Box<dyn GravityEvaluator + Send + Sync> {
        match self {
            GravityMode::Basic => Box::new(DirectGravity),
        }
    }
}

/// Source of accelerations for every body in a state
/// Implementations overwrite `out[i]` with the total acceleration of body `i`
pub trait GravityEvaluator {
    fn accelerations(&self, state: &SimulationState, out: &mut [NVec3]);
}

/// Newtonian gravity with Plummer softening, direct summation
/// a_i = G * sum_j m_j (x_j - x_i) / (|x_j - x_i|^2 + eps^2)^(3/2)
/// The central mass is accelerated by the particles like any other body
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectGravity;

impl GravityEvaluator for DirectGravity {
    fn accelerations(&self, state: &SimulationState, out: &mut [NVec3]) {
        for a in out.iter_mut() {
            *a = NVec3::zeros();
        }

        let bodies = &state.bodies;
        let n = bodies.len();
        let g = state.g;
        let eps2 = state.softening * state.softening;

        // Each unordered pair once, equal and opposite
        for i in 0..n {
            let xi = bodies[i].x;
            let mi = bodies[i].m;

            for j in (i + 1)..n {
                let xj = bodies[j].x;
                let mj = bodies[j].m;

                // displacement from i to j
                let r = xj - xi;
                let d2 = r.dot(&r) + eps2;

                let inv_r = d2.sqrt().recip();
                let coef = g * inv_r * inv_r * inv_r;

                out[i] += coef * mj * r;
                out[j] -= coef * mi * r;
            }
        }
    }
}
