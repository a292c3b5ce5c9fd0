//! Conserved quantities of a state, for logging and checks

use super::states::{NVec3, SimulationState};

/// Kinetic plus softened potential energy
/// U = -G sum_{i<j} m_i m_j / sqrt(|x_j - x_i|^2 + eps^2), the potential whose
/// gradient the direct evaluator uses
pub fn total_energy(state: &SimulationState) -> f64 {
    kinetic_energy(state) + potential_energy(state)
}

pub fn kinetic_energy(state: &SimulationState) -> f64 {
    state
        .bodies
        .iter()
        .map(|b| 0.5 * b.m * b.v.norm_squared())
        .sum()
}

pub fn potential_energy(state: &SimulationState) -> f64 {
    let bodies = &state.bodies;
    let eps2 = state.softening * state.softening;
    let mut u = 0.0;
    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            let r = bodies[j].x - bodies[i].x;
            u -= state.g * bodies[i].m * bodies[j].m / (r.norm_squared() + eps2).sqrt();
        }
    }
    u
}

/// Sum of m (x cross v)
pub fn angular_momentum(state: &SimulationState) -> NVec3 {
    state
        .bodies
        .iter()
        .fold(NVec3::zeros(), |l, b| l + b.m * b.x.cross(&b.v))
}

pub fn linear_momentum(state: &SimulationState) -> NVec3 {
    state
        .bodies
        .iter()
        .fold(NVec3::zeros(), |p, b| p + b.m * b.v)
}

/// Centre-of-mass position, or `None` for a massless state
pub fn center_of_mass(state: &SimulationState) -> Option<NVec3> {
    let total: f64 = state.bodies.iter().map(|b| b.m).sum();
    if total <= 0.0 {
        return None;
    }
    let weighted = state
        .bodies
        .iter()
        .fold(NVec3::zeros(), |c, b| c + b.m * b.x);
    Some(weighted / total)
}
