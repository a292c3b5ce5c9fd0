//! Fixed-step time integration for the ring system
//!
//! Kick-drift-kick leapfrog (velocity Verlet) driven by a `GravityEvaluator`.
//! `plan_substeps` splits an interval into `dt`-sized steps with a clipped
//! final step, `verlet_step` advances the state by one of them.

use super::forces::GravityEvaluator;
use super::states::{NVec3, SimulationState};

/// Remainders below this fraction of `dt` are folded into the last full step
pub const TIME_EPS: f64 = 1e-9;

/// How an interval `[t, target]` is covered by sub-steps
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepPlan {
    pub steps: u64, // number of sub-steps
    pub last: f64, // size of the final sub-step (<= dt unless a residue was folded in)
}

/// Split `target - t` into ceil((target - t) / dt) sub-steps.
/// The final one is clipped to the remaining interval instead of overshooting
pub fn plan_substeps(t: f64, target: f64, dt: f64) -> StepPlan {
    let remaining = target - t;
    if remaining <= 0.0 {
        return StepPlan { steps: 0, last: 0.0 };
    }

    let full = (remaining / dt).floor();
    let rem = remaining - full * dt;

    if full >= 1.0 && rem <= dt * TIME_EPS {
        // exact multiple up to rounding
        StepPlan {
            steps: full as u64,
            last: dt + rem,
        }
    } else {
        StepPlan {
            steps: full as u64 + 1,
            last: rem,
        }
    }
}

/// Advance `state` by one step of size `h` using velocity Verlet.
/// `acc` must hold a(t) on entry and holds a(t + h) on exit, so consecutive
/// steps need one force evaluation each
pub fn verlet_step(
    state: &mut SimulationState,
    forces: &dyn GravityEvaluator,
    h: f64,
    acc: &mut [NVec3],
) {
    let half_h = 0.5 * h;

    // Kick: v_n+1/2 = v_n + (h/2) a_n
    for (b, a) in state.bodies.iter_mut().zip(acc.iter()) {
        b.v += half_h * *a;
    }

    // Drift: x_n+1 = x_n + h v_n+1/2
    for b in state.bodies.iter_mut() {
        b.x += h * b.v;
    }

    state.t += h;

    // a_n+1 from x_n+1
    forces.accelerations(&*state, acc);

    // Kick: v_n+1 = v_n+1/2 + (h/2) a_n+1
    for (b, a) in state.bodies.iter_mut().zip(acc.iter()) {
        b.v += half_h * *a;
    }
}
