//! Runtime engine owning the simulation state
//!
//! `Simulation` is the only mutator of a `SimulationState`: bodies enter
//! through `add_body`, motion happens through `integrate`, and everything
//! else (snapshots, status, checkpoints) reads it.

use std::collections::HashSet;
use std::fmt;

use log::{debug, warn};

use crate::error::{Error, Result};

use super::forces::{GravityEvaluator, GravityMode};
use super::integrator::{plan_substeps, verlet_step};
use super::params::Parameters;
use super::states::{Body, BodyId, BodyInit, NVec3, SimulationState};

/// The massive body at index 0
#[derive(Debug, Clone, PartialEq)]
pub struct CentralBody {
    pub name: String,
    pub m: f64, // mass in sim mass units
    pub radius: f64, // metres
}

impl CentralBody {
    /// Saturn (NAIF 699), mass in kg
    pub fn saturn() -> Self {
        Self {
            name: "Saturn".to_string(),
            m: 5.6834e26,
            radius: 5.8232e7,
        }
    }
}

/// Read-only summary of a simulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Status {
    pub t: f64,
    pub body_count: usize,
    pub central_mass: f64,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t = {} s, bodies = {}, central mass = {:e}",
            self.t, self.body_count, self.central_mass
        )
    }
}

pub struct Simulation {
    state: SimulationState,
    mode: GravityMode,
    forces: Box<dyn GravityEvaluator + Send + Sync>,
    diverged: bool, // set when integration produced non-finite values
    next_id: BodyId,
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("state", &self.state)
            .field("mode", &self.mode)
            .field("diverged", &self.diverged)
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl Simulation {
    /// New simulation at t = 0 holding only the central body at rest at the origin
    pub fn new(params: Parameters, central: &CentralBody) -> Result<Self> {
        Self::with_mode(params, central, GravityMode::default())
    }

    pub fn with_mode(params: Parameters, central: &CentralBody, mode: GravityMode) -> Result<Self> {
        params.validate()?;
        if !(central.m.is_finite() && central.m > 0.0) {
            return Err(Error::InvalidConfiguration(format!(
                "central mass must be positive, got {}",
                central.m
            )));
        }

        let state = SimulationState {
            t: 0.0,
            dt: params.dt,
            softening: params.softening,
            g: params.g,
            units: params.units,
            bodies: vec![Body {
                id: BodyId(0),
                x: NVec3::zeros(),
                v: NVec3::zeros(),
                m: central.m,
                radius: central.radius,
            }],
        };

        Ok(Self {
            state,
            mode,
            forces: mode.evaluator(),
            diverged: false,
            next_id: BodyId(1),
        })
    }

    /// Take ownership of a previously saved state
    pub fn from_state(state: SimulationState) -> Result<Self> {
        Self::from_state_with_mode(state, GravityMode::default())
    }

    pub fn from_state_with_mode(state: SimulationState, mode: GravityMode) -> Result<Self> {
        Parameters {
            dt: state.dt,
            softening: state.softening,
            units: state.units,
            g: state.g,
        }
        .validate()?;

        if state.bodies.is_empty() {
            return Err(Error::InvalidConfiguration(
                "state has no central body".to_string(),
            ));
        }
        if !state.t.is_finite() {
            return Err(Error::InvalidConfiguration(format!(
                "state time is not finite: {}",
                state.t
            )));
        }
        let mut seen = HashSet::with_capacity(state.bodies.len());
        if let Some(dup) = state.bodies.iter().find(|b| !seen.insert(b.id)) {
            return Err(Error::InvalidConfiguration(format!(
                "duplicate body id {}",
                dup.id
            )));
        }
        let diverged = state.first_non_finite().is_some();
        let next_id = state.next_id();

        Ok(Self {
            state,
            mode,
            forces: mode.evaluator(),
            diverged,
            next_id,
        })
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn into_state(self) -> SimulationState {
        self.state
    }

    pub fn mode(&self) -> GravityMode {
        self.mode
    }

    pub fn t(&self) -> f64 {
        self.state.t
    }

    pub fn dt(&self) -> f64 {
        self.state.dt
    }

    pub fn body_count(&self) -> usize {
        self.state.bodies.len()
    }

    pub fn central_mass(&self) -> f64 {
        self.state.bodies[0].m
    }

    /// True once an integration produced non-finite positions or velocities
    pub fn is_diverged(&self) -> bool {
        self.diverged
    }

    pub fn status(&self) -> Status {
        Status {
            t: self.state.t,
            body_count: self.state.bodies.len(),
            central_mass: self.central_mass(),
        }
    }

    /// Append a body after all existing ones and return its new id
    pub fn add_body(&mut self, init: BodyInit) -> Result<BodyId> {
        if !(init.m.is_finite() && init.m >= 0.0) {
            return Err(Error::InvalidConfiguration(format!(
                "body mass must be non-negative, got {}",
                init.m
            )));
        }
        if !(init.radius.is_finite() && init.radius >= 0.0) {
            return Err(Error::InvalidConfiguration(format!(
                "body radius must be non-negative, got {}",
                init.radius
            )));
        }
        if !init.x.iter().chain(init.v.iter()).all(|c| c.is_finite()) {
            return Err(Error::InvalidConfiguration(
                "body position and velocity must be finite".to_string(),
            ));
        }

        let id = self.next_id;
        self.next_id = BodyId(id.0 + 1);
        self.state.bodies.push(Body {
            id,
            x: init.x,
            v: init.v,
            m: init.m,
            radius: init.radius,
        });
        Ok(id)
    }

    /// Shift positions and velocities into the centre-of-mass frame
    pub fn move_to_com(&mut self) {
        let total: f64 = self.state.bodies.iter().map(|b| b.m).sum();
        if total <= 0.0 {
            return;
        }
        let mut com_x = NVec3::zeros();
        let mut com_v = NVec3::zeros();
        for b in &self.state.bodies {
            com_x += b.m * b.x;
            com_v += b.m * b.v;
        }
        com_x /= total;
        com_v /= total;

        for b in self.state.bodies.iter_mut() {
            b.x -= com_x;
            b.v -= com_v;
        }
    }

    /// Advance to `target_time` with fixed steps of `dt`, clipping the last one.
    ///
    /// Calling again with the current time is a no-op. Errors found before any
    /// step leave the state untouched; non-finite values produced during a step
    /// mark the simulation as diverged and every later call fails.
    pub fn integrate(&mut self, target_time: f64) -> Result<()> {
        if self.diverged {
            return Err(Error::NumericalDivergence {
                body: self.state.first_non_finite().map(|b| b.id),
                t: self.state.t,
            });
        }
        if !target_time.is_finite() {
            return Err(Error::InvalidConfiguration(format!(
                "integration target is not finite: {}",
                target_time
            )));
        }
        if target_time < self.state.t {
            return Err(Error::InvalidConfiguration(format!(
                "integration target {} precedes current time {}",
                target_time, self.state.t
            )));
        }
        if let Some(b) = self.state.first_non_finite() {
            return Err(Error::NumericalDivergence {
                body: Some(b.id),
                t: self.state.t,
            });
        }

        let plan = plan_substeps(self.state.t, target_time, self.state.dt);
        if plan.steps == 0 {
            self.state.t = target_time;
            return Ok(());
        }

        let mut acc = vec![NVec3::zeros(); self.state.bodies.len()];
        self.forces.accelerations(&self.state, &mut acc);

        for k in 0..plan.steps {
            let h = if k + 1 == plan.steps {
                plan.last
            } else {
                self.state.dt
            };
            verlet_step(&mut self.state, self.forces.as_ref(), h, &mut acc);

            if let Some(b) = self.state.first_non_finite() {
                let id = b.id;
                self.diverged = true;
                warn!("body {} diverged at t = {} s", id, self.state.t);
                return Err(Error::NumericalDivergence {
                    body: Some(id),
                    t: self.state.t,
                });
            }
        }
        self.state.t = target_time;

        debug!(
            "integrated {} sub-steps (last {} s) to t = {} s",
            plan.steps, plan.last, self.state.t
        );
        Ok(())
    }
}
