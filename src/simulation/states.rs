//! Core state types for the ring simulation.
//!
//! - `Body`            one particle (or the central mass) in 3D
//! - `SimulationState` the ordered body list plus time, step, softening, `G` and units
//!
//! Index 0 of `SimulationState::bodies` is always the central mass.

use std::fmt;

use nalgebra::{Vector2, Vector3};

use super::units::Units;

pub type NVec2 = Vector2<f64>;
pub type NVec3 = Vector3<f64>;

/// Stable identifier of a body, never reused within one simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u64);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub id: BodyId,
    pub x: NVec3, // position
    pub v: NVec3, // velocity
    pub m: f64, // mass
    pub radius: f64, // physical radius in metres, not used by gravity
}

impl Body {
    /// True when position and velocity are all finite
    pub fn is_finite(&self) -> bool {
        self.x.iter().chain(self.v.iter()).all(|c| c.is_finite())
    }
}

/// Initial values for a body before the simulation assigns it an id
#[derive(Debug, Clone, PartialEq)]
pub struct BodyInit {
    pub x: NVec3,
    pub v: NVec3,
    pub m: f64,
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    pub t: f64, // time
    pub dt: f64, // fixed step size
    pub softening: f64, // softening length epsilon
    pub g: f64, // gravitational constant in `units`
    pub units: Units,
    pub bodies: Vec<Body>, // insertion order, central mass first
}

impl SimulationState {
    pub fn central(&self) -> Option<&Body> {
        self.bodies.first()
    }

    /// One past the largest id present
    pub fn next_id(&self) -> BodyId {
        BodyId(self.bodies.iter().map(|b| b.id.0 + 1).max().unwrap_or(0))
    }

    /// First body with a non-finite position or velocity
    pub fn first_non_finite(&self) -> Option<&Body> {
        self.bodies.iter().find(|b| !b.is_finite())
    }
}
