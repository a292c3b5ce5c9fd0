//! Ring particle clouds
//!
//! A ring is `count` ice particles placed on a circle of radius `ds / 2`
//! around the central body, jittered in the plane, spread vertically by a
//! normal deviate and given a tangential speed that is a fixed fraction of
//! the circular-orbit speed (0.75 by default, so the cloud falls inward).

use std::f64::consts::{PI, TAU};

use log::info;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::simulation::engine::Simulation;
use crate::simulation::states::{BodyId, BodyInit, NVec3};
use crate::simulation::units::Units;

use super::powerlaw::PowerLaw;

pub const DEFAULT_COUNT: usize = 1000;
/// particle radius in metres = SIZE_SCALE * power-law draw / SIZE_DIVISOR
pub const DEFAULT_SIZE_SCALE: f64 = 50.0;
pub const DEFAULT_SIZE_DIVISOR: f64 = 1000.0;
/// fraction of circular speed given to new particles
pub const DEFAULT_VELOCITY_FACTOR: f64 = 0.75;
/// standard deviation of the vertical offset, sim distance units
pub const DEFAULT_VERTICAL_SCALE: f64 = 1.0;

/// Parameters of one ring generation call.
///
/// The particle population (`slope`, `min_v`, `max_v`, `density`, `spread`)
/// has no defaults and must be given for every ring.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct RingSpec {
    pub ds: f64, // reference distance; particles sit at ds / 2
    #[serde(default = "default_count")]
    pub count: usize,
    pub slope: f64,
    pub min_v: f64,
    pub max_v: f64,
    pub density: f64, // kg/m^3
    pub spread: f64, // in-plane jitter half-width, sim distance units
    #[serde(default = "default_size_scale")]
    pub size_scale: f64,
    #[serde(default = "default_size_divisor")]
    pub size_divisor: f64,
    #[serde(default = "default_velocity_factor")]
    pub velocity_factor: f64,
    #[serde(default = "default_vertical_scale")]
    pub vertical_scale: f64,
}

fn default_count() -> usize { DEFAULT_COUNT }
fn default_size_scale() -> f64 { DEFAULT_SIZE_SCALE }
fn default_size_divisor() -> f64 { DEFAULT_SIZE_DIVISOR }
fn default_velocity_factor() -> f64 { DEFAULT_VELOCITY_FACTOR }
fn default_vertical_scale() -> f64 { DEFAULT_VERTICAL_SCALE }

impl RingSpec {
    /// Ring at reference distance `ds` with an explicit particle population.
    /// Count and the formation constants take their defaults
    pub fn new(ds: f64, slope: f64, min_v: f64, max_v: f64, density: f64, spread: f64) -> Self {
        Self {
            ds,
            count: DEFAULT_COUNT,
            slope,
            min_v,
            max_v,
            density,
            spread,
            size_scale: DEFAULT_SIZE_SCALE,
            size_divisor: DEFAULT_SIZE_DIVISOR,
            velocity_factor: DEFAULT_VELOCITY_FACTOR,
            vertical_scale: DEFAULT_VERTICAL_SCALE,
        }
    }

    /// Saturn's icy ring population: sizes ~ v^-4 on [1, 4], 0.1 kg/m^3,
    /// 5000 km in-plane jitter
    pub fn saturn_ice(ds: f64) -> Self {
        Self::new(ds, -4.0, 1.0, 4.0, 0.1, 5000.0)
    }

    pub fn reference_radius(&self) -> f64 {
        self.ds / 2.0
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.ds.is_finite() && self.ds > 0.0) {
            return Err(Error::InvalidConfiguration(format!(
                "ring distance must be positive, got {}",
                self.ds
            )));
        }
        if self.count == 0 {
            return Err(Error::InvalidConfiguration(
                "ring particle count must be positive".to_string(),
            ));
        }
        let positive = [
            ("density", self.density),
            ("size scale", self.size_scale),
            ("size divisor", self.size_divisor),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidConfiguration(format!(
                    "ring {} must be positive, got {}",
                    name, value
                )));
            }
        }
        let non_negative = [
            ("spread", self.spread),
            ("velocity factor", self.velocity_factor),
            ("vertical scale", self.vertical_scale),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::InvalidConfiguration(format!(
                    "ring {} must be non-negative, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// One generated particle before it is added to a simulation
#[derive(Debug, Clone, PartialEq)]
pub struct RingParticle {
    pub theta: f64, // orbital angle
    pub reference_radius: f64, // un-jittered orbital distance, ds / 2
    pub radius: f64, // physical radius, metres
    pub m: f64, // sim mass units
    pub x: NVec3,
    pub v: NVec3,
}

impl RingParticle {
    pub fn into_init(self) -> BodyInit {
        BodyInit {
            x: self.x,
            v: self.v,
            m: self.m,
            radius: self.radius,
        }
    }
}

/// Draw a single particle for `spec` around a central mass `central_m`.
///
/// `g` and `units` are those of the receiving simulation. The speed is
/// sqrt(G M / rs) * velocity_factor, which in km / s / kg is exactly
/// sqrt(G_SI M / (rs * 1000)) / 1000 * velocity_factor.
pub fn sample_particle<R: Rng + ?Sized>(
    rng: &mut R,
    spec: &RingSpec,
    sizes: &PowerLaw,
    central_m: f64,
    g: f64,
    units: &Units,
) -> RingParticle {
    let radius = spec.size_scale * sizes.sample(rng) / spec.size_divisor;
    let mass_kg = spec.density * 4.0 / 3.0 * PI * radius.powi(3);

    let rs = spec.reference_radius();
    let theta = rng.gen_range(0.0..TAU);
    let (sin, cos) = theta.sin_cos();

    let mut x = rs * cos;
    let mut y = rs * sin;
    x += rng.gen_range(-1.0..1.0) * spec.spread;
    y += rng.gen_range(-1.0..1.0) * spec.spread;
    let n: f64 = StandardNormal.sample(rng);
    let z = n * spec.vertical_scale;

    // tangential to the un-jittered radius vector
    let speed = (g * central_m / rs).sqrt() * spec.velocity_factor;

    RingParticle {
        theta,
        reference_radius: rs,
        radius,
        m: mass_kg * units.mass_from_si(),
        x: NVec3::new(x, y, z),
        v: NVec3::new(-speed * sin, speed * cos, 0.0),
    }
}

/// Append a ring of `spec.count` particles to `sim`, returning their ids.
///
/// Everything is validated and sampled before the first append, so an error
/// leaves the simulation unchanged.
pub fn generate<R: Rng + ?Sized>(
    sim: &mut Simulation,
    spec: &RingSpec,
    rng: &mut R,
) -> Result<Vec<BodyId>> {
    spec.validate()?;
    let sizes = PowerLaw::new(spec.slope, spec.min_v, spec.max_v)?;

    let central_m = sim.central_mass();
    let g = sim.state().g;
    let units = sim.state().units;

    let particles: Vec<RingParticle> = (0..spec.count)
        .map(|_| sample_particle(rng, spec, &sizes, central_m, g, &units))
        .collect();

    if let Some(bad) = particles
        .iter()
        .find(|p| !p.x.iter().chain(p.v.iter()).all(|c| c.is_finite()))
    {
        return Err(Error::InvalidConfiguration(format!(
            "ring produced a non-finite particle at angle {}",
            bad.theta
        )));
    }

    info!(
        "adding {} ring particles at {} (ds = {})",
        spec.count,
        spec.reference_radius(),
        spec.ds
    );
    let mut ids = Vec::with_capacity(particles.len());
    for p in particles {
        ids.push(sim.add_body(p.into_init())?);
    }
    Ok(ids)
}
