//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds the settings fixed at initialization:
//! - integration step size `dt`,
//! - softening length `softening`,
//! - unit system and gravitational constant `g`

use crate::error::{Error, Result};

use super::units::Units;

#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub dt: f64, // step size
    pub softening: f64, // softening length
    pub units: Units,
    pub g: f64, // gravitational constant
}

impl Parameters {
    /// Parameters with `g` derived from `units`
    pub fn new(dt: f64, softening: f64, units: Units) -> Result<Self> {
        let params = Self {
            dt,
            softening,
            units,
            g: units.gravitational_constant(),
        };
        params.validate()?;
        Ok(params)
    }

    /// Replace the derived gravitational constant
    pub fn with_g(mut self, g: f64) -> Result<Self> {
        self.g = g;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(Error::InvalidConfiguration(format!(
                "time step must be positive, got {}",
                self.dt
            )));
        }
        if !(self.softening.is_finite() && self.softening > 0.0) {
            return Err(Error::InvalidConfiguration(format!(
                "softening length must be positive, got {}",
                self.softening
            )));
        }
        if !(self.g.is_finite() && self.g > 0.0) {
            return Err(Error::InvalidConfiguration(format!(
                "gravitational constant must be positive, got {}",
                self.g
            )));
        }
        Ok(())
    }
}
