//! Bounded power-law sampling by inverse CDF
//!
//! For a density proportional to x^slope on [min_v, max_v] and y ~ U[0, 1):
//!
//! x = ((max_v^(k) - min_v^(k)) * y + min_v^(k))^(1/k),  k = slope + 1
//!
//! k = 0 (slope = -1) is the logarithmic case and is rejected.

use rand::Rng;
use rand_distr::Distribution;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerLaw {
    slope: f64,
    min_v: f64,
    max_v: f64,
    pow_min: f64, // min_v^(slope+1)
    pow_max: f64, // max_v^(slope+1)
}

impl PowerLaw {
    pub fn new(slope: f64, min_v: f64, max_v: f64) -> Result<Self> {
        if !(slope.is_finite() && min_v.is_finite() && max_v.is_finite()) {
            return Err(Error::InvalidDistributionParameters(format!(
                "parameters must be finite (slope {}, min {}, max {})",
                slope, min_v, max_v
            )));
        }
        if slope == -1.0 {
            return Err(Error::InvalidDistributionParameters(
                "slope -1 makes the inverse CDF singular".to_string(),
            ));
        }
        if min_v <= 0.0 {
            return Err(Error::InvalidDistributionParameters(format!(
                "lower bound must be positive, got {}",
                min_v
            )));
        }
        if min_v >= max_v {
            return Err(Error::InvalidDistributionParameters(format!(
                "lower bound {} must be below upper bound {}",
                min_v, max_v
            )));
        }

        let k = slope + 1.0;
        Ok(Self {
            slope,
            min_v,
            max_v,
            pow_min: min_v.powf(k),
            pow_max: max_v.powf(k),
        })
    }

    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.min_v, self.max_v)
    }

    /// Inverse CDF at `y` in [0, 1]
    pub fn invert(&self, y: f64) -> f64 {
        let k = self.slope + 1.0;
        let x = ((self.pow_max - self.pow_min) * y + self.pow_min).powf(k.recip());
        // rounding in powf can land a hair outside the support
        x.clamp(self.min_v, self.max_v)
    }
}

impl Distribution<f64> for PowerLaw {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let y: f64 = rng.gen();
        self.invert(y)
    }
}

/// One draw from the power law on [min_v, max_v]
pub fn sample<R: Rng + ?Sized>(rng: &mut R, slope: f64, min_v: f64, max_v: f64) -> Result<f64> {
    Ok(PowerLaw::new(slope, min_v, max_v)?.sample(rng))
}
