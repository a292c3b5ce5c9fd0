//! Configuration types for loading ring-formation scenarios from YAML.
//!
//! A scenario consists of:
//!
//! - [`EngineConfig`]     – gravity evaluation mode
//! - [`ParametersConfig`] – step size, softening, units and seed
//! - [`CentralConfig`]    – the massive body at index 0
//! - [`RingSpec`]s        – one entry per ring, generated in order
//! - [`ScheduleConfig`]   – how far to integrate after each ring
//! - `checkpoint`         – file overwritten after every ring
//!
//! # YAML format
//!
//! ```yaml
//! engine:
//!   gravity: "basic"
//!
//! parameters:
//!   dt: 10.0                # seconds
//!   softening: 0.2          # km
//!   units: { distance: "km", time: "s", mass: "kg" }
//!   seed: 42                # omit for a different run every time
//!
//! central:
//!   name: "Saturn"
//!   m: 5.6834e26            # kg
//!   radius: 5.8232e7        # m
//!
//! rings:
//!   - name: "A"
//!     ds: 273496.0          # particles start at ds / 2
//!   - name: "B"
//!     ds: 253166.0
//!     count: 500
//!
//! schedule:
//!   jumps: 50
//!   jump_interval: 100.0
//!
//! checkpoint: "ringsim.bin"
//! ```
//!
//! Ring fields other than `ds` default to the values in
//! [`crate::generation::ring`].

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::generation::ring::RingSpec;
use crate::simulation::forces::GravityMode;
use crate::simulation::units::Units;

#[derive(Deserialize, Debug, Clone, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub gravity: GravityMode, // only "basic" (direct summation) for now
}

#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    pub dt: f64, // fixed step size
    pub softening: f64, // softening length, prevents singular forces at small separations
    #[serde(default)]
    pub units: Units,
    pub g: Option<f64>, // overrides the G derived from `units`
    pub seed: Option<u64>, // deterministic seed to make runs reproducible
}

#[derive(Deserialize, Debug, Clone)]
pub struct CentralConfig {
    #[serde(default = "default_central_name")]
    pub name: String,
    pub m: f64, // mass in sim units
    pub radius: f64, // metres
}

fn default_central_name() -> String {
    "central".to_string()
}

#[derive(Deserialize, Debug, Clone)]
pub struct RingConfig {
    pub name: String,
    #[serde(flatten)]
    pub spec: RingSpec,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ScheduleConfig {
    pub jumps: usize, // integrate calls per ring
    pub jump_interval: f64, // time added per call
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    pub parameters: ParametersConfig,
    pub central: CentralConfig,
    pub rings: Vec<RingConfig>,
    pub schedule: ScheduleConfig,
    pub checkpoint: Option<String>,
}

impl ScenarioConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        serde_yaml::from_str(s).context("failed to parse scenario")
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("failed to open scenario {}", path.display()))?;
        let reader = BufReader::new(file);
        serde_yaml::from_reader(reader)
            .with_context(|| format!("failed to parse scenario {}", path.display()))
    }
}
