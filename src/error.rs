//! Error types for ringsim.
//!
//! Every failure in the core is reported to the caller; nothing is retried
//! or clamped inside the library.

use std::fmt;
use std::io;

use crate::simulation::states::BodyId;

/// Errors produced by sampling, generation, integration and the state store.
#[derive(Debug)]
pub enum Error {
    /// Power-law parameters are singular or out of order.
    InvalidDistributionParameters(String),
    /// A ring spec, simulation parameter or integration target is unusable.
    InvalidConfiguration(String),
    /// A position or velocity became non-finite.
    NumericalDivergence {
        /// Body whose state went non-finite (first one found).
        body: Option<BodyId>,
        /// Simulation time at which it was detected.
        t: f64,
    },
    /// A persisted checkpoint does not match the expected layout.
    CorruptState(String),
    /// Reading or writing a checkpoint failed at the OS level.
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidDistributionParameters(msg) => {
                write!(f, "invalid distribution parameters: {}", msg)
            }
            Error::InvalidConfiguration(msg) => write!(f, "invalid configuration: {}", msg),
            Error::NumericalDivergence { body: Some(id), t } => {
                write!(f, "numerical divergence at t = {} s (body {})", t, id)
            }
            Error::NumericalDivergence { body: None, t } => {
                write!(f, "numerical divergence at t = {} s", t)
            }
            Error::CorruptState(msg) => write!(f, "corrupt simulation state: {}", msg),
            Error::Io(e) => write!(f, "state store I/O failed: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
