pub mod states;
pub mod units;
pub mod params;
pub mod engine;
pub mod forces;
pub mod integrator;
pub mod diagnostics;
pub mod snapshot;
pub mod scenario;
