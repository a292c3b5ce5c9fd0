pub mod error;
pub mod simulation;
pub mod generation;
pub mod storage;
pub mod configuration;
pub mod benchmark;

pub use error::{Error, Result};

pub use simulation::states::{Body, BodyId, BodyInit, SimulationState, NVec2, NVec3};
pub use simulation::units::{Units, DistanceUnit, TimeUnit, MassUnit, G_SI};
pub use simulation::params::Parameters;
pub use simulation::engine::{Simulation, CentralBody, Status};
pub use simulation::forces::{GravityEvaluator, GravityMode, DirectGravity};
pub use simulation::snapshot::{Snapshot, SnapshotEntry, SnapshotSink, NullSink};
pub use simulation::scenario::{Scenario, RingReport};

pub use generation::powerlaw::PowerLaw;
pub use generation::ring::{generate, RingSpec, RingParticle};

pub use storage::state_store::{save, load};

pub use configuration::config::{ScenarioConfig, EngineConfig, ParametersConfig, CentralConfig, RingConfig, ScheduleConfig};

pub use benchmark::benchmark::{bench_gravity, bench_integrate_curve};
