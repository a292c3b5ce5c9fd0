use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::Result;
use crate::generation::ring::{generate, RingSpec};
use crate::simulation::engine::{CentralBody, Simulation};
use crate::simulation::forces::{DirectGravity, GravityEvaluator};
use crate::simulation::params::Parameters;
use crate::simulation::states::NVec3;
use crate::simulation::units::Units;

/// Saturn plus `n - 1` particles of ring A, fixed seed
fn make_simulation(n: usize) -> Result<Simulation> {
    let params = Parameters::new(10.0, 0.2, Units::default())?;
    let mut sim = Simulation::new(params, &CentralBody::saturn())?;

    let mut spec = RingSpec::saturn_ice(273_496.0);
    spec.count = n.saturating_sub(1).max(1);
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    generate(&mut sim, &spec, &mut rng)?;
    Ok(sim)
}

/// Time one direct force evaluation for a range of N
pub fn bench_gravity() -> Result<()> {
    let ns = [250, 500, 1000, 2000, 4000, 7000];

    for n in ns {
        let sim = make_simulation(n)?;
        let mut out = vec![NVec3::zeros(); sim.body_count()];

        // Warm up
        DirectGravity.accelerations(sim.state(), &mut out);

        let t0 = Instant::now();
        DirectGravity.accelerations(sim.state(), &mut out);
        let dt_direct = t0.elapsed().as_secs_f64();

        println!("N = {:5}, direct = {:8.6} s", sim.body_count(), dt_direct);
    }
    Ok(())
}

/// Time one 100 s jump (10 sub-steps) for a range of N
/// Paste output directly into a spreadsheet to graph
pub fn bench_integrate_curve() -> Result<()> {
    println!("N,jump_ms");

    for n in (500..=7000).step_by(500) {
        let mut sim = make_simulation(n)?;

        let t0 = Instant::now();
        let target = sim.t() + 100.0;
        sim.integrate(target)?;
        let ms = t0.elapsed().as_secs_f64() * 1000.0;

        println!("{},{:.6}", sim.body_count(), ms);
    }
    Ok(())
}
