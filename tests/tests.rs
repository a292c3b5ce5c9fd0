use ringsim::simulation::diagnostics::{angular_momentum, center_of_mass, linear_momentum, total_energy};
use ringsim::simulation::integrator::{plan_substeps, verlet_step};
use ringsim::{
    Body, BodyId, BodyInit, CentralBody, DirectGravity, Error, GravityEvaluator, NVec3, Parameters,
    Simulation, SimulationState, Units,
};

/// Build a simple 2-body state separated along the x-axis
pub fn two_body_state(dist: f64, m1: f64, m2: f64) -> SimulationState {
    let b1 = Body {
        id: BodyId(0),
        x: [-dist / 2.0, 0.0, 0.0].into(),
        v: [0.0, 0.0, 0.0].into(),
        m: m1,
        radius: 0.0,
    };
    let b2 = Body {
        id: BodyId(1),
        x: [dist / 2.0, 0.0, 0.0].into(),
        v: [0.0, 0.0, 0.0].into(),
        m: m2,
        radius: 0.0,
    };
    SimulationState {
        t: 0.0,
        dt: 0.001,
        softening: 1e-6,
        g: 0.1,
        units: Units::default(),
        bodies: vec![b1, b2],
    }
}

/// km / s / kg, dt = 10 s, softening 0.2 km
pub fn saturn_params() -> Parameters {
    Parameters::new(10.0, 0.2, Units::default()).unwrap()
}

/// Saturn plus one test particle on a circular orbit at `r` km
pub fn saturn_with_moonlet(r: f64, m: f64) -> Simulation {
    let mut sim = Simulation::new(saturn_params(), &CentralBody::saturn()).unwrap();
    let v = (sim.state().g * sim.central_mass() / r).sqrt();
    sim.add_body(BodyInit {
        x: NVec3::new(r, 0.0, 0.0),
        v: NVec3::new(0.0, v, 0.0),
        m,
        radius: 0.1,
    })
    .unwrap();
    sim
}

// ==================================================================================
// Gravity tests
// ==================================================================================

#[test]
fn gravity_newton_third_law() {
    let state = two_body_state(1.0, 2.0, 3.0);

    let mut acc = vec![NVec3::zeros(); 2];
    DirectGravity.accelerations(&state, &mut acc);

    let net = acc[0] * state.bodies[0].m + acc[1] * state.bodies[1].m;

    assert!(net.norm() < 1e-12, "Net momentum not zero: {:?}", net);
}

#[test]
fn gravity_points_toward_other_body() {
    let state = two_body_state(2.0, 1.0, 1.0);

    let mut acc = vec![NVec3::zeros(); 2];
    DirectGravity.accelerations(&state, &mut acc);

    let dx = state.bodies[1].x - state.bodies[0].x;
    assert!(acc[0].dot(&dx) > 0.0, "Acceleration is not toward second body");
    assert!(acc[1].dot(&dx) < 0.0, "Acceleration is not toward first body");
}

#[test]
fn gravity_inverse_square_law() {
    let state_r = two_body_state(1.0, 1.0, 1.0);
    let state_2r = two_body_state(2.0, 1.0, 1.0);

    let mut acc_r = vec![NVec3::zeros(); 2];
    let mut acc_2r = vec![NVec3::zeros(); 2];
    DirectGravity.accelerations(&state_r, &mut acc_r);
    DirectGravity.accelerations(&state_2r, &mut acc_2r);

    let ratio = acc_r[0].norm() / acc_2r[0].norm();

    assert!((ratio - 4.0).abs() < 1e-3, "Expected ~4x, got {}", ratio);
}

#[test]
fn gravity_softening_prevents_blowup() {
    let mut state = two_body_state(1e-9, 1.0, 1.0);
    state.softening = 0.3;

    let mut acc = vec![NVec3::zeros(); 2];
    DirectGravity.accelerations(&state, &mut acc);

    assert!(acc[0].norm() < 1e-6, "Softening failed; acceleration too large");
}

#[test]
fn gravity_overwrites_output_buffer() {
    let state = two_body_state(1.0, 1.0, 1.0);

    let mut fresh = vec![NVec3::zeros(); 2];
    let mut stale = vec![NVec3::new(5.0, 5.0, 5.0); 2];
    DirectGravity.accelerations(&state, &mut fresh);
    DirectGravity.accelerations(&state, &mut stale);

    assert_eq!(fresh, stale);
}

#[test]
fn central_body_is_pulled_by_particles() {
    let sim = saturn_with_moonlet(136_748.0, 1e20);

    let mut acc = vec![NVec3::zeros(); 2];
    DirectGravity.accelerations(sim.state(), &mut acc);

    assert!(acc[0].x > 0.0, "central body should accelerate toward the particle");
}

// ==================================================================================
// Integrator tests
// ==================================================================================

#[test]
fn plan_exact_multiple() {
    let plan = plan_substeps(0.0, 100.0, 10.0);
    assert_eq!(plan.steps, 10);
    assert!((plan.last - 10.0).abs() < 1e-9);
}

#[test]
fn plan_clips_final_step() {
    let plan = plan_substeps(0.0, 95.0, 10.0);
    assert_eq!(plan.steps, 10);
    assert!((plan.last - 5.0).abs() < 1e-9);
}

#[test]
fn plan_ignores_rounding_residue() {
    // 0.1 + 0.2 != 0.3, so the interval is an exact multiple only up to rounding
    let t = 0.1 + 0.2;
    let plan = plan_substeps(t, t + 1.0, 0.1);
    assert_eq!(plan.steps, 10);

    let plan = plan_substeps(5.0, 5.0, 10.0);
    assert_eq!(plan.steps, 0);
}

#[test]
fn plan_tiny_interval_is_one_step() {
    let plan = plan_substeps(0.0, 1e-4, 1e6);
    assert_eq!(plan.steps, 1);
    assert!((plan.last - 1e-4).abs() < 1e-18);
}

#[test]
fn verlet_step_advances_time_and_moves_bodies() {
    let mut state = two_body_state(1.0, 1.0, 1.0);
    let mut acc = vec![NVec3::zeros(); 2];
    DirectGravity.accelerations(&state, &mut acc);

    let x0 = state.bodies[1].x;
    verlet_step(&mut state, &DirectGravity, 0.01, &mut acc);

    assert!((state.t - 0.01).abs() < 1e-15);
    assert!(state.bodies[1].x.x < x0.x, "bodies should fall toward each other");
}

#[test]
fn two_body_energy_and_angular_momentum_conserved() {
    let mut sim = saturn_with_moonlet(136_748.0, 1.0e3);

    let e0 = total_energy(sim.state());
    let l0 = angular_momentum(sim.state());

    // 1000 sub-steps of dt = 10
    sim.integrate(10_000.0).unwrap();

    let e1 = total_energy(sim.state());
    let l1 = angular_momentum(sim.state());

    let de = ((e1 - e0) / e0).abs();
    let dl = (l1 - l0).norm() / l0.norm();
    assert!(de < 1e-3, "Energy drift too large: {}", de);
    assert!(dl < 1e-3, "Angular momentum drift too large: {}", dl);

    // still roughly on the circle
    let r = sim.state().bodies[1].x.norm();
    assert!((r - 136_748.0).abs() / 136_748.0 < 1e-3, "orbit radius drifted to {}", r);
}

#[test]
fn integrate_to_current_time_is_noop() {
    let mut sim = saturn_with_moonlet(100_000.0, 1.0);
    let before = sim.state().clone();

    let t0 = sim.t();
    sim.integrate(t0).unwrap();
    sim.integrate(t0).unwrap();
    assert_eq!(sim.state(), &before);

    sim.integrate(100.0).unwrap();
    let after_first = sim.state().clone();
    sim.integrate(100.0).unwrap();
    assert_eq!(sim.state(), &after_first);
}

#[test]
fn integrate_lands_exactly_on_clipped_target() {
    let mut sim = saturn_with_moonlet(100_000.0, 1.0);
    sim.integrate(95.0).unwrap();
    assert_eq!(sim.t(), 95.0);

    // repeated jumps of 100 keep t on the grid
    for i in 1..=5 {
        let target = sim.t() + 100.0;
        sim.integrate(target).unwrap();
        assert_eq!(sim.t(), target, "jump {}", i);
    }
}

#[test]
fn clipped_step_matches_manual_steps() {
    let mut sim = saturn_with_moonlet(100_000.0, 1.0);
    let mut state = sim.state().clone();

    sim.integrate(25.0).unwrap();

    let mut acc = vec![NVec3::zeros(); state.bodies.len()];
    DirectGravity.accelerations(&state, &mut acc);
    verlet_step(&mut state, &DirectGravity, 10.0, &mut acc);
    verlet_step(&mut state, &DirectGravity, 10.0, &mut acc);
    verlet_step(&mut state, &DirectGravity, 5.0, &mut acc);

    let diff = (sim.state().bodies[1].x - state.bodies[1].x).norm();
    assert!(diff < 1e-9, "positions differ by {}", diff);
}

#[test]
fn integrate_interval_far_below_dt_still_moves_bodies() {
    let params = Parameters::new(1e6, 0.2, Units::default()).unwrap();
    let mut sim = Simulation::new(params, &CentralBody::saturn()).unwrap();
    sim.add_body(BodyInit {
        x: NVec3::new(1.0e6, 0.0, 0.0),
        v: NVec3::new(0.0, 10.0, 0.0),
        m: 1.0,
        radius: 0.1,
    })
    .unwrap();

    sim.integrate(1e-4).unwrap();

    let moved = sim.state().bodies[1].x.y;
    assert!((moved - 1e-3).abs() < 1e-12, "moved {} km", moved);
    assert_eq!(sim.t(), 1e-4);
}

#[test]
fn integrate_backwards_is_rejected() {
    let mut sim = saturn_with_moonlet(100_000.0, 1.0);
    sim.integrate(100.0).unwrap();
    let before = sim.state().clone();

    let err = sim.integrate(50.0).unwrap_err();
    assert!(matches!(err, Error::InvalidConfiguration(_)), "{:?}", err);
    assert_eq!(sim.state(), &before);

    let err = sim.integrate(f64::NAN).unwrap_err();
    assert!(matches!(err, Error::InvalidConfiguration(_)), "{:?}", err);
    assert_eq!(sim.state(), &before);
}

#[test]
fn divergence_is_reported_and_sticky() {
    let params = saturn_params().with_g(1.0).unwrap();
    let central = CentralBody {
        name: "heavy".to_string(),
        m: 1e308,
        radius: 1.0,
    };
    let mut sim = Simulation::new(params, &central).unwrap();
    sim.add_body(BodyInit {
        x: NVec3::new(1.0, 0.0, 0.0),
        v: NVec3::zeros(),
        m: 1.0,
        radius: 0.0,
    })
    .unwrap();

    let err = sim.integrate(10.0).unwrap_err();
    assert!(matches!(err, Error::NumericalDivergence { .. }), "{:?}", err);
    assert!(sim.is_diverged());

    let err = sim.integrate(20.0).unwrap_err();
    assert!(matches!(err, Error::NumericalDivergence { .. }), "{:?}", err);
}

#[test]
fn non_finite_state_rejected_before_stepping() {
    let mut state = saturn_with_moonlet(100_000.0, 1.0).into_state();
    state.bodies[1].v.x = f64::NAN;

    let mut sim = Simulation::from_state(state.clone()).unwrap();
    assert!(sim.is_diverged());

    let err = sim.integrate(10.0).unwrap_err();
    match err {
        Error::NumericalDivergence { body, .. } => assert_eq!(body, Some(BodyId(1))),
        other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(sim.t(), 0.0);
}

// ==================================================================================
// Engine tests
// ==================================================================================

#[test]
fn invalid_parameters_are_rejected() {
    let err = Parameters::new(0.0, 0.2, Units::default()).unwrap_err();
    assert!(matches!(err, Error::InvalidConfiguration(_)));

    let err = Parameters::new(10.0, -1.0, Units::default()).unwrap_err();
    assert!(matches!(err, Error::InvalidConfiguration(_)));

    let central = CentralBody {
        name: "none".to_string(),
        m: 0.0,
        radius: 1.0,
    };
    let err = Simulation::new(saturn_params(), &central).unwrap_err();
    assert!(matches!(err, Error::InvalidConfiguration(_)));
}

#[test]
fn status_reports_time_count_and_central_mass() {
    let mut sim = saturn_with_moonlet(100_000.0, 1.0);
    sim.integrate(30.0).unwrap();

    let status = sim.status();
    assert_eq!(status.t, 30.0);
    assert_eq!(status.body_count, 2);
    assert_eq!(status.central_mass, 5.6834e26);
    assert!(status.to_string().contains("bodies = 2"));
}

#[test]
fn add_body_assigns_fresh_ids_in_order() {
    let mut sim = Simulation::new(saturn_params(), &CentralBody::saturn()).unwrap();
    let init = BodyInit {
        x: NVec3::new(1.0e5, 0.0, 0.0),
        v: NVec3::zeros(),
        m: 1.0,
        radius: 0.1,
    };
    let a = sim.add_body(init.clone()).unwrap();
    let b = sim.add_body(init.clone()).unwrap();
    assert_eq!(a, BodyId(1));
    assert_eq!(b, BodyId(2));
    assert_eq!(sim.state().bodies[0].id, BodyId(0));

    let mut bad = init;
    bad.m = -1.0;
    assert!(sim.add_body(bad).is_err());
    assert_eq!(sim.body_count(), 3);
}

#[test]
fn ids_continue_after_largest_loaded_id() {
    let mut state = two_body_state(1.0, 1.0, 1.0);
    state.bodies[1].id = BodyId(41);
    let mut sim = Simulation::from_state(state).unwrap();

    let init = BodyInit {
        x: NVec3::new(3.0, 0.0, 0.0),
        v: NVec3::zeros(),
        m: 1.0,
        radius: 0.0,
    };
    assert_eq!(sim.add_body(init.clone()).unwrap(), BodyId(42));
    assert_eq!(sim.add_body(init).unwrap(), BodyId(43));
}

#[test]
fn move_to_com_zeroes_centre_and_momentum() {
    let mut sim = saturn_with_moonlet(136_748.0, 1e24);
    sim.move_to_com();

    let com = center_of_mass(sim.state()).unwrap();
    let p = linear_momentum(sim.state());
    assert!(com.norm() < 1e-6, "com at {:?}", com);
    assert!(p.norm() < 1e-3 * 1e24, "momentum {:?}", p);
}

#[test]
fn snapshot_flags_central_and_projects_xy() {
    let mut sim = saturn_with_moonlet(120_000.0, 1.0);
    sim.integrate(50.0).unwrap();

    let snap = sim.snapshot();
    assert_eq!(snap.t, 50.0);
    assert_eq!(snap.entries.len(), 2);
    assert!(snap.entries[0].is_central);
    assert!(!snap.entries[1].is_central);
    assert_eq!(snap.central().unwrap().radius, 5.8232e7);
    assert_eq!(snap.particles().count(), 1);

    let b = &sim.state().bodies[1];
    assert_eq!(snap.entries[1].id, b.id);
    assert_eq!(snap.entries[1].position.x, b.x.x);
    assert_eq!(snap.entries[1].position.y, b.x.y);

    // taking a snapshot does not disturb the state
    let before = sim.state().clone();
    let _ = sim.snapshot();
    assert_eq!(sim.state(), &before);
}
