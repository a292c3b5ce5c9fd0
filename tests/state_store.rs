use std::fs;
use std::path::PathBuf;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use ringsim::storage::state_store::{read_state, write_state, HEADER_LEN, RECORD_LEN};
use ringsim::{
    generate, load, save, CentralBody, DistanceUnit, Error, MassUnit, Parameters, RingSpec,
    Simulation, SimulationState, TimeUnit, Units,
};

/// Saturn with a small ring, integrated a little so every field is non-trivial
fn evolved_state() -> SimulationState {
    let params = Parameters::new(10.0, 0.2, Units::default()).unwrap();
    let mut sim = Simulation::new(params, &CentralBody::saturn()).unwrap();
    let mut spec = RingSpec::saturn_ice(273_496.0);
    spec.count = 25;
    generate(&mut sim, &spec, &mut ChaCha8Rng::seed_from_u64(3)).unwrap();
    sim.integrate(200.0).unwrap();
    sim.into_state()
}

fn temp_file(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("ringsim_{}_{}.bin", name, std::process::id()))
}

fn encode(state: &SimulationState) -> Vec<u8> {
    let mut bytes = Vec::new();
    write_state(&mut bytes, state).unwrap();
    bytes
}

fn assert_corrupt(bytes: &[u8]) {
    let err = read_state(&mut &bytes[..]).unwrap_err();
    assert!(matches!(err, Error::CorruptState(_)), "{:?}", err);
}

#[test]
fn round_trip_in_memory() {
    let state = evolved_state();
    let bytes = encode(&state);

    assert_eq!(bytes.len(), HEADER_LEN + state.bodies.len() * RECORD_LEN);

    let back = read_state(&mut &bytes[..]).unwrap();
    assert_eq!(back, state);
}

#[test]
fn round_trip_keeps_units() {
    let mut state = evolved_state();
    state.units = Units::new(DistanceUnit::AstronomicalUnit, TimeUnit::Year, MassUnit::SolarMass);

    let back = read_state(&mut &encode(&state)[..]).unwrap();
    assert_eq!(back.units, state.units);
}

#[test]
fn save_overwrites_and_load_round_trips() {
    let path = temp_file("overwrite");
    let state = evolved_state();

    let mut bigger = state.clone();
    bigger.bodies.extend(state.bodies[1..].iter().cloned().map(|mut b| {
        b.id.0 += 1000;
        b
    }));
    save(&bigger, &path).unwrap();
    save(&state, &path).unwrap();

    let loaded = load(&path).unwrap();
    assert_eq!(loaded, state);
    assert_eq!(
        fs::metadata(&path).unwrap().len() as usize,
        HEADER_LEN + state.bodies.len() * RECORD_LEN
    );

    fs::remove_file(&path).unwrap();
}

#[test]
fn reloaded_state_continues_identically() {
    let path = temp_file("resume");
    let state = evolved_state();
    save(&state, &path).unwrap();

    let mut original = Simulation::from_state(state).unwrap();
    let mut resumed = Simulation::from_state(load(&path).unwrap()).unwrap();

    original.integrate(500.0).unwrap();
    resumed.integrate(500.0).unwrap();
    assert_eq!(original.state(), resumed.state());

    fs::remove_file(&path).unwrap();
}

#[test]
fn missing_file_is_io_error() {
    let err = load(temp_file("does_not_exist")).unwrap_err();
    assert!(matches!(err, Error::Io(_)), "{:?}", err);
}

#[test]
fn failed_save_removes_temp_file() {
    // a directory at the destination makes the final rename fail
    let dir = temp_file("dir_target");
    fs::create_dir_all(&dir).unwrap();

    let err = save(&evolved_state(), &dir).unwrap_err();
    assert!(matches!(err, Error::Io(_)), "{:?}", err);

    let mut tmp = dir.clone().into_os_string();
    tmp.push(".tmp");
    assert!(!PathBuf::from(tmp).exists());
    assert!(dir.is_dir());

    fs::remove_dir(&dir).unwrap();
}

#[test]
fn truncated_and_trailing_bytes_are_corrupt() {
    let bytes = encode(&evolved_state());

    assert_corrupt(&[]);
    assert_corrupt(&bytes[..HEADER_LEN - 1]);
    assert_corrupt(&bytes[..bytes.len() - 1]);
    assert_corrupt(&bytes[..bytes.len() - RECORD_LEN]);

    let mut longer = bytes.clone();
    longer.push(0);
    assert_corrupt(&longer);
}

#[test]
fn bad_header_is_corrupt() {
    let bytes = encode(&evolved_state());

    let mut magic = bytes.clone();
    magic[0] = b'X';
    assert_corrupt(&magic);

    let mut version = bytes.clone();
    version[4] = 9;
    assert_corrupt(&version);

    let mut units = bytes.clone();
    units[6] = 200;
    assert_corrupt(&units);

    // dt sits after magic, version, tags and t
    let mut dt = bytes.clone();
    dt[4 + 2 + 3 + 8..4 + 2 + 3 + 16].copy_from_slice(&(-1.0f64).to_le_bytes());
    assert_corrupt(&dt);
}

#[test]
fn record_count_mismatch_is_corrupt() {
    let bytes = encode(&evolved_state());
    let count_at = HEADER_LEN - 8;

    let n = u64::from_le_bytes(bytes[count_at..HEADER_LEN].try_into().unwrap());

    let mut more = bytes.clone();
    more[count_at..HEADER_LEN].copy_from_slice(&(n + 1).to_le_bytes());
    assert_corrupt(&more);

    let mut huge = bytes.clone();
    huge[count_at..HEADER_LEN].copy_from_slice(&u64::MAX.to_le_bytes());
    assert_corrupt(&huge);

    let mut none = bytes[..HEADER_LEN].to_vec();
    none[count_at..HEADER_LEN].copy_from_slice(&0u64.to_le_bytes());
    assert_corrupt(&none);
}

#[test]
fn duplicate_ids_are_corrupt() {
    let mut state = evolved_state();
    state.bodies[2].id = state.bodies[1].id;
    assert_corrupt(&encode(&state));
}
