//! Binary checkpoints of a `SimulationState`
//!
//! Layout, little-endian, fixed widths:
//!
//! | field            | type      |
//! |------------------|-----------|
//! | magic `RSIM`     | 4 bytes   |
//! | version          | u16       |
//! | unit tags        | 3 x u8    |
//! | t, dt, eps, G    | 4 x f64   |
//! | body count N     | u64       |
//! | N body records   | u64 id + 8 x f64 (m, radius, x, y, z, vx, vy, vz) |
//!
//! A save replaces the whole destination; it is a checkpoint, not a log.

use std::collections::HashSet;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::debug;

use crate::error::{Error, Result};
use crate::simulation::states::{Body, BodyId, NVec3, SimulationState};
use crate::simulation::units::Units;

pub const MAGIC: [u8; 4] = *b"RSIM";
pub const VERSION: u16 = 1;

/// Bytes before the first body record
pub const HEADER_LEN: usize = 4 + 2 + 3 + 4 * 8 + 8;
/// Bytes per body record
pub const RECORD_LEN: usize = 8 + 8 * 8;

fn corrupt(msg: impl Into<String>) -> Error {
    Error::CorruptState(msg.into())
}

/// Serialize `state` into `w`
pub fn write_state<W: Write>(w: &mut W, state: &SimulationState) -> Result<()> {
    w.write_all(&MAGIC)?;
    w.write_u16::<LittleEndian>(VERSION)?;
    w.write_all(&state.units.tags())?;
    w.write_f64::<LittleEndian>(state.t)?;
    w.write_f64::<LittleEndian>(state.dt)?;
    w.write_f64::<LittleEndian>(state.softening)?;
    w.write_f64::<LittleEndian>(state.g)?;
    w.write_u64::<LittleEndian>(state.bodies.len() as u64)?;

    for b in &state.bodies {
        w.write_u64::<LittleEndian>(b.id.0)?;
        w.write_f64::<LittleEndian>(b.m)?;
        w.write_f64::<LittleEndian>(b.radius)?;
        for c in b.x.iter().chain(b.v.iter()) {
            w.write_f64::<LittleEndian>(*c)?;
        }
    }
    Ok(())
}

/// Deserialize a state written by [`write_state`], consuming all of `r`
pub fn read_state<R: Read>(r: &mut R) -> Result<SimulationState> {
    let mut bytes = Vec::new();
    r.read_to_end(&mut bytes)?;
    decode(&bytes)
}

fn decode(bytes: &[u8]) -> Result<SimulationState> {
    if bytes.len() < HEADER_LEN {
        return Err(corrupt(format!(
            "{} bytes is shorter than the {} byte header",
            bytes.len(),
            HEADER_LEN
        )));
    }
    let mut cur = bytes;

    let mut magic = [0u8; 4];
    cur.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(corrupt("bad magic"));
    }
    let version = cur.read_u16::<LittleEndian>()?;
    if version != VERSION {
        return Err(corrupt(format!("unsupported version {}", version)));
    }

    let mut tags = [0u8; 3];
    cur.read_exact(&mut tags)?;
    let units = Units::from_tags(tags).ok_or_else(|| corrupt(format!("unknown unit tags {:?}", tags)))?;

    let t = cur.read_f64::<LittleEndian>()?;
    let dt = cur.read_f64::<LittleEndian>()?;
    let softening = cur.read_f64::<LittleEndian>()?;
    let g = cur.read_f64::<LittleEndian>()?;
    let n = cur.read_u64::<LittleEndian>()?;

    // record count must account for every remaining byte
    let expected = usize::try_from(n)
        .ok()
        .and_then(|n| n.checked_mul(RECORD_LEN))
        .ok_or_else(|| corrupt(format!("body count {} is out of range", n)))?;
    if cur.len() != expected {
        return Err(corrupt(format!(
            "body count {} needs {} record bytes, found {}",
            n,
            expected,
            cur.len()
        )));
    }
    if n == 0 {
        return Err(corrupt("no central body"));
    }
    if !t.is_finite() {
        return Err(corrupt(format!("time is not finite: {}", t)));
    }
    if !(dt.is_finite() && dt > 0.0) {
        return Err(corrupt(format!("invalid time step {}", dt)));
    }
    if !(softening.is_finite() && softening > 0.0) {
        return Err(corrupt(format!("invalid softening {}", softening)));
    }
    if !(g.is_finite() && g > 0.0) {
        return Err(corrupt(format!("invalid gravitational constant {}", g)));
    }

    let mut bodies = Vec::with_capacity(n as usize);
    let mut seen = HashSet::with_capacity(n as usize);
    for _ in 0..n {
        let id = BodyId(cur.read_u64::<LittleEndian>()?);
        if !seen.insert(id) {
            return Err(corrupt(format!("duplicate body id {}", id)));
        }
        let m = cur.read_f64::<LittleEndian>()?;
        let radius = cur.read_f64::<LittleEndian>()?;
        let mut c = [0f64; 6];
        cur.read_f64_into::<LittleEndian>(&mut c)?;
        bodies.push(Body {
            id,
            x: NVec3::new(c[0], c[1], c[2]),
            v: NVec3::new(c[3], c[4], c[5]),
            m,
            radius,
        });
    }

    Ok(SimulationState {
        t,
        dt,
        softening,
        g,
        units,
        bodies,
    })
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

fn write_file(path: &Path, state: &SimulationState) -> Result<()> {
    let file = File::create(path)?;
    let mut w = BufWriter::new(file);
    write_state(&mut w, state)?;
    w.flush()?;
    w.get_ref().sync_all()?;
    Ok(())
}

/// Write a checkpoint, replacing anything at `path`.
/// The bytes go to a sibling temporary file that is then renamed over `path`
pub fn save(state: &SimulationState, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let tmp = temp_path(path);

    let written = write_file(&tmp, state).and_then(|()| Ok(fs::rename(&tmp, path)?));
    if let Err(e) = written {
        // drop the partial temp file
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }

    debug!(
        "saved {} bodies at t = {} s to {}",
        state.bodies.len(),
        state.t,
        path.display()
    );
    Ok(())
}

pub fn load(path: impl AsRef<Path>) -> Result<SimulationState> {
    let bytes = fs::read(path.as_ref())?;
    decode(&bytes)
}
