//! Read-only projections of the simulation for renderers

use super::engine::Simulation;
use super::states::{BodyId, NVec2, SimulationState};

#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotEntry {
    pub id: BodyId,
    pub position: NVec2, // x, y in sim distance units
    pub radius: f64, // metres; a relative scale for particles
    pub is_central: bool,
}

/// Bodies in insertion order at time `t`
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub t: f64,
    pub entries: Vec<SnapshotEntry>,
}

impl Snapshot {
    pub fn of_state(state: &SimulationState) -> Self {
        let entries = state
            .bodies
            .iter()
            .enumerate()
            .map(|(i, b)| SnapshotEntry {
                id: b.id,
                position: NVec2::new(b.x.x, b.x.y),
                radius: b.radius,
                is_central: i == 0,
            })
            .collect();

        Self { t: state.t, entries }
    }

    pub fn central(&self) -> Option<&SnapshotEntry> {
        self.entries.first().filter(|e| e.is_central)
    }

    pub fn particles(&self) -> impl Iterator<Item = &SnapshotEntry> {
        self.entries.iter().filter(|e| !e.is_central)
    }
}

impl Simulation {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::of_state(self.state())
    }
}

/// Consumer of snapshots produced while a scenario runs
pub trait SnapshotSink {
    /// `frame` is 0 right after a ring is generated, then 1.. after each jump
    fn frame(&mut self, ring: &str, frame: usize, snapshot: &Snapshot);
}

/// Sink that drops every snapshot
#[derive(Debug, Default)]
pub struct NullSink;

impl SnapshotSink for NullSink {
    fn frame(&mut self, _ring: &str, _frame: usize, _snapshot: &Snapshot) {}
}
