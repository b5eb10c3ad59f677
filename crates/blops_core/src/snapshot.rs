//! Frame snapshots handed to renderers and other read-only observers.

use crate::simulation::Simulation;
use blops_data::{BlopSnapshot, SpeciesId, WorldSnapshot};

impl Simulation {
    /// Captures the current frame, resolving each species to a display color
    /// through `color_of`.
    pub fn snapshot<F>(&self, color_of: F) -> WorldSnapshot
    where
        F: Fn(SpeciesId) -> [u8; 3],
    {
        let bounds = self.bounds();
        WorldSnapshot {
            tick: self.tick(),
            width: bounds.width,
            height: bounds.height,
            blops: self
                .blops()
                .iter()
                .map(|b| BlopSnapshot {
                    x: b.position.x,
                    y: b.position.y,
                    vx: b.velocity.vx,
                    vy: b.velocity.vy,
                    species: b.species,
                    color: color_of(b.species),
                })
                .collect(),
            species: self.stats(),
        }
    }
}

/// Serializes a snapshot as a single JSON line (no trailing newline).
pub fn to_json_line(snapshot: &WorldSnapshot) -> serde_json::Result<String> {
    serde_json::to_string(snapshot)
}
