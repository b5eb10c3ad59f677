use serde::{Deserialize, Serialize};

use super::entity::SpeciesId;

/// Read-only view of one blop, with its display color already resolved.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BlopSnapshot {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub species: SpeciesId,
    pub color: [u8; 3],
}

/// Aggregate figures for a single species.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct SpeciesStats {
    pub species: SpeciesId,
    /// Number of living blops of this species.
    pub count: usize,
    /// Mean position, `(0, 0)` when the species is empty.
    pub centroid: (f64, f64),
    pub mean_speed: f64,
}

/// Everything a renderer needs to draw one frame.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub width: f64,
    pub height: f64,
    pub blops: Vec<BlopSnapshot>,
    pub species: Vec<SpeciesStats>,
}
