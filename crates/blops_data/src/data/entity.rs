use serde::{Deserialize, Serialize};
use std::fmt;

/// World position of a blop.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared distance to `other`.
    #[inline]
    #[must_use]
    pub fn distance_sq(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    #[must_use]
    pub fn distance(&self, other: &Position) -> f64 {
        self.distance_sq(other).sqrt()
    }
}

/// Velocity of a blop in world units per second.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Velocity {
    pub vx: f64,
    pub vy: f64,
}

impl Velocity {
    #[must_use]
    pub fn new(vx: f64, vy: f64) -> Self {
        Self { vx, vy }
    }

    #[inline]
    #[must_use]
    pub fn speed_sq(&self) -> f64 {
        self.vx * self.vx + self.vy * self.vy
    }

    #[must_use]
    pub fn speed(&self) -> f64 {
        self.speed_sq().sqrt()
    }
}

/// Opaque species tag. Indexes rows and columns of the relation matrix.
///
/// Colors and names live in configuration; the engine only ever sees this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeciesId(pub u16);

impl SpeciesId {
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

impl From<u16> for SpeciesId {
    fn from(id: u16) -> Self {
        Self(id)
    }
}

impl fmt::Display for SpeciesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single simulated particle.
///
/// `species` is fixed at creation; position and velocity are rewritten by
/// the simulation step every tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Blop {
    pub position: Position,
    pub velocity: Velocity,
    pub species: SpeciesId,
}

impl Blop {
    #[must_use]
    pub fn new(x: f64, y: f64, species: SpeciesId) -> Self {
        Self {
            position: Position::new(x, y),
            velocity: Velocity::default(),
            species,
        }
    }

    #[must_use]
    pub fn with_velocity(mut self, vx: f64, vy: f64) -> Self {
        self.velocity = Velocity::new(vx, vy);
        self
    }
}
