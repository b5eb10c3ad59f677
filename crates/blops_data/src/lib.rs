//! Plain data types shared by the Blops simulation engine and its drivers.
//!
//! Nothing in here knows about forces, grids or randomness; these are the
//! values the engine reads and writes each tick and the snapshots handed to
//! whatever renders them.

pub mod data;

pub use data::entity::{Blop, Position, SpeciesId, Velocity};
pub use data::snapshot::{BlopSnapshot, SpeciesStats, WorldSnapshot};
