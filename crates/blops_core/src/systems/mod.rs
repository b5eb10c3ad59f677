//! Per-tick systems run by [`crate::simulation`].
//!
//! - `forces`: pairwise attraction/repulsion through the spatial index
//! - `movement`: damping, noise, speed cap, integration and walls
//! - `stats`: read-only population summaries

pub mod forces;
pub mod movement;
pub mod stats;

pub use forces::{accumulate_force, pair_force, ForceContext};
pub use movement::{handle_movement, Bounds, MovementContext};
pub use stats::species_stats;
