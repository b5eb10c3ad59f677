//! # Blops Core
//!
//! The simulation engine for Blops, a particle-life toy: a few species of
//! point particles that attract or repel each other according to a fixed
//! relation matrix, and in doing so form clusters, chains and chases.
//!
//! This crate contains:
//! - The species relation matrix
//! - A uniform-grid spatial index rebuilt every tick
//! - Pairwise force accumulation, integration and wall handling
//! - Configuration, error types and tick metrics
//!
//! ## Architecture
//!
//! Each tick is a two-phase pass over a contiguous `Vec<Blop>`:
//! - **Index**: the grid is rebuilt from the start-of-tick positions
//! - **Step**: every blop reads its 3×3 cell neighborhood from that frozen
//!   state and writes its next state into a staging buffer, in parallel
//!   with Rayon; the buffer is swapped in once all blops are done
//!
//! ## Example
//!
//! ```
//! use blops_core::config::AppConfig;
//! use blops_core::simulation::Simulation;
//!
//! let mut config = AppConfig::default();
//! config.world.per_species = 20;
//! config.world.seed = Some(42);
//!
//! let mut sim = Simulation::from_config(&config).unwrap();
//! for _ in 0..10 {
//!     sim.advance(1.0 / 60.0);
//! }
//! assert_eq!(sim.tick(), 10);
//! ```

/// Configuration management for simulation parameters
pub mod config;
/// Configuration error types
pub mod error;
/// Tick timing, rate estimate and logging setup
pub mod metrics;
/// Species affinity matrix
pub mod relation;
/// Tick orchestration
pub mod simulation;
/// Frame snapshots for renderers
pub mod snapshot;
/// Uniform grid for neighbor queries
pub mod spatial_hash;
/// Force, movement and statistics systems
pub mod systems;

pub use config::AppConfig;
pub use error::{Result, SimError};
pub use metrics::{init_logging, Metrics};
pub use relation::RelationModel;
pub use simulation::Simulation;
pub use spatial_hash::SpatialIndex;
pub use systems::Bounds;
