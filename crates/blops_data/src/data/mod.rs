//! Core data structures for the Blops simulation.

pub mod entity;
pub mod snapshot;
