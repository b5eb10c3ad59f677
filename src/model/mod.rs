pub use blops_core::{AppConfig, Bounds, RelationModel, SimError, Simulation, SpatialIndex};
pub use blops_data::{Blop, Position, SpeciesId, Velocity};

pub mod config {
    pub use blops_core::config::*;
}
pub mod error {
    pub use blops_core::error::*;
}
pub mod metrics {
    pub use blops_core::metrics::*;
}
pub mod relation {
    pub use blops_core::relation::*;
}
pub mod simulation {
    pub use blops_core::simulation::*;
}
pub mod snapshot {
    pub use blops_core::snapshot::*;
    pub use blops_data::{BlopSnapshot, SpeciesStats, WorldSnapshot};
}
pub mod spatial_hash {
    pub use blops_core::spatial_hash::*;
}
pub mod systems {
    pub use blops_core::systems::*;
}
