//! Configuration management for simulation parameters.
//!
//! This module provides strongly-typed configuration structures that map to
//! the `config.toml` file. Every tunable of the force model lives here so a
//! run can be reproduced from its config plus seed.
//!
//! ## Configuration Hierarchy
//!
//! 1. Default values (hardcoded in `Default` impl)
//! 2. `config.toml` file (overrides defaults)
//! 3. Command-line flags on the `blops` binary (seed, tick count)
//!
//! ## Example `config.toml`
//!
//! ```toml
//! target_fps = 60
//! relations = [
//!     [0.3, -0.8],
//!     [-0.7, 0.2],
//! ]
//!
//! [world]
//! width = 1920.0
//! height = 1080.0
//! per_species = 150
//! seed = 42
//! deterministic = true
//!
//! [physics]
//! noise_amplitude = 0.0
//!
//! [[species]]
//! name = "P"
//! color = [255, 50, 150]
//!
//! [[species]]
//! name = "L"
//! color = [100, 255, 80]
//! ```

use crate::error::SimError;
use crate::relation::{RelationModel, DEFAULT_RELATIONS};
use serde::{Deserialize, Serialize};

/// World-level simulation configuration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f64,
    pub height: f64,
    /// Blops spawned for each configured species.
    pub per_species: usize,
    pub seed: Option<u64>,
    /// Reseed the tick RNG from `seed` and the tick number every tick.
    pub deterministic: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 1920.0,
            height: 1080.0,
            per_species: 150,
            seed: None,
            deterministic: false,
        }
    }
}

/// Force model and integration constants.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Side length of a spatial index cell.
    pub cell_size: f64,
    /// Pairs farther apart than this exert no force.
    pub interaction_radius: f64,
    /// Pairs with squared distance below this are skipped.
    pub min_distance_sq: f64,
    /// Symmetrized relations weaker than this count as no interaction.
    pub relation_epsilon: f64,
    /// Force magnitude at zero distance for a relation of 1.0.
    pub force_scale: f64,
    /// Multiplier applied to accumulated force before it reaches velocity.
    pub force_gain: f64,
    /// Per-tick velocity retention, applied regardless of `dt`.
    pub damping: f64,
    /// Half-width of the uniform per-axis random walk; 0 disables it.
    pub noise_amplitude: f64,
    pub max_speed: f64,
    /// Distance kept between blops and every wall.
    pub wall_margin: f64,
    /// Distance from the walls inside which blops are spawned.
    pub spawn_margin: f64,
    /// Initial velocity components are drawn from `[-initial_speed, initial_speed]`.
    pub initial_speed: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            cell_size: 200.0,
            interaction_radius: 300.0,
            min_distance_sq: 1.0,
            relation_epsilon: 0.01,
            force_scale: 150.0,
            force_gain: 0.015,
            damping: 0.95,
            noise_amplitude: 3.0,
            max_speed: 110.0,
            wall_margin: 15.0,
            spawn_margin: 50.0,
            initial_speed: 30.0,
        }
    }
}

impl PhysicsConfig {
    #[inline]
    #[must_use]
    pub fn interaction_radius_sq(&self) -> f64 {
        self.interaction_radius * self.interaction_radius
    }

    #[inline]
    #[must_use]
    pub fn max_speed_sq(&self) -> f64 {
        self.max_speed * self.max_speed
    }

    /// Checks every physics parameter the tick relies on.
    ///
    /// Sizes and the speed cap must be finite and positive, damping must be
    /// in `(0, 1]`, every other quantity finite and non-negative, and the
    /// spawn margin must not be smaller than the wall margin.
    pub fn validate(&self) -> crate::error::Result<()> {
        for (name, value) in [
            ("cell_size", self.cell_size),
            ("interaction_radius", self.interaction_radius),
            ("max_speed", self.max_speed),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SimError::invalid_parameter(format!(
                    "{name} must be finite and positive, got {value}"
                )));
            }
        }

        if !(self.damping > 0.0 && self.damping <= 1.0) {
            return Err(SimError::invalid_parameter(format!(
                "damping must be in (0, 1], got {}",
                self.damping
            )));
        }

        for (name, value) in [
            ("min_distance_sq", self.min_distance_sq),
            ("relation_epsilon", self.relation_epsilon),
            ("force_scale", self.force_scale),
            ("force_gain", self.force_gain),
            ("noise_amplitude", self.noise_amplitude),
            ("wall_margin", self.wall_margin),
            ("spawn_margin", self.spawn_margin),
            ("initial_speed", self.initial_speed),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SimError::invalid_parameter(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }

        if self.spawn_margin < self.wall_margin {
            return Err(SimError::invalid_parameter(format!(
                "spawn_margin {} is smaller than wall_margin {}",
                self.spawn_margin, self.wall_margin
            )));
        }

        Ok(())
    }

    /// Whether the 3×3 neighbor block is guaranteed to reach every partner
    /// inside the interaction radius.
    #[must_use]
    pub fn grid_covers_radius(&self) -> bool {
        self.cell_size >= self.interaction_radius
    }
}

/// Display properties for one species. Never consulted by the force model.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SpeciesConfig {
    pub name: String,
    pub color: [u8; 3],
}

impl SpeciesConfig {
    fn new(name: &str, color: [u8; 3]) -> Self {
        Self {
            name: name.to_string(),
            color,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub world: WorldConfig,
    pub physics: PhysicsConfig,
    pub species: Vec<SpeciesConfig>,
    pub relations: Vec<Vec<f64>>,
    pub target_fps: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            physics: PhysicsConfig::default(),
            species: vec![
                SpeciesConfig::new("P", [255, 50, 150]),
                SpeciesConfig::new("L", [100, 255, 80]),
                SpeciesConfig::new("C", [80, 220, 255]),
                SpeciesConfig::new("O", [255, 220, 50]),
            ],
            relations: DEFAULT_RELATIONS.iter().map(|r| r.to_vec()).collect(),
            target_fps: 60,
        }
    }
}

impl AppConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a description
    /// of the first validation failure.
    ///
    /// # Validation Rules
    /// - World must be larger than twice the wall and spawn margins
    /// - Relation matrix must be square, finite, within `[-1, 1]` and sized to
    ///   the species list
    /// - Physics parameters must pass [`PhysicsConfig::validate`]
    ///
    /// A cell size smaller than the interaction radius is accepted with a
    /// warning; the default configuration runs that way.
    pub fn validate(&self) -> anyhow::Result<()> {
        let w = &self.world;
        let p = &self.physics;

        self.physics.validate()?;

        // World validation
        anyhow::ensure!(
            w.width.is_finite() && w.height.is_finite(),
            "World dimensions must be finite"
        );
        anyhow::ensure!(
            w.width > 2.0 * p.wall_margin && w.height > 2.0 * p.wall_margin,
            "World must be larger than twice the wall margin"
        );
        anyhow::ensure!(
            w.width > 2.0 * p.spawn_margin && w.height > 2.0 * p.spawn_margin,
            "World must be larger than twice the spawn margin"
        );
        anyhow::ensure!(
            w.per_species <= 100_000,
            "Per-species population too large (max 100000)"
        );

        // Species / relation validation
        anyhow::ensure!(!self.species.is_empty(), "At least one species required");
        self.relation_model()?;

        // Target FPS validation
        anyhow::ensure!(self.target_fps > 0, "Target FPS must be positive");
        anyhow::ensure!(self.target_fps <= 240, "Target FPS too high (max 240)");

        if !p.grid_covers_radius() {
            tracing::warn!(
                cell_size = p.cell_size,
                interaction_radius = p.interaction_radius,
                "Cell size below interaction radius; distant partners outside the 3x3 block are ignored"
            );
        }

        Ok(())
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Builds the relation model for the configured species, labelled with
    /// their names.
    pub fn relation_model(&self) -> crate::error::Result<RelationModel> {
        let model = RelationModel::with_species_count(self.species.len(), &self.relations)?;
        Ok(model.with_labels(self.species.iter().map(|s| s.name.clone())))
    }

    /// Color for a species id, white when the palette has no entry.
    #[must_use]
    pub fn species_color(&self, species: blops_data::SpeciesId) -> [u8; 3] {
        self.species
            .get(species.index())
            .map_or([255, 255, 255], |s| s.color)
    }

    /// Hash of everything that affects the trajectory of a run.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.world).as_bytes());
        hasher.update(format!("{:?}", self.physics).as_bytes());
        hasher.update(format!("{:?}", self.relations).as_bytes());
        hex::encode(hasher.finalize())
    }
}
