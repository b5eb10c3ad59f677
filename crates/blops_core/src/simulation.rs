use crate::config::{AppConfig, PhysicsConfig};
use crate::error::{Result, SimError};
use crate::relation::RelationModel;
use crate::spatial_hash::SpatialIndex;
use crate::systems::forces::{accumulate_force, ForceContext};
use crate::systems::movement::{handle_movement, Bounds, MovementContext};
use crate::systems::stats::species_stats;
use blops_data::{Blop, SpeciesId, SpeciesStats};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::time::Instant;

/// Read-only inputs shared by every blop during one tick.
pub struct StepContext<'a> {
    pub relations: &'a RelationModel,
    pub physics: &'a PhysicsConfig,
    pub bounds: Bounds,
    /// Base seed for this tick's per-blop noise streams.
    pub tick_seed: u64,
}

/// Seed of blop `idx`'s noise stream for a tick.
#[inline]
fn blop_seed(tick_seed: u64, idx: usize) -> u64 {
    tick_seed.wrapping_mul(0x517C_C1B7_2722_0A95) ^ (idx as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Advances `blops` by `dt` seconds.
///
/// 1. Rebuilds `index` from the current positions. Nothing is queried before
///    the rebuild completes.
/// 2. Computes every blop's next state in parallel from that frozen state,
///    writing into `staging`.
/// 3. Swaps `staging` into `blops`.
///
/// Because reads only touch the pre-tick slice, no blop ever sees another
/// blop's already-moved position. `staging` is scratch space; its previous
/// contents are discarded.
pub fn advance(
    blops: &mut Vec<Blop>,
    index: &mut SpatialIndex,
    staging: &mut Vec<Blop>,
    ctx: &StepContext,
    dt: f64,
) {
    index.rebuild(blops);

    let forces = ForceContext {
        blops: blops.as_slice(),
        index: &*index,
        relations: ctx.relations,
        physics: ctx.physics,
    };

    blops
        .par_iter()
        .enumerate()
        .map(|(idx, blop)| {
            let force = accumulate_force(idx, &forces);
            let mut next = *blop;
            let mut rng = ChaCha8Rng::seed_from_u64(blop_seed(ctx.tick_seed, idx));
            handle_movement(
                MovementContext {
                    position: &mut next.position,
                    velocity: &mut next.velocity,
                    force,
                    dt,
                    physics: ctx.physics,
                    bounds: ctx.bounds,
                },
                &mut rng,
            );
            next
        })
        .collect_into_vec(staging);

    std::mem::swap(blops, staging);
}

/// Owns the blop population and everything needed to step it.
///
/// ```
/// use blops_core::relation::DEFAULT_RELATIONS;
/// use blops_core::simulation::Simulation;
///
/// let matrix: Vec<Vec<f64>> = DEFAULT_RELATIONS.iter().map(|r| r.to_vec()).collect();
/// let mut sim = Simulation::initialize(4, 25, 1280.0, 720.0, &matrix).unwrap();
/// sim.advance(1.0 / 60.0);
/// assert_eq!(sim.blops().len(), 100);
/// assert_eq!(sim.tick(), 1);
/// ```
pub struct Simulation {
    blops: Vec<Blop>,
    staging: Vec<Blop>,
    index: SpatialIndex,
    relations: RelationModel,
    physics: PhysicsConfig,
    bounds: Bounds,
    rng: ChaCha8Rng,
    seed: Option<u64>,
    deterministic: bool,
    tick: u64,
}

impl Simulation {
    /// Seeds `per_species` blops of every species uniformly inside the spawn
    /// margin, with default physics and an entropy-seeded RNG.
    pub fn initialize(
        species_count: usize,
        per_species: usize,
        width: f64,
        height: f64,
        relation_matrix: &[Vec<f64>],
    ) -> Result<Self> {
        let relations = RelationModel::with_species_count(species_count, relation_matrix)?;
        Self::spawn(
            relations,
            PhysicsConfig::default(),
            Bounds::new(width, height),
            per_species,
            None,
            false,
        )
    }

    /// Builds a fresh population from a validated [`AppConfig`].
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::spawn(
            config.relation_model()?,
            config.physics.clone(),
            Bounds::new(config.world.width, config.world.height),
            config.world.per_species,
            config.world.seed,
            config.world.deterministic,
        )
    }

    fn spawn(
        relations: RelationModel,
        physics: PhysicsConfig,
        bounds: Bounds,
        per_species: usize,
        seed: Option<u64>,
        deterministic: bool,
    ) -> Result<Self> {
        physics.validate()?;
        check_bounds(bounds, &physics)?;
        let margin = physics.spawn_margin;
        if bounds.width <= 2.0 * margin || bounds.height <= 2.0 * margin {
            return Err(SimError::invalid_bounds(
                bounds.width,
                bounds.height,
                format!("no room inside spawn margin {margin}"),
            ));
        }

        let mut rng = make_rng(seed);
        let species_count = relations.species_count();
        let mut blops = Vec::with_capacity(species_count * per_species);
        for species in 0..species_count {
            for _ in 0..per_species {
                let x = rng.gen_range(margin..bounds.width - margin);
                let y = rng.gen_range(margin..bounds.height - margin);
                let (vx, vy) = if physics.initial_speed > 0.0 {
                    (
                        rng.gen_range(-physics.initial_speed..=physics.initial_speed),
                        rng.gen_range(-physics.initial_speed..=physics.initial_speed),
                    )
                } else {
                    (0.0, 0.0)
                };
                blops.push(Blop::new(x, y, SpeciesId(species as u16)).with_velocity(vx, vy));
            }
        }

        tracing::debug!(
            species = species_count,
            per_species,
            population = blops.len(),
            seed = ?seed,
            "Simulation initialized"
        );

        Ok(Self::assemble(blops, relations, physics, bounds, rng, seed, deterministic))
    }

    /// Wraps an explicit population, e.g. a hand-placed scenario.
    ///
    /// Every blop's species must be covered by `relations`, and its position
    /// and velocity must be finite.
    pub fn with_blops(
        blops: Vec<Blop>,
        relations: RelationModel,
        physics: PhysicsConfig,
        bounds: Bounds,
        seed: Option<u64>,
    ) -> Result<Self> {
        physics.validate()?;
        check_bounds(bounds, &physics)?;
        for (i, b) in blops.iter().enumerate() {
            relations.check_species(b.species)?;
            let (p, v) = (b.position, b.velocity);
            if !(p.x.is_finite() && p.y.is_finite() && v.vx.is_finite() && v.vy.is_finite()) {
                return Err(SimError::invalid_parameter(format!(
                    "blop {i} has a non-finite position or velocity"
                )));
            }
        }
        let rng = make_rng(seed);
        Ok(Self::assemble(blops, relations, physics, bounds, rng, seed, seed.is_some()))
    }

    fn assemble(
        blops: Vec<Blop>,
        relations: RelationModel,
        physics: PhysicsConfig,
        bounds: Bounds,
        rng: ChaCha8Rng,
        seed: Option<u64>,
        deterministic: bool,
    ) -> Self {
        Self {
            staging: Vec::with_capacity(blops.len()),
            index: SpatialIndex::new(physics.cell_size),
            blops,
            relations,
            physics,
            bounds,
            rng,
            seed,
            deterministic,
            tick: 0,
        }
    }

    /// Steps the whole population forward by `dt` seconds.
    ///
    /// A non-finite or negative `dt` leaves the state untouched.
    pub fn advance(&mut self, dt: f64) {
        if !dt.is_finite() || dt < 0.0 {
            tracing::warn!(dt, "Ignoring tick with invalid dt");
            return;
        }

        let start = Instant::now();
        self.tick += 1;
        let tick_seed = match (self.deterministic, self.seed) {
            (true, Some(seed)) => seed.wrapping_add(self.tick).wrapping_add(0x5EED),
            _ => self.rng.gen(),
        };

        let ctx = StepContext {
            relations: &self.relations,
            physics: &self.physics,
            bounds: self.bounds,
            tick_seed,
        };
        advance(&mut self.blops, &mut self.index, &mut self.staging, &ctx, dt);

        tracing::trace!(
            tick = self.tick,
            dt,
            elapsed_us = start.elapsed().as_micros() as u64,
            "Tick advanced"
        );
    }

    /// Like [`Simulation::advance`] after resizing the world, for callers
    /// whose window can change size between ticks.
    pub fn advance_in(&mut self, dt: f64, width: f64, height: f64) -> Result<()> {
        self.resize(width, height)?;
        self.advance(dt);
        Ok(())
    }

    pub fn resize(&mut self, width: f64, height: f64) -> Result<()> {
        let bounds = Bounds::new(width, height);
        check_bounds(bounds, &self.physics)?;
        self.bounds = bounds;
        Ok(())
    }

    #[must_use]
    pub fn blops(&self) -> &[Blop] {
        &self.blops
    }

    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Index as built at the start of the most recent tick.
    #[must_use]
    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    #[must_use]
    pub fn relations(&self) -> &RelationModel {
        &self.relations
    }

    #[must_use]
    pub fn physics(&self) -> &PhysicsConfig {
        &self.physics
    }

    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    #[must_use]
    pub fn stats(&self) -> Vec<SpeciesStats> {
        species_stats(&self.blops, self.relations.species_count())
    }
}

fn make_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn check_bounds(bounds: Bounds, physics: &PhysicsConfig) -> Result<()> {
    if !bounds.width.is_finite() || !bounds.height.is_finite() {
        return Err(SimError::invalid_bounds(bounds.width, bounds.height, "not finite"));
    }
    let margin = physics.wall_margin;
    if bounds.width <= 2.0 * margin || bounds.height <= 2.0 * margin {
        return Err(SimError::invalid_bounds(
            bounds.width,
            bounds.height,
            format!("no room inside wall margin {margin}"),
        ));
    }
    Ok(())
}
