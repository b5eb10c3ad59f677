use crate::config::PhysicsConfig;
use crate::relation::RelationModel;
use crate::spatial_hash::SpatialIndex;
use blops_data::Blop;

/// Read-only inputs for force accumulation during one tick.
///
/// `blops` is the frozen start-of-tick state the index was built from.
pub struct ForceContext<'a> {
    pub blops: &'a [Blop],
    pub index: &'a SpatialIndex,
    pub relations: &'a RelationModel,
    pub physics: &'a PhysicsConfig,
}

/// Force that `other` exerts on `me`, or `None` when the pair does not
/// interact (out of range, near-coincident, or negligible relation).
///
/// Magnitude falls off linearly from `force_scale * |relation|` at zero
/// distance to nothing at the interaction radius. Positive relations pull
/// `me` toward `other`, negative ones push it away.
#[inline]
#[must_use]
pub fn pair_force(
    me: &Blop,
    other: &Blop,
    relations: &RelationModel,
    physics: &PhysicsConfig,
) -> Option<(f64, f64)> {
    let dx = other.position.x - me.position.x;
    let dy = other.position.y - me.position.y;
    let d2 = dx * dx + dy * dy;
    if d2 > physics.interaction_radius_sq() || d2 < physics.min_distance_sq {
        return None;
    }

    let relation = relations.symmetric(me.species, other.species);
    if relation.abs() < physics.relation_epsilon {
        return None;
    }

    let d = d2.sqrt();
    let force = relation.abs() * (1.0 - d / physics.interaction_radius) * physics.force_scale;
    let (nx, ny) = (dx / d, dy / d);
    if relation > 0.0 {
        Some((nx * force, ny * force))
    } else {
        Some((-nx * force, -ny * force))
    }
}

/// Sums the forces on blop `idx` from every other blop in the 3×3 cell
/// block around it.
///
/// The blop itself is excluded by index, so a distinct blop sitting on the
/// exact same spot is still considered (and then dropped by the minimum
/// distance check).
#[must_use]
pub fn accumulate_force(idx: usize, ctx: &ForceContext) -> (f64, f64) {
    let me = &ctx.blops[idx];
    let mut fx = 0.0;
    let mut fy = 0.0;

    for other_idx in ctx.index.neighbors_of_position(&me.position) {
        if other_idx == idx {
            continue;
        }
        if let Some((px, py)) =
            pair_force(me, &ctx.blops[other_idx], ctx.relations, ctx.physics)
        {
            fx += px;
            fy += py;
        }
    }

    (fx, fy)
}
