use crate::config::PhysicsConfig;
use blops_data::{Position, Velocity};
use rand::Rng;

/// World rectangle `[0, width] × [0, height]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether `p` lies inside the rectangle shrunk by `margin` on every side.
    #[must_use]
    pub fn contains(&self, p: &Position, margin: f64) -> bool {
        p.x >= margin && p.x <= self.width - margin && p.y >= margin && p.y <= self.height - margin
    }
}

pub struct MovementContext<'a> {
    pub position: &'a mut Position,
    pub velocity: &'a mut Velocity,
    pub force: (f64, f64),
    pub dt: f64,
    pub physics: &'a PhysicsConfig,
    pub bounds: Bounds,
}

/// Folds the accumulated force into velocity, then damps it.
///
/// Damping is applied once per call whatever `dt` is.
#[inline]
pub fn apply_force(velocity: &mut Velocity, force: (f64, f64), dt: f64, physics: &PhysicsConfig) {
    velocity.vx = (velocity.vx + force.0 * dt * physics.force_gain) * physics.damping;
    velocity.vy = (velocity.vy + force.1 * dt * physics.force_gain) * physics.damping;
}

/// Adds an independent uniform kick on each axis.
#[inline]
pub fn apply_noise<R: Rng + ?Sized>(velocity: &mut Velocity, dt: f64, amplitude: f64, rng: &mut R) {
    if amplitude <= 0.0 {
        return;
    }
    velocity.vx += rng.gen_range(-amplitude..=amplitude) * dt;
    velocity.vy += rng.gen_range(-amplitude..=amplitude) * dt;
}

/// Rescales `velocity` to exactly `max_speed` if it is faster.
///
/// When the speed overflows, each component is first pulled back to
/// `±max_speed` (NaN to 0) so the result is always finite.
#[inline]
pub fn clamp_speed(velocity: &mut Velocity, max_speed: f64) {
    let mut speed = velocity.vx.hypot(velocity.vy);
    if !speed.is_finite() {
        velocity.vx = finite_component(velocity.vx, max_speed);
        velocity.vy = finite_component(velocity.vy, max_speed);
        speed = velocity.vx.hypot(velocity.vy);
    }

    if speed > max_speed {
        let s = max_speed / speed;
        velocity.vx *= s;
        velocity.vy *= s;
    }
}

#[inline]
fn finite_component(v: f64, max_speed: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(-max_speed, max_speed)
    }
}

/// Clamps the position into the margin rectangle and turns the offending
/// velocity component to point back inside. Magnitude is kept.
pub fn reflect_at_walls(position: &mut Position, velocity: &mut Velocity, bounds: Bounds, margin: f64) {
    if position.x < margin {
        position.x = margin;
        velocity.vx = velocity.vx.abs();
    } else if position.x > bounds.width - margin {
        position.x = bounds.width - margin;
        velocity.vx = -velocity.vx.abs();
    }

    if position.y < margin {
        position.y = margin;
        velocity.vy = velocity.vy.abs();
    } else if position.y > bounds.height - margin {
        position.y = bounds.height - margin;
        velocity.vy = -velocity.vy.abs();
    }
}

/// Full per-blop integration: force, noise, speed cap, move, walls.
pub fn handle_movement<R: Rng + ?Sized>(ctx: MovementContext, rng: &mut R) {
    apply_force(ctx.velocity, ctx.force, ctx.dt, ctx.physics);
    apply_noise(ctx.velocity, ctx.dt, ctx.physics.noise_amplitude, rng);
    clamp_speed(ctx.velocity, ctx.physics.max_speed);

    ctx.position.x += ctx.velocity.vx * ctx.dt;
    ctx.position.y += ctx.velocity.vy * ctx.dt;

    reflect_at_walls(ctx.position, ctx.velocity, ctx.bounds, ctx.physics.wall_margin);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_apply_force_then_damp() {
        let physics = PhysicsConfig::default();
        let mut v = Velocity::new(10.0, 0.0);
        apply_force(&mut v, (100.0, -100.0), 1.0, &physics);
        // (10 + 1.5) * 0.95, (0 - 1.5) * 0.95
        assert!((v.vx - 10.925).abs() < 1e-12);
        assert!((v.vy + 1.425).abs() < 1e-12);
    }

    #[test]
    fn test_noise_bounded_and_disabled_at_zero() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..1000 {
            let mut v = Velocity::default();
            apply_noise(&mut v, 0.5, 3.0, &mut rng);
            assert!(v.vx.abs() <= 1.5 && v.vy.abs() <= 1.5);
        }

        let mut v = Velocity::new(1.0, 2.0);
        apply_noise(&mut v, 1.0, 0.0, &mut rng);
        assert_eq!(v, Velocity::new(1.0, 2.0));
    }

    #[test]
    fn test_clamp_speed_exact() {
        let mut v = Velocity::new(300.0, 400.0);
        clamp_speed(&mut v, 110.0);
        assert!((v.speed() - 110.0).abs() < 1e-9);
        assert!((v.vx / v.vy - 0.75).abs() < 1e-12);

        let mut slow = Velocity::new(3.0, 4.0);
        clamp_speed(&mut slow, 110.0);
        assert_eq!(slow, Velocity::new(3.0, 4.0));
    }

    #[test]
    fn test_clamp_speed_recovers_from_overflow() {
        let mut v = Velocity::new(f64::INFINITY, 5.0);
        clamp_speed(&mut v, 110.0);
        assert!(v.vx.is_finite() && v.vy.is_finite());
        assert!((v.speed() - 110.0).abs() < 1e-9);
        assert!(v.vx > 0.0);

        let mut v = Velocity::new(f64::NAN, f64::NEG_INFINITY);
        clamp_speed(&mut v, 110.0);
        assert_eq!(v, Velocity::new(0.0, -110.0));

        let mut v = Velocity::new(f64::MAX, f64::MAX);
        clamp_speed(&mut v, 110.0);
        assert!((v.speed() - 110.0).abs() < 1e-9);
    }

    #[test]
    fn test_reflect_left_and_bottom() {
        let bounds = Bounds::new(800.0, 600.0);
        let mut p = Position::new(3.0, 700.0);
        let mut v = Velocity::new(-20.0, 5.0);
        reflect_at_walls(&mut p, &mut v, bounds, 15.0);
        assert_eq!(p, Position::new(15.0, 585.0));
        assert_eq!(v, Velocity::new(20.0, -5.0));
    }

    #[test]
    fn test_reflect_keeps_inward_velocity_inward() {
        let bounds = Bounds::new(800.0, 600.0);
        let mut p = Position::new(900.0, 10.0);
        let mut v = Velocity::new(-7.0, 4.0);
        reflect_at_walls(&mut p, &mut v, bounds, 15.0);
        assert_eq!(p, Position::new(785.0, 15.0));
        assert_eq!(v, Velocity::new(-7.0, 4.0));
    }

    #[test]
    fn test_handle_movement_stays_inside() {
        let physics = PhysicsConfig::default();
        let bounds = Bounds::new(400.0, 300.0);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut p = Position::new(20.0, 290.0);
        let mut v = Velocity::new(-500.0, 500.0);
        handle_movement(
            MovementContext {
                position: &mut p,
                velocity: &mut v,
                force: (0.0, 0.0),
                dt: 1.0,
                physics: &physics,
                bounds,
            },
            &mut rng,
        );
        assert!(bounds.contains(&p, physics.wall_margin));
        assert!(v.speed_sq() <= physics.max_speed_sq() + 1e-6);
    }
}
