//! Particle components and the systems that move and age them.

use ecs_registry::{Registry, RegistryError};
use ecs_storage::{Entity, indexed_zip, zip};
use glam::Vec3;
use tracing::debug;

/// Downward acceleration applied to every particle with a velocity.
pub const GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);

/// Golden angle in radians, spreads launch directions evenly.
const GOLDEN_ANGLE: f32 = 2.399_963;

/// World-space position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position(pub Vec3);

/// Linear velocity in units per second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Velocity(pub Vec3);

/// Seconds left before the particle is reaped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lifetime {
    pub remaining: f32,
}

impl From<f32> for Lifetime {
    fn from(remaining: f32) -> Self {
        Self { remaining }
    }
}

/// Register the particle components and systems.
///
/// Systems run in the order gravity, movement, aging.
pub fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register_component::<Position>()?;
    registry.register_component::<Velocity>()?;
    registry.register_component::<Lifetime>()?;

    registry.add_named_system::<(Velocity,), _>("gravity", |_, dt, columns| {
        let (mut velocities,) = columns.into_inner();
        for (vel,) in zip((&mut *velocities,)) {
            vel.0 += GRAVITY * dt as f32;
        }
    });

    registry.add_named_system::<(Position, Velocity), _>("movement", |_, dt, columns| {
        let (mut positions, velocities) = columns.into_inner();
        for (pos, vel) in zip((&mut *positions, &*velocities)) {
            pos.0 += vel.0 * dt as f32;
        }
    });

    registry.add_named_system::<(Lifetime,), _>("aging", |_, dt, columns| {
        let (mut lifetimes,) = columns.into_inner();
        for (life,) in zip((&mut *lifetimes,)) {
            life.remaining -= dt as f32;
        }
    });

    Ok(())
}

/// Spawn `count` particles at the origin, launched upwards in a spiral.
///
/// Every fourth particle has no [`Lifetime`] and is never reaped.
pub fn spawn_particles(registry: &mut Registry, count: usize) -> Result<Vec<Entity>, RegistryError> {
    let mut spawned = Vec::with_capacity(count);
    for i in 0..count {
        let e = registry.spawn_entity();
        let angle = i as f32 * GOLDEN_ANGLE;
        let velocity = Vec3::new(angle.cos(), 5.0, angle.sin()) * 2.0;

        registry.add_component(e, Position(Vec3::ZERO))?;
        registry.add_component(e, Velocity(velocity))?;
        if i % 4 != 3 {
            registry.emplace_component::<Lifetime, _>(e, 0.5 + (i % 10) as f32 * 0.25)?;
        }
        spawned.push(e);
    }
    debug!(count, "spawned particles");
    Ok(spawned)
}

/// Kill every particle whose lifetime has run out. Returns how many died.
pub fn reap_expired(registry: &mut Registry) -> Result<usize, RegistryError> {
    let expired: Vec<Entity> = {
        let lifetimes = registry.get_component::<Lifetime>()?;
        lifetimes
            .iter_occupied()
            .filter(|(_, life)| life.remaining <= 0.0)
            .map(|(index, _)| Entity::from_index(index))
            .collect()
    };
    for &e in &expired {
        registry.kill_entity(e);
    }
    Ok(expired.len())
}

/// Mean position of every particle that is still moving.
pub fn centroid(registry: &Registry) -> Result<Option<Vec3>, RegistryError> {
    let positions = registry.get_component::<Position>()?;
    let velocities = registry.get_component::<Velocity>()?;
    let (sum, count) = indexed_zip((&*positions, &*velocities))
        .fold((Vec3::ZERO, 0usize), |(sum, count), (_, (pos, _))| (sum + pos.0, count + 1));
    Ok((count > 0).then(|| sum / count as f32))
}
