//! # ecs_registry
//!
//! The runtime layer of the ECS: a registry owning one type-erased column
//! per component type, the entity allocator and an ordered list of systems,
//! plus a fixed-timestep loop that drives it.
//!
//! ```rust
//! use ecs_registry::Registry;
//! use ecs_storage::zip;
//!
//! struct Position(f32);
//! struct Velocity(f32);
//!
//! let mut registry = Registry::new();
//! registry.register_component::<Position>()?;
//! registry.register_component::<Velocity>()?;
//!
//! let e = registry.spawn_entity();
//! registry.add_component(e, Position(0.0))?;
//! registry.add_component(e, Velocity(2.0))?;
//!
//! registry.add_system::<(Position, Velocity), _>(|_, dt, columns| {
//!     let (mut positions, velocities) = columns.into_inner();
//!     for (pos, vel) in zip((&mut *positions, &*velocities)) {
//!         pos.0 += vel.0 * dt as f32;
//!     }
//! });
//! registry.run_systems(0.5)?;
//!
//! assert_eq!(registry.get_component::<Position>()?.get(e.index()).map(|p| p.0), Some(1.0));
//! # Ok::<(), ecs_registry::RegistryError>(())
//! ```

pub mod config;
pub mod error;
pub mod registry;
pub mod system;
pub mod tick;

pub use config::TickConfig;
pub use error::{ConfigError, RegistryError};
pub use registry::Registry;
pub use system::{Columns, ComponentSet, FnSystem, System};
pub use tick::TickLoop;
