//! The component registry: one type-erased column per component type, the
//! entity allocator and the list of systems.
//!
//! Columns are stored behind `Box<dyn Any>` as `RefCell<SparseArray<T>>`.
//! Each entry also carries an eraser, a plain function pointer
//! monomorphised for its component type, so that killing an entity can
//! clear its slot in every column without knowing any of the types.

use std::any::Any;
use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;

use ecs_storage::{Component, ComponentMeta, ComponentTypeId, Entity, EntityPool, SparseArray};
use tracing::{debug, trace};

use crate::error::RegistryError;
use crate::system::{Columns, ComponentSet, FnSystem, System};

/// Clears one index of a type-erased column.
type EraseFn = fn(&mut dyn Any, usize);

fn erase<T: Component>(column: &mut dyn Any, index: usize) {
    if let Some(cell) = column.downcast_mut::<RefCell<SparseArray<T>>>() {
        cell.get_mut().clear(index);
    }
}

/// A registered column and its eraser.
struct ComponentEntry {
    column: Box<dyn Any>,
    erase_fn: EraseFn,
}

impl ComponentEntry {
    fn new<T: Component>() -> Self {
        Self {
            column: Box::new(RefCell::new(SparseArray::<T>::new())),
            erase_fn: erase::<T>,
        }
    }

    fn cell<T: Component>(&self) -> Option<&RefCell<SparseArray<T>>> {
        self.column.downcast_ref()
    }

    fn cell_mut<T: Component>(&mut self) -> Option<&mut RefCell<SparseArray<T>>> {
        self.column.downcast_mut()
    }

    fn erase(&mut self, index: usize) {
        (self.erase_fn)(&mut *self.column, index);
    }
}

fn names(order: &[ComponentMeta]) -> Vec<&'static str> {
    order.iter().map(|meta| meta.name).collect()
}

fn not_registered<T: Component>(order: &[ComponentMeta]) -> RegistryError {
    RegistryError::NotRegistered {
        requested: std::any::type_name::<T>(),
        registered: names(order),
    }
}

/// Owns every component column, the entity allocator and the systems.
pub struct Registry {
    /// Columns keyed by component type.
    columns: HashMap<ComponentTypeId, ComponentEntry>,
    /// Metadata of registered types, in registration order.
    registration_order: Vec<ComponentMeta>,
    /// Systems, in the order they run.
    systems: Vec<Box<dyn System>>,
    entities: EntityPool,
}

impl Registry {
    /// Create an empty registry with no components, entities or systems.
    #[must_use]
    pub fn new() -> Self {
        Self {
            columns: HashMap::new(),
            registration_order: Vec::new(),
            systems: Vec::new(),
            entities: EntityPool::new(),
        }
    }

    // -- Entity lifecycle --

    /// Allocate an entity, reusing the most recently killed index if any.
    pub fn spawn_entity(&mut self) -> Entity {
        let entity = self.entities.spawn();
        trace!(%entity, "spawned entity");
        entity
    }

    /// Allocate the entity with index `index`.
    ///
    /// A freed index is taken out of the reuse pool. An index past every
    /// index handed out so far is claimed directly, and the indices skipped
    /// over become available to [`Registry::spawn_entity`].
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::AlreadySpawned`](ecs_storage::StorageError)
    /// if `index` is alive.
    pub fn entity_from_index(&mut self, index: usize) -> Result<Entity, RegistryError> {
        let entity = self.entities.claim(index)?;
        trace!(%entity, "claimed entity");
        Ok(entity)
    }

    /// Clear `entity` from every column and return its index to the pool.
    ///
    /// Returns `false` if the entity was not alive. Its slots are cleared
    /// either way.
    pub fn kill_entity(&mut self, entity: Entity) -> bool {
        for entry in self.columns.values_mut() {
            entry.erase(entity.index());
        }
        let freed = self.entities.free(entity);
        debug!(%entity, freed, "killed entity");
        freed
    }

    /// Returns `true` if `entity` is allocated and not killed.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Number of alive entities.
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.entities.alive_count()
    }

    // -- Component operations --

    /// Create the column for `T`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::AlreadyRegistered`] if `T` already has a
    /// column.
    pub fn register_component<T: Component>(
        &mut self,
    ) -> Result<&mut SparseArray<T>, RegistryError> {
        let meta = ComponentMeta::of::<T>();
        if self.columns.contains_key(&meta.type_id) {
            return Err(RegistryError::AlreadyRegistered {
                requested: meta.name,
                registered: self.registered_components(),
            });
        }

        self.columns.insert(meta.type_id, ComponentEntry::new::<T>());
        self.registration_order.push(meta);
        debug!(component = meta.name, "registered component");
        self.get_component_mut::<T>()
    }

    /// Returns `true` if `T` has a column.
    #[must_use]
    pub fn is_registered<T: Component>(&self) -> bool {
        self.columns.contains_key(&ComponentTypeId::of::<T>())
    }

    /// Names of every registered component type, in registration order.
    #[must_use]
    pub fn registered_components(&self) -> Vec<&'static str> {
        names(&self.registration_order)
    }

    /// Number of registered component types.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.columns.len()
    }

    fn cell<T: Component>(&self) -> Result<&RefCell<SparseArray<T>>, RegistryError> {
        self.columns
            .get(&ComponentTypeId::of::<T>())
            .and_then(ComponentEntry::cell::<T>)
            .ok_or_else(|| not_registered::<T>(&self.registration_order))
    }

    /// Borrow the column for `T`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotRegistered`] if `T` has no column and
    /// [`RegistryError::ComponentBorrowed`] if it is mutably borrowed.
    pub fn get_component<T: Component>(&self) -> Result<Ref<'_, SparseArray<T>>, RegistryError> {
        self.cell::<T>()?
            .try_borrow()
            .map_err(|_| RegistryError::ComponentBorrowed {
                name: std::any::type_name::<T>(),
            })
    }

    /// Mutably borrow the column for `T` through a shared registry.
    ///
    /// The borrow is checked at runtime; this is how systems receive their
    /// columns.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotRegistered`] if `T` has no column and
    /// [`RegistryError::ComponentBorrowed`] if it is already borrowed.
    pub fn borrow_component_mut<T: Component>(
        &self,
    ) -> Result<RefMut<'_, SparseArray<T>>, RegistryError> {
        self.cell::<T>()?
            .try_borrow_mut()
            .map_err(|_| RegistryError::ComponentBorrowed {
                name: std::any::type_name::<T>(),
            })
    }

    /// Get the column for `T` mutably.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotRegistered`] if `T` has no column.
    pub fn get_component_mut<T: Component>(
        &mut self,
    ) -> Result<&mut SparseArray<T>, RegistryError> {
        let Self {
            columns,
            registration_order,
            ..
        } = self;
        match columns
            .get_mut(&ComponentTypeId::of::<T>())
            .and_then(ComponentEntry::cell_mut::<T>)
        {
            Some(cell) => Ok(cell.get_mut()),
            None => Err(not_registered::<T>(registration_order)),
        }
    }

    /// Store `value` as `entity`'s `T`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotRegistered`] if `T` has no column.
    pub fn add_component<T: Component>(
        &mut self,
        entity: Entity,
        value: T,
    ) -> Result<&mut T, RegistryError> {
        Ok(self.get_component_mut::<T>()?.insert(entity.index(), value))
    }

    /// Build `entity`'s `T` from `args`, dropping any previous value first.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotRegistered`] if `T` has no column.
    pub fn emplace_component<T, A>(&mut self, entity: Entity, args: A) -> Result<&mut T, RegistryError>
    where
        T: Component + From<A>,
    {
        Ok(self.get_component_mut::<T>()?.emplace(entity.index(), args))
    }

    /// Remove `entity`'s `T`. Removing a component the entity does not have
    /// is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotRegistered`] if `T` has no column.
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Result<(), RegistryError> {
        self.get_component_mut::<T>()?.clear(entity.index());
        Ok(())
    }

    /// Returns `true` if `entity` currently has a `T`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotRegistered`] if `T` has no column and
    /// [`RegistryError::ComponentBorrowed`] if it is mutably borrowed.
    pub fn has_component<T: Component>(&self, entity: Entity) -> Result<bool, RegistryError> {
        Ok(self.get_component::<T>()?.contains(entity.index()))
    }

    // -- Systems --

    /// Add a system working on the component types in `Q`.
    ///
    /// The system is named after its position, `system#<n>`. Component
    /// types are resolved when the system runs, so they do not need to be
    /// registered yet.
    pub fn add_system<Q, F>(&mut self, f: F)
    where
        Q: ComponentSet,
        F: for<'r> Fn(&'r Registry, f64, Columns<'r, Q>) + 'static,
    {
        let name = format!("system#{}", self.systems.len());
        self.add_named_system::<Q, F>(name, f);
    }

    /// Add a named system working on the component types in `Q`.
    pub fn add_named_system<Q, F>(&mut self, name: impl Into<String>, f: F)
    where
        Q: ComponentSet,
        F: for<'r> Fn(&'r Registry, f64, Columns<'r, Q>) + 'static,
    {
        let system = FnSystem::<Q, F>::new(name, f);
        debug!(
            system = system.name(),
            components = ?system.component_names(),
            "declared system components"
        );
        self.push_system(system);
    }

    /// Add an already-built system.
    pub fn push_system<S: System + 'static>(&mut self, system: S) {
        debug!(system = system.name(), index = self.systems.len(), "added system");
        self.systems.push(Box::new(system));
    }

    /// Number of systems.
    #[must_use]
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Run every system once, in the order they were added.
    ///
    /// # Errors
    ///
    /// Stops at the first system that fails and returns its error; later
    /// systems do not run.
    pub fn run_systems(&mut self, dt: f64) -> Result<(), RegistryError> {
        let this = &*self;
        for system in &this.systems {
            trace!(system = system.name(), dt, "running system");
            system.run(this, dt)?;
        }
        Ok(())
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("components", &self.registered_components())
            .field("systems", &self.systems.len())
            .field("entities", &self.entities)
            .finish()
    }
}
